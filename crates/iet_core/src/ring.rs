use std::cmp::Ordering;
use std::fmt::{Debug, Display};

use num_bigint::BigUint;
use num_rational::BigRational;
use serde::Serialize;

use crate::error::Result;

/// The arithmetic an interval length must support.
///
/// Implementations wrap elements of an ordered ring of real numbers that is a
/// finite-dimensional vector space over the rationals, such as the integers,
/// the rationals, or a real quadratic number field. The engine never assumes
/// more than this trait: all induction, Boshernitzan and SAF computations are
/// phrased through it.
///
/// Arithmetic is checked. Operations that could leave the ring, mix
/// incompatible ring instances, or overflow report an [`Error`] instead of
/// panicking.
///
/// [`Error`]: crate::error::Error
pub trait Ring: Clone + PartialEq + Debug + Display + Serialize + Sized + 'static {
    /// The additive identity.
    fn zero() -> Self;

    /// Whether this value is strictly greater than zero.
    fn is_positive(&self) -> bool;

    /// Total order on compatible values.
    fn cmp(&self, rhs: &Self) -> Result<Ordering>;

    fn add(&self, rhs: &Self) -> Result<Self>;

    /// Checked subtraction. Fails when the difference cannot be represented.
    fn sub(&self, rhs: &Self) -> Result<Self>;

    /// Checked multiplication, used for exact cross-multiplied ratio
    /// comparisons.
    fn mul(&self, rhs: &Self) -> Result<Self>;

    /// Floor division of two positive values.
    ///
    /// Returns the integer quotient `q = ⌊self / rhs⌋` together with the
    /// remainder `self - q·rhs`, both exact. Must terminate in a bounded
    /// number of ring operations; the accelerated Zorich induction relies on
    /// this to skip long runs of identical Euclidean steps at once.
    fn floor_div(&self, rhs: &Self) -> Result<(BigUint, Self)>;

    /// The coordinates of this value over a fixed ℚ-basis of its ring.
    ///
    /// Degree-one rings (integers, rationals) report a single coordinate.
    /// Every length combined in one transformation must report the same
    /// number of coordinates.
    fn coefficients(&self) -> Vec<BigRational>;

    /// A stable tag identifying the ring for serialized snapshots.
    fn ring_name() -> &'static str;
}
