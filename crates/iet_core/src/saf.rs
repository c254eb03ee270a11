use num_rational::BigRational;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::iet::IntervalExchangeTransformation;
use crate::ring::Ring;

/// The Sah-Arnoux-Fathi invariant of an interval exchange transformation.
///
/// An antisymmetric tensor over ℚ, stored as the `d·(d-1)/2` independent
/// wedge coordinates where `d` is the degree of the lengths over ℚ. It is
/// empty in degree one, stays fixed under induction up to the sign flipped by
/// [`IntervalExchangeTransformation::swap`], and a zero invariant signals
/// that Boshernitzan's criterion is not going to be useful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafInvariant(Vec<BigRational>);

impl SafInvariant {
    pub fn coordinates(&self) -> &[BigRational] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Zero::is_zero)
    }
}

fn wedge(v1: &[BigRational], v2: &[BigRational]) -> Vec<BigRational> {
    let d = v1.len();
    if d == 0 {
        return Vec::new();
    }
    let mut result = Vec::with_capacity(d * (d - 1) / 2);
    for i in 0..d - 1 {
        for j in i + 1..d {
            result.push(&v1[i] * &v2[j] - &v1[j] * &v2[i]);
        }
    }
    result
}

impl<R: Ring> IntervalExchangeTransformation<R> {
    /// The Sah-Arnoux-Fathi invariant, the sum of the wedges of coefficient
    /// and translation vectors over all intervals.
    pub fn saf_invariant(&self) -> Result<SafInvariant> {
        if self.degree <= 1 {
            return Ok(SafInvariant(Vec::new()));
        }
        let mut invariant: Vec<BigRational> =
            vec![Zero::zero(); self.degree * (self.degree - 1) / 2];
        for &label in &self.top {
            let contribution = wedge(&self.coefficients(label)?, &self.translation(label)?);
            for (sum, value) in invariant.iter_mut().zip(contribution) {
                *sum = &*sum + &value;
            }
        }
        Ok(SafInvariant(invariant))
    }
}
