use std::cmp::Ordering;
use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::ring::Ring;

/// An element `a + b·√d` of a real quadratic number field ℚ(√d).
///
/// Rational values use the radicand 0 as a placeholder and are compatible
/// with every field; all other operands must agree on `d`.
#[derive(Debug, Clone, Serialize)]
pub struct Quadratic {
    d: u32,
    a: BigRational,
    b: BigRational,
}

impl Quadratic {
    /// The element `a + b·√d`; the radicand must not be a perfect square.
    pub fn new(d: u32, a: BigRational, b: BigRational) -> Result<Self> {
        let root = f64::from(d).sqrt().round() as u64;
        if d < 2 || root * root == u64::from(d) {
            return Err(Error::RingMismatch(format!("√{d} is not irrational")));
        }
        Ok(Quadratic { d, a, b })
    }

    /// A rational value, compatible with any quadratic field.
    pub fn rational(a: BigRational) -> Self {
        Quadratic {
            d: 0,
            a,
            b: Zero::zero(),
        }
    }

    pub fn sqrt(d: u32) -> Result<Self> {
        Quadratic::new(d, Zero::zero(), BigRational::from_integer(1.into()))
    }

    pub fn from_integers(d: u32, a: i64, b: i64) -> Result<Self> {
        Quadratic::new(
            d,
            BigRational::from_integer(a.into()),
            BigRational::from_integer(b.into()),
        )
    }

    fn same_field(&self, rhs: &Self) -> Result<u32> {
        if self.d == rhs.d {
            Ok(self.d)
        } else if self.b.is_zero() {
            Ok(rhs.d)
        } else if rhs.b.is_zero() {
            Ok(self.d)
        } else {
            Err(Error::RingMismatch(format!(
                "cannot combine values of ℚ(√{}) and ℚ(√{})",
                self.d, rhs.d
            )))
        }
    }

    fn sign(&self) -> Ordering {
        let zero: BigRational = Zero::zero();
        match (Ord::cmp(&self.a, &zero), Ord::cmp(&self.b, &zero)) {
            (Ordering::Equal, b) => b,
            (a, Ordering::Equal) => a,
            (Ordering::Greater, Ordering::Greater) => Ordering::Greater,
            (Ordering::Less, Ordering::Less) => Ordering::Less,
            (a, _) => {
                // The two terms have opposite signs; the larger square wins.
                let radicand = BigRational::from_integer(self.d.into());
                let squares = Ord::cmp(&(&self.a * &self.a), &(&self.b * &self.b * radicand));
                match a {
                    Ordering::Greater => squares,
                    _ => squares.reverse(),
                }
            }
        }
    }

    fn scale_int(&self, n: &BigInt) -> Self {
        let n = BigRational::from_integer(n.clone());
        Quadratic {
            d: self.d,
            a: &self.a * &n,
            b: &self.b * &n,
        }
    }

    /// The largest integer not exceeding `a + b·√d`, computed exactly.
    ///
    /// Brings the value to `(α + β·√d) / γ` over the integers; since `√(β²d)`
    /// is irrational for β ≠ 0, the integer square root of `β²d` pins the
    /// numerator between consecutive integers and the floor follows by
    /// integer division.
    fn floor(&self) -> BigInt {
        if self.b.is_zero() {
            return self.a.floor().to_integer();
        }
        let gamma = self.a.denom().lcm(self.b.denom());
        let alpha = self.a.numer() * (&gamma / self.a.denom());
        let beta = self.b.numer() * (&gamma / self.b.denom());
        let root = (&beta * &beta * BigInt::from(self.d)).sqrt();
        let numerator = if Signed::is_positive(&beta) {
            alpha + root
        } else {
            alpha - root - 1
        };
        numerator.div_floor(&gamma)
    }
}

impl PartialEq for Quadratic {
    fn eq(&self, rhs: &Self) -> bool {
        self.a == rhs.a && self.b == rhs.b && (self.d == rhs.d || self.b.is_zero())
    }
}

impl<'de> Deserialize<'de> for Quadratic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            d: u32,
            a: BigRational,
            b: BigRational,
        }

        // Snapshots go through the same radicand validation as constructed
        // values.
        let raw = Raw::deserialize(deserializer)?;
        if raw.d == 0 && raw.b.is_zero() {
            return Ok(Quadratic::rational(raw.a));
        }
        Quadratic::new(raw.d, raw.a, raw.b).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Quadratic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.b.is_zero() {
            write!(f, "{}", self.a)
        } else if self.a.is_zero() {
            write!(f, "{}*√{}", self.b, self.d)
        } else if self.b.is_negative() {
            write!(f, "{} - {}*√{}", self.a, -&self.b, self.d)
        } else {
            write!(f, "{} + {}*√{}", self.a, self.b, self.d)
        }
    }
}

impl Ring for Quadratic {
    fn zero() -> Self {
        Quadratic::rational(Zero::zero())
    }

    fn is_positive(&self) -> bool {
        self.sign() == Ordering::Greater
    }

    fn cmp(&self, rhs: &Self) -> Result<Ordering> {
        Ok(Ring::sub(self, rhs)?.sign())
    }

    fn add(&self, rhs: &Self) -> Result<Self> {
        let d = self.same_field(rhs)?;
        Ok(Quadratic {
            d,
            a: &self.a + &rhs.a,
            b: &self.b + &rhs.b,
        })
    }

    fn sub(&self, rhs: &Self) -> Result<Self> {
        let d = self.same_field(rhs)?;
        Ok(Quadratic {
            d,
            a: &self.a - &rhs.a,
            b: &self.b - &rhs.b,
        })
    }

    fn mul(&self, rhs: &Self) -> Result<Self> {
        let d = self.same_field(rhs)?;
        let radicand = BigRational::from_integer(d.into());
        Ok(Quadratic {
            d,
            a: &self.a * &rhs.a + &self.b * &rhs.b * radicand,
            b: &self.a * &rhs.b + &self.b * &rhs.a,
        })
    }

    fn floor_div(&self, rhs: &Self) -> Result<(BigUint, Self)> {
        if !Ring::is_positive(rhs) {
            return Err(Error::NegativeLength(format!("cannot divide by {rhs}")));
        }
        let d = self.same_field(rhs)?;
        let radicand = BigRational::from_integer(rhs.d.into());
        let norm = &rhs.a * &rhs.a - &rhs.b * &rhs.b * radicand;
        if norm.is_zero() {
            return Err(Error::RingMismatch(format!("{rhs} is not invertible")));
        }
        let inverse = Quadratic {
            d,
            a: &rhs.a / &norm,
            b: -&rhs.b / &norm,
        };
        let n = self.mul(&inverse)?.floor();
        let whole = n
            .to_biguint()
            .ok_or_else(|| Error::NegativeLength(format!("cannot divide {self} by {rhs}")))?;
        let remainder = Ring::sub(self, &rhs.scale_int(&n))?;
        Ok((whole, remainder))
    }

    fn coefficients(&self) -> Vec<BigRational> {
        vec![self.a.clone(), self.b.clone()]
    }

    fn ring_name() -> &'static str {
        "quadratic"
    }
}
