//! Ready-made length rings: machine integers, big integers, big rationals
//! and real quadratic number fields.

use std::cmp::Ordering;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::error::{Error, Result};
use crate::ring::Ring;

mod quadratic;

pub use quadratic::Quadratic;

impl Ring for i64 {
    fn zero() -> Self {
        0
    }

    fn is_positive(&self) -> bool {
        *self > 0
    }

    fn cmp(&self, rhs: &Self) -> Result<Ordering> {
        Ok(Ord::cmp(self, rhs))
    }

    fn add(&self, rhs: &Self) -> Result<Self> {
        self.checked_add(*rhs)
            .ok_or_else(|| Error::InvalidLengths(format!("{self} + {rhs} overflows")))
    }

    fn sub(&self, rhs: &Self) -> Result<Self> {
        self.checked_sub(*rhs)
            .ok_or_else(|| Error::InvalidLengths(format!("{self} - {rhs} overflows")))
    }

    fn mul(&self, rhs: &Self) -> Result<Self> {
        self.checked_mul(*rhs)
            .ok_or_else(|| Error::InvalidLengths(format!("{self} * {rhs} overflows")))
    }

    fn floor_div(&self, rhs: &Self) -> Result<(BigUint, Self)> {
        if *rhs <= 0 {
            return Err(Error::NegativeLength(format!("cannot divide by {rhs}")));
        }
        if *self < 0 {
            return Err(Error::NegativeLength(format!("cannot divide {self}")));
        }
        let quotient = self / rhs;
        Ok((BigUint::from(quotient as u64), self - quotient * rhs))
    }

    fn coefficients(&self) -> Vec<BigRational> {
        vec![BigRational::from_integer((*self).into())]
    }

    fn ring_name() -> &'static str {
        "int64"
    }
}

impl Ring for BigInt {
    fn zero() -> Self {
        Zero::zero()
    }

    fn is_positive(&self) -> bool {
        Signed::is_positive(self)
    }

    fn cmp(&self, rhs: &Self) -> Result<Ordering> {
        Ok(Ord::cmp(self, rhs))
    }

    fn add(&self, rhs: &Self) -> Result<Self> {
        Ok(self + rhs)
    }

    fn sub(&self, rhs: &Self) -> Result<Self> {
        Ok(self - rhs)
    }

    fn mul(&self, rhs: &Self) -> Result<Self> {
        Ok(self * rhs)
    }

    fn floor_div(&self, rhs: &Self) -> Result<(BigUint, Self)> {
        if !Signed::is_positive(rhs) {
            return Err(Error::NegativeLength(format!("cannot divide by {rhs}")));
        }
        let (quotient, remainder) = self.div_mod_floor(rhs);
        let quotient = quotient
            .to_biguint()
            .ok_or_else(|| Error::NegativeLength(format!("cannot divide {self}")))?;
        Ok((quotient, remainder))
    }

    fn coefficients(&self) -> Vec<BigRational> {
        vec![BigRational::from_integer(self.clone())]
    }

    fn ring_name() -> &'static str {
        "integer"
    }
}

impl Ring for BigRational {
    fn zero() -> Self {
        Zero::zero()
    }

    fn is_positive(&self) -> bool {
        Signed::is_positive(self)
    }

    fn cmp(&self, rhs: &Self) -> Result<Ordering> {
        Ok(Ord::cmp(self, rhs))
    }

    fn add(&self, rhs: &Self) -> Result<Self> {
        Ok(self + rhs)
    }

    fn sub(&self, rhs: &Self) -> Result<Self> {
        Ok(self - rhs)
    }

    fn mul(&self, rhs: &Self) -> Result<Self> {
        Ok(self * rhs)
    }

    fn floor_div(&self, rhs: &Self) -> Result<(BigUint, Self)> {
        if !Signed::is_positive(rhs) {
            return Err(Error::NegativeLength(format!("cannot divide by {rhs}")));
        }
        let quotient = (self / rhs).floor();
        let remainder = self - &quotient * rhs;
        let quotient = quotient
            .to_integer()
            .to_biguint()
            .ok_or_else(|| Error::NegativeLength(format!("cannot divide {self}")))?;
        Ok((quotient, remainder))
    }

    fn coefficients(&self) -> Vec<BigRational> {
        vec![self.clone()]
    }

    fn ring_name() -> &'static str {
        "rational"
    }
}
