//! Interval exchange transformations and their dynamical decomposition.
//!
//! The central type is [`IntervalExchangeTransformation`], a pair of orderings
//! of labeled intervals whose lengths live in a [`Ring`] of real numbers.
//! Rauzy-Veech/Zorich induction drives [`DynamicalDecomposition`], which
//! splits a transformation into components that are certified cylinders or
//! certified free of periodic trajectories, using the Sah-Arnoux-Fathi
//! invariant and Boshernitzan's criterion along the way.
//!
//! Length rings for machine integers, arbitrary precision integers and
//! rationals, and real quadratic number fields ship in [`sample`].

mod boshernitzan;
pub mod decomposition;
pub mod error;
pub mod iet;
pub mod label;
pub mod lengths;
pub mod linear;
pub mod registry;
pub mod ring;
pub mod saf;
pub mod sample;

pub use decomposition::{Component, DynamicalDecomposition};
pub use error::{Error, Result};
pub use iet::{Induction, InductionStep, IntervalExchangeTransformation};
pub use label::Label;
pub use lengths::Lengths;
pub use registry::LengthRegistry;
pub use ring::Ring;
pub use saf::SafInvariant;
