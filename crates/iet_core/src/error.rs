use thiserror::Error;

use crate::label::Label;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the interval exchange engine.
///
/// Absence of a saddle connection is never an error; operations that search
/// for one report `Option` or enum outcomes instead. Every failed mutation
/// leaves its receiver unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid lengths: {0}")]
    InvalidLengths(String),

    #[error("label {0:?} is not valid here")]
    UnknownLabel(Label),

    #[error("length would become non-positive: {0}")]
    NegativeLength(String),

    #[error("incompatible rings: {0}")]
    RingMismatch(String),

    #[error("cannot serialize or deserialize: {0}")]
    UnsupportedSerialization(String),
}
