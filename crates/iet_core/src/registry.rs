use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::iet::IntervalExchangeTransformation;
use crate::label::Label;
use crate::lengths::Lengths;
use crate::ring::Ring;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<R: Ring> {
    ring: String,
    lengths: Lengths<R>,
    top: Vec<Label>,
    bottom: Vec<Label>,
    swapped: bool,
}

/// A registry of length rings that may appear in serialized transformations.
///
/// Snapshots are tagged with the [`Ring::ring_name`] of their coefficients so
/// that a reader can tell which ring to deserialize with before committing to
/// a concrete type.
#[derive(Debug, Default)]
pub struct LengthRegistry {
    known: HashSet<&'static str>,
}

impl LengthRegistry {
    pub fn new() -> Self {
        LengthRegistry::default()
    }

    /// Allows transformations over `R` to be saved and restored.
    pub fn register<R: Ring>(&mut self) {
        self.known.insert(R::ring_name());
    }

    pub fn is_registered<R: Ring>(&self) -> bool {
        self.known.contains(R::ring_name())
    }

    /// Serializes a transformation to a tagged JSON value.
    pub fn save<R: Ring>(&self, iet: &IntervalExchangeTransformation<R>) -> Result<Value> {
        if !self.is_registered::<R>() {
            return Err(Error::UnsupportedSerialization(format!(
                "ring {} has not been registered",
                R::ring_name()
            )));
        }
        let snapshot = Snapshot {
            ring: R::ring_name().to_string(),
            lengths: iet.lengths().clone(),
            top: iet.top().to_vec(),
            bottom: iet.bottom().to_vec(),
            swapped: iet.swapped(),
        };
        serde_json::to_value(&snapshot)
            .map_err(|e| Error::UnsupportedSerialization(e.to_string()))
    }

    /// Restores a transformation from a value produced by
    /// [`save`](Self::save). The ring tag must match `R` exactly.
    pub fn restore<R: Ring + DeserializeOwned>(
        &self,
        value: &Value,
    ) -> Result<IntervalExchangeTransformation<R>> {
        let ring = value
            .get("ring")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::UnsupportedSerialization("snapshot carries no ring tag".to_string())
            })?;
        if !self.known.contains(ring) {
            return Err(Error::UnsupportedSerialization(format!(
                "ring {ring} has not been registered"
            )));
        }
        if ring != R::ring_name() {
            return Err(Error::RingMismatch(format!(
                "snapshot over {} cannot be restored over {}",
                ring,
                R::ring_name()
            )));
        }

        let snapshot: Snapshot<R> = serde_json::from_value(value.clone())
            .map_err(|e| Error::UnsupportedSerialization(e.to_string()))?;
        IntervalExchangeTransformation::from_parts(
            snapshot.lengths,
            snapshot.top,
            snapshot.bottom,
            snapshot.swapped,
        )
    }
}
