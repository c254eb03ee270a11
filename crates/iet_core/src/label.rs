use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

// Starts well clear of the deterministic ids handed out by Lengths::new.
static NEXT_LABEL: AtomicUsize = AtomicUsize::new(usize::MAX / 2);

/// An opaque identifier for a pair of intervals exchanged by an interval
/// exchange transformation.
///
/// A label carries no length and no name; those live in [`Lengths`] so that
/// several transformations produced by splitting one surface can keep sharing
/// the same identities. The wrapped integer exists for identity and
/// diagnostics only and has no intrinsic ordering semantics.
///
/// [`Lengths`]: crate::lengths::Lengths
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label(usize);

impl Label {
    /// A label distinct from every other label created this way in this
    /// process.
    pub fn fresh() -> Self {
        Label(NEXT_LABEL.fetch_add(1, Ordering::Relaxed))
    }

    /// A label with an explicit id, for deterministic construction.
    pub fn from_id(id: usize) -> Self {
        Label(id)
    }

    pub fn id(self) -> usize {
        self.0
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({})", self.0)
    }
}
