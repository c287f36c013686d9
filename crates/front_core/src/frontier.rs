//! Conquest frontier: priority-ordered tile candidates plus the border set.
//!
//! The frontier pairs a min-heap of `(tile, priority)` candidates with the
//! set of tiles currently pending conquest. Lower priority dequeues first.
//! A tile may be enqueued more than once (its priority context changes as
//! territory shifts); the border set deduplicates membership, and stale heap
//! entries are discarded by the conquest loop's validity checks.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::math::Fixed;
use crate::world::TileRef;

/// One conquest candidate. Lives only inside the frontier heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    tile: TileRef,
    priority: Fixed,
}

// BinaryHeap is a max-heap; reverse the comparison for min-priority-first.
// Ties break on tile index so the ordering is total and replay-stable.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.tile.cmp(&self.tile))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority-ordered set of tiles pending conquest.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: BinaryHeap<Candidate>,
    border: HashSet<TileRef>,
}

impl Frontier {
    /// Create an empty frontier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate tile with its priority.
    pub fn push(&mut self, tile: TileRef, priority: Fixed) {
        self.border.insert(tile);
        self.queue.push(Candidate { tile, priority });
    }

    /// Remove and return the lowest-priority tile, dropping it from the
    /// border set as well.
    pub fn pop(&mut self) -> Option<TileRef> {
        let candidate = self.queue.pop()?;
        self.border.remove(&candidate.tile);
        Some(candidate.tile)
    }

    /// Whether no candidates remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct tiles pending conquest.
    #[must_use]
    pub fn border_len(&self) -> usize {
        self.border.len()
    }

    /// Drop all candidates.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.border.clear();
    }
}
