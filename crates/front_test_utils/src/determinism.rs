//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! Lockstep multiplayer requires the simulation to be 100% deterministic.
//! Sources of non-determinism include:
//!
//! - **Floating-point math**: Different CPUs can produce different results.
//!   We use fixed-point arithmetic via [`front_core::math::Fixed`] throughout.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   [`crate::TestWorld`] stores every arena in a `BTreeMap` and iterates in
//!   key order.
//!
//! - **System randomness**: No calls to `rand()` without explicit seeds.
//!   All "random" behavior uses seeded [`front_core::rng::PseudoRandom`]
//!   streams.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use front_core::scheduler::Scheduler;

use crate::world::TestWorld;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error
    /// message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Run a scheduler scenario multiple times and verify the final world
/// hashes match.
pub fn verify_scheduler_determinism<F>(runs: usize, ticks: u64, setup: F) -> DeterminismResult
where
    F: Fn() -> Scheduler<TestWorld>,
{
    verify_determinism(
        runs,
        ticks,
        setup,
        Scheduler::tick,
        |scheduler| scheduler.world().state_hash(),
    )
}

/// Compare two scheduler runs tick-by-tick, finding the first divergence.
///
/// Useful for debugging non-determinism by finding exactly when runs start
/// to differ.
///
/// # Returns
///
/// `None` if the runs match, `Some(tick)` for the first differing tick.
pub fn find_first_divergence<F>(setup: F, ticks: u64) -> Option<u64>
where
    F: Fn() -> Scheduler<TestWorld>,
{
    let mut left = setup();
    let mut right = setup();

    if left.world().state_hash() != right.world().state_hash() {
        return Some(0);
    }

    for tick in 1..=ticks {
        left.tick();
        right.tick();

        if left.world().state_hash() != right.world().state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Run N scheduler scenarios in parallel and verify they all match.
///
/// This catches non-determinism that only manifests under thread scheduling
/// variations or memory layout differences.
///
/// # Panics
///
/// Panics if a worker thread panics, or if the runs diverge.
pub fn verify_parallel_determinism<F>(setup: F, runs: usize, ticks: u64)
where
    F: Fn() -> Scheduler<TestWorld> + Sync,
{
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..runs)
            .map(|_| {
                s.spawn(|| {
                    let mut scheduler = setup();
                    scheduler.run(ticks);
                    scheduler.world().state_hash()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("simulation thread panicked"))
            .collect()
    });

    let result = DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        ticks,
    };
    result.assert_deterministic();
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n| *n += 1, |n| *n);

        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![100, 100, 100]);
    }

    #[test]
    fn test_empty_world_determinism() {
        let result =
            verify_scheduler_determinism(3, 50, || Scheduler::new(TestWorld::new(8, 8)));
        result.assert_deterministic();
    }

    #[test]
    fn test_find_divergence_on_identical_runs() {
        let divergence = find_first_divergence(|| Scheduler::new(TestWorld::new(8, 8)), 50);
        assert!(divergence.is_none(), "expected no divergence");
    }
}
