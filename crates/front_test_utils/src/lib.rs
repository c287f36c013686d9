//! # Front Test Utilities
//!
//! Shared testing utilities for all crates:
//! - In-memory reference world implementing the `Game` contract
//! - Deterministic grid path stepper
//! - Determinism test harness
//! - Fixture and scenario helpers

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod path;
pub mod world;

pub use path::GridStepper;
pub use world::TestWorld;

/// Re-export proptest for convenience.
pub use proptest;
