//! # Front Core
//!
//! Deterministic combat and territory simulation core.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! This separation enables:
//! - Lockstep multiplayer (identical simulation across clients)
//! - Headless server builds
//! - Replay systems
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`executions`] - The simulation state machines (attacks, interception,
//!   trade, diplomacy one-shots)
//! - [`scheduler`] - Lockstep tick loop driving the executions
//! - [`world`] - Data model and the [`world::Game`] contract to the host
//! - [`config`] - Numeric gameplay policy, loaded from RON
//! - [`frontier`] - Priority-queue conquest frontier
//! - [`rng`] - Seeded pseudo-random source
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod error;
pub mod executions;
pub mod frontier;
pub mod math;
pub mod rng;
pub mod scheduler;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{GameError, Result};
    pub use crate::executions::{
        AllianceRequestExecution, AttackExecution, DonateTroopsExecution, EmbargoAction,
        EmbargoExecution, Execution, PortExecution, SamLauncherExecution, SamMissileExecution,
        ShellExecution, TradeShipExecution,
    };
    pub use crate::math::Fixed;
    pub use crate::rng::PseudoRandom;
    pub use crate::scheduler::Scheduler;
    pub use crate::world::{
        AllianceId, Attack, AttackId, AttackOutcome, Game, MessageType, NearbyUnit, PathStep,
        PathStepper, PlayerId, PlayerType, TerrainType, Tick, TileRef, Unit, UnitId, UnitKind,
    };
}
