//! The execution state-machine family.
//!
//! An execution is one scheduled unit of simulation logic with an
//! `init`/`tick`/liveness lifecycle: `Uninitialized -> Active -> Inactive`,
//! terminal, no resurrection. The scheduler calls [`Execution::init`] exactly
//! once and [`Execution::tick`] once per simulation step while the execution
//! is active, and drops it once it reports inactive.
//!
//! Failure discipline: executions never return errors and never panic across
//! the scheduler boundary. A bad reference or rejected policy is logged via
//! `tracing` and resolved by deactivating; the scheduler only ever observes
//! the liveness flag.

mod alliance;
mod attack;
mod donate;
mod embargo;
mod port;
mod sam_launcher;
mod sam_missile;
mod shell;
mod trade;

pub use alliance::AllianceRequestExecution;
pub use attack::AttackExecution;
pub use donate::DonateTroopsExecution;
pub use embargo::{EmbargoAction, EmbargoExecution};
pub use port::PortExecution;
pub use sam_launcher::SamLauncherExecution;
pub use sam_missile::SamMissileExecution;
pub use shell::ShellExecution;
pub use trade::TradeShipExecution;

use crate::world::{Game, PlayerId, Tick};

/// One scheduled unit of simulation work.
pub trait Execution {
    /// Validate referenced entities and set up state. Called exactly once.
    /// Invalid references deactivate the execution without side effects.
    fn init(&mut self, world: &mut dyn Game, tick: Tick);

    /// Perform one step of work. May mutate world state, spawn new
    /// executions via [`Game::add_execution`], and/or go inactive.
    fn tick(&mut self, world: &mut dyn Game, tick: Tick);

    /// Whether this execution still wants to be ticked.
    fn is_active(&self) -> bool;

    /// The player this execution is attributed to, if any. Administrative
    /// executions (donation, embargo, alliance request) have none.
    fn owner(&self) -> Option<PlayerId> {
        None
    }

    /// Whether the scheduler may tick this execution during the pre-game
    /// spawn phase. Constant per execution type.
    fn active_during_spawn_phase(&self) -> bool {
        false
    }
}

/// Check that a player id resolves; log a warning naming `context` if not.
pub(crate) fn require_player(world: &dyn Game, id: PlayerId, context: &str) -> bool {
    if world.has_player(id) {
        true
    } else {
        tracing::warn!("{context}: player {id:?} not found");
        false
    }
}
