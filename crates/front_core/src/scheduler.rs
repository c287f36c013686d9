//! Lockstep execution scheduler.
//!
//! All simulation side effects happen inside executions, and executions run
//! strictly in registration order, one full pass per tick. Determinism
//! follows: identical initial state plus identical registration order yields
//! identical state on every peer, with no wall-clock or thread-timing input.
//!
//! Executions queued mid-tick (via [`Game::add_execution`]) are initialized
//! at the end of the tick and first ticked on the next one, so no execution
//! ever observes a peer that was created after it within the same tick.

use crate::executions::Execution;
use crate::world::Game;

/// Drives a world and its executions one lockstep tick at a time.
pub struct Scheduler<W: Game> {
    world: W,
    executions: Vec<Box<dyn Execution>>,
}

impl<W: Game> Scheduler<W> {
    /// Wrap a world with an empty execution list.
    #[must_use]
    pub fn new(world: W) -> Self {
        Self {
            world,
            executions: Vec::new(),
        }
    }

    /// Read access to the world, for assertions and state hashing.
    #[must_use]
    pub fn world(&self) -> &W {
        &self.world
    }

    /// Mutable access to the world, for scenario setup.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Number of executions currently scheduled (active or pending removal).
    #[must_use]
    pub fn execution_count(&self) -> usize {
        self.executions.len()
    }

    /// Queue an execution for activation on the next tick.
    pub fn add_execution(&mut self, execution: Box<dyn Execution>) {
        self.world.add_execution(execution);
    }

    /// Run one simulation tick: tick every active execution in registration
    /// order, drop the inactive ones, activate the queued ones, advance the
    /// world clock.
    pub fn tick(&mut self) {
        let tick = self.world.ticks();
        let spawn_phase = self.world.in_spawn_phase();

        for execution in &mut self.executions {
            if spawn_phase && !execution.active_during_spawn_phase() {
                continue;
            }
            if execution.is_active() {
                execution.tick(&mut self.world, tick);
            }
        }
        self.executions.retain(|execution| execution.is_active());

        for mut execution in self.world.take_pending_executions() {
            execution.init(&mut self.world, tick);
            if execution.is_active() {
                self.executions.push(execution);
            }
        }

        self.world.advance_tick();
    }

    /// Run `count` ticks back to back.
    pub fn run(&mut self, count: u64) {
        for _ in 0..count {
            self.tick();
        }
    }
}
