//! One-shot trade embargo toggle.

use crate::executions::{require_player, Execution};
use crate::world::{Game, PlayerId, Tick};

/// Whether an embargo is being imposed or lifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbargoAction {
    /// Impose an embargo.
    Start,
    /// Lift an existing embargo.
    Stop,
}

/// Fire-and-forget embargo change by `player` against `target`.
pub struct EmbargoExecution {
    player: PlayerId,
    target: PlayerId,
    action: EmbargoAction,
    active: bool,
}

impl EmbargoExecution {
    /// Create an embargo change.
    #[must_use]
    pub fn new(player: PlayerId, target: PlayerId, action: EmbargoAction) -> Self {
        Self {
            player,
            target,
            action,
            active: true,
        }
    }
}

impl Execution for EmbargoExecution {
    fn init(&mut self, world: &mut dyn Game, _tick: Tick) {
        if !require_player(world, self.player, "EmbargoExecution sender")
            || !require_player(world, self.target, "EmbargoExecution recipient")
        {
            self.active = false;
        }
    }

    fn tick(&mut self, world: &mut dyn Game, _tick: Tick) {
        match self.action {
            EmbargoAction::Start => world.add_embargo(self.player, self.target),
            EmbargoAction::Stop => world.stop_embargo(self.player, self.target),
        }
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
