//! One-shot alliance request.

use crate::executions::{require_player, Execution};
use crate::world::{Game, PlayerId, Tick};

/// Fire-and-forget alliance request from `requestor` to `recipient`.
///
/// Skipped, not retried, if the two are already friendly or a request is
/// pending or was sent recently.
pub struct AllianceRequestExecution {
    requestor: PlayerId,
    recipient: PlayerId,
    active: bool,
}

impl AllianceRequestExecution {
    /// Create an alliance request.
    #[must_use]
    pub fn new(requestor: PlayerId, recipient: PlayerId) -> Self {
        Self {
            requestor,
            recipient,
            active: true,
        }
    }
}

impl Execution for AllianceRequestExecution {
    fn init(&mut self, world: &mut dyn Game, _tick: Tick) {
        if !require_player(world, self.requestor, "AllianceRequestExecution requester")
            || !require_player(world, self.recipient, "AllianceRequestExecution recipient")
        {
            self.active = false;
        }
    }

    fn tick(&mut self, world: &mut dyn Game, _tick: Tick) {
        if world.is_friendly(self.requestor, self.recipient) {
            tracing::warn!("already allied");
        } else if !world.can_send_alliance_request(self.requestor, self.recipient) {
            tracing::warn!("recent or pending alliance request");
        } else {
            world.create_alliance_request(self.requestor, self.recipient);
        }
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
