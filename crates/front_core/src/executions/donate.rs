//! One-shot troop donation between players.

use crate::executions::{require_player, Execution};
use crate::math::Fixed;
use crate::world::{Game, PlayerId, Tick};

/// Relation bonus the recipient applies toward the sender.
const DONATION_RELATION_BONUS: i32 = 50;

/// Fire-and-forget donation: one effect on the first tick, then inactive,
/// never retried.
pub struct DonateTroopsExecution {
    sender: PlayerId,
    recipient: PlayerId,
    troops: Option<Fixed>,
    active: bool,
}

impl DonateTroopsExecution {
    /// Create a donation. `troops` of `None` uses the configured default.
    #[must_use]
    pub fn new(sender: PlayerId, recipient: PlayerId, troops: Option<Fixed>) -> Self {
        Self {
            sender,
            recipient,
            troops,
            active: true,
        }
    }
}

impl Execution for DonateTroopsExecution {
    fn init(&mut self, world: &mut dyn Game, _tick: Tick) {
        if !require_player(world, self.sender, "DonateTroopsExecution sender")
            || !require_player(world, self.recipient, "DonateTroopsExecution recipient")
        {
            self.active = false;
            return;
        }
        if self.troops.is_none() {
            self.troops = Some(
                world
                    .config()
                    .default_donation_amount(world.troops(self.sender)),
            );
        }
    }

    fn tick(&mut self, world: &mut dyn Game, _tick: Tick) {
        if world.can_donate(self.sender, self.recipient) {
            let troops = self.troops.unwrap_or(Fixed::ZERO);
            world.donate_troops(self.sender, self.recipient, troops);
            world.update_relation(self.recipient, self.sender, DONATION_RELATION_BONUS);
        } else {
            tracing::warn!(
                "cannot send troops from {:?} to {:?}",
                self.sender,
                self.recipient
            );
        }
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
