//! Artillery shell in flight: chases a unit and applies damage on arrival.
//!
//! Unlike an interceptor, a shell does not destroy its target outright, and
//! it keeps flying for a configured grace period after its firing unit dies.

use crate::executions::{require_player, Execution};
use crate::world::{Game, PathStep, PathStepper, PlayerId, Tick, TileRef, UnitId, UnitKind};

/// Path steps a shell advances per tick.
const SHELL_SPEED: u32 = 3;

/// Execution flying one shell from a firing unit to its target.
pub struct ShellExecution {
    spawn: TileRef,
    owner: PlayerId,
    firer: UnitId,
    target: UnitId,
    shell: Option<UnitId>,
    path: Option<Box<dyn PathStepper>>,
    destroy_at: Option<Tick>,
    active: bool,
}

impl ShellExecution {
    /// Create a shell flight from `spawn` toward `target`, fired by `firer`.
    #[must_use]
    pub fn new(spawn: TileRef, owner: PlayerId, firer: UnitId, target: UnitId) -> Self {
        Self {
            spawn,
            owner,
            firer,
            target,
            shell: None,
            path: None,
            destroy_at: None,
            active: true,
        }
    }
}

impl Execution for ShellExecution {
    fn init(&mut self, world: &mut dyn Game, _tick: Tick) {
        if !require_player(world, self.owner, "ShellExecution") {
            self.active = false;
            return;
        }
        self.path = Some(world.path_finder());
    }

    fn tick(&mut self, world: &mut dyn Game, _tick: Tick) {
        if self.shell.is_none() {
            self.shell = Some(world.build_unit(self.owner, UnitKind::Shell, self.spawn));
        }
        let Some(shell_id) = self.shell else {
            self.active = false;
            return;
        };
        let Some(shell) = world.unit(shell_id) else {
            self.active = false;
            return;
        };
        if !shell.active {
            self.active = false;
            return;
        }

        let target = world.unit(self.target);
        let target_valid = target.is_some_and(|t| t.active && t.owner != shell.owner);
        let grace_expired = self
            .destroy_at
            .is_some_and(|deadline| world.ticks() >= deadline);
        if !target_valid || grace_expired {
            world.delete_unit(shell_id, false);
            self.active = false;
            return;
        }

        // The firer just died: keep flying for the configured lifetime.
        if self.destroy_at.is_none() && !world.unit(self.firer).is_some_and(|u| u.active) {
            self.destroy_at = Some(world.ticks() + u64::from(world.config().shell_lifetime));
        }

        let Some(path) = self.path.as_mut() else {
            self.active = false;
            return;
        };
        for _ in 0..SHELL_SPEED {
            let Some(current) = world.unit(shell_id) else {
                self.active = false;
                return;
            };
            let Some(target) = world.unit(self.target) else {
                self.active = false;
                return;
            };
            match path.next_tile(current.tile, target.tile) {
                PathStep::Arrived => {
                    self.active = false;
                    let damage = world.config().unit_damage(UnitKind::Shell);
                    world.modify_unit_health(self.target, -damage);
                    world.delete_unit(shell_id, false);
                    return;
                }
                PathStep::Next(tile) => world.move_unit(shell_id, tile),
            }
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn owner(&self) -> Option<PlayerId> {
        Some(self.owner)
    }
}
