//! Interceptor missile in flight: chases a nuke tile by tile and deletes it
//! outright on arrival.

use crate::executions::{require_player, Execution};
use crate::world::{Game, MessageType, PathStep, PathStepper, PlayerId, Tick, TileRef, UnitId};
use crate::world::UnitKind;

/// Path steps an interceptor advances per tick.
const MISSILE_SPEED: u32 = 12;

/// Execution flying one SAM missile from a launcher to its target.
pub struct SamMissileExecution {
    spawn: TileRef,
    owner: PlayerId,
    launcher: UnitId,
    target: UnitId,
    speed: u32,
    missile: Option<UnitId>,
    path: Option<Box<dyn PathStepper>>,
    active: bool,
}

impl SamMissileExecution {
    /// Create a missile flight from `spawn` toward `target`.
    #[must_use]
    pub fn new(spawn: TileRef, owner: PlayerId, launcher: UnitId, target: UnitId) -> Self {
        Self {
            spawn,
            owner,
            launcher,
            target,
            speed: MISSILE_SPEED,
            missile: None,
            path: None,
            active: true,
        }
    }
}

impl Execution for SamMissileExecution {
    fn init(&mut self, world: &mut dyn Game, _tick: Tick) {
        if !require_player(world, self.owner, "SamMissileExecution") {
            self.active = false;
            return;
        }
        self.path = Some(world.path_finder());
    }

    fn tick(&mut self, world: &mut dyn Game, _tick: Tick) {
        if self.missile.is_none() {
            self.missile = Some(world.build_unit(self.owner, UnitKind::SamMissile, self.spawn));
        }
        let Some(missile_id) = self.missile else {
            self.active = false;
            return;
        };
        let Some(missile) = world.unit(missile_id) else {
            self.active = false;
            return;
        };
        if !missile.active {
            self.active = false;
            return;
        }

        // Fizzle without effect once the chase no longer makes sense: target
        // gone, launcher gone, target captured by a friend, or target no
        // longer a chaseable nuke (warheads are never chased).
        let target = world.unit(self.target);
        let launcher_alive = world.unit(self.launcher).is_some_and(|u| u.active);
        let valid = target.is_some_and(|t| {
            t.active
                && launcher_alive
                && t.owner != missile.owner
                && t.kind.is_interceptable_nuke()
        });
        if !valid {
            world.delete_unit(missile_id, false);
            self.active = false;
            return;
        }

        let Some(path) = self.path.as_mut() else {
            self.active = false;
            return;
        };
        for _ in 0..self.speed {
            let Some(current) = world.unit(missile_id) else {
                self.active = false;
                return;
            };
            let Some(target) = world.unit(self.target) else {
                self.active = false;
                return;
            };
            match path.next_tile(current.tile, target.tile) {
                PathStep::Arrived => {
                    world.display_message(
                        format!("Missile intercepted {:?}", target.kind),
                        MessageType::Success,
                        Some(self.owner),
                    );
                    self.active = false;
                    world.delete_unit(self.target, true);
                    world.delete_unit(missile_id, false);
                    return;
                }
                PathStep::Next(tile) => world.move_unit(missile_id, tile),
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
