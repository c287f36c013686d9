//! SAM launcher: scans for hostile airborne munitions and fires
//! cooldown-gated, probabilistic interceptors at them.

use crate::executions::{require_player, Execution};
use crate::math::Fixed;
use crate::rng::PseudoRandom;
use crate::world::{Game, MessageType, PlayerId, Tick, TileRef, UnitId, UnitKind};

use super::sam_missile::SamMissileExecution;

/// Radius scanned for single bomb threats.
const SEARCH_RANGE_RADIUS: u32 = 80;
/// MIRV warheads move very fast, so they are detected much earlier...
const MIRV_WARHEAD_SEARCH_RADIUS: u32 = 400;
/// ...but only the ones detonating close by are engaged.
const MIRV_WARHEAD_PROTECTION_RADIUS: u32 = 50;

/// Execution driving one SAM launcher unit.
///
/// The launcher's RNG is seeded from its unit id once the unit exists, so
/// every launcher rolls an independent but replay-stable stream.
pub struct SamLauncherExecution {
    owner: PlayerId,
    tile: TileRef,
    sam: Option<UnitId>,
    rng: Option<PseudoRandom>,
    active: bool,
}

impl SamLauncherExecution {
    /// Create an execution that builds a new launcher at `tile`.
    #[must_use]
    pub fn new(owner: PlayerId, tile: TileRef) -> Self {
        Self {
            owner,
            tile,
            sam: None,
            rng: None,
            active: true,
        }
    }

    /// Create an execution driving an already-built launcher unit.
    #[must_use]
    pub fn for_unit(owner: PlayerId, sam: UnitId, tile: TileRef) -> Self {
        Self {
            owner,
            tile,
            sam: Some(sam),
            rng: None,
            active: true,
        }
    }

    /// Best single threat in range: hydrogen bombs beat atom bombs, then
    /// nearer (squared distance) beats farther. Claimed threats are still
    /// selected; the engagement step holds fire on them rather than falling
    /// back to a lesser threat.
    fn single_target(&self, world: &dyn Game, sam_tile: TileRef) -> Option<UnitId> {
        let mut nukes: Vec<(u64, UnitKind, UnitId)> = world
            .nearby_units(
                sam_tile,
                SEARCH_RANGE_RADIUS,
                &[UnitKind::AtomBomb, UnitKind::HydrogenBomb],
            )
            .into_iter()
            .filter_map(|nearby| {
                let unit = world.unit(nearby.id)?;
                if unit.owner == self.owner || world.is_friendly(self.owner, unit.owner) {
                    return None;
                }
                Some((nearby.dist_squared, unit.kind, nearby.id))
            })
            .collect();

        nukes.sort_by(|a, b| {
            let a_hydrogen = a.1 == UnitKind::HydrogenBomb;
            let b_hydrogen = b.1 == UnitKind::HydrogenBomb;
            b_hydrogen.cmp(&a_hydrogen).then_with(|| a.0.cmp(&b.0))
        });
        nukes.first().map(|&(_, _, id)| id)
    }

    /// Hostile warheads detonating within the protection radius.
    fn warhead_targets(&self, world: &dyn Game, sam_tile: TileRef) -> Vec<UnitId> {
        world
            .nearby_units(sam_tile, MIRV_WARHEAD_SEARCH_RADIUS, &[UnitKind::MirvWarhead])
            .into_iter()
            .filter_map(|nearby| {
                let unit = world.unit(nearby.id)?;
                if unit.owner == self.owner || world.is_friendly(self.owner, unit.owner) {
                    return None;
                }
                let detonation = unit.detonation_dst?;
                if world.manhattan_dist(detonation, sam_tile) < MIRV_WARHEAD_PROTECTION_RADIUS {
                    Some(nearby.id)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Interception rule: atom bombs are always hit, warhead groups and
    /// hydrogen bombs roll against their configured chances.
    fn is_hit(world: &dyn Game, kind: UnitKind, roll: Fixed) -> bool {
        match kind {
            UnitKind::AtomBomb => true,
            UnitKind::MirvWarhead => roll < world.config().sam_warhead_hitting_chance,
            _ => roll < world.config().sam_hitting_chance,
        }
    }
}

impl Execution for SamLauncherExecution {
    fn init(&mut self, world: &mut dyn Game, _tick: Tick) {
        if !require_player(world, self.owner, "SamLauncherExecution") {
            self.active = false;
            return;
        }
        if let Some(sam) = self.sam {
            if let Some(unit) = world.unit(sam) {
                self.tile = unit.tile;
            }
        }
    }

    fn tick(&mut self, world: &mut dyn Game, _tick: Tick) {
        if self.sam.is_none() {
            match world.can_build(self.owner, UnitKind::SamLauncher, self.tile) {
                Some(spawn) => {
                    self.sam = Some(world.build_unit(self.owner, UnitKind::SamLauncher, spawn));
                }
                None => {
                    tracing::warn!("cannot build SAM launcher at {:?}", self.tile);
                    self.active = false;
                    return;
                }
            }
        }
        let Some(sam_id) = self.sam else {
            self.active = false;
            return;
        };
        let Some(sam) = world.unit(sam_id) else {
            self.active = false;
            return;
        };
        if !sam.active {
            self.active = false;
            return;
        }

        // Ownership follows the unit when the launcher is captured.
        if self.owner != sam.owner {
            self.owner = sam.owner;
        }

        if self.rng.is_none() {
            self.rng = Some(PseudoRandom::new(sam_id.0));
        }

        let warheads = self.warhead_targets(world, sam.tile);
        // Any warhead group preempts single-target engagements this tick.
        let target = if warheads.is_empty() {
            self.single_target(world, sam.tile)
        } else {
            None
        };

        if world.unit_in_cooldown(sam_id) {
            return;
        }

        let Some(rng) = self.rng.as_mut() else {
            return;
        };

        if !warheads.is_empty() {
            world.start_unit_cooldown(sam_id, world.config().sam_cooldown);
            let roll = rng.next_fixed();
            if Self::is_hit(world, UnitKind::MirvWarhead, roll) {
                world.display_message(
                    format!("{} MIRV warheads intercepted", warheads.len()),
                    MessageType::Success,
                    Some(self.owner),
                );
                for warhead in warheads {
                    world.delete_unit(warhead, true);
                }
            } else {
                world.display_message(
                    "Missile failed to intercept MirvWarhead".to_string(),
                    MessageType::Error,
                    Some(self.owner),
                );
            }
        } else if let Some(target_id) = target {
            let Some(target_unit) = world.unit(target_id) else {
                return;
            };
            // Another launcher already claimed the pick; no draw, no cooldown.
            if target_unit.targeted_by_sam {
                return;
            }
            world.start_unit_cooldown(sam_id, world.config().sam_cooldown);
            let roll = rng.next_fixed();
            if Self::is_hit(world, target_unit.kind, roll) {
                world.set_unit_targeted(target_id, true);
                world.add_execution(Box::new(SamMissileExecution::new(
                    sam.tile, self.owner, sam_id, target_id,
                )));
            } else {
                world.display_message(
                    format!("Missile failed to intercept {:?}", target_unit.kind),
                    MessageType::Error,
                    Some(self.owner),
                );
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
