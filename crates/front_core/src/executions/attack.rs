//! Territorial conquest: grow one player's territory into a target's
//! territory tile by tile until troops run out, the frontier is exhausted,
//! or the attack is cancelled.

use crate::executions::{require_player, Execution};
use crate::frontier::Frontier;
use crate::math::Fixed;
use crate::rng::PseudoRandom;
use crate::world::{AttackId, Game, MessageType, PlayerId, PlayerType, Tick, TileRef};

/// Percentage of remaining troops lost when retreating from a player
/// (conquering terra nullius retreats for free).
const RETREAT_MALUS_PERCENT: u32 = 25;

/// A player collapses once it holds fewer tiles than this.
const DEAD_DEFENDER_TILE_THRESHOLD: usize = 100;

/// Passes over a collapsed player's remnant tiles when partitioning them.
const PARTITION_PASSES: usize = 10;

/// Relation penalty the target applies toward the attacker on attack start.
const ATTACK_RELATION_PENALTY: i32 = -80;

/// Execution that expands `owner`'s border into `target`'s territory.
///
/// `target` of `None` attacks terra nullius. The per-execution RNG drives
/// frontier tie-breaking; its draw order is load-bearing for replays, so the
/// constant seed and the exact draw sequence are part of the contract.
pub struct AttackExecution {
    start_troops: Option<Fixed>,
    owner: PlayerId,
    target: Option<PlayerId>,
    source: Option<TileRef>,
    remove_troops: bool,

    attack: Option<AttackId>,
    frontier: Frontier,
    rng: PseudoRandom,
    break_alliance: bool,
    active: bool,
}

impl AttackExecution {
    /// Create a new attack execution.
    ///
    /// `start_troops` of `None` defers to the configured default commitment;
    /// `remove_troops` reserves the commitment out of the owner's pool on
    /// init. `source` of `None` attacks along the whole border.
    #[must_use]
    pub fn new(
        start_troops: Option<Fixed>,
        owner: PlayerId,
        target: Option<PlayerId>,
        source: Option<TileRef>,
        remove_troops: bool,
    ) -> Self {
        Self {
            start_troops,
            owner,
            target,
            source,
            remove_troops,
            attack: None,
            frontier: Frontier::new(),
            rng: PseudoRandom::new(123),
            break_alliance: false,
            active: true,
        }
    }

    /// The attacked player, or `None` for terra nullius.
    #[must_use]
    pub fn target(&self) -> Option<PlayerId> {
        self.target
    }

    fn refresh_frontier(&mut self, world: &dyn Game) {
        self.frontier.clear();
        for tile in world.border_tiles(self.owner) {
            self.add_neighbors(world, tile);
        }
    }

    /// Enqueue `tile`'s target-owned land neighbors as conquest candidates.
    ///
    /// Priority formula (reproduced exactly, including RNG draw order):
    /// `(rand(0,7) + 10) * (1 - 0.5*ownedNeighbors + mag/2) + tick`, where
    /// `mag` is the terrain magnitude of `tile` itself. More owner-owned
    /// neighbors mean lower priority (encirclement pressure); harder terrain
    /// and later enqueueing mean higher priority (conquered later).
    fn add_neighbors(&mut self, world: &dyn Game, tile: TileRef) {
        let tick = Fixed::from_num(world.ticks() as u32);
        let mag = world.terrain(tile).magnitude();
        let half = Fixed::from_num(0.5);

        for neighbor in world.neighbors(tile) {
            if world.is_water(neighbor) || world.owner_of(neighbor) != self.target {
                continue;
            }
            let owned_by_me = world
                .neighbors(neighbor)
                .iter()
                .filter(|&&t| world.owner_of(t) == Some(self.owner))
                .count();
            let roll = Fixed::from_num(self.rng.next_int(0, 7) + 10);
            let weight = Fixed::ONE - Fixed::from_num(owned_by_me as u32) * half + mag / 2;
            self.frontier.push(neighbor, roll * weight + tick);
        }
    }

    /// Refund remaining troops to the owner (minus the malus) and finish.
    fn retreat(&mut self, world: &mut dyn Game, malus_percent: u32) {
        let Some(attack_id) = self.attack else {
            self.active = false;
            return;
        };
        let Some(attack) = world.attack(attack_id) else {
            self.active = false;
            return;
        };
        let deaths = attack.troops * Fixed::from_num(malus_percent) / Fixed::from_num(100);
        if deaths > Fixed::ZERO {
            world.display_message(
                format!(
                    "Attack cancelled, {} soldiers killed during retreat",
                    deaths.to_num::<i64>()
                ),
                MessageType::Success,
                Some(self.owner),
            );
        }
        world.add_troops(self.owner, attack.troops - deaths);
        world.delete_attack(attack_id);
        self.active = false;
    }

    /// Collapse-and-partition a defender that fell below the tile threshold:
    /// its gold transfers to the attacker and its remnant tiles go to
    /// whichever player borders them, over a fixed number of passes.
    fn handle_dead_defender(&mut self, world: &mut dyn Game) {
        let Some(target) = self.target else { return };
        if world.num_tiles_owned(target) >= DEAD_DEFENDER_TILE_THRESHOLD {
            return;
        }

        let gold = world.gold(target);
        world.display_message(
            format!(
                "Conquered {} received {gold} gold",
                world.display_name(target)
            ),
            MessageType::Success,
            Some(self.owner),
        );
        world.remove_gold(target, gold);
        world.add_gold(self.owner, gold);

        for _ in 0..PARTITION_PASSES {
            for tile in world.tiles_owned(target) {
                let touches_owner = world
                    .neighbors(tile)
                    .iter()
                    .any(|&t| world.owner_of(t) == Some(self.owner));
                if touches_owner {
                    world.conquer(self.owner, tile);
                } else {
                    for neighbor in world.neighbors(tile) {
                        match world.owner_of(neighbor) {
                            Some(other) if other != target => {
                                world.conquer(other, tile);
                                break;
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
    }
}

impl Execution for AttackExecution {
    fn init(&mut self, world: &mut dyn Game, tick: Tick) {
        if !self.active {
            return;
        }
        if !require_player(world, self.owner, "AttackExecution") {
            self.active = false;
            return;
        }
        if let Some(target) = self.target {
            if !require_player(world, target, "AttackExecution target") {
                self.active = false;
                return;
            }
        }

        if let Some(target) = self.target {
            // Bots cannot trade, so they neither receive nor impose embargoes.
            if world.player_type(target) != PlayerType::Bot
                && world.player_type(self.owner) != PlayerType::Bot
            {
                world.add_embargo(target, self.owner);
            }
        }

        if Some(self.owner) == self.target {
            tracing::error!("player {:?} cannot attack itself", self.owner);
            self.active = false;
            return;
        }

        if self.target.is_some() && world.config().spawn_immunity_active(tick) {
            tracing::warn!("cannot attack player during immunity phase");
            self.active = false;
            return;
        }

        let mut troops = match self.start_troops {
            Some(troops) => troops,
            None => world
                .config()
                .attack_amount(world.troops(self.owner), world.player_type(self.owner)),
        };
        if self.remove_troops {
            troops = troops.min(world.troops(self.owner));
            world.remove_troops(self.owner, troops);
        }
        let attack_id = world.create_attack(self.owner, self.target, troops, self.source);
        self.attack = Some(attack_id);

        // The target's opposing attack cancels troop-for-troop: the larger
        // commitment survives with the difference.
        for incoming_id in world.incoming_attacks(self.owner) {
            let Some(incoming) = world.attack(incoming_id) else {
                continue;
            };
            if Some(incoming.owner) != self.target {
                continue;
            }
            let mine = world.attack(attack_id).map_or(Fixed::ZERO, |a| a.troops);
            if incoming.troops > mine {
                world.set_attack_troops(incoming_id, incoming.troops - mine);
                world.delete_attack(attack_id);
                self.active = false;
                return;
            }
            world.set_attack_troops(attack_id, mine - incoming.troops);
            world.delete_attack(incoming_id);
        }

        // An existing attack on the same target from the same source absorbs
        // this one instead of running in parallel.
        for outgoing_id in world.outgoing_attacks(self.owner) {
            if outgoing_id == attack_id {
                continue;
            }
            let Some(outgoing) = world.attack(outgoing_id) else {
                continue;
            };
            if outgoing.target == self.target && outgoing.source == self.source {
                let mine = world.attack(attack_id).map_or(Fixed::ZERO, |a| a.troops);
                world.set_attack_troops(outgoing_id, outgoing.troops + mine);
                self.active = false;
                world.delete_attack(attack_id);
                return;
            }
        }

        match self.source {
            // A breach point seeds the frontier from its neighbors only.
            Some(source) => self.add_neighbors(world, source),
            None => self.refresh_frontier(world),
        }

        if let Some(target) = self.target {
            if world.is_allied(self.owner, target) {
                // No diplomacy mutations during init; break next tick.
                self.break_alliance = true;
            }
            world.update_relation(target, self.owner, ATTACK_RELATION_PENALTY);
        }
    }

    fn tick(&mut self, world: &mut dyn Game, _tick: Tick) {
        let Some(attack_id) = self.attack else {
            self.active = false;
            return;
        };
        let Some(attack) = world.attack(attack_id) else {
            self.active = false;
            return;
        };

        if attack.retreated {
            let malus = if attack.target.is_some() {
                RETREAT_MALUS_PERCENT
            } else {
                0
            };
            self.retreat(world, malus);
            return;
        }
        if attack.retreating {
            return;
        }
        if !attack.active {
            self.active = false;
            return;
        }

        if self.break_alliance {
            if let Some(target) = self.target {
                if let Some(alliance) = world.alliance_between(self.owner, target) {
                    self.break_alliance = false;
                    world.break_alliance(alliance);
                }
            }
        }
        if let Some(target) = self.target {
            if world.is_allied(self.owner, target) {
                // A new alliance formed after the attack started.
                self.retreat(world, 0);
                return;
            }
        }

        let frontier_hint = self.frontier.border_len() + self.rng.next_int(0, 5) as usize;
        let mut budget = world.config().attack_tiles_per_tick(
            attack.troops,
            world.player_type(self.owner),
            self.target.is_some(),
            frontier_hint,
        );

        while budget > Fixed::ZERO {
            let troops = world.attack(attack_id).map_or(Fixed::ZERO, |a| a.troops);
            if troops < Fixed::ONE {
                // Died of attrition.
                world.delete_attack(attack_id);
                self.active = false;
                return;
            }

            let Some(tile) = self.frontier.pop() else {
                // No reachable enemy tiles left along this front.
                self.refresh_frontier(world);
                self.retreat(world, 0);
                return;
            };

            // Ownership may have shifted since enqueue; stale candidates are
            // skipped without spending budget.
            let on_border = world
                .neighbors(tile)
                .iter()
                .any(|&t| world.owner_of(t) == Some(self.owner));
            if world.owner_of(tile) != self.target || !on_border {
                continue;
            }

            self.add_neighbors(world, tile);
            let outcome = {
                let w: &dyn Game = &*world;
                w.config()
                    .attack_logic(w, troops, self.owner, self.target, tile)
            };
            budget -= outcome.tiles_used;
            world.set_attack_troops(attack_id, troops - outcome.attacker_loss);
            if let Some(target) = self.target {
                world.remove_troops(target, outcome.defender_loss);
            }
            world.conquer(self.owner, tile);
            self.handle_dead_defender(world);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn owner(&self) -> Option<PlayerId> {
        Some(self.owner)
    }
}
