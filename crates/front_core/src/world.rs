//! The simulation data model and the narrow contracts to the outside world.
//!
//! Executions never hold live references into world state. They hold opaque
//! ids ([`PlayerId`], [`UnitId`], [`AttackId`], [`TileRef`]) and re-resolve
//! them through the [`Game`] trait every tick, so ownership changes, deaths
//! and deletions between ticks are always observed instead of aliased.
//!
//! The concrete world (tile grid, player storage, spatial queries) lives
//! behind the [`Game`] trait: the core mutates it but does not implement it.
//! `front_test_utils` ships an in-memory reference implementation for tests.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::executions::Execution;
use crate::math::{fixed_serde, Fixed};

/// Simulation tick counter type.
pub type Tick = u64;

/// Opaque player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Opaque unit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Opaque attack identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttackId(pub u32);

/// Opaque alliance identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AllianceId(pub u32);

/// Reference to a map tile (index into the world's tile grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileRef(pub u32);

/// Who is driving a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerType {
    /// Human-controlled player.
    Human,
    /// Scripted bot. Bots neither trade nor impose embargoes.
    Bot,
}

/// Terrain classification of a land tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    /// Flat land, cheapest to conquer.
    Plains,
    /// Elevated land, slower to conquer.
    Highland,
    /// Mountains, slowest to conquer.
    Mountain,
    /// Water. Never conquered, never part of a frontier.
    Water,
}

impl TerrainType {
    /// Conquest difficulty magnitude used by the frontier priority formula
    /// and combat resolution: plains 1, highland 1.5, mountain 2.
    #[must_use]
    pub fn magnitude(self) -> Fixed {
        match self {
            TerrainType::Plains => Fixed::from_num(1),
            TerrainType::Highland => Fixed::from_num(1.5),
            TerrainType::Mountain => Fixed::from_num(2),
            TerrainType::Water => Fixed::ZERO,
        }
    }
}

/// Kind of a world unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Anti-missile launcher structure.
    SamLauncher,
    /// Interceptor in flight, spawned by a launcher.
    SamMissile,
    /// Artillery shell in flight.
    Shell,
    /// Fission bomb. The weakest airborne munition; always interceptable.
    AtomBomb,
    /// Fusion bomb. Prioritized by launchers over atom bombs.
    HydrogenBomb,
    /// One warhead of a multi-warhead strike. Intercepted only in groups.
    MirvWarhead,
    /// Harbor structure that spawns trade ships.
    Port,
    /// Trade ship in transit between two ports.
    TradeShip,
    /// Shell-firing warship.
    Warship,
}

impl UnitKind {
    /// Whether interceptor missiles may chase this kind. Warheads move too
    /// fast for a chase and are only destroyed by the group roll.
    #[must_use]
    pub fn is_interceptable_nuke(self) -> bool {
        matches!(self, UnitKind::AtomBomb | UnitKind::HydrogenBomb)
    }
}

/// Severity of a user-facing message emitted through the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    /// Neutral information.
    Info,
    /// Positive outcome for the addressed player.
    Success,
    /// Negative outcome for the addressed player.
    Error,
}

/// One active offensive action from an owner against a target.
///
/// `target` of `None` means terra nullius (unclaimed land). The troop count
/// never goes negative: [`Attack::set_troops`] only clamps at zero; deleting
/// the attack when troops are exhausted is the attack execution's job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    /// Identifier of this attack in the world's arena.
    pub id: AttackId,
    /// Attacking player.
    pub owner: PlayerId,
    /// Attacked player, or `None` for terra nullius.
    pub target: Option<PlayerId>,
    /// Troops still committed to this attack.
    #[serde(with = "fixed_serde")]
    pub troops: Fixed,
    /// Breach point the attack started from; `None` means the whole border.
    pub source: Option<TileRef>,
    /// Retreat was requested and is pending resolution by the execution.
    pub retreated: bool,
    /// Retreat is in progress; the execution idles while this is set.
    pub retreating: bool,
    /// Liveness flag; cleared when the attack is deleted.
    pub active: bool,
}

impl Attack {
    /// Set the troop count, clamping at zero.
    pub fn set_troops(&mut self, troops: Fixed) {
        self.troops = troops.max(Fixed::ZERO);
    }
}

/// Snapshot of one world unit.
///
/// Returned by value from [`Game::unit`]; mutations go back through the
/// trait so the world stays the single source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Identifier of this unit in the world's arena.
    pub id: UnitId,
    /// What the unit is.
    pub kind: UnitKind,
    /// Current owner. May change via conquest.
    pub owner: PlayerId,
    /// Tile the unit currently occupies.
    pub tile: TileRef,
    /// Remaining health.
    #[serde(with = "fixed_serde")]
    pub health: Fixed,
    /// Liveness flag; cleared when the unit is destroyed.
    pub active: bool,
    /// Whether a launcher has already claimed this unit as its target.
    pub targeted_by_sam: bool,
    /// Where a munition will detonate, if it is one.
    pub detonation_dst: Option<TileRef>,
}

/// A unit found by a radius query, with its squared distance to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearbyUnit {
    /// The found unit.
    pub id: UnitId,
    /// Squared euclidean distance to the query tile.
    pub dist_squared: u64,
}

/// Result of resolving combat for a single tile flip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOutcome {
    /// Troops the attacker loses on this tile.
    pub attacker_loss: Fixed,
    /// Troops the defender loses on this tile (ignored for terra nullius).
    pub defender_loss: Fixed,
    /// How much of the per-tick conquest budget this flip consumed.
    /// May be fractional; the budget may be overrun by the final flip.
    pub tiles_used: Fixed,
}

/// One step of tile-by-tile movement toward a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    /// The current tile already is (or touches) the target.
    Arrived,
    /// Move to this tile next.
    Next(TileRef),
}

/// Stateful stepper producing a tile path toward a possibly moving target.
///
/// Consumed, not implemented, by the projectile executions. Obtained from
/// [`Game::path_finder`] so the world controls the concrete strategy.
pub trait PathStepper {
    /// Return the next tile toward `to`, or [`PathStep::Arrived`].
    fn next_tile(&mut self, from: TileRef, to: TileRef) -> PathStep;
}

/// The authoritative world state, as seen by executions.
///
/// One shared mutable object; all executions read and write it in
/// registration order within a tick. There is no isolation boundary per
/// execution, so invariants are enforced at the point of mutation (e.g.
/// troop clamping), never assumed from atomicity.
pub trait Game {
    // --- players ---

    /// Whether a player id resolves to a live player.
    fn has_player(&self, id: PlayerId) -> bool;
    /// Driver type of a player.
    fn player_type(&self, id: PlayerId) -> PlayerType;
    /// Human-readable name for messages.
    fn display_name(&self, id: PlayerId) -> String;
    /// Troops currently in the player's pool.
    fn troops(&self, id: PlayerId) -> Fixed;
    /// Add troops to the player's pool.
    fn add_troops(&mut self, id: PlayerId, amount: Fixed);
    /// Remove up to `amount` troops; clamps at zero.
    fn remove_troops(&mut self, id: PlayerId, amount: Fixed);
    /// Gold currently held by the player.
    fn gold(&self, id: PlayerId) -> u64;
    /// Add gold to the player.
    fn add_gold(&mut self, id: PlayerId, amount: u64);
    /// Remove up to `amount` gold; clamps at zero.
    fn remove_gold(&mut self, id: PlayerId, amount: u64);
    /// Number of tiles the player owns.
    fn num_tiles_owned(&self, id: PlayerId) -> usize;
    /// All tiles the player owns, in deterministic (tile index) order.
    fn tiles_owned(&self, id: PlayerId) -> Vec<TileRef>;
    /// Owned tiles adjacent to at least one tile the player does not own.
    fn border_tiles(&self, id: PlayerId) -> Vec<TileRef>;

    // --- diplomacy ---

    /// Whether two players share an active alliance.
    fn is_allied(&self, a: PlayerId, b: PlayerId) -> bool;
    /// Allied or on the same team.
    fn is_friendly(&self, a: PlayerId, b: PlayerId) -> bool;
    /// The alliance object between two players, if any.
    fn alliance_between(&self, a: PlayerId, b: PlayerId) -> Option<AllianceId>;
    /// Dissolve an alliance.
    fn break_alliance(&mut self, id: AllianceId);
    /// Shift `of`'s relation score toward `toward` by `delta`.
    fn update_relation(&mut self, of: PlayerId, toward: PlayerId, delta: i32);
    /// Impose a one-directional trade embargo.
    fn add_embargo(&mut self, by: PlayerId, against: PlayerId);
    /// Lift a previously imposed embargo.
    fn stop_embargo(&mut self, by: PlayerId, against: PlayerId);
    /// Whether a donation from `from` to `to` is currently permitted.
    fn can_donate(&self, from: PlayerId, to: PlayerId) -> bool;
    /// Transfer troops between players.
    fn donate_troops(&mut self, from: PlayerId, to: PlayerId, troops: Fixed);
    /// Whether an alliance request may currently be sent.
    fn can_send_alliance_request(&self, from: PlayerId, to: PlayerId) -> bool;
    /// Open an alliance request.
    fn create_alliance_request(&mut self, from: PlayerId, to: PlayerId);

    // --- attacks ---

    /// Register a new attack and return its id.
    fn create_attack(
        &mut self,
        owner: PlayerId,
        target: Option<PlayerId>,
        troops: Fixed,
        source: Option<TileRef>,
    ) -> AttackId;
    /// Snapshot of an attack, if it still exists.
    fn attack(&self, id: AttackId) -> Option<Attack>;
    /// Set an attack's troop count (clamped at zero by the world).
    fn set_attack_troops(&mut self, id: AttackId, troops: Fixed);
    /// Delete an attack and unregister it from its owner.
    fn delete_attack(&mut self, id: AttackId);
    /// Attacks currently directed at this player.
    fn incoming_attacks(&self, target: PlayerId) -> Vec<AttackId>;
    /// Attacks this player currently has in flight.
    fn outgoing_attacks(&self, owner: PlayerId) -> Vec<AttackId>;

    // --- tiles ---

    /// Orthogonal neighbors of a tile.
    fn neighbors(&self, tile: TileRef) -> Vec<TileRef>;
    /// Owning player of a tile, or `None` for terra nullius.
    fn owner_of(&self, tile: TileRef) -> Option<PlayerId>;
    /// Whether a tile is water.
    fn is_water(&self, tile: TileRef) -> bool;
    /// Terrain classification of a tile.
    fn terrain(&self, tile: TileRef) -> TerrainType;
    /// Transfer ownership of a tile to a player.
    fn conquer(&mut self, player: PlayerId, tile: TileRef);
    /// Manhattan distance between two tiles.
    fn manhattan_dist(&self, a: TileRef, b: TileRef) -> u32;

    // --- units ---

    /// Snapshot of a unit, if it still exists.
    fn unit(&self, id: UnitId) -> Option<Unit>;
    /// Where the player may place a unit of this kind near `tile`, if at all.
    fn can_build(&self, player: PlayerId, kind: UnitKind, tile: TileRef) -> Option<TileRef>;
    /// Create a unit and return its id.
    fn build_unit(&mut self, player: PlayerId, kind: UnitKind, tile: TileRef) -> UnitId;
    /// Move a unit to a tile.
    fn move_unit(&mut self, id: UnitId, to: TileRef);
    /// Destroy a unit. `with_effects` lets the world trigger on-death
    /// behavior (e.g. a munition fizzling visibly) or suppress it.
    fn delete_unit(&mut self, id: UnitId, with_effects: bool);
    /// Apply a health delta; the world destroys the unit at zero health.
    fn modify_unit_health(&mut self, id: UnitId, delta: Fixed);
    /// Mark or clear the launcher-claim flag on a unit.
    fn set_unit_targeted(&mut self, id: UnitId, targeted: bool);
    /// Start a cooldown on a unit. The world decrements it each tick.
    fn start_unit_cooldown(&mut self, id: UnitId, duration: u32);
    /// Whether the unit's cooldown is still running.
    fn unit_in_cooldown(&self, id: UnitId) -> bool;
    /// Active units of the given kinds within `radius` (euclidean) of a
    /// tile, with squared distances, in deterministic order.
    fn nearby_units(&self, tile: TileRef, radius: u32, kinds: &[UnitKind]) -> Vec<NearbyUnit>;
    /// Number of active units of a kind in the whole world.
    fn unit_count(&self, kind: UnitKind) -> usize;
    /// Ports this port's owner may currently trade with.
    fn trading_ports(&self, port: UnitId) -> Vec<UnitId>;

    // --- scheduling and ambient services ---

    /// Current tick count.
    fn ticks(&self) -> Tick;
    /// Advance the tick counter and run per-tick world upkeep (cooldowns).
    fn advance_tick(&mut self);
    /// Whether the game is still in its pre-game spawn phase.
    fn in_spawn_phase(&self) -> bool;
    /// Numeric policy configuration.
    fn config(&self) -> &Config;
    /// Emit a user-facing message, optionally addressed to one player.
    fn display_message(&mut self, text: String, kind: MessageType, player: Option<PlayerId>);
    /// Queue an execution for activation on the next tick, never the
    /// current one. The scheduler drains this queue at end of tick.
    fn add_execution(&mut self, execution: Box<dyn Execution>);
    /// Hand queued executions to the scheduler.
    fn take_pending_executions(&mut self) -> Vec<Box<dyn Execution>>;
    /// Construct a fresh path stepper for a projectile or vessel. The world
    /// picks the concrete strategy; each caller gets independent state.
    fn path_finder(&self) -> Box<dyn PathStepper>;
}
