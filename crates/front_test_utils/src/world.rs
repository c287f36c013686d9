//! In-memory reference implementation of the `Game` contract.
//!
//! A row-major tile grid with `BTreeMap` arenas for players, attacks and
//! units. Iteration is always in key order, so every query the core makes
//! returns results in a deterministic order regardless of insertion history.
//!
//! This is the world the whole test suite runs against; production hosts
//! implement [`Game`] over their own state instead.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use front_core::config::Config;
use front_core::executions::Execution;
use front_core::math::Fixed;
use front_core::world::{
    AllianceId, Attack, AttackId, Game, MessageType, NearbyUnit, PathStepper, PlayerId,
    PlayerType, TerrainType, Tick, TileRef, Unit, UnitId, UnitKind,
};

use crate::path::GridStepper;

/// Relation scores are clamped to this range.
const RELATION_MIN: i32 = -100;
/// See [`RELATION_MIN`].
const RELATION_MAX: i32 = 100;

#[derive(Debug, Clone)]
struct PlayerState {
    name: String,
    player_type: PlayerType,
    troops: Fixed,
    gold: u64,
}

#[derive(Debug, Clone)]
struct UnitState {
    unit: Unit,
    cooldown: u32,
}

/// One message the core emitted through [`Game::display_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message text.
    pub text: String,
    /// Severity.
    pub kind: MessageType,
    /// Addressed player, if any.
    pub player: Option<PlayerId>,
}

/// Reference world over a rectangular tile grid.
pub struct TestWorld {
    width: u32,
    height: u32,
    config: Config,
    tick: Tick,

    terrain: Vec<TerrainType>,
    owners: Vec<Option<PlayerId>>,

    players: BTreeMap<PlayerId, PlayerState>,
    next_player: u32,
    attacks: BTreeMap<AttackId, Attack>,
    next_attack: u32,
    units: BTreeMap<UnitId, UnitState>,
    next_unit: u32,

    alliances: BTreeMap<AllianceId, (PlayerId, PlayerId)>,
    next_alliance: u32,
    relations: BTreeMap<(PlayerId, PlayerId), i32>,
    embargoes: BTreeSet<(PlayerId, PlayerId)>,
    alliance_requests: BTreeSet<(PlayerId, PlayerId)>,

    pending: Vec<Box<dyn Execution>>,
    messages: Vec<Message>,
    deleted_units: Vec<(UnitId, bool)>,
}

impl TestWorld {
    /// Create an all-plains world of the given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, Config::default())
    }

    /// Create an all-plains world with an explicit config.
    #[must_use]
    pub fn with_config(width: u32, height: u32, config: Config) -> Self {
        let tiles = (width * height) as usize;
        Self {
            width,
            height,
            config,
            tick: 0,
            terrain: vec![TerrainType::Plains; tiles],
            owners: vec![None; tiles],
            players: BTreeMap::new(),
            next_player: 1,
            attacks: BTreeMap::new(),
            next_attack: 1,
            units: BTreeMap::new(),
            next_unit: 1,
            alliances: BTreeMap::new(),
            next_alliance: 1,
            relations: BTreeMap::new(),
            embargoes: BTreeSet::new(),
            alliance_requests: BTreeSet::new(),
            pending: Vec::new(),
            messages: Vec::new(),
            deleted_units: Vec::new(),
        }
    }

    /// Tile reference for grid coordinates.
    #[must_use]
    pub fn tile(&self, x: u32, y: u32) -> TileRef {
        debug_assert!(x < self.width && y < self.height);
        TileRef(y * self.width + x)
    }

    fn coords(&self, tile: TileRef) -> (u32, u32) {
        (tile.0 % self.width, tile.0 / self.width)
    }

    /// Overwrite a tile's terrain.
    pub fn set_terrain(&mut self, tile: TileRef, terrain: TerrainType) {
        self.terrain[tile.0 as usize] = terrain;
    }

    /// Register a player with a starting troop pool.
    pub fn add_player(&mut self, name: &str, player_type: PlayerType, troops: Fixed) -> PlayerId {
        let id = PlayerId(self.next_player);
        self.next_player += 1;
        self.players.insert(
            id,
            PlayerState {
                name: name.to_string(),
                player_type,
                troops,
                gold: 0,
            },
        );
        id
    }

    /// Overwrite a player's troop pool.
    pub fn set_troops(&mut self, id: PlayerId, troops: Fixed) {
        if let Some(player) = self.players.get_mut(&id) {
            player.troops = troops;
        }
    }

    /// Overwrite a player's gold.
    pub fn set_gold(&mut self, id: PlayerId, gold: u64) {
        if let Some(player) = self.players.get_mut(&id) {
            player.gold = gold;
        }
    }

    /// Give a rectangular region (inclusive corners) to a player.
    pub fn claim_rect(&mut self, id: PlayerId, x0: u32, y0: u32, x1: u32, y1: u32) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                let tile = self.tile(x, y);
                self.owners[tile.0 as usize] = Some(id);
            }
        }
    }

    /// Give a single tile to a player (or to nobody).
    pub fn set_owner(&mut self, tile: TileRef, owner: Option<PlayerId>) {
        self.owners[tile.0 as usize] = owner;
    }

    /// Jump the clock past the spawn phase and the immunity window.
    pub fn skip_spawn_phase(&mut self) {
        self.tick = self.config.spawn_phase_turns + self.config.spawn_immunity_duration;
    }

    /// Set the clock directly.
    pub fn set_tick(&mut self, tick: Tick) {
        self.tick = tick;
    }

    /// Form an alliance directly, bypassing the request flow.
    pub fn make_alliance(&mut self, a: PlayerId, b: PlayerId) -> AllianceId {
        let id = AllianceId(self.next_alliance);
        self.next_alliance += 1;
        self.alliances.insert(id, (a, b));
        id
    }

    /// Current relation score of `of` toward `toward`.
    #[must_use]
    pub fn relation(&self, of: PlayerId, toward: PlayerId) -> i32 {
        self.relations.get(&(of, toward)).copied().unwrap_or(0)
    }

    /// Whether `by` currently embargoes `against`.
    #[must_use]
    pub fn has_embargo(&self, by: PlayerId, against: PlayerId) -> bool {
        self.embargoes.contains(&(by, against))
    }

    /// Whether an alliance request from `from` to `to` is pending.
    #[must_use]
    pub fn has_alliance_request(&self, from: PlayerId, to: PlayerId) -> bool {
        self.alliance_requests.contains(&(from, to))
    }

    /// Turn a pending request into an alliance.
    pub fn accept_alliance_request(&mut self, from: PlayerId, to: PlayerId) -> Option<AllianceId> {
        if self.alliance_requests.remove(&(from, to)) {
            Some(self.make_alliance(from, to))
        } else {
            None
        }
    }

    /// Flag an attack as retreat-requested, as a player command would.
    pub fn order_retreat(&mut self, id: AttackId) {
        if let Some(attack) = self.attacks.get_mut(&id) {
            attack.retreated = true;
        }
    }

    /// Set or clear the retreat-in-progress flag on an attack.
    pub fn set_attack_retreating(&mut self, id: AttackId, retreating: bool) {
        if let Some(attack) = self.attacks.get_mut(&id) {
            attack.retreating = retreating;
        }
    }

    /// Place a unit directly, bypassing the build rules.
    pub fn place_unit(&mut self, owner: PlayerId, kind: UnitKind, tile: TileRef) -> UnitId {
        let id = UnitId(self.next_unit);
        self.next_unit += 1;
        self.units.insert(
            id,
            UnitState {
                unit: Unit {
                    id,
                    kind,
                    owner,
                    tile,
                    health: default_health(kind),
                    active: true,
                    targeted_by_sam: false,
                    detonation_dst: None,
                },
                cooldown: 0,
            },
        );
        id
    }

    /// Set where a munition unit will detonate.
    pub fn set_detonation_dst(&mut self, id: UnitId, dst: TileRef) {
        if let Some(state) = self.units.get_mut(&id) {
            state.unit.detonation_dst = Some(dst);
        }
    }

    /// Overwrite a unit's health.
    pub fn set_unit_health(&mut self, id: UnitId, health: Fixed) {
        if let Some(state) = self.units.get_mut(&id) {
            state.unit.health = health;
        }
    }

    /// All messages emitted so far.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages addressed to one player.
    #[must_use]
    pub fn messages_for(&self, player: PlayerId) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.player == Some(player))
            .collect()
    }

    /// Deletion log: `(unit, with_effects)` in deletion order.
    #[must_use]
    pub fn deleted_units(&self) -> &[(UnitId, bool)] {
        &self.deleted_units
    }

    /// Troops committed across all of a player's outgoing attacks.
    #[must_use]
    pub fn committed_troops(&self, owner: PlayerId) -> Fixed {
        self.attacks
            .values()
            .filter(|a| a.owner == owner)
            .map(|a| a.troops)
            .fold(Fixed::ZERO, |acc, t| acc + t)
    }

    /// Hash of all deterministic simulation state.
    ///
    /// Two worlds that ran the same scenario must produce equal hashes
    /// after every tick; anything else is a desync.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);
        for (id, player) in &self.players {
            id.hash(&mut hasher);
            player.troops.to_bits().hash(&mut hasher);
            player.gold.hash(&mut hasher);
        }
        self.owners.hash(&mut hasher);
        for (id, attack) in &self.attacks {
            id.hash(&mut hasher);
            attack.owner.hash(&mut hasher);
            attack.target.hash(&mut hasher);
            attack.troops.to_bits().hash(&mut hasher);
            attack.source.hash(&mut hasher);
            (attack.retreated, attack.retreating, attack.active).hash(&mut hasher);
        }
        for (id, state) in &self.units {
            id.hash(&mut hasher);
            state.unit.kind.hash(&mut hasher);
            state.unit.owner.hash(&mut hasher);
            state.unit.tile.hash(&mut hasher);
            state.unit.health.to_bits().hash(&mut hasher);
            state.unit.active.hash(&mut hasher);
            state.cooldown.hash(&mut hasher);
        }
        for pair in &self.embargoes {
            pair.hash(&mut hasher);
        }
        for (pair, score) in &self.relations {
            pair.hash(&mut hasher);
            score.hash(&mut hasher);
        }
        hasher.finish()
    }
}

fn default_health(kind: UnitKind) -> Fixed {
    match kind {
        UnitKind::SamLauncher | UnitKind::Port | UnitKind::Warship => Fixed::from_num(1000),
        _ => Fixed::ONE,
    }
}

impl Game for TestWorld {
    fn has_player(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    fn player_type(&self, id: PlayerId) -> PlayerType {
        self.players
            .get(&id)
            .map_or(PlayerType::Human, |p| p.player_type)
    }

    fn display_name(&self, id: PlayerId) -> String {
        self.players
            .get(&id)
            .map_or_else(|| format!("player {}", id.0), |p| p.name.clone())
    }

    fn troops(&self, id: PlayerId) -> Fixed {
        self.players.get(&id).map_or(Fixed::ZERO, |p| p.troops)
    }

    fn add_troops(&mut self, id: PlayerId, amount: Fixed) {
        if let Some(player) = self.players.get_mut(&id) {
            player.troops += amount;
        }
    }

    fn remove_troops(&mut self, id: PlayerId, amount: Fixed) {
        if let Some(player) = self.players.get_mut(&id) {
            player.troops = (player.troops - amount).max(Fixed::ZERO);
        }
    }

    fn gold(&self, id: PlayerId) -> u64 {
        self.players.get(&id).map_or(0, |p| p.gold)
    }

    fn add_gold(&mut self, id: PlayerId, amount: u64) {
        if let Some(player) = self.players.get_mut(&id) {
            player.gold += amount;
        }
    }

    fn remove_gold(&mut self, id: PlayerId, amount: u64) {
        if let Some(player) = self.players.get_mut(&id) {
            player.gold = player.gold.saturating_sub(amount);
        }
    }

    fn num_tiles_owned(&self, id: PlayerId) -> usize {
        self.owners.iter().filter(|&&o| o == Some(id)).count()
    }

    fn tiles_owned(&self, id: PlayerId) -> Vec<TileRef> {
        self.owners
            .iter()
            .enumerate()
            .filter(|&(_, &o)| o == Some(id))
            .map(|(i, _)| TileRef(i as u32))
            .collect()
    }

    fn border_tiles(&self, id: PlayerId) -> Vec<TileRef> {
        self.tiles_owned(id)
            .into_iter()
            .filter(|&tile| {
                self.neighbors(tile)
                    .iter()
                    .any(|&n| self.owner_of(n) != Some(id))
            })
            .collect()
    }

    fn is_allied(&self, a: PlayerId, b: PlayerId) -> bool {
        self.alliances
            .values()
            .any(|&(x, y)| (x, y) == (a, b) || (x, y) == (b, a))
    }

    fn is_friendly(&self, a: PlayerId, b: PlayerId) -> bool {
        a == b || self.is_allied(a, b)
    }

    fn alliance_between(&self, a: PlayerId, b: PlayerId) -> Option<AllianceId> {
        self.alliances
            .iter()
            .find(|(_, &(x, y))| (x, y) == (a, b) || (x, y) == (b, a))
            .map(|(&id, _)| id)
    }

    fn break_alliance(&mut self, id: AllianceId) {
        self.alliances.remove(&id);
    }

    fn update_relation(&mut self, of: PlayerId, toward: PlayerId, delta: i32) {
        let score = self.relations.entry((of, toward)).or_insert(0);
        *score = (*score + delta).clamp(RELATION_MIN, RELATION_MAX);
    }

    fn add_embargo(&mut self, by: PlayerId, against: PlayerId) {
        self.embargoes.insert((by, against));
    }

    fn stop_embargo(&mut self, by: PlayerId, against: PlayerId) {
        self.embargoes.remove(&(by, against));
    }

    fn can_donate(&self, from: PlayerId, to: PlayerId) -> bool {
        from != to && self.has_player(from) && self.has_player(to) && self.is_allied(from, to)
    }

    fn donate_troops(&mut self, from: PlayerId, to: PlayerId, troops: Fixed) {
        let amount = troops.min(self.troops(from)).max(Fixed::ZERO);
        self.remove_troops(from, amount);
        self.add_troops(to, amount);
    }

    fn can_send_alliance_request(&self, from: PlayerId, to: PlayerId) -> bool {
        from != to
            && self.has_player(from)
            && self.has_player(to)
            && !self.is_friendly(from, to)
            && !self.alliance_requests.contains(&(from, to))
            && !self.alliance_requests.contains(&(to, from))
    }

    fn create_alliance_request(&mut self, from: PlayerId, to: PlayerId) {
        self.alliance_requests.insert((from, to));
    }

    fn create_attack(
        &mut self,
        owner: PlayerId,
        target: Option<PlayerId>,
        troops: Fixed,
        source: Option<TileRef>,
    ) -> AttackId {
        let id = AttackId(self.next_attack);
        self.next_attack += 1;
        self.attacks.insert(
            id,
            Attack {
                id,
                owner,
                target,
                troops: troops.max(Fixed::ZERO),
                source,
                retreated: false,
                retreating: false,
                active: true,
            },
        );
        id
    }

    fn attack(&self, id: AttackId) -> Option<Attack> {
        self.attacks.get(&id).copied()
    }

    fn set_attack_troops(&mut self, id: AttackId, troops: Fixed) {
        if let Some(attack) = self.attacks.get_mut(&id) {
            attack.set_troops(troops);
        }
    }

    fn delete_attack(&mut self, id: AttackId) {
        self.attacks.remove(&id);
    }

    fn incoming_attacks(&self, target: PlayerId) -> Vec<AttackId> {
        self.attacks
            .values()
            .filter(|a| a.target == Some(target))
            .map(|a| a.id)
            .collect()
    }

    fn outgoing_attacks(&self, owner: PlayerId) -> Vec<AttackId> {
        self.attacks
            .values()
            .filter(|a| a.owner == owner)
            .map(|a| a.id)
            .collect()
    }

    fn neighbors(&self, tile: TileRef) -> Vec<TileRef> {
        let (x, y) = self.coords(tile);
        let mut out = Vec::with_capacity(4);
        if x > 0 {
            out.push(self.tile(x - 1, y));
        }
        if x + 1 < self.width {
            out.push(self.tile(x + 1, y));
        }
        if y > 0 {
            out.push(self.tile(x, y - 1));
        }
        if y + 1 < self.height {
            out.push(self.tile(x, y + 1));
        }
        out
    }

    fn owner_of(&self, tile: TileRef) -> Option<PlayerId> {
        self.owners[tile.0 as usize]
    }

    fn is_water(&self, tile: TileRef) -> bool {
        self.terrain[tile.0 as usize] == TerrainType::Water
    }

    fn terrain(&self, tile: TileRef) -> TerrainType {
        self.terrain[tile.0 as usize]
    }

    fn conquer(&mut self, player: PlayerId, tile: TileRef) {
        self.owners[tile.0 as usize] = Some(player);
        // Structures on the tile change hands with it.
        for state in self.units.values_mut() {
            if state.unit.tile == tile
                && state.unit.active
                && matches!(state.unit.kind, UnitKind::SamLauncher | UnitKind::Port)
            {
                state.unit.owner = player;
            }
        }
    }

    fn manhattan_dist(&self, a: TileRef, b: TileRef) -> u32 {
        let (ax, ay) = self.coords(a);
        let (bx, by) = self.coords(b);
        ax.abs_diff(bx) + ay.abs_diff(by)
    }

    fn unit(&self, id: UnitId) -> Option<Unit> {
        self.units.get(&id).map(|s| s.unit)
    }

    fn can_build(&self, player: PlayerId, _kind: UnitKind, tile: TileRef) -> Option<TileRef> {
        if self.owner_of(tile) == Some(player) && !self.is_water(tile) {
            Some(tile)
        } else {
            None
        }
    }

    fn build_unit(&mut self, player: PlayerId, kind: UnitKind, tile: TileRef) -> UnitId {
        self.place_unit(player, kind, tile)
    }

    fn move_unit(&mut self, id: UnitId, to: TileRef) {
        if let Some(state) = self.units.get_mut(&id) {
            state.unit.tile = to;
        }
    }

    fn delete_unit(&mut self, id: UnitId, with_effects: bool) {
        if self.units.remove(&id).is_some() {
            self.deleted_units.push((id, with_effects));
        }
    }

    fn modify_unit_health(&mut self, id: UnitId, delta: Fixed) {
        let dead = match self.units.get_mut(&id) {
            Some(state) => {
                state.unit.health += delta;
                state.unit.health <= Fixed::ZERO
            }
            None => false,
        };
        if dead {
            self.delete_unit(id, true);
        }
    }

    fn set_unit_targeted(&mut self, id: UnitId, targeted: bool) {
        if let Some(state) = self.units.get_mut(&id) {
            state.unit.targeted_by_sam = targeted;
        }
    }

    fn start_unit_cooldown(&mut self, id: UnitId, duration: u32) {
        if let Some(state) = self.units.get_mut(&id) {
            state.cooldown = duration;
        }
    }

    fn unit_in_cooldown(&self, id: UnitId) -> bool {
        self.units.get(&id).is_some_and(|s| s.cooldown > 0)
    }

    fn nearby_units(&self, tile: TileRef, radius: u32, kinds: &[UnitKind]) -> Vec<NearbyUnit> {
        let (x, y) = self.coords(tile);
        let limit = u64::from(radius) * u64::from(radius);
        self.units
            .values()
            .filter(|s| s.unit.active && kinds.contains(&s.unit.kind))
            .filter_map(|s| {
                let (ux, uy) = self.coords(s.unit.tile);
                let dx = u64::from(x.abs_diff(ux));
                let dy = u64::from(y.abs_diff(uy));
                let dist_squared = dx * dx + dy * dy;
                (dist_squared <= limit).then_some(NearbyUnit {
                    id: s.unit.id,
                    dist_squared,
                })
            })
            .collect()
    }

    fn unit_count(&self, kind: UnitKind) -> usize {
        self.units
            .values()
            .filter(|s| s.unit.active && s.unit.kind == kind)
            .count()
    }

    fn trading_ports(&self, port: UnitId) -> Vec<UnitId> {
        let Some(origin) = self.unit(port) else {
            return Vec::new();
        };
        self.units
            .values()
            .filter(|s| {
                s.unit.active
                    && s.unit.kind == UnitKind::Port
                    && s.unit.id != port
                    && s.unit.owner != origin.owner
                    && self.player_type(s.unit.owner) != PlayerType::Bot
                    && !self.has_embargo(origin.owner, s.unit.owner)
                    && !self.has_embargo(s.unit.owner, origin.owner)
            })
            .map(|s| s.unit.id)
            .collect()
    }

    fn ticks(&self) -> Tick {
        self.tick
    }

    fn advance_tick(&mut self) {
        self.tick += 1;
        for state in self.units.values_mut() {
            state.cooldown = state.cooldown.saturating_sub(1);
        }
    }

    fn in_spawn_phase(&self) -> bool {
        self.tick < self.config.spawn_phase_turns
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn display_message(&mut self, text: String, kind: MessageType, player: Option<PlayerId>) {
        self.messages.push(Message { text, kind, player });
    }

    fn add_execution(&mut self, execution: Box<dyn Execution>) {
        self.pending.push(execution);
    }

    fn take_pending_executions(&mut self) -> Vec<Box<dyn Execution>> {
        std::mem::take(&mut self.pending)
    }

    fn path_finder(&self) -> Box<dyn PathStepper> {
        Box::new(GridStepper::new(self.width))
    }
}
