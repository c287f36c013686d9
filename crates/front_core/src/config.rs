//! Numeric policy configuration for the simulation core.
//!
//! Every tunable the executions consume lives here: attack sizing, conquest
//! speed, combat attrition, interception chances, cooldowns, trade rates.
//! The struct is plain data, deserializable from RON, so scenarios and tests
//! can pin any policy without touching simulation code.
//!
//! # Example RON
//!
//! ```ron
//! Config(
//!     spawn_phase_turns: 30,
//!     spawn_immunity_duration: 30,
//!     sam_cooldown: 75,
//!     shell_lifetime: 20,
//!     max_tiles_per_tick: 64,
//! )
//! ```
//!
//! Fixed-point fields are stored as raw I32F32 bits (e.g. `4294967296` for
//! 1.0), matching how all fixed-point data serializes in this workspace.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{fixed_serde, within, Fixed};
use crate::world::{AttackOutcome, Game, PlayerId, PlayerType, TileRef, UnitKind};

/// Numeric policies consumed by the simulation core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Length of the pre-game spawn phase in ticks.
    pub spawn_phase_turns: u64,
    /// Ticks of attack immunity granted after the spawn phase ends.
    pub spawn_immunity_duration: u64,

    /// Human attacks commit `troops / this` by default.
    pub attack_amount_divisor: u32,
    /// Bot attacks commit `troops / this` by default.
    pub bot_attack_amount_divisor: u32,

    /// Conquest budget per tick as a fraction of committed troops.
    #[serde(with = "fixed_serde")]
    pub tiles_per_tick_rate: Fixed,
    /// Lower clamp of the per-tick conquest budget.
    pub min_tiles_per_tick: u32,
    /// Upper clamp of the per-tick conquest budget.
    pub max_tiles_per_tick: u32,

    /// Base attacker troop loss per conquered tile (scaled by terrain).
    #[serde(with = "fixed_serde")]
    pub attrition_per_tile: Fixed,
    /// How much an outnumbering defender amplifies attacker losses.
    #[serde(with = "fixed_serde")]
    pub defense_weight: Fixed,
    /// Defender troop loss per tile lost.
    #[serde(with = "fixed_serde")]
    pub defender_loss_per_tile: Fixed,

    /// Donations default to `sender troops / this`.
    pub donation_divisor: u32,

    /// Base 1-in-N odds of a port spawning a trade ship per check.
    pub trade_ship_spawn_odds: u32,
    /// Gold awarded per tile of distance when a trade ship arrives.
    pub trade_gold_per_dist: u64,

    /// Interception chance against hydrogen bombs, in `[0, 1]`.
    #[serde(with = "fixed_serde")]
    pub sam_hitting_chance: Fixed,
    /// Interception chance against a MIRV warhead group, in `[0, 1]`.
    #[serde(with = "fixed_serde")]
    pub sam_warhead_hitting_chance: Fixed,
    /// Ticks a launcher is blocked after an engagement.
    pub sam_cooldown: u32,
    /// Grace period (ticks) a shell keeps flying after its firer dies.
    pub shell_lifetime: u32,
    /// Damage a shell applies on arrival.
    #[serde(with = "fixed_serde")]
    pub shell_damage: Fixed,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spawn_phase_turns: 30,
            spawn_immunity_duration: 30,
            attack_amount_divisor: 5,
            bot_attack_amount_divisor: 20,
            tiles_per_tick_rate: Fixed::from_num(0.01),
            min_tiles_per_tick: 1,
            max_tiles_per_tick: 64,
            attrition_per_tile: Fixed::ONE,
            defense_weight: Fixed::from_num(0.5),
            defender_loss_per_tile: Fixed::from_num(2),
            donation_divisor: 3,
            trade_ship_spawn_odds: 50,
            trade_gold_per_dist: 100,
            sam_hitting_chance: Fixed::from_num(0.8),
            sam_warhead_hitting_chance: Fixed::from_num(0.5),
            sam_cooldown: 75,
            shell_lifetime: 20,
            shell_damage: Fixed::from_num(250),
        }
    }
}

impl Config {
    /// Parse a config from RON and validate it.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: Config =
            ron::from_str(source).map_err(|e| GameError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field for sanity.
    pub fn validate(&self) -> Result<()> {
        fn chance_in_unit_interval(field: &'static str, value: Fixed) -> Result<()> {
            if value < Fixed::ZERO || value > Fixed::ONE {
                return Err(GameError::InvalidConfig {
                    field,
                    message: format!("must be in [0, 1], got {value}"),
                });
            }
            Ok(())
        }
        fn nonzero(field: &'static str, value: u64) -> Result<()> {
            if value == 0 {
                return Err(GameError::InvalidConfig {
                    field,
                    message: "must be nonzero".to_string(),
                });
            }
            Ok(())
        }

        chance_in_unit_interval("sam_hitting_chance", self.sam_hitting_chance)?;
        chance_in_unit_interval("sam_warhead_hitting_chance", self.sam_warhead_hitting_chance)?;
        nonzero("attack_amount_divisor", u64::from(self.attack_amount_divisor))?;
        nonzero(
            "bot_attack_amount_divisor",
            u64::from(self.bot_attack_amount_divisor),
        )?;
        nonzero("donation_divisor", u64::from(self.donation_divisor))?;
        nonzero("min_tiles_per_tick", u64::from(self.min_tiles_per_tick))?;
        nonzero("trade_ship_spawn_odds", u64::from(self.trade_ship_spawn_odds))?;
        nonzero("sam_cooldown", u64::from(self.sam_cooldown))?;
        nonzero("shell_lifetime", u64::from(self.shell_lifetime))?;
        if self.max_tiles_per_tick < self.min_tiles_per_tick {
            return Err(GameError::InvalidConfig {
                field: "max_tiles_per_tick",
                message: "must be >= min_tiles_per_tick".to_string(),
            });
        }
        if self.tiles_per_tick_rate <= Fixed::ZERO {
            return Err(GameError::InvalidConfig {
                field: "tiles_per_tick_rate",
                message: "must be positive".to_string(),
            });
        }
        if self.attrition_per_tile < Fixed::ZERO {
            return Err(GameError::InvalidConfig {
                field: "attrition_per_tile",
                message: "must be non-negative".to_string(),
            });
        }
        Ok(())
    }

    /// Default troop commitment for a new attack.
    #[must_use]
    pub fn attack_amount(&self, owner_troops: Fixed, owner_type: PlayerType) -> Fixed {
        let divisor = match owner_type {
            PlayerType::Human => self.attack_amount_divisor,
            PlayerType::Bot => self.bot_attack_amount_divisor,
        };
        owner_troops / Fixed::from_num(divisor)
    }

    /// Per-tick conquest budget for an attack.
    ///
    /// `frontier_hint` is the current frontier size plus the caller's random
    /// jitter; the budget never needs to exceed it by much since excess
    /// budget only drains on skipped tiles.
    #[must_use]
    pub fn attack_tiles_per_tick(
        &self,
        troops: Fixed,
        owner_type: PlayerType,
        target_defended: bool,
        frontier_hint: usize,
    ) -> Fixed {
        let mut budget = troops * self.tiles_per_tick_rate;
        if target_defended {
            budget /= 2;
        }
        if owner_type == PlayerType::Bot {
            budget = budget * Fixed::from_num(3) / Fixed::from_num(4);
        }
        let front = Fixed::from_num(frontier_hint as u32 + 1);
        within(
            budget.min(front),
            Fixed::from_num(self.min_tiles_per_tick),
            Fixed::from_num(self.max_tiles_per_tick),
        )
    }

    /// Resolve combat for a single tile flip.
    ///
    /// Attacker losses scale with terrain and with how badly the attacker is
    /// outnumbered; harder terrain also consumes more of the tick budget.
    #[must_use]
    pub fn attack_logic(
        &self,
        world: &dyn Game,
        troops: Fixed,
        owner: PlayerId,
        target: Option<PlayerId>,
        tile: TileRef,
    ) -> AttackOutcome {
        let mag = world.terrain(tile).magnitude();
        let mut attacker_loss = self.attrition_per_tile * mag;
        let mut defender_loss = Fixed::ZERO;

        if let Some(defender) = target {
            let pressure = within(
                world.troops(defender) / troops.max(Fixed::ONE),
                Fixed::ZERO,
                Fixed::from_num(4),
            );
            attacker_loss *= Fixed::ONE + pressure * self.defense_weight;
            defender_loss = self.defender_loss_per_tile;
        }
        if world.player_type(owner) == PlayerType::Bot {
            attacker_loss = attacker_loss * Fixed::from_num(5) / Fixed::from_num(4);
        }

        AttackOutcome {
            attacker_loss,
            defender_loss,
            tiles_used: mag,
        }
    }

    /// Default troop amount for a donation.
    #[must_use]
    pub fn default_donation_amount(&self, sender_troops: Fixed) -> Fixed {
        sender_troops / Fixed::from_num(self.donation_divisor)
    }

    /// 1-in-N odds of a trade ship spawning on one port check.
    ///
    /// Odds grow with the global port count so total trade volume stays
    /// bounded as ports multiply.
    #[must_use]
    pub fn trade_ship_spawn_rate(&self, total_ports: usize) -> u32 {
        self.trade_ship_spawn_odds * (total_ports as u32 / 2).max(1)
    }

    /// Gold awarded to each side of a completed trade route.
    #[must_use]
    pub fn trade_ship_gold(&self, dist: u32) -> u64 {
        self.trade_gold_per_dist * u64::from(dist)
    }

    /// Damage a munition applies on arrival.
    #[must_use]
    pub fn unit_damage(&self, kind: UnitKind) -> Fixed {
        match kind {
            UnitKind::Shell => self.shell_damage,
            _ => Fixed::ZERO,
        }
    }

    /// Whether players still enjoy post-spawn attack immunity at `tick`.
    #[must_use]
    pub fn spawn_immunity_active(&self, tick: u64) -> bool {
        self.spawn_phase_turns + self.spawn_immunity_duration > tick
    }
}
