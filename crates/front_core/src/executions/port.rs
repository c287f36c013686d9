//! Port: a harbor structure that periodically spawns trade ships toward
//! other players' ports.

use crate::executions::{require_player, Execution};
use crate::rng::PseudoRandom;
use crate::world::{Game, PlayerId, Tick, TileRef, UnitId, UnitKind};

use super::trade::TradeShipExecution;

/// Execution driving one port unit.
pub struct PortExecution {
    owner: PlayerId,
    tile: TileRef,
    port: Option<UnitId>,
    rng: Option<PseudoRandom>,
    check_offset: u64,
    active: bool,
}

impl PortExecution {
    /// Create an execution that builds a new port at `tile`.
    #[must_use]
    pub fn new(owner: PlayerId, tile: TileRef) -> Self {
        Self {
            owner,
            tile,
            port: None,
            rng: None,
            check_offset: 0,
            active: true,
        }
    }
}

impl Execution for PortExecution {
    fn init(&mut self, world: &mut dyn Game, tick: Tick) {
        if !require_player(world, self.owner, "PortExecution") {
            self.active = false;
            return;
        }
        self.rng = Some(PseudoRandom::new(tick as u32));
        self.check_offset = tick % 10;
    }

    fn tick(&mut self, world: &mut dyn Game, _tick: Tick) {
        if self.port.is_none() {
            match world.can_build(self.owner, UnitKind::Port, self.tile) {
                Some(spawn) => {
                    self.port = Some(world.build_unit(self.owner, UnitKind::Port, spawn));
                }
                None => {
                    tracing::warn!(
                        "player {:?} cannot build port at {:?}",
                        self.owner,
                        self.tile
                    );
                    self.active = false;
                    return;
                }
            }
        }
        let Some(port_id) = self.port else {
            self.active = false;
            return;
        };
        let Some(port) = world.unit(port_id) else {
            self.active = false;
            return;
        };
        if !port.active {
            self.active = false;
            return;
        }

        // Ownership follows the unit when the port is captured.
        if self.owner != port.owner {
            self.owner = port.owner;
        }

        // Only check every 10 ticks, staggered across ports.
        if (world.ticks() + self.check_offset) % 10 != 0 {
            return;
        }

        let Some(rng) = self.rng.as_mut() else {
            return;
        };
        let total_ports = world.unit_count(UnitKind::Port);
        if !rng.chance(world.config().trade_ship_spawn_rate(total_ports)) {
            return;
        }

        let partners = world.trading_ports(port_id);
        if partners.is_empty() {
            return;
        }
        let Some(&destination) = rng.rand_element(&partners) else {
            return;
        };
        world.add_execution(Box::new(TradeShipExecution::new(
            self.owner,
            port_id,
            destination,
        )));
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn owner(&self) -> Option<PlayerId> {
        Some(self.owner)
    }
}
