//! Trade ship: sails from one port to another and pays out gold to both
//! port owners on arrival.

use crate::executions::{require_player, Execution};
use crate::world::{Game, MessageType, PathStep, PathStepper, PlayerId, Tick, UnitId, UnitKind};

/// Execution sailing one trade ship between two ports.
pub struct TradeShipExecution {
    owner: PlayerId,
    src_port: UnitId,
    dst_port: UnitId,
    ship: Option<UnitId>,
    path: Option<Box<dyn PathStepper>>,
    active: bool,
}

impl TradeShipExecution {
    /// Create a voyage from `src_port` to `dst_port`.
    #[must_use]
    pub fn new(owner: PlayerId, src_port: UnitId, dst_port: UnitId) -> Self {
        Self {
            owner,
            src_port,
            dst_port,
            ship: None,
            path: None,
            active: true,
        }
    }
}

impl Execution for TradeShipExecution {
    fn init(&mut self, world: &mut dyn Game, _tick: Tick) {
        if !require_player(world, self.owner, "TradeShipExecution") {
            self.active = false;
            return;
        }
        self.path = Some(world.path_finder());
    }

    fn tick(&mut self, world: &mut dyn Game, _tick: Tick) {
        if self.ship.is_none() {
            let Some(src) = world.unit(self.src_port) else {
                self.active = false;
                return;
            };
            self.ship = Some(world.build_unit(self.owner, UnitKind::TradeShip, src.tile));
        }
        let Some(ship_id) = self.ship else {
            self.active = false;
            return;
        };
        let Some(ship) = world.unit(ship_id) else {
            self.active = false;
            return;
        };
        if !ship.active {
            self.active = false;
            return;
        }

        // The route dies with either port.
        let src_alive = world.unit(self.src_port).is_some_and(|u| u.active);
        let dst = world.unit(self.dst_port).filter(|u| u.active);
        let Some(dst) = dst else {
            world.delete_unit(ship_id, false);
            self.active = false;
            return;
        };
        if !src_alive {
            world.delete_unit(ship_id, false);
            self.active = false;
            return;
        }

        let Some(path) = self.path.as_mut() else {
            self.active = false;
            return;
        };
        match path.next_tile(ship.tile, dst.tile) {
            PathStep::Arrived => {
                let src_tile = world.unit(self.src_port).map_or(ship.tile, |u| u.tile);
                let gold = world
                    .config()
                    .trade_ship_gold(world.manhattan_dist(src_tile, dst.tile));
                world.add_gold(self.owner, gold);
                world.add_gold(dst.owner, gold);
                world.display_message(
                    format!("Trade ship arrived, {gold} gold received"),
                    MessageType::Success,
                    Some(self.owner),
                );
                world.display_message(
                    format!("Trade ship arrived, {gold} gold received"),
                    MessageType::Success,
                    Some(dst.owner),
                );
                world.delete_unit(ship_id, false);
                self.active = false;
            }
            PathStep::Next(tile) => world.move_unit(ship_id, tile),
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn owner(&self) -> Option<PlayerId> {
        Some(self.owner)
    }
}
