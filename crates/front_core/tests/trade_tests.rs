//! Integration tests for ports and trade ships.

use front_core::config::Config;
use front_core::executions::{Execution, PortExecution, TradeShipExecution};
use front_core::world::{Game, MessageType, PlayerId, PlayerType, UnitId, UnitKind};
use front_test_utils::fixtures::fixed;
use front_test_utils::TestWorld;

fn step<E: Execution>(world: &mut TestWorld, exec: &mut E) {
    let tick = world.ticks();
    exec.tick(world, tick);
    world.advance_tick();
}

fn start<E: Execution>(world: &mut TestWorld, exec: &mut E) {
    let tick = world.ticks();
    exec.init(world, tick);
}

/// A thin strip of coast with two trading partners.
fn harbor_world(config: Config) -> (TestWorld, PlayerId, PlayerId, UnitId, UnitId) {
    let mut world = TestWorld::with_config(20, 1, config);
    let a = world.add_player("West", PlayerType::Human, fixed(100));
    let b = world.add_player("East", PlayerType::Human, fixed(100));
    world.claim_rect(a, 0, 0, 4, 0);
    world.claim_rect(b, 15, 0, 19, 0);
    let port_a = world.place_unit(a, UnitKind::Port, world.tile(0, 0));
    let port_b = world.place_unit(b, UnitKind::Port, world.tile(15, 0));
    (world, a, b, port_a, port_b)
}

#[test]
fn test_port_builds_and_spawns_trade_ship() {
    let mut config = Config::default();
    config.trade_ship_spawn_odds = 1; // guaranteed spawn on every check
    let mut world = TestWorld::with_config(20, 1, config);
    let a = world.add_player("West", PlayerType::Human, fixed(100));
    let b = world.add_player("East", PlayerType::Human, fixed(100));
    world.claim_rect(a, 0, 0, 4, 0);
    world.claim_rect(b, 15, 0, 19, 0);
    world.place_unit(b, UnitKind::Port, world.tile(15, 0));

    let mut exec = PortExecution::new(a, world.tile(0, 0));
    start(&mut world, &mut exec);
    let tick = world.ticks();
    exec.tick(&mut world, tick); // tick 0: on the 10-tick schedule

    assert_eq!(world.unit_count(UnitKind::Port), 2);
    assert_eq!(world.take_pending_executions().len(), 1);
}

#[test]
fn test_port_checks_only_every_ten_ticks() {
    let mut config = Config::default();
    config.trade_ship_spawn_odds = 1;
    let (mut world, a, _b, _port_a, _port_b) = harbor_world(config);

    let mut exec = PortExecution::new(a, world.tile(1, 0));
    start(&mut world, &mut exec);
    world.set_tick(3); // off the schedule

    let tick = world.ticks();
    exec.tick(&mut world, tick);
    assert!(world.take_pending_executions().is_empty());

    world.set_tick(10);
    let tick = world.ticks();
    exec.tick(&mut world, tick);
    assert_eq!(world.take_pending_executions().len(), 1);
}

#[test]
fn test_port_on_unowned_tile_deactivates() {
    let (mut world, a, _b, _port_a, _port_b) = harbor_world(Config::default());

    let mut exec = PortExecution::new(a, world.tile(10, 0)); // terra nullius
    start(&mut world, &mut exec);
    step(&mut world, &mut exec);

    assert!(!exec.is_active());
}

#[test]
fn test_trade_ship_pays_both_owners() {
    let (mut world, a, b, port_a, port_b) = harbor_world(Config::default());

    let mut exec = TradeShipExecution::new(a, port_a, port_b);
    start(&mut world, &mut exec);

    // 15 tiles at one step per tick, then the arrival tick.
    for _ in 0..16 {
        step(&mut world, &mut exec);
    }

    assert!(!exec.is_active());
    // Default rate: 100 gold per tile of distance, paid to both sides.
    assert_eq!(world.gold(a), 1500);
    assert_eq!(world.gold(b), 1500);
    assert_eq!(world.unit_count(UnitKind::TradeShip), 0);
    assert!(world
        .messages_for(a)
        .iter()
        .any(|m| m.kind == MessageType::Success && m.text.contains("1500 gold")));
    assert!(world
        .messages_for(b)
        .iter()
        .any(|m| m.kind == MessageType::Success));
}

#[test]
fn test_trade_ship_lost_when_destination_dies() {
    let (mut world, a, b, port_a, port_b) = harbor_world(Config::default());

    let mut exec = TradeShipExecution::new(a, port_a, port_b);
    start(&mut world, &mut exec);
    step(&mut world, &mut exec);
    step(&mut world, &mut exec);

    world.delete_unit(port_b, true);
    step(&mut world, &mut exec);

    assert!(!exec.is_active());
    assert_eq!(world.unit_count(UnitKind::TradeShip), 0);
    assert_eq!(world.gold(a), 0);
    assert_eq!(world.gold(b), 0);
}

#[test]
fn test_trade_ship_lost_when_source_dies() {
    let (mut world, a, b, port_a, port_b) = harbor_world(Config::default());

    let mut exec = TradeShipExecution::new(a, port_a, port_b);
    start(&mut world, &mut exec);
    step(&mut world, &mut exec);

    world.delete_unit(port_a, true);
    step(&mut world, &mut exec);

    assert!(!exec.is_active());
    assert_eq!(world.unit_count(UnitKind::TradeShip), 0);
    assert_eq!(world.gold(b), 0);
}

#[test]
fn test_captured_port_keeps_trading_for_new_owner() {
    let mut config = Config::default();
    config.trade_ship_spawn_odds = 1;
    let (mut world, a, _b, port_a, _port_b) = harbor_world(config);
    // C will capture A's harbor town.
    let c = world.add_player("North", PlayerType::Human, fixed(100));

    let mut exec = PortExecution::new(a, world.tile(0, 0));
    start(&mut world, &mut exec);
    world.set_tick(10);
    let tick = world.ticks();
    exec.tick(&mut world, tick);
    let _ = world.take_pending_executions();

    world.conquer(c, world.tile(0, 0));
    assert_eq!(world.unit(port_a).map(|u| u.owner), Some(c));

    world.set_tick(20);
    let tick = world.ticks();
    exec.tick(&mut world, tick);
    assert_eq!(exec.owner(), Some(c));
    // B's port is still a valid partner for the new owner.
    assert_eq!(world.take_pending_executions().len(), 1);
}
