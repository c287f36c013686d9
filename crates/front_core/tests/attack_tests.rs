//! Integration tests for territorial conquest.

use front_core::executions::{AttackExecution, Execution};
use front_core::math::Fixed;
use front_core::world::{Game, PlayerType, Tick};
use front_test_utils::fixtures::{fixed, lone_expander, two_player_front};
use front_test_utils::TestWorld;

/// Init an attack execution against the world at its current tick.
fn start(world: &mut TestWorld, exec: &mut AttackExecution) {
    let tick: Tick = world.ticks();
    exec.init(world, tick);
}

fn step(world: &mut TestWorld, exec: &mut AttackExecution) {
    let tick: Tick = world.ticks();
    exec.tick(world, tick);
    world.advance_tick();
}

#[test]
fn test_opposing_attacks_cancel_troop_for_troop() {
    let (mut world, a, b) = two_player_front(30, 20, fixed(1000));

    let mut b_exec = AttackExecution::new(Some(fixed(6)), b, Some(a), None, false);
    start(&mut world, &mut b_exec);
    assert_eq!(world.outgoing_attacks(b).len(), 1);

    // The larger counter-attack survives with the difference.
    let mut a_exec = AttackExecution::new(Some(fixed(10)), a, Some(b), None, false);
    start(&mut world, &mut a_exec);

    assert!(a_exec.is_active());
    let surviving = world.outgoing_attacks(a);
    assert_eq!(surviving.len(), 1);
    assert_eq!(world.attack(surviving[0]).map(|x| x.troops), Some(fixed(4)));
    assert!(world.outgoing_attacks(b).is_empty());

    // The cancelled side notices its attack is gone and goes inactive.
    step(&mut world, &mut b_exec);
    assert!(!b_exec.is_active());
}

#[test]
fn test_smaller_counter_attack_is_consumed() {
    let (mut world, a, b) = two_player_front(30, 20, fixed(1000));

    let mut b_exec = AttackExecution::new(Some(fixed(10)), b, Some(a), None, false);
    start(&mut world, &mut b_exec);

    let mut a_exec = AttackExecution::new(Some(fixed(6)), a, Some(b), None, false);
    start(&mut world, &mut a_exec);

    assert!(!a_exec.is_active());
    assert!(world.outgoing_attacks(a).is_empty());
    let remaining = world.outgoing_attacks(b);
    assert_eq!(world.attack(remaining[0]).map(|x| x.troops), Some(fixed(4)));
}

#[test]
fn test_same_target_same_source_merges() {
    let (mut world, a, b) = two_player_front(30, 20, fixed(1000));

    let mut first = AttackExecution::new(Some(fixed(10)), a, Some(b), None, false);
    start(&mut world, &mut first);
    let mut second = AttackExecution::new(Some(fixed(5)), a, Some(b), None, false);
    start(&mut world, &mut second);

    assert!(!second.is_active());
    let attacks = world.outgoing_attacks(a);
    assert_eq!(attacks.len(), 1);
    assert_eq!(world.attack(attacks[0]).map(|x| x.troops), Some(fixed(15)));
}

#[test]
fn test_self_attack_rejected() {
    let (mut world, a, _b) = two_player_front(30, 20, fixed(1000));

    let mut exec = AttackExecution::new(Some(fixed(10)), a, Some(a), None, false);
    start(&mut world, &mut exec);

    assert!(!exec.is_active());
    assert!(world.outgoing_attacks(a).is_empty());
}

#[test]
fn test_stale_frontier_candidate_is_skipped() {
    let mut world = TestWorld::new(4, 1);
    let a = world.add_player("Expander", PlayerType::Human, fixed(100));
    let c = world.add_player("Interloper", PlayerType::Human, fixed(100));
    world.claim_rect(a, 0, 0, 0, 0);

    let mut exec = AttackExecution::new(Some(fixed(100)), a, None, None, true);
    start(&mut world, &mut exec);

    // The only candidate was unowned at enqueue time; flip it before the
    // attack spends budget on it.
    let contested = world.tile(1, 0);
    world.set_owner(contested, Some(c));
    step(&mut world, &mut exec);

    // The stale candidate is never conquered, and with nothing unclaimed
    // left to reach the attack refunds in full.
    assert_eq!(world.owner_of(contested), Some(c));
    assert_eq!(world.num_tiles_owned(a), 1);
    assert_eq!(world.troops(a), fixed(100));
    assert!(world.outgoing_attacks(a).is_empty());
    assert!(!exec.is_active());
}

#[test]
fn test_player_attack_blocked_during_immunity() {
    let (mut world, a, b) = two_player_front(30, 20, fixed(1000));
    world.set_tick(10);

    let mut exec = AttackExecution::new(Some(fixed(10)), a, Some(b), None, false);
    start(&mut world, &mut exec);
    assert!(!exec.is_active());
    assert!(world.outgoing_attacks(a).is_empty());

    // Terra nullius expansion is allowed during immunity.
    let mut expand = AttackExecution::new(Some(fixed(10)), a, None, None, false);
    start(&mut world, &mut expand);
    assert!(expand.is_active());
    assert_eq!(world.outgoing_attacks(a).len(), 1);
}

#[test]
fn test_attack_imposes_embargo_on_attacker() {
    let (mut world, a, b) = two_player_front(30, 20, fixed(1000));

    let mut exec = AttackExecution::new(Some(fixed(10)), b, Some(a), None, false);
    start(&mut world, &mut exec);

    // The target stops trading with the aggressor, and relations sour.
    assert!(world.has_embargo(a, b));
    assert_eq!(world.relation(a, b), -80);
}

#[test]
fn test_bots_neither_impose_nor_receive_embargoes() {
    let mut world = TestWorld::new(30, 20);
    let human = world.add_player("Human", PlayerType::Human, fixed(1000));
    let bot = world.add_player("Bot", PlayerType::Bot, fixed(1000));
    world.claim_rect(human, 0, 0, 14, 19);
    world.claim_rect(bot, 15, 0, 29, 19);
    world.skip_spawn_phase();

    let mut exec = AttackExecution::new(Some(fixed(10)), human, Some(bot), None, false);
    start(&mut world, &mut exec);
    assert!(!world.has_embargo(bot, human));
}

#[test]
fn test_default_commitment_scales_by_player_type() {
    let mut world = TestWorld::new(10, 10);
    let bot = world.add_player("Bot", PlayerType::Bot, fixed(2000));
    world.claim_rect(bot, 0, 0, 0, 9);
    world.skip_spawn_phase();

    let mut exec = AttackExecution::new(None, bot, None, None, false);
    start(&mut world, &mut exec);

    let attacks = world.outgoing_attacks(bot);
    // Bots commit troops / 20 by default.
    assert_eq!(world.attack(attacks[0]).map(|x| x.troops), Some(fixed(100)));
}

#[test]
fn test_terra_nullius_expansion_pays_attrition() {
    let (mut world, player) = lone_expander(8, 4, fixed(100));

    let mut exec = AttackExecution::new(Some(fixed(50)), player, None, None, true);
    start(&mut world, &mut exec);
    assert_eq!(world.troops(player), fixed(50));

    for _ in 0..5 {
        step(&mut world, &mut exec);
    }

    // One plains tile per tick at one troop of attrition each.
    assert_eq!(world.num_tiles_owned(player), 4 + 5);
    let attacks = world.outgoing_attacks(player);
    assert_eq!(world.attack(attacks[0]).map(|x| x.troops), Some(fixed(45)));
}

#[test]
fn test_exhausted_frontier_refunds_troops() {
    let (mut world, player) = lone_expander(3, 1, fixed(20));

    let mut exec = AttackExecution::new(Some(fixed(10)), player, None, None, true);
    start(&mut world, &mut exec);
    assert_eq!(world.troops(player), fixed(10));

    for _ in 0..3 {
        step(&mut world, &mut exec);
    }

    // Two tiles conquered at one troop each, the rest returned in full.
    assert!(!exec.is_active());
    assert_eq!(world.num_tiles_owned(player), 3);
    assert!(world.outgoing_attacks(player).is_empty());
    assert_eq!(world.troops(player), fixed(18));
}

#[test]
fn test_retreat_from_player_costs_a_quarter() {
    let (mut world, a, b) = two_player_front(30, 20, fixed(1000));

    let mut exec = AttackExecution::new(Some(fixed(100)), b, Some(a), None, true);
    start(&mut world, &mut exec);
    assert_eq!(world.troops(b), fixed(900));

    let attack_id = world.outgoing_attacks(b)[0];
    world.order_retreat(attack_id);
    step(&mut world, &mut exec);

    assert!(!exec.is_active());
    assert!(world.outgoing_attacks(b).is_empty());
    assert_eq!(world.troops(b), fixed(975));
    assert!(world
        .messages_for(b)
        .iter()
        .any(|m| m.text.contains("killed during retreat")));
}

#[test]
fn test_retreat_from_terra_nullius_is_free() {
    let (mut world, player) = lone_expander(20, 20, fixed(100));

    let mut exec = AttackExecution::new(Some(fixed(40)), player, None, None, true);
    start(&mut world, &mut exec);
    let attack_id = world.outgoing_attacks(player)[0];
    world.order_retreat(attack_id);
    step(&mut world, &mut exec);

    assert!(!exec.is_active());
    assert_eq!(world.troops(player), fixed(100));
}

#[test]
fn test_retreating_attack_idles() {
    let (mut world, a, b) = two_player_front(30, 20, fixed(1000));

    let mut exec = AttackExecution::new(Some(fixed(100)), b, Some(a), None, true);
    start(&mut world, &mut exec);
    let attack_id = world.outgoing_attacks(b)[0];
    world.set_attack_retreating(attack_id, true);

    let tiles_before = world.num_tiles_owned(a);
    step(&mut world, &mut exec);

    assert!(exec.is_active());
    assert_eq!(world.num_tiles_owned(a), tiles_before);
    assert_eq!(world.attack(attack_id).map(|x| x.troops), Some(fixed(100)));
}

#[test]
fn test_new_alliance_forces_free_retreat() {
    let (mut world, a, b) = two_player_front(30, 20, fixed(1000));

    let mut exec = AttackExecution::new(Some(fixed(100)), b, Some(a), None, true);
    start(&mut world, &mut exec);
    assert_eq!(world.troops(b), fixed(900));

    // Diplomats worked faster than soldiers.
    world.make_alliance(a, b);
    step(&mut world, &mut exec);

    assert!(!exec.is_active());
    assert!(world.outgoing_attacks(b).is_empty());
    assert_eq!(world.troops(b), fixed(1000));
}

#[test]
fn test_attacking_an_ally_breaks_the_alliance() {
    let (mut world, a, b) = two_player_front(30, 20, fixed(1000));
    world.make_alliance(a, b);

    let mut exec = AttackExecution::new(Some(fixed(100)), b, Some(a), None, true);
    start(&mut world, &mut exec);
    // Init never mutates diplomacy state beyond relations.
    assert!(world.is_allied(a, b));
    assert_eq!(world.relation(a, b), -80);

    step(&mut world, &mut exec);
    assert!(!world.is_allied(a, b));
    assert!(exec.is_active());
}

#[test]
fn test_collapsed_defender_is_partitioned() {
    // 16 tiles is far below the collapse threshold.
    let (mut world, a, b) = two_player_front(8, 4, fixed(1000));
    world.set_gold(b, 500);

    let mut exec = AttackExecution::new(Some(fixed(100)), a, Some(b), None, true);
    start(&mut world, &mut exec);
    step(&mut world, &mut exec);

    assert_eq!(world.num_tiles_owned(b), 0);
    assert_eq!(world.num_tiles_owned(a), 32);
    assert_eq!(world.gold(a), 500);
    assert_eq!(world.gold(b), 0);
    assert!(world
        .messages_for(a)
        .iter()
        .any(|m| m.text.contains("Conquered")));
}

#[test]
fn test_attack_dies_of_attrition() {
    let (mut world, a, b) = two_player_front(30, 20, fixed(1000));

    let mut exec = AttackExecution::new(Some(fixed(1)), a, Some(b), None, true);
    start(&mut world, &mut exec);

    for _ in 0..3 {
        step(&mut world, &mut exec);
    }

    assert!(!exec.is_active());
    assert!(world.outgoing_attacks(a).is_empty());
    assert!(world.troops(a) >= Fixed::ZERO);
}

#[test]
fn test_total_troops_never_increase_during_conquest() {
    let (mut world, a, b) = two_player_front(30, 20, fixed(1000));

    let mut exec = AttackExecution::new(Some(fixed(200)), a, Some(b), None, true);
    start(&mut world, &mut exec);

    let mut last_total =
        world.troops(a) + world.troops(b) + world.committed_troops(a) + world.committed_troops(b);
    for _ in 0..30 {
        step(&mut world, &mut exec);
        let total = world.troops(a)
            + world.troops(b)
            + world.committed_troops(a)
            + world.committed_troops(b);
        assert!(total <= last_total, "troops appeared from nowhere");
        last_total = total;
    }
}
