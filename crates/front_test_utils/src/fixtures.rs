//! Test fixtures and helpers.
//!
//! Pre-built worlds and scenario builders for consistent testing.

use fixed::types::I32F32;
use front_core::config::Config;
use front_core::math::Fixed;
use front_core::world::{PlayerId, PlayerType};

use crate::world::TestWorld;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// A `width` x `height` map split vertically between two human players,
/// clock already past the spawn and immunity phases.
///
/// The left half belongs to the first player, the right half to the second.
#[must_use]
pub fn two_player_front(width: u32, height: u32, troops: Fixed) -> (TestWorld, PlayerId, PlayerId) {
    two_player_front_with_config(width, height, troops, Config::default())
}

/// [`two_player_front`] with an explicit config.
#[must_use]
pub fn two_player_front_with_config(
    width: u32,
    height: u32,
    troops: Fixed,
    config: Config,
) -> (TestWorld, PlayerId, PlayerId) {
    let mut world = TestWorld::with_config(width, height, config);
    let left = world.add_player("Left", PlayerType::Human, troops);
    let right = world.add_player("Right", PlayerType::Human, troops);
    let mid = width / 2;
    world.claim_rect(left, 0, 0, mid - 1, height - 1);
    world.claim_rect(right, mid, 0, width - 1, height - 1);
    world.skip_spawn_phase();
    (world, left, right)
}

/// A map where one player borders unclaimed land: the left column is owned,
/// everything else is terra nullius. Clock past spawn phase.
#[must_use]
pub fn lone_expander(width: u32, height: u32, troops: Fixed) -> (TestWorld, PlayerId) {
    let mut world = TestWorld::new(width, height);
    let player = world.add_player("Expander", PlayerType::Human, troops);
    world.claim_rect(player, 0, 0, 0, height - 1);
    world.skip_spawn_phase();
    (world, player)
}
