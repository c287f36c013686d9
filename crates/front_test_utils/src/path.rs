//! Deterministic grid path stepper.
//!
//! Projectiles and vessels in the core consume a [`PathStepper`] without
//! caring about the strategy behind it. For tests a greedy
//! longest-axis-first walk is enough: it is fully deterministic, always
//! terminates, and its step count is the Chebyshev-ish sum both sides of a
//! determinism comparison will reproduce exactly.

use front_core::world::{PathStep, PathStepper, TileRef};

/// Greedy stepper over a row-major tile grid of fixed width.
///
/// Steps one orthogonal tile at a time along the axis with the larger
/// remaining delta; ties prefer the x axis.
pub struct GridStepper {
    width: u32,
}

impl GridStepper {
    /// Create a stepper for a grid `width` tiles wide.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self { width }
    }

    fn coords(&self, tile: TileRef) -> (i64, i64) {
        (i64::from(tile.0 % self.width), i64::from(tile.0 / self.width))
    }
}

impl PathStepper for GridStepper {
    fn next_tile(&mut self, from: TileRef, to: TileRef) -> PathStep {
        if from == to {
            return PathStep::Arrived;
        }
        let (fx, fy) = self.coords(from);
        let (tx, ty) = self.coords(to);
        let dx = tx - fx;
        let dy = ty - fy;

        let next = if dx.abs() >= dy.abs() && dx != 0 {
            if dx > 0 {
                from.0 + 1
            } else {
                from.0 - 1
            }
        } else if dy > 0 {
            from.0 + self.width
        } else {
            from.0 - self.width
        };
        PathStep::Next(TileRef(next))
    }
}
