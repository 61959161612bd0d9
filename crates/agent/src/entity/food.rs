use crate::rules::FOOD_RADIUS;
use glam::DVec2;

/// A food pellet. Its mass is the match-wide `food_mass`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Food {
    pub position: DVec2,
}

impl Food {
    pub const RADIUS: f64 = FOOD_RADIUS;

    pub fn new(position: DVec2) -> Self {
        Self { position }
    }
}
