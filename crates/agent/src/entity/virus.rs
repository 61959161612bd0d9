//! Virus.

use super::{DEFAULT_DIRECTION, drift};
use crate::rules::{Rules, VIRUS_MASS, VIRUS_SPLIT_SPEED};
use glam::DVec2;

/// A virus that bursts large fragments and grows from swallowed ejections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Virus {
    pub position: DVec2,
    pub direction: DVec2,
    /// Non-zero only right after a split.
    pub speed: f64,
    pub mass: f64,
    pub radius: f64,
    /// Heading of the last ejection swallowed; children fly this way.
    pub split_direction: DVec2,
}

impl Virus {
    pub fn new(position: DVec2, mass: f64, radius: f64) -> Self {
        Self {
            position,
            direction: DEFAULT_DIRECTION,
            speed: 0.0,
            mass,
            radius,
            split_direction: DEFAULT_DIRECTION,
        }
    }

    pub fn advance(&mut self, rules: &Rules) {
        drift(&mut self.position, self.direction, &mut self.speed, self.radius, rules);
    }

    /// Swallow an ejection.
    pub fn absorb(&mut self, mass: f64, direction: DVec2) {
        self.mass += mass;
        self.split_direction = direction;
    }

    pub fn should_split(&self, rules: &Rules) -> bool {
        self.mass > rules.virus_split_mass
    }

    /// Shed a base-mass child along the stored split direction.
    pub fn split(&mut self) -> Virus {
        self.mass = VIRUS_MASS;
        Virus {
            direction: self.split_direction,
            speed: VIRUS_SPLIT_SPEED,
            ..Virus::new(self.position, VIRUS_MASS, self.radius)
        }
    }
}

impl Default for Virus {
    fn default() -> Self {
        Self::new(DVec2::ZERO, VIRUS_MASS, 0.0)
    }
}
