//! Ejected mass blob.

use super::{DEFAULT_DIRECTION, drift};
use crate::rules::{EJECT_MASS, EJECT_RADIUS, Rules};
use glam::DVec2;

/// Mass thrown out by a fragment. Decelerates until it stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ejection {
    pub position: DVec2,
    pub direction: DVec2,
    pub speed: f64,
    /// Player slot that ejected it, if known.
    pub owner: Option<usize>,
}

impl Ejection {
    pub const RADIUS: f64 = EJECT_RADIUS;
    pub const MASS: f64 = EJECT_MASS;

    pub fn new(position: DVec2, direction: DVec2, speed: f64, owner: Option<usize>) -> Self {
        Self {
            position,
            direction,
            speed,
            owner,
        }
    }

    pub fn advance(&mut self, rules: &Rules) {
        drift(&mut self.position, self.direction, &mut self.speed, Self::RADIUS, rules);
    }
}

impl Default for Ejection {
    fn default() -> Self {
        Self::new(DVec2::ZERO, DEFAULT_DIRECTION, 0.0, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ejection_decelerates_to_rest() {
        let rules = Rules::default();
        let mut ejection = Ejection::new(DVec2::new(100.0, 100.0), DVec2::X, 1.0, Some(0));
        ejection.advance(&rules);
        assert_eq!(ejection.position, DVec2::new(101.0, 100.0));
        assert_eq!(ejection.speed, 0.75);
        for _ in 0..10 {
            ejection.advance(&rules);
        }
        assert_eq!(ejection.speed, 0.0);
        let rest = ejection.position;
        ejection.advance(&rules);
        assert_eq!(ejection.position, rest);
    }

    #[test]
    fn test_ejection_stays_inside() {
        let rules = Rules::default();
        let mut ejection = Ejection::new(DVec2::new(rules.width - 5.0, 50.0), DVec2::X, 8.0, None);
        ejection.advance(&rules);
        assert_eq!(ejection.position.x, rules.width - Ejection::RADIUS);
    }
}
