//! A player's cell.

use super::{DEFAULT_DIRECTION, Ejection, keep_inside};
use crate::collision::mass_to_radius;
use crate::rules::{
    BURST_BONUS, EJECT_MASS, EJECT_START_SPEED, MIN_BURST_MASS, MIN_EJECT_MASS, MIN_SHRINK_MASS,
    MIN_SPLIT_MASS, Rules, SCORE_FOR_BURST, SHRINK_FACTOR, SPLIT_START_SPEED,
};
use glam::DVec2;

/// One physical cell of a player.
///
/// Velocity is kept as a unit `direction` plus a scalar `speed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub position: DVec2,
    pub direction: DVec2,
    pub speed: f64,
    pub mass: f64,
    /// Always `mass_to_radius(mass)` once the tick finishes.
    pub radius: f64,
    /// Set after split, burst or spawn; steering is ignored meanwhile.
    pub fast: bool,
    /// Ticks left before this fragment may fuse.
    pub fuse_timer: u32,
    /// Player id as seen on the wire.
    pub owner: u32,
    pub sub_id: u32,
    /// Score earned this tick, moved into the player total at the end of it.
    pub score: i32,
}

impl Fragment {
    pub fn new(owner: u32, sub_id: u32, position: DVec2, mass: f64) -> Self {
        Self {
            position,
            direction: DEFAULT_DIRECTION,
            speed: 0.0,
            mass,
            radius: mass_to_radius(mass),
            fast: false,
            fuse_timer: 0,
            owner,
            sub_id,
            score: 0,
        }
    }

    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.direction * self.speed
    }

    /// Set speed and heading; a zero vector keeps the old heading.
    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.speed = velocity.length();
        if self.speed > 0.0 {
            self.direction = velocity / self.speed;
        }
    }

    /// Blend velocity toward `target`. Heavier fragments turn slower.
    pub fn steer(&mut self, target: DVec2, rules: &Rules) {
        if self.fast {
            return;
        }
        let max_speed = rules.max_speed(self.mass);
        let n = (target - self.position).normalize_or_zero();
        let mut v = self.velocity();
        v += (n * max_speed - v) * (rules.inertia_factor / self.mass);

        let speed = v.length();
        if speed > 0.0 {
            self.direction = v / speed;
        }
        self.speed = speed.min(max_speed);
    }

    /// Integrate one tick of motion.
    ///
    /// Wall contact clamps the center and drops the perpendicular velocity.
    pub fn advance(&mut self, rules: &Rules) {
        let mut v = self.velocity();
        let moved = self.position + v;
        let r = self.radius;
        let mut hit_wall = false;

        if moved.x - r > 0.0 && moved.x + r < rules.width {
            self.position.x = moved.x;
        } else {
            self.position.x = keep_inside(moved.x, r, rules.width);
            v.x = 0.0;
            hit_wall = true;
        }
        if moved.y - r > 0.0 && moved.y + r < rules.height {
            self.position.y = moved.y;
        } else {
            self.position.y = keep_inside(moved.y, r, rules.height);
            v.y = 0.0;
            hit_wall = true;
        }
        if hit_wall {
            self.set_velocity(v);
        }

        if self.fast {
            let max_speed = rules.max_speed(self.mass);
            if self.speed - rules.viscosity > max_speed {
                self.speed -= rules.viscosity;
            } else {
                self.speed = max_speed;
                self.fast = false;
            }
        }
        self.fuse_timer = self.fuse_timer.saturating_sub(1);
    }

    /// Push this fragment away from `other`.
    pub fn nudge(&mut self, impulse: DVec2) {
        self.set_velocity(self.velocity() + impulse);
    }

    #[inline]
    pub fn can_split(&self) -> bool {
        self.mass > MIN_SPLIT_MASS
    }

    /// Halve this fragment and return the other half flying ahead.
    pub fn split_off(&mut self, sub_id: u32, rules: &Rules) -> Fragment {
        let half = self.mass / 2.0;
        self.set_mass(half);
        self.fuse_timer = rules.ticks_til_fusion;
        Fragment {
            speed: SPLIT_START_SPEED,
            fast: true,
            sub_id,
            score: 0,
            ..*self
        }
    }

    #[inline]
    pub fn can_eject(&self) -> bool {
        self.mass > MIN_EJECT_MASS
    }

    /// Throw a blob out of the leading edge.
    pub fn eject(&mut self, owner: usize) -> Ejection {
        let position = self.position + self.direction * (self.radius + 1.0);
        self.set_mass(self.mass - EJECT_MASS);
        Ejection::new(position, self.direction, EJECT_START_SPEED, Some(owner))
    }

    pub fn shrink(&mut self) {
        if self.mass > MIN_SHRINK_MASS {
            self.mass -= (self.mass - MIN_SHRINK_MASS) * SHRINK_FACTOR;
        }
    }

    /// Large enough to be burst with at least one spare fragment slot.
    pub fn can_burst(&self, headroom: usize) -> bool {
        if self.mass < MIN_BURST_MASS * 2.0 {
            return false;
        }
        (self.mass / MIN_BURST_MASS).floor() > 1.0 && headroom > 0
    }

    /// Recoil from a virus: head away from it at least at cruising speed.
    pub fn burst_on(&mut self, virus: DVec2, rules: &Rules) {
        let away = self.position - virus;
        let d = away.length();
        self.direction = if d > 0.0 { away / d } else { DEFAULT_DIRECTION };
        self.speed = self.speed.max(rules.max_speed(self.mass));
        self.mass += BURST_BONUS;
        self.score += SCORE_FOR_BURST;
    }

    /// Merge `other` in, weighting center and velocity by mass.
    pub fn absorb(&mut self, other: &Fragment) {
        let total = self.mass + other.mass;
        let own = self.mass / total;
        let theirs = other.mass / total;
        self.position = self.position * own + other.position * theirs;
        self.set_velocity(self.velocity() * own + other.velocity() * theirs);
        self.mass = total;
        self.score += other.score;
        self.fuse_timer = 0;
    }

    pub fn can_fuse(&self, other: &Fragment) -> bool {
        self.fuse_timer == 0
            && other.fuse_timer == 0
            && crate::collision::touching(self.position, self.radius, other.position, other.radius)
    }

    /// Recompute radius and restore the speed cap and wall distance.
    pub fn refresh(&mut self, rules: &Rules) {
        self.radius = mass_to_radius(self.mass);
        if !self.fast {
            self.speed = self.speed.min(rules.max_speed(self.mass));
        }
        self.position.x = keep_inside(self.position.x, self.radius, rules.width);
        self.position.y = keep_inside(self.position.y, self.radius, rules.height);
    }

    #[inline]
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.radius = mass_to_radius(mass);
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new(0, 0, DVec2::ZERO, 0.0)
    }
}
