//! Overlap predicates for eating, virus hurting, fusion and the
//! repulsion between same-owner fragments.

use crate::rules::PLAYER_RADIUS_FACTOR;
use glam::DVec2;

/// Predator mass must exceed prey mass times this.
pub const MASS_EAT_FACTOR: f64 = 1.2;
/// Fraction of the prey diameter that must be inside the predator.
pub const DIAM_EAT_FACTOR: f64 = 2.0 / 3.0;
pub const RAD_HURT_FACTOR: f64 = 2.0 / 3.0;
pub const COLLISION_POWER: f64 = 20.0;

/// Prey radius multiplier in the eat-overlap test.
const RADIUS_EAT_FACTOR: f64 = 2.0 * DIAM_EAT_FACTOR - 1.0;

/// Calculate radius from mass.
#[inline]
pub fn mass_to_radius(mass: f64) -> f64 {
    PLAYER_RADIUS_FACTOR * mass.sqrt()
}

/// Inverse of [`mass_to_radius`].
#[inline]
pub fn radius_to_mass(radius: f64) -> f64 {
    let root = radius / PLAYER_RADIUS_FACTOR;
    root * root
}

/// Strict mass test: equal-ratio fragments never eat each other.
#[inline]
pub fn outweighs(predator_mass: f64, prey_mass: f64) -> bool {
    predator_mass > prey_mass * MASS_EAT_FACTOR
}

/// Overlap depth if `prey` is deep enough inside the predator to be eaten.
///
/// Mass is not checked here; see [`outweighs`].
#[inline]
pub fn eat_depth(
    predator: DVec2,
    predator_radius: f64,
    prey: DVec2,
    prey_radius: f64,
) -> Option<f64> {
    let reach = predator_radius - prey_radius * RADIUS_EAT_FACTOR;
    if reach <= 0.0 {
        return None;
    }
    let qdist = predator.distance_squared(prey);
    (qdist < reach * reach).then(|| predator_radius - qdist.sqrt())
}

/// Squared distance if a virus can hurt a fragment, `None` otherwise.
#[inline]
pub fn hurt_distance(
    virus: DVec2,
    virus_radius: f64,
    fragment: DVec2,
    fragment_radius: f64,
) -> Option<f64> {
    if fragment_radius < virus_radius {
        return None;
    }
    let qdist = virus.distance_squared(fragment);
    let reach = virus_radius * RAD_HURT_FACTOR + fragment_radius;
    (qdist < reach * reach).then_some(qdist)
}

/// Circles touch or overlap.
#[inline]
pub fn touching(a: DVec2, a_radius: f64, b: DVec2, b_radius: f64) -> bool {
    let r = a_radius + b_radius;
    a.distance_squared(b) <= r * r
}

/// Velocity impulses applied to two overlapping fragments of one owner.
///
/// Returns the change for `a` and for `b`; the lighter one is pushed more.
#[inline]
pub fn repulsion(
    a: DVec2,
    a_radius: f64,
    a_mass: f64,
    b: DVec2,
    b_radius: f64,
    b_mass: f64,
) -> Option<(DVec2, DVec2)> {
    let r = a_radius + b_radius;
    let delta = a - b;
    let d = delta.length();
    if d >= r || d < 1e-9 {
        return None;
    }
    let n = delta / d;
    let force = (1.0 - d / r).powi(2) * COLLISION_POWER;
    let sum = a_mass + b_mass;
    Some((n * (force * b_mass / sum), -n * (force * a_mass / sum)))
}
