//! Game entities.
//!
//! This module defines the value types the simulator copies around and
//! the fixed-capacity containers that hold them.

mod bounded;
mod ejection;
mod food;
mod fragment;
mod player;
mod virus;

pub use bounded::BoundedList;
pub use ejection::Ejection;
pub use food::Food;
pub use fragment::Fragment;
pub use player::{FragmentList, PlayerFragments};
pub use virus::Virus;

/// Capacity of every "nearest K" container in a snapshot.
pub const NEAREST: usize = 16;

/// Default heading for anything that has never moved.
pub const DEFAULT_DIRECTION: glam::DVec2 = glam::DVec2::X;

/// Keep a center at least `radius` inside `[0, extent]`.
#[inline]
pub(crate) fn keep_inside(value: f64, radius: f64, extent: f64) -> f64 {
    value.max(radius).min(extent - radius)
}

/// Move a point with a decaying speed, clamped to the arena.
///
/// Shared by ejections and viruses; neither steers.
pub(crate) fn drift(
    position: &mut glam::DVec2,
    direction: glam::DVec2,
    speed: &mut f64,
    radius: f64,
    rules: &crate::rules::Rules,
) {
    if *speed == 0.0 {
        return;
    }
    let moved = *position + direction * *speed;
    position.x = keep_inside(moved.x, radius, rules.width);
    position.y = keep_inside(moved.y, radius, rules.height);
    *speed = (*speed - rules.viscosity).max(0.0);
}
