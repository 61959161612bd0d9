//! Game rules: fixed constants plus the per-match physics parameters.

use glam::DVec2;
use protocol::GameConfig;

pub const FOOD_RADIUS: f64 = 2.5;
pub const VIRUS_MASS: f64 = 40.0;
/// Radius is `PLAYER_RADIUS_FACTOR * sqrt(mass)`.
pub const PLAYER_RADIUS_FACTOR: f64 = 2.0;
pub const PLAYER_MASS: f64 = 40.0;

pub const VIS_FACTOR: f64 = 4.0;
pub const VIS_FACTOR_FR: f64 = 2.5;
pub const VIS_SHIFT: f64 = 10.0;

pub const MIN_BURST_MASS: f64 = 60.0;
pub const BURST_START_SPEED: f64 = 8.0;
pub const BURST_ANGLE_SPECTRUM: f64 = std::f64::consts::PI;
pub const BURST_BONUS: f64 = 5.0;

pub const MIN_SPLIT_MASS: f64 = 120.0;
pub const SPLIT_START_SPEED: f64 = 9.0;

pub const MIN_EJECT_MASS: f64 = 40.0;
pub const EJECT_START_SPEED: f64 = 8.0;
pub const EJECT_RADIUS: f64 = 4.0;
pub const EJECT_MASS: f64 = 15.0;

pub const VIRUS_SPLIT_SPEED: f64 = 8.0;

pub const MIN_SHRINK_MASS: f64 = 100.0;
pub const SHRINK_FACTOR: f64 = 0.01;
pub const SHRINK_EVERY_TICK: u32 = 50;

pub const SCORE_FOR_FOOD: i32 = 1;
pub const SCORE_FOR_PLAYER: i32 = 10;
pub const SCORE_FOR_LAST: i32 = 100;
pub const SCORE_FOR_BURST: i32 = 2;

/// A fragment reaches a checkpoint when within this many radii of it.
pub const CHECKPOINT_REACH_FACTOR: f64 = 4.0;

/// Physics parameters announced by the runner at match start.
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    pub width: f64,
    pub height: f64,
    pub ticks: u32,
    pub food_mass: f64,
    pub max_fragments: usize,
    pub ticks_til_fusion: u32,
    pub virus_radius: f64,
    pub virus_split_mass: f64,
    pub viscosity: f64,
    pub inertia_factor: f64,
    pub speed_factor: f64,
}

impl Rules {
    /// Mass-capped cruising speed.
    #[inline]
    pub fn max_speed(&self, mass: f64) -> f64 {
        self.speed_factor / mass.sqrt()
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.size().length()
    }

    /// Clamp a steering target into the arena.
    pub fn limit(&self, target: DVec2) -> DVec2 {
        target.clamp(DVec2::ZERO, self.size())
    }

    /// A point tucked into a corner where a fragment of `radius` cannot
    /// reach it, because the walls stop the fragment's center short.
    pub fn is_shadowed(&self, point: DVec2, radius: f64) -> bool {
        let corner_axis = |value: f64, extent: f64| {
            if value < radius {
                Some(radius)
            } else if value > extent - radius {
                Some(extent - radius)
            } else {
                None
            }
        };
        match (corner_axis(point.x, self.width), corner_axis(point.y, self.height)) {
            (Some(x), Some(y)) => point.distance_squared(DVec2::new(x, y)) > radius * radius,
            _ => false,
        }
    }

    /// Four corners followed by the four edge midpoints.
    pub fn border_points(&self) -> [DVec2; 8] {
        let (w, h) = (self.width, self.height);
        [
            DVec2::new(0.0, 0.0),
            DVec2::new(w, 0.0),
            DVec2::new(0.0, h),
            DVec2::new(w, h),
            DVec2::new(w / 2.0, 0.0),
            DVec2::new(0.0, h / 2.0),
            DVec2::new(w, h / 2.0),
            DVec2::new(w / 2.0, h),
        ]
    }
}

impl From<&GameConfig> for Rules {
    fn from(config: &GameConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            ticks: config.ticks,
            food_mass: config.food_mass,
            max_fragments: config.max_fragments,
            ticks_til_fusion: config.ticks_til_fusion,
            virus_radius: config.virus_radius,
            virus_split_mass: config.virus_split_mass,
            viscosity: config.viscosity,
            inertia_factor: config.inertia_factor,
            speed_factor: config.speed_factor,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}
