//! Long-range waypoints that keep the agent roaming when nothing is in sight.

use crate::config::CheckpointConfig;
use crate::rules::Rules;
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Placement attempts before a waypoint is accepted regardless of spacing.
const MAX_ATTEMPTS: u32 = 1000;

/// Share of the arena kept free along each wall.
const MARGIN: f64 = 0.05;

/// Scatter `settings.count` waypoints over the arena.
///
/// Each one is placed farther than a quarter of the arena diagonal from the
/// already placed waypoints among its `neighbour_window` cyclic neighbours on
/// either side, so consecutive legs are long.
pub fn generate(rules: &Rules, settings: &CheckpointConfig, seed: u64) -> Vec<DVec2> {
    let mut rng = StdRng::seed_from_u64(seed);
    let count = settings.count;
    let min_distance = rules.diagonal() * 0.25;
    let mut points: Vec<DVec2> = Vec::with_capacity(count);

    for index in 0..count {
        let neighbours: Vec<DVec2> = (1..=settings.neighbour_window)
            .flat_map(|offset| [(index + count - offset % count) % count, (index + offset) % count])
            .filter(|&i| i != index && i < points.len())
            .map(|i| points[i])
            .collect();

        let mut candidate = random_point(&mut rng, rules);
        for _ in 1..MAX_ATTEMPTS {
            if neighbours.iter().all(|p| p.distance(candidate) > min_distance) {
                break;
            }
            candidate = random_point(&mut rng, rules);
        }
        points.push(candidate);
    }
    points
}

fn random_point(rng: &mut impl Rng, rules: &Rules) -> DVec2 {
    let span = 1.0 - 2.0 * MARGIN;
    DVec2::new(
        rules.width * (MARGIN + rng.random::<f64>() * span),
        rules.height * (MARGIN + rng.random::<f64>() * span),
    )
}

/// Compact `x,y;x,y` listing for the debug line.
pub fn describe(points: &[DVec2]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x as i64, p.y as i64))
        .collect::<Vec<_>>()
        .join(";")
}
