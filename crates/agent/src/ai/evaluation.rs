//! Position evaluation used to rank rollouts.
//!
//! Higher is better. Every distance term is normalized by the arena
//! diagonal (or by a radius-derived range), so the weights do not depend on
//! the arena size.

use crate::collision::{DIAM_EAT_FACTOR, outweighs};
use crate::config::EvaluationConfig;
use crate::rules::Rules;
use crate::sim::Simulator;
use glam::DVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ThreatKind {
    /// An enemy fragment can eat ours as it is.
    Direct,
    /// An enemy fragment could eat ours after splitting.
    Split,
}

#[derive(Debug, Clone, Copy)]
struct Threat {
    qdist: f64,
    kind: ThreatKind,
    enemy_radius: f64,
    my_radius: f64,
}

#[derive(Debug, Clone, Copy)]
struct Prey {
    qdist: f64,
    my_radius: f64,
    is_last: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    weights: EvaluationConfig,
}

impl Evaluation {
    pub fn new(weights: EvaluationConfig) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EvaluationConfig {
        &self.weights
    }

    /// Score the world for `player`; `f64::MIN` if it has no fragments.
    pub fn evaluate(
        &self,
        sim: &Simulator,
        player: usize,
        rules: &Rules,
        checkpoints: &[DVec2],
    ) -> f64 {
        let me = &sim.players[player];
        if !me.is_alive() {
            return f64::MIN;
        }
        let w = &self.weights;
        let diagonal = rules.diagonal();
        let best_enemy_score = sim
            .players
            .iter()
            .enumerate()
            .filter(|&(p, _)| p != player)
            .map(|(_, other)| other.score)
            .max()
            .unwrap_or(0);

        let checkpoint = (player == 0 && !checkpoints.is_empty())
            .then(|| checkpoints[sim.next_checkpoint % checkpoints.len()]);
        let mut checkpoint_qdist = f64::INFINITY;
        let mut food_qdist = f64::INFINITY;
        let mut prey: Option<Prey> = None;
        let mut threat: Option<Threat> = None;

        for frag in me.fragments.iter() {
            if let Some(point) = checkpoint {
                checkpoint_qdist = checkpoint_qdist.min(frag.position.distance_squared(point));
            }
            for food in sim.foods.iter() {
                if !rules.is_shadowed(food.position, frag.radius) {
                    food_qdist = food_qdist.min(frag.position.distance_squared(food.position));
                }
            }

            for (p, other) in sim.players.iter().enumerate() {
                if p == player {
                    continue;
                }
                for enemy in other.fragments.iter() {
                    let qdist = frag.position.distance_squared(enemy.position);
                    if outweighs(frag.mass, enemy.mass) {
                        let reach = w.eatable_radius_factor * frag.radius;
                        if qdist < reach * reach && prey.is_none_or(|p| qdist < p.qdist) {
                            prey = Some(Prey {
                                qdist,
                                my_radius: frag.radius,
                                is_last: other.fragments.len() == 1,
                            });
                        }
                        continue;
                    }
                    let (kind, factor) = if outweighs(enemy.mass / 2.0, frag.mass) {
                        (ThreatKind::Split, w.can_super_eat_me_radius_factor)
                    } else if outweighs(enemy.mass, frag.mass) {
                        (ThreatKind::Direct, w.can_eat_me_radius_factor)
                    } else {
                        continue;
                    };
                    let reach = factor * enemy.radius;
                    if qdist < reach * reach && threat.is_none_or(|t| qdist < t.qdist) {
                        threat = Some(Threat {
                            qdist,
                            kind,
                            enemy_radius: enemy.radius,
                            my_radius: frag.radius,
                        });
                    }
                }
            }
        }

        let mut value = f64::from(me.score - best_enemy_score) * w.score;

        if food_qdist.is_finite() {
            value += (diagonal - food_qdist.sqrt()) / diagonal * w.nearest_food;
        }

        if checkpoint.is_some() {
            let progress = (diagonal - checkpoint_qdist.sqrt()) / diagonal;
            value += (f64::from(sim.checkpoints_taken) + progress) * w.checkpoints_taken;
        }

        if let Some(prey) = prey {
            let reach = w.eatable_radius_factor * prey.my_radius;
            let closeness = (reach - prey.qdist.sqrt()) / reach;
            let coeff = if prey.is_last { w.last_eatable } else { w.eatable };
            value += closeness * coeff;
        }

        if let Some(threat) = threat {
            let last = me.fragments.len() == 1;
            let (factor, coeff) = match threat.kind {
                ThreatKind::Direct => (
                    w.can_eat_me_radius_factor,
                    if last { w.last_can_eat_me } else { w.can_eat_me },
                ),
                ThreatKind::Split => (
                    w.can_super_eat_me_radius_factor,
                    if last { w.last_can_super_eat_me } else { w.can_super_eat_me },
                ),
            };
            // Zero at the edge of the danger zone, one where eating starts.
            let min_dist = threat.enemy_radius + threat.my_radius
                - 2.0 * threat.my_radius * DIAM_EAT_FACTOR;
            let max_dist = factor * threat.enemy_radius;
            let danger = (max_dist - threat.qdist.sqrt()) / (max_dist - min_dist);
            value -= danger * coeff;
        }

        value
    }
}
