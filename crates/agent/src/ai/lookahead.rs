//! Clone-and-rollout search over candidate steering targets.
//!
//! Each candidate is played out for a fixed depth on a copy of the
//! snapshot, with every other player driven by [`Heuristic`], and the
//! resulting position is scored by [`Evaluation`]. The first tick of the
//! best rollout is what gets played.

use super::{Context, Decision, Evaluation, Heuristic, compensate};
use crate::entity::Fragment;
use crate::sim::{Intent, Simulator};
use glam::DVec2;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct Lookahead {
    depth: u32,
    split: bool,
    /// Added to `depth` when the time manager allows thorough search.
    extra_depth: u32,
    evaluation: Evaluation,
}

/// What a rollout steers toward on every tick.
#[derive(Debug, Clone, Copy)]
enum Aim {
    Point(DVec2),
    /// Where an enemy fragment will be next tick, re-found each tick.
    Chase { slot: usize, sub_id: u32 },
}

impl Lookahead {
    pub fn new(depth: u32, split: bool, extra_depth: u32, evaluation: Evaluation) -> Self {
        Self {
            depth,
            split,
            extra_depth,
            evaluation,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn splits(&self) -> bool {
        self.split
    }

    pub fn decide(&self, sim: &Simulator, player: usize, ctx: &Context<'_>) -> Decision {
        let fallback = || Heuristic.decide(sim, player, ctx.rules, ctx.checkpoints);
        let me = &sim.players[player];
        if ctx.time.be_cheap() || !me.is_alive() {
            return fallback();
        }

        let thorough = ctx.time.be_thorough();
        let depth = (self.depth + if thorough { self.extra_depth } else { 0 }).max(1);
        let points: Vec<Aim> = self
            .candidates(sim, player, ctx, thorough)
            .into_iter()
            .map(Aim::Point)
            .collect();
        let chases: Vec<Aim> = sim
            .players
            .iter()
            .enumerate()
            .filter(|&(p, _)| p != player)
            .flat_map(|(slot, other)| {
                other
                    .fragments
                    .iter()
                    .map(move |e| Aim::Chase { slot, sub_id: e.sub_id })
            })
            .collect();
        let splits: &[bool] = if self.split { &[false, true] } else { &[false] };

        let mut best: Option<Decision> = None;
        let mut rollouts = 0u32;
        let mut expired = false;
        'search: for aims in [&points, &chases] {
            for frag in me.fragments.iter() {
                for &aim in aims.iter() {
                    for &split in splits {
                        if ctx.time.is_tick_expired() {
                            expired = true;
                            break 'search;
                        }
                        let decision = self.rollout(sim, player, ctx, depth, frag, aim, split);
                        rollouts += 1;
                        if best.is_none_or(|b| decision.estimate > b.estimate) {
                            best = Some(decision);
                        }
                    }
                }
            }
        }

        debug!(
            rollouts,
            depth,
            thorough,
            expired,
            estimate = ?best.map(|b| b.estimate),
            "lookahead finished"
        );
        match best {
            Some(best) => Decision {
                target: ctx.rules.limit(best.target),
                ..best
            },
            None => fallback(),
        }
    }

    /// Static points worth steering at.
    fn candidates(
        &self,
        sim: &Simulator,
        player: usize,
        ctx: &Context<'_>,
        thorough: bool,
    ) -> Vec<DVec2> {
        let mut points = Vec::with_capacity(96);
        if player == 0 {
            points.extend_from_slice(ctx.checkpoints);
        }
        points.extend(ctx.rules.border_points());
        points.extend(sim.foods.iter().map(|f| f.position));
        points.extend(sim.viruses.iter().map(|v| v.position));
        for (p, other) in sim.players.iter().enumerate() {
            if p == player {
                continue;
            }
            for enemy in other.fragments.iter() {
                points.push(enemy.position);
                points.push(enemy.position + enemy.velocity());
            }
        }
        if thorough {
            points.extend(sim.ejections.iter().map(|e| e.position));
        }
        points
    }

    /// Play `aim` out for `depth` ticks, steering by `source`'s momentum.
    #[allow(clippy::too_many_arguments)]
    fn rollout(
        &self,
        sim: &Simulator,
        player: usize,
        ctx: &Context<'_>,
        depth: u32,
        source: &Fragment,
        aim: Aim,
        split: bool,
    ) -> Decision {
        let rules = ctx.rules;
        let mut world = *sim;
        let mut frag = *source;
        let mut point = DVec2::ZERO;
        let mut first = None;

        for step in 0..depth {
            if let Some(live) = world.players[player].find(source.sub_id) {
                frag = *live;
            }
            point = match aim {
                Aim::Point(p) => p,
                Aim::Chase { slot, sub_id } => world.players[slot]
                    .find(sub_id)
                    .map(|e| e.position + e.velocity())
                    // Gone (usually eaten): keep heading for where it was.
                    .unwrap_or(point),
            };
            let intent = Intent {
                target: compensate(point, &frag, rules),
                split: split && step == 0,
                eject: false,
            };
            first.get_or_insert(intent);

            let mut intents = Heuristic.intents(&world, player, rules, ctx.checkpoints);
            intents[player] = Some(intent);
            world.tick(rules, ctx.checkpoints, &intents);
        }

        let estimate = self.evaluation.evaluate(&world, player, rules, ctx.checkpoints);
        trace!(?aim, split, estimate, "rollout");
        let first = first.unwrap_or(Intent::toward(point));
        Decision {
            target: first.target,
            split: first.split,
            eject: first.eject,
            estimate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeConfig;
    use crate::entity::{Ejection, Food, Virus};
    use crate::rules::{Rules, VIRUS_MASS};
    use crate::time_manager::TimeManager;

    fn engine(split: bool) -> Lookahead {
        Lookahead::new(7, split, 2, Evaluation::default())
    }

    fn add(sim: &mut Simulator, slot: usize, x: f64, y: f64, mass: f64) {
        let sub = sim.players[slot].next_sub_id();
        sim.players[slot]
            .fragments
            .push(Fragment::new(slot as u32 + 1, sub, DVec2::new(x, y), mass));
    }

    fn idle_clock() -> TimeManager {
        // Never started, so never expired.
        TimeManager::new(1000, &TimeConfig::default())
    }

    #[test]
    fn test_same_snapshot_same_decision() {
        let rules = Rules::default();
        let time = idle_clock();
        let checkpoints = [DVec2::new(500.0, 500.0), DVec2::new(100.0, 100.0)];
        let ctx = Context {
            rules: &rules,
            checkpoints: &checkpoints,
            time: &time,
        };
        let mut sim = Simulator::default();
        add(&mut sim, 0, 300.0, 300.0, 130.0);
        add(&mut sim, 1, 450.0, 400.0, 60.0);
        add(&mut sim, 2, 200.0, 150.0, 200.0);
        sim.foods.push(Food::new(DVec2::new(350.0, 320.0)));
        sim.foods.push(Food::new(DVec2::new(200.0, 250.0)));
        sim.viruses
            .push(Virus::new(DVec2::new(400.0, 200.0), VIRUS_MASS, rules.virus_radius));

        let a = engine(true).decide(&sim, 0, &ctx);
        let b = engine(true).decide(&sim, 0, &ctx);
        assert_eq!(a, b);
        assert!(a.target.x.to_bits() == b.target.x.to_bits());
        assert!(a.estimate.to_bits() == b.estimate.to_bits());
    }

    #[test]
    fn test_moves_toward_food() {
        let rules = Rules::default();
        let time = idle_clock();
        let ctx = Context {
            rules: &rules,
            checkpoints: &[],
            time: &time,
        };
        let mut sim = Simulator::default();
        add(&mut sim, 0, 300.0, 300.0, 40.0);
        sim.foods.push(Food::new(DVec2::new(400.0, 300.0)));
        let decision = engine(false).decide(&sim, 0, &ctx);
        assert!(decision.target.x > 300.0);
        assert!(!decision.split);
    }

    #[test]
    fn test_runs_from_big_enemy() {
        let rules = Rules::default();
        let time = idle_clock();
        let ctx = Context {
            rules: &rules,
            checkpoints: &[],
            time: &time,
        };
        let mut sim = Simulator::default();
        add(&mut sim, 0, 300.0, 300.0, 40.0);
        add(&mut sim, 1, 380.0, 300.0, 400.0);
        let decision = engine(false).decide(&sim, 0, &ctx);
        assert!(decision.target.x < 300.0, "{decision:?}");
    }

    #[test]
    fn test_splits_onto_reachable_prey() {
        let rules = Rules::default();
        let time = idle_clock();
        let ctx = Context {
            rules: &rules,
            checkpoints: &[],
            time: &time,
        };
        let mut sim = Simulator::default();
        add(&mut sim, 0, 300.0, 300.0, 300.0);
        add(&mut sim, 1, 360.0, 300.0, 100.0);
        let decision = engine(true).decide(&sim, 0, &ctx);
        assert!(decision.split, "{decision:?}");
        assert!(decision.estimate > 0.0);
    }

    #[test]
    fn test_thorough_budget_reaches_ejections() {
        let rules = Rules::default();
        let mut sim = Simulator::default();
        add(&mut sim, 0, 300.0, 330.0, 40.0);
        let blob = Ejection::new(DVec2::new(330.0, 330.0), DVec2::X, 0.0, None);
        sim.ejections.push(blob);

        // 22 ms a tick: plain search, seven ticks is not enough to get there.
        let normal = idle_clock();
        assert!(!normal.be_thorough());
        let ctx = Context {
            rules: &rules,
            checkpoints: &[],
            time: &normal,
        };
        let plain = Lookahead::new(7, false, 2, Evaluation::default()).decide(&sim, 0, &ctx);
        assert_eq!(plain.estimate, 0.0);

        let settings = TimeConfig {
            millis_per_tick: 50.0,
            ..TimeConfig::default()
        };
        let generous = TimeManager::new(1000, &settings);
        assert!(generous.be_thorough());
        let ctx = Context {
            rules: &rules,
            checkpoints: &[],
            time: &generous,
        };
        let thorough = Lookahead::new(7, false, 2, Evaluation::default()).decide(&sim, 0, &ctx);
        assert!(thorough.estimate >= Evaluation::default().weights().score, "{thorough:?}");
        assert!(thorough.target.x > 300.0);
    }

    #[test]
    fn test_cheap_budget_falls_back_to_heuristic() {
        let rules = Rules::default();
        let settings = TimeConfig {
            millis_per_tick: 10.0,
            overhead_millis: 0.0,
            ..TimeConfig::default()
        };
        let time = TimeManager::new(1000, &settings);
        assert!(time.be_cheap());
        let ctx = Context {
            rules: &rules,
            checkpoints: &[],
            time: &time,
        };
        let mut sim = Simulator::default();
        add(&mut sim, 0, 300.0, 300.0, 40.0);
        sim.foods.push(Food::new(DVec2::new(400.0, 300.0)));
        let decision = engine(true).decide(&sim, 0, &ctx);
        assert_eq!(decision, Heuristic.decide(&sim, 0, &rules, &[]));
    }
}
