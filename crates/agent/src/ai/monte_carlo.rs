//! Randomized planner.
//!
//! Samples whole plans (sequences of steering segments) until the tick's
//! time runs out, keeps the best-scoring one and plays its first tick. The
//! winning plan is carried over to the next tick, shifted by one, so work
//! from earlier ticks keeps paying off.

use super::{Context, Decision, Evaluation, Heuristic, compensate};
use crate::entity::PlayerFragments;
use crate::rules::Rules;
use crate::sim::{Intent, Simulator};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use tracing::debug;

const SPLIT_CHANCE: f64 = 0.05;
const MAX_SEGMENT_TICKS: u32 = 10;
/// Segment targets lie within `exp(-u) * this * radius` of the fragment.
const REACH_RADII: f64 = 10.0;

/// Steer one fragment toward a fixed offset for a few ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    sub_id: u32,
    offset: DVec2,
    split: bool,
    ticks: u32,
}

#[derive(Debug, Clone)]
pub struct MonteCarlo {
    rng: StdRng,
    horizon: u32,
    max_rollouts: u32,
    evaluation: Evaluation,
    plan: Vec<Segment>,
}

impl MonteCarlo {
    pub fn new(seed: u64, horizon: u32, max_rollouts: u32, evaluation: Evaluation) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            horizon: horizon.max(1),
            max_rollouts: max_rollouts.max(1),
            evaluation,
            plan: Vec::new(),
        }
    }

    pub fn decide(&mut self, sim: &Simulator, player: usize, ctx: &Context<'_>) -> Decision {
        let me = &sim.players[player];
        if !me.is_alive() || ctx.time.be_cheap() {
            self.plan.clear();
            return Heuristic.decide(sim, player, ctx.rules, ctx.checkpoints);
        }

        let mut best: Option<(Decision, Vec<Segment>)> = None;
        let carried = shift(std::mem::take(&mut self.plan));
        if !carried.is_empty() {
            let decision = self.play(sim, player, ctx, &carried);
            best = Some((decision, carried));
        }

        let mut rollouts = 0;
        while rollouts < self.max_rollouts && !ctx.time.is_tick_expired() {
            let plan = self.random_plan(me, ctx.rules);
            let decision = self.play(sim, player, ctx, &plan);
            rollouts += 1;
            if best.as_ref().is_none_or(|(b, _)| decision.estimate > b.estimate) {
                best = Some((decision, plan));
            }
        }

        debug!(
            rollouts,
            estimate = ?best.as_ref().map(|(b, _)| b.estimate),
            "monte carlo finished"
        );
        match best {
            Some((decision, plan)) => {
                self.plan = plan;
                Decision {
                    target: ctx.rules.limit(decision.target),
                    ..decision
                }
            }
            None => Heuristic.decide(sim, player, ctx.rules, ctx.checkpoints),
        }
    }

    fn random_plan(&mut self, me: &PlayerFragments, rules: &Rules) -> Vec<Segment> {
        let mut plan = Vec::new();
        let mut planned = 0;
        while planned < self.horizon {
            let frag = &me.fragments[self.rng.random_range(0..me.fragments.len())];
            let angle = self.rng.random_range(0.0..TAU);
            let reach = (-self.rng.random::<f64>()).exp() * frag.radius * REACH_RADII;
            let ticks = self
                .rng
                .random_range(1..=MAX_SEGMENT_TICKS)
                .min(self.horizon - planned);
            plan.push(Segment {
                sub_id: frag.sub_id,
                offset: DVec2::new(angle.cos(), angle.sin()) * reach,
                split: self.rng.random_bool(SPLIT_CHANCE) && rules.max_fragments > 1,
                ticks,
            });
            planned += ticks;
        }
        plan
    }

    /// Roll a plan out and score the end position.
    fn play(
        &self,
        sim: &Simulator,
        player: usize,
        ctx: &Context<'_>,
        plan: &[Segment],
    ) -> Decision {
        let rules = ctx.rules;
        let mut world = *sim;
        let mut first = None;

        for segment in plan {
            for step in 0..segment.ticks {
                let me = &world.players[player];
                let Some(frag) = me.find(segment.sub_id).or(me.fragments.first()).copied() else {
                    break;
                };
                let intent = Intent {
                    target: compensate(frag.position + segment.offset, &frag, rules),
                    split: segment.split && step == 0,
                    eject: false,
                };
                first.get_or_insert(intent);

                let mut intents = Heuristic.intents(&world, player, rules, ctx.checkpoints);
                intents[player] = Some(intent);
                world.tick(rules, ctx.checkpoints, &intents);
            }
        }

        let estimate = self.evaluation.evaluate(&world, player, rules, ctx.checkpoints);
        let first = first.unwrap_or(Intent::toward(DVec2::ZERO));
        Decision {
            target: first.target,
            split: first.split,
            eject: first.eject,
            estimate,
        }
    }
}

/// Drop the tick that was just played from the front of a plan.
fn shift(mut plan: Vec<Segment>) -> Vec<Segment> {
    if let Some(front) = plan.first_mut() {
        front.ticks -= 1;
        front.split = false;
        if front.ticks == 0 {
            plan.remove(0);
        }
    }
    plan
}
