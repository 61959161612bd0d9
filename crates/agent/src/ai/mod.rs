//! Decision making.
//!
//! Every agent answers the same question: given a snapshot, where should
//! `player` steer this tick and should it split or eject.

mod evaluation;
mod heuristic;
mod lookahead;
mod monte_carlo;

pub use evaluation::Evaluation;
pub use heuristic::Heuristic;
pub use lookahead::Lookahead;
pub use monte_carlo::MonteCarlo;

use crate::entity::Fragment;
use crate::rules::Rules;
use crate::sim::{Intent, Simulator};
use crate::time_manager::TimeManager;
use glam::DVec2;

/// One tick's answer plus the evaluation that justified it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub target: DVec2,
    pub split: bool,
    pub eject: bool,
    /// Evaluation of the chosen rollout; zero when nothing was searched.
    pub estimate: f64,
}

impl Decision {
    pub fn toward(target: DVec2) -> Self {
        Self {
            target,
            split: false,
            eject: false,
            estimate: 0.0,
        }
    }

    pub fn intent(&self) -> Intent {
        Intent {
            target: self.target,
            split: self.split,
            eject: self.eject,
        }
    }
}

/// Everything a decision may consult besides the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub rules: &'a Rules,
    pub checkpoints: &'a [DVec2],
    pub time: &'a TimeManager,
}

/// Steering point that lands a fragment on `target` instead of
/// overshooting it with its current momentum.
#[inline]
pub fn compensate(target: DVec2, frag: &Fragment, rules: &Rules) -> DVec2 {
    target + frag.velocity() * (rules.inertia_factor / frag.mass - 1.0)
}

/// The decision engines a strategy can run.
#[derive(Debug, Clone)]
pub enum Agent {
    Heuristic(Heuristic),
    Lookahead(Lookahead),
    MonteCarlo(MonteCarlo),
}

impl Agent {
    pub fn decide(&mut self, sim: &Simulator, player: usize, ctx: &Context<'_>) -> Decision {
        match self {
            Agent::Heuristic(agent) => agent.decide(sim, player, ctx.rules, ctx.checkpoints),
            Agent::Lookahead(agent) => agent.decide(sim, player, ctx),
            Agent::MonteCarlo(agent) => agent.decide(sim, player, ctx),
        }
    }
}
