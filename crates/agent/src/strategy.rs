//! Turn driver: observation in, steering command out.

use crate::ai::{Agent, Context, Decision, Evaluation, Heuristic, Lookahead, MonteCarlo};
use crate::checkpoints;
use crate::config::{Config, EvaluationConfig};
use crate::diagnostics::Diagnostics;
use crate::rules::Rules;
use crate::time_manager::TimeManager;
use crate::world::World;
use glam::DVec2;
use protocol::{TurnInput, TurnOutput};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("unknown strategy `{0}`")]
    UnknownStrategy(String),
}

/// Registered strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    NearestFood,
    NearestFoodNoFoodStuck,
    Sim5,
    Sim7,
    Sim5Split,
    Sim7Split,
    Sim7SplitNoFoodStuck,
    /// Seven ticks deep, split-aware, blind to other players.
    Sim7Greedy,
    MonteCarlo,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 9] = [
        StrategyKind::NearestFood,
        StrategyKind::NearestFoodNoFoodStuck,
        StrategyKind::Sim5,
        StrategyKind::Sim7,
        StrategyKind::Sim5Split,
        StrategyKind::Sim7Split,
        StrategyKind::Sim7SplitNoFoodStuck,
        StrategyKind::Sim7Greedy,
        StrategyKind::MonteCarlo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::NearestFood => "nearest_food",
            StrategyKind::NearestFoodNoFoodStuck => "nearest_food_no_food_stuck",
            StrategyKind::Sim5 => "sim_5",
            StrategyKind::Sim7 => "sim_7",
            StrategyKind::Sim5Split => "sim_5_split",
            StrategyKind::Sim7Split => "sim_7_split",
            StrategyKind::Sim7SplitNoFoodStuck => "sim_7_split_no_food_stuck",
            StrategyKind::Sim7Greedy => "sim_7_greedy",
            StrategyKind::MonteCarlo => "monte_carlo",
        }
    }

    /// Whether the world should ban foods the agent keeps circling.
    pub fn escapes_food_stuck(self) -> bool {
        matches!(
            self,
            StrategyKind::NearestFoodNoFoodStuck | StrategyKind::Sim7SplitNoFoodStuck
        )
    }

    fn agent(self, config: &Config) -> Agent {
        let search = &config.search;
        let evaluation = Evaluation::new(config.evaluation.clone());
        let lookahead = |depth, split| {
            Agent::Lookahead(Lookahead::new(
                depth,
                split,
                search.thorough_extra_depth,
                evaluation.clone(),
            ))
        };
        match self {
            StrategyKind::NearestFood | StrategyKind::NearestFoodNoFoodStuck => {
                Agent::Heuristic(Heuristic)
            }
            StrategyKind::Sim5 => lookahead(5, false),
            StrategyKind::Sim7 => lookahead(7, false),
            StrategyKind::Sim5Split => lookahead(5, true),
            StrategyKind::Sim7Split | StrategyKind::Sim7SplitNoFoodStuck => lookahead(7, true),
            StrategyKind::Sim7Greedy => Agent::Lookahead(Lookahead::new(
                7,
                true,
                search.thorough_extra_depth,
                Evaluation::new(EvaluationConfig::greedy()),
            )),
            StrategyKind::MonteCarlo => Agent::MonteCarlo(MonteCarlo::new(
                config.agent.seed,
                search.monte_carlo_horizon,
                search.monte_carlo_max_rollouts,
                evaluation,
            )),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| StrategyError::UnknownStrategy(s.to_string()))
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One agent playing one match.
#[derive(Debug, Clone)]
pub struct Strategy {
    kind: StrategyKind,
    rules: Rules,
    world: World,
    agent: Agent,
    checkpoints: Vec<DVec2>,
    checkpoint_listing: String,
    next_checkpoint: usize,
    checkpoints_taken: u32,
    diagnostics: Diagnostics,
}

impl Strategy {
    pub fn new(kind: StrategyKind, rules: Rules, config: &Config) -> Self {
        let checkpoints = checkpoints::generate(&rules, &config.checkpoints, config.agent.seed);
        info!(strategy = %kind, checkpoints = checkpoints.len(), "strategy ready");
        Self {
            kind,
            world: World::new(rules.clone(), config.memory.clone(), kind.escapes_food_stuck()),
            agent: kind.agent(config),
            checkpoint_listing: checkpoints::describe(&checkpoints),
            checkpoints,
            next_checkpoint: 0,
            checkpoints_taken: 0,
            diagnostics: Diagnostics::default(),
            rules,
        }
    }

    pub fn from_name(name: &str, rules: Rules, config: &Config) -> Result<Self, StrategyError> {
        Ok(Self::new(name.parse()?, rules, config))
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn checkpoints(&self) -> &[DVec2] {
        &self.checkpoints
    }

    pub fn next_checkpoint(&self) -> usize {
        self.next_checkpoint
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Answer one turn.
    ///
    /// The observation is always ingested so memory stays current, even when
    /// the answer is a no-op.
    pub fn on_tick(&mut self, input: &TurnInput, time: &TimeManager) -> TurnOutput {
        self.world.apply(input);
        if time.is_globally_expired() {
            return TurnOutput::idle("Accept defeat");
        }
        if !self.world.is_alive() {
            self.diagnostics.record("Died");
            return TurnOutput::idle("Died");
        }

        let mut sim = self.world.snapshot(self.next_checkpoint, self.checkpoints_taken);
        if sim.advance_checkpoint(&self.checkpoints) {
            self.next_checkpoint = sim.next_checkpoint;
            self.checkpoints_taken = sim.checkpoints_taken;
            debug!(
                next = self.next_checkpoint,
                taken = self.checkpoints_taken,
                "checkpoint reached"
            );
        }

        let ctx = Context {
            rules: &self.rules,
            checkpoints: &self.checkpoints,
            time,
        };
        let decision = self.agent.decide(&sim, 0, &ctx);
        let line = self.describe(&decision, time);
        self.diagnostics.record(&line);
        TurnOutput::toward(
            decision.target.x,
            decision.target.y,
            decision.split,
            decision.eject,
        )
        .with_debug(line)
    }

    fn describe(&self, decision: &Decision, time: &TimeManager) -> String {
        format!(
            "{}{}{:.0}/{:.0} ms; est: {:.2}; next: {}; cp: {}",
            if time.be_cheap() { "CHEAP! " } else { "" },
            if time.be_thorough() { "THOROUGH! " } else { "" },
            time.millis_in_tick(),
            time.millis_per_tick(),
            decision.estimate,
            self.next_checkpoint,
            self.checkpoint_listing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeConfig;

    fn turn(json: &str) -> TurnInput {
        serde_json::from_str(json).unwrap()
    }

    const ALONE: &str = r#"{"Mine":[{"Id":"1","X":100,"Y":100,"SX":0,"SY":0,"R":12.649,"M":40}],"Objects":[{"T":"F","X":130,"Y":100}]}"#;

    #[test]
    fn test_parse_names() {
        assert_eq!("sim_7_split".parse::<StrategyKind>(), Ok(StrategyKind::Sim7Split));
        assert_eq!("Monte_Carlo".parse::<StrategyKind>(), Ok(StrategyKind::MonteCarlo));
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>(), Ok(kind));
        }
        assert_eq!(
            "sim_9".parse::<StrategyKind>(),
            Err(StrategyError::UnknownStrategy("sim_9".to_string()))
        );
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let result = Strategy::from_name("best_one", Rules::default(), &Config::default());
        assert!(matches!(result, Err(StrategyError::UnknownStrategy(name)) if name == "best_one"));
    }

    #[test]
    fn test_dead_agent_idles() {
        let config = Config::default();
        let mut strategy = Strategy::from_name("sim_5", Rules::default(), &config).unwrap();
        let time = TimeManager::new(100, &config.time);
        let out = strategy.on_tick(&turn(r#"{"Mine":[],"Objects":[]}"#), &time);
        assert_eq!((out.x, out.y, out.split, out.eject), (0.0, 0.0, false, false));
        assert_eq!(out.debug.as_deref(), Some("Died"));
    }

    #[test]
    fn test_expired_budget_accepts_defeat() {
        let config = Config::default();
        let mut strategy = Strategy::from_name("nearest_food", Rules::default(), &config).unwrap();
        let mut time = TimeManager::new(2, &config.time);
        time.record_tick(1000.0);
        let out = strategy.on_tick(&turn(ALONE), &time);
        assert_eq!(out.debug.as_deref(), Some("Accept defeat"));
        assert_eq!((out.x, out.y), (0.0, 0.0));
    }

    #[test]
    fn test_heuristic_heads_for_food_and_records() {
        let config = Config::default();
        let mut strategy = Strategy::from_name("nearest_food", Rules::default(), &config)
            .unwrap()
            .with_diagnostics(Diagnostics::recording());
        let time = TimeManager::new(100, &config.time);
        let out = strategy.on_tick(&turn(ALONE), &time);
        assert!(out.x > 100.0, "should steer toward the food on the right, got {out:?}");
        assert!(!out.split && !out.eject);
        let debug = out.debug.unwrap();
        assert!(debug.contains(" ms; est: "));
        assert_eq!(strategy.diagnostics().lines(), [debug]);
    }

    #[test]
    fn test_cheap_budget_is_flagged() {
        let config = Config {
            time: TimeConfig {
                millis_per_tick: 5.0,
                ..TimeConfig::default()
            },
            ..Config::default()
        };
        let mut strategy = Strategy::from_name("sim_7_split", Rules::default(), &config).unwrap();
        let time = TimeManager::new(100, &config.time);
        let out = strategy.on_tick(&turn(ALONE), &time);
        assert!(out.debug.unwrap().starts_with("CHEAP! "));
    }

    #[test]
    fn test_reaching_a_checkpoint_advances_it() {
        let config = Config::default();
        let mut strategy = Strategy::from_name("nearest_food", Rules::default(), &config).unwrap();
        let first = strategy.checkpoints()[0];
        let time = TimeManager::new(100, &config.time);
        let input = turn(&format!(
            r#"{{"Mine":[{{"Id":"1","X":{},"Y":{},"SX":0,"SY":0,"R":12.649,"M":40}}],"Objects":[]}}"#,
            first.x, first.y
        ));
        strategy.on_tick(&input, &time);
        assert_eq!(strategy.next_checkpoint(), 1);
    }
}
