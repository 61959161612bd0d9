//! Agent configuration.
//!
//! Match physics come from the runner (see [`crate::rules::Rules`]); this
//! file only holds tuning knobs, read from an optional TOML file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub checkpoints: CheckpointConfig,
}

impl Config {
    /// Load configuration from `path`, or use defaults if it is missing.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("No {} found, using default config", path.display());
            Ok(Self::default())
        }
    }
}

/// Strategy selection.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AgentConfig {
    /// Registered strategy name, e.g. `sim_7_split_no_food_stuck`.
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Seed for checkpoint placement and randomized planners.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            seed: default_seed(),
        }
    }
}

fn default_strategy() -> String {
    "sim_7_split_no_food_stuck".to_string()
}
fn default_seed() -> u64 {
    0x5eed
}

/// Match time budget.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimeConfig {
    /// Average budget per tick; the match total is this times the tick count.
    #[serde(default = "default_millis_per_tick")]
    pub millis_per_tick: f64,
    #[serde(default = "default_max_millis_per_tick")]
    pub max_millis_per_tick: f64,
    /// At or below this the agent falls back to the heuristic.
    #[serde(default = "default_cheap_millis")]
    pub cheap_millis_per_tick: f64,
    /// At or above this the agent widens and deepens its search.
    #[serde(default = "default_thorough_millis")]
    pub thorough_millis_per_tick: f64,
    /// Charged on top of measured time for protocol I/O.
    #[serde(default = "default_overhead_millis")]
    pub overhead_millis: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            millis_per_tick: default_millis_per_tick(),
            max_millis_per_tick: default_max_millis_per_tick(),
            cheap_millis_per_tick: default_cheap_millis(),
            thorough_millis_per_tick: default_thorough_millis(),
            overhead_millis: default_overhead_millis(),
        }
    }
}

fn default_millis_per_tick() -> f64 {
    24.0
}
fn default_max_millis_per_tick() -> f64 {
    4000.0
}
fn default_cheap_millis() -> f64 {
    10.0
}
fn default_thorough_millis() -> f64 {
    40.0
}
fn default_overhead_millis() -> f64 {
    2.0
}

/// Fog-of-war memory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MemoryConfig {
    #[serde(default = "default_forget_ticks")]
    pub food_forget_ticks: u32,
    #[serde(default = "default_forget_ticks")]
    pub enemy_forget_ticks: u32,
    /// Ticks without progress on the same two foods before one is banned.
    #[serde(default = "default_food_stuck_ticks")]
    pub food_stuck_ticks: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            food_forget_ticks: default_forget_ticks(),
            enemy_forget_ticks: default_forget_ticks(),
            food_stuck_ticks: default_food_stuck_ticks(),
        }
    }
}

fn default_forget_ticks() -> u32 {
    20
}
fn default_food_stuck_ticks() -> u32 {
    10
}

/// Search limits.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Extra rollout depth when the time manager allows thorough search.
    #[serde(default = "default_thorough_extra_depth")]
    pub thorough_extra_depth: u32,
    #[serde(default = "default_monte_carlo_horizon")]
    pub monte_carlo_horizon: u32,
    #[serde(default = "default_monte_carlo_max_rollouts")]
    pub monte_carlo_max_rollouts: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            thorough_extra_depth: default_thorough_extra_depth(),
            monte_carlo_horizon: default_monte_carlo_horizon(),
            monte_carlo_max_rollouts: default_monte_carlo_max_rollouts(),
        }
    }
}

fn default_thorough_extra_depth() -> u32 {
    2
}
fn default_monte_carlo_horizon() -> u32 {
    50
}
fn default_monte_carlo_max_rollouts() -> u32 {
    20000
}

/// Weights of the position evaluation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_three")]
    pub can_eat_me_radius_factor: f64,
    #[serde(default = "default_six")]
    pub can_super_eat_me_radius_factor: f64,
    #[serde(default = "default_three")]
    pub eatable_radius_factor: f64,
    #[serde(default = "default_score_coeff")]
    pub score: f64,
    #[serde(default = "default_nearest_food_coeff")]
    pub nearest_food: f64,
    #[serde(default = "default_checkpoints_coeff")]
    pub checkpoints_taken: f64,
    #[serde(default = "default_eatable_coeff")]
    pub eatable: f64,
    #[serde(default = "default_last_eatable_coeff")]
    pub last_eatable: f64,
    #[serde(default = "default_can_eat_me_coeff")]
    pub can_eat_me: f64,
    #[serde(default = "default_last_can_eat_me_coeff")]
    pub last_can_eat_me: f64,
    #[serde(default = "default_can_super_eat_me_coeff")]
    pub can_super_eat_me: f64,
    #[serde(default = "default_last_can_super_eat_me_coeff")]
    pub last_can_super_eat_me: f64,
}

impl EvaluationConfig {
    /// Only score, food and checkpoints matter; other players are ignored.
    pub fn greedy() -> Self {
        Self {
            eatable: 0.0,
            last_eatable: 0.0,
            can_eat_me: 0.0,
            last_can_eat_me: 0.0,
            can_super_eat_me: 0.0,
            last_can_super_eat_me: 0.0,
            ..Self::default()
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            can_eat_me_radius_factor: default_three(),
            can_super_eat_me_radius_factor: default_six(),
            eatable_radius_factor: default_three(),
            score: default_score_coeff(),
            nearest_food: default_nearest_food_coeff(),
            checkpoints_taken: default_checkpoints_coeff(),
            eatable: default_eatable_coeff(),
            last_eatable: default_last_eatable_coeff(),
            can_eat_me: default_can_eat_me_coeff(),
            last_can_eat_me: default_last_can_eat_me_coeff(),
            can_super_eat_me: default_can_super_eat_me_coeff(),
            last_can_super_eat_me: default_last_can_super_eat_me_coeff(),
        }
    }
}

fn default_three() -> f64 {
    3.0
}
fn default_six() -> f64 {
    6.0
}
fn default_score_coeff() -> f64 {
    10000.0
}
fn default_nearest_food_coeff() -> f64 {
    100.0
}
fn default_checkpoints_coeff() -> f64 {
    1.0
}
fn default_eatable_coeff() -> f64 {
    10000.0
}
fn default_last_eatable_coeff() -> f64 {
    50000.0
}
fn default_can_eat_me_coeff() -> f64 {
    20000.0
}
fn default_last_can_eat_me_coeff() -> f64 {
    100000.0
}
fn default_can_super_eat_me_coeff() -> f64 {
    40000.0
}
fn default_last_can_super_eat_me_coeff() -> f64 {
    200000.0
}

/// Long-range waypoints.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CheckpointConfig {
    #[serde(default = "default_checkpoint_count")]
    pub count: usize,
    /// How many preceding waypoints a new one must keep its distance from.
    #[serde(default = "default_neighbour_window")]
    pub neighbour_window: usize,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            count: default_checkpoint_count(),
            neighbour_window: default_neighbour_window(),
        }
    }
}

fn default_checkpoint_count() -> usize {
    16
}
fn default_neighbour_window() -> usize {
    2
}
