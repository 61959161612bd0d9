//! Decision agent for a cell-eating arena game.
//!
//! The runner sends one observation per tick; [`Strategy::on_tick`] folds it
//! into a remembered [`World`], snapshots that into a [`sim::Simulator`] and
//! lets the configured [`ai::Agent`] pick a steering command.

pub mod ai;
pub mod checkpoints;
pub mod collision;
pub mod config;
pub mod diagnostics;
pub mod entity;
pub mod rules;
pub mod sim;
pub mod strategy;
pub mod time_manager;
pub mod world;

pub use config::Config;
pub use diagnostics::Diagnostics;
pub use rules::Rules;
pub use strategy::{Strategy, StrategyError, StrategyKind};
pub use time_manager::TimeManager;
pub use world::World;
