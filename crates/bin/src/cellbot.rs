//! cellbot - arena agent speaking JSON lines on stdin/stdout.

use agent::{Config, Rules, Strategy, TimeManager};
use protocol::{LineReader, LineWriter};
use std::io::{self, BufWriter};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "CELLBOT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "cellbot.toml";

fn main() -> anyhow::Result<()> {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;
    let strategy_name = std::env::args().nth(1).unwrap_or_else(|| config.agent.strategy.clone());

    let stdin = io::stdin();
    let mut reader = LineReader::new(stdin.lock());
    let mut writer = LineWriter::new(BufWriter::new(io::stdout().lock()));

    let game = reader.read_config()?;
    let rules = Rules::from(&game);
    let mut strategy = Strategy::from_name(&strategy_name, rules, &config)?;
    let mut time = TimeManager::new(game.ticks, &config.time);
    info!(strategy = %strategy.kind(), ticks = game.ticks, "match started");

    while let Some(turn) = reader.read_turn()? {
        time.tick_started();
        let output = strategy.on_tick(&turn, &time);
        writer.write_output(&output)?;
        time.tick_finished();
    }

    info!(
        ticks = time.ticks_passed(),
        elapsed_ms = time.elapsed_millis(),
        "match finished"
    );
    Ok(())
}
