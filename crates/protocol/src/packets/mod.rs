//! Protocol record definitions.
//!
//! - `server`: records sent by the match runner (config, turn observations)
//! - `client`: records sent back by the agent (decisions)

mod client;
mod server;

pub use client::{SpriteData, TurnOutput};
pub use server::{FragmentId, GameConfig, MineData, ObjectData, ObjectKind, TurnInput};
