//! Shared protocol crate for cellbot.
//!
//! This crate contains:
//! - The JSON records exchanged with the match runner, one per line
//! - Fragment id parsing ("owner" or "owner.sub")
//! - A line codec that reads configs/turns and writes decisions

mod codec;
mod error;
pub mod packets;

pub use codec::{LineReader, LineWriter, MAX_DEBUG_LEN};
pub use error::ProtocolError;
pub use packets::{
    FragmentId, GameConfig, MineData, ObjectData, ObjectKind, SpriteData, TurnInput, TurnOutput,
};
