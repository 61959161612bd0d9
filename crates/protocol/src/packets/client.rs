//! Records sent back by the agent.

use serde::{Deserialize, Serialize};

/// Optional debug sprite drawn by visualizers next to a fragment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpriteData {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "S")]
    pub text: String,
}

/// The agent's decision for one tick.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TurnOutput {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Split")]
    pub split: bool,
    #[serde(rename = "Eject")]
    pub eject: bool,
    #[serde(rename = "Debug", default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
    #[serde(rename = "Sprite", default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<SpriteData>,
}

impl TurnOutput {
    /// Move toward a point.
    pub fn toward(x: f64, y: f64, split: bool, eject: bool) -> Self {
        Self {
            x,
            y,
            split,
            eject,
            debug: None,
            sprite: None,
        }
    }

    /// A well-formed no-op used when there is nothing meaningful to do.
    pub fn idle(reason: impl Into<String>) -> Self {
        Self {
            debug: Some(reason.into()),
            ..Self::toward(0.0, 0.0, false, false)
        }
    }

    pub fn with_debug(mut self, debug: impl Into<String>) -> Self {
        self.debug = Some(debug.into());
        self
    }
}
