//! Records sent by the match runner.

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Match configuration, sent once before the first turn.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GameConfig {
    #[serde(rename = "GAME_WIDTH")]
    pub width: f64,
    #[serde(rename = "GAME_HEIGHT")]
    pub height: f64,
    #[serde(rename = "GAME_TICKS")]
    pub ticks: u32,
    #[serde(rename = "FOOD_MASS")]
    pub food_mass: f64,
    #[serde(rename = "MAX_FRAGS_CNT")]
    pub max_fragments: usize,
    #[serde(rename = "TICKS_TIL_FUSION")]
    pub ticks_til_fusion: u32,
    #[serde(rename = "VIRUS_RADIUS")]
    pub virus_radius: f64,
    #[serde(rename = "VIRUS_SPLIT_MASS")]
    pub virus_split_mass: f64,
    #[serde(rename = "VISCOSITY")]
    pub viscosity: f64,
    #[serde(rename = "INERTION_FACTOR")]
    pub inertia_factor: f64,
    #[serde(rename = "SPEED_FACTOR")]
    pub speed_factor: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 660.0,
            height: 660.0,
            ticks: 75000,
            food_mass: 1.0,
            max_fragments: 10,
            ticks_til_fusion: 250,
            virus_radius: 22.0,
            virus_split_mass: 80.0,
            viscosity: 0.25,
            inertia_factor: 10.0,
            speed_factor: 25.0,
        }
    }
}

/// One observation: our own fragments plus everything in sight.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TurnInput {
    #[serde(rename = "Mine", default)]
    pub mine: Vec<MineData>,
    #[serde(rename = "Objects", default)]
    pub objects: Vec<ObjectData>,
}

/// One of our own fragments.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MineData {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "SX", default)]
    pub sx: f64,
    #[serde(rename = "SY", default)]
    pub sy: f64,
    #[serde(rename = "R")]
    pub r: f64,
    #[serde(rename = "M")]
    pub m: f64,
    /// Ticks until this fragment may fuse again.
    #[serde(rename = "TTF", default)]
    pub ttf: Option<u32>,
}

/// Kind tag of a visible object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ObjectKind {
    #[serde(rename = "F")]
    Food,
    #[serde(rename = "E")]
    Ejection,
    #[serde(rename = "V")]
    Virus,
    #[serde(rename = "P")]
    Player,
    /// Any tag this agent does not understand.
    #[serde(other)]
    Unknown,
}

/// A visible object that is not one of our fragments.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObjectData {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owner of an ejection.
    #[serde(rename = "pId", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "T")]
    pub kind: ObjectKind,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "R", default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(rename = "M", default, skip_serializing_if = "Option::is_none")]
    pub m: Option<f64>,
}

/// Identity of a fragment: the owning player plus a per-player sub id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FragmentId {
    pub owner: u32,
    pub sub: u32,
}

impl FragmentId {
    pub const fn new(owner: u32, sub: u32) -> Self {
        Self { owner, sub }
    }
}

impl FromStr for FragmentId {
    type Err = ProtocolError;

    /// Parses `"owner"` or `"owner.sub"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidId(s.to_string());
        let (owner, sub) = match s.split_once('.') {
            Some((owner, sub)) => (owner, Some(sub)),
            None => (s, None),
        };
        let owner = owner.trim().parse().map_err(|_| invalid())?;
        let sub = match sub {
            Some(sub) => sub.trim().parse().map_err(|_| invalid())?,
            None => 0,
        };
        Ok(Self { owner, sub })
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.sub)
    }
}
