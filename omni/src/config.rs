//! Data-driven world and player definitions.
//!
//! The caller owns these values and threads them into the core
//! explicitly; nothing here is global state. File layout matches the
//! original YAML data: a world file of named level entries and a player
//! file of race entries.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use omni_core::Point;
use omni_rl::SightShape;
use serde::Deserialize;

use crate::actor::Actor;
use crate::mapgen::GenParams;
use crate::tile::{Appearance, Color};

/// One level entry of the world file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LevelData {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub min_rooms: u32,
    pub max_rooms: u32,
}

impl From<&LevelData> for GenParams {
    fn from(level: &LevelData) -> Self {
        Self {
            width: level.width,
            height: level.height,
            min_rooms: level.min_rooms,
            max_rooms: level.max_rooms,
        }
    }
}

/// All level definitions, keyed by level id.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct WorldData {
    pub levels: BTreeMap<String, LevelData>,
}

impl WorldData {
    /// Load a world file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn level(&self, id: &str) -> Option<&LevelData> {
        self.levels.get(id)
    }
}

/// One race entry of the player file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RaceData {
    pub glyph: char,
    pub color: Color,
    pub sight_radius: i32,
    #[serde(default)]
    pub sight_shape: SightShape,
}

impl RaceData {
    /// Build an actor of this race at the given position.
    pub fn spawn(&self, pos: Point) -> Actor {
        Actor::new(pos, self.sight_radius, self.sight_shape)
            .with_appearance(Appearance::new(self.glyph, self.color))
    }
}

/// All race definitions, keyed by race id.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct PlayerData {
    pub races: BTreeMap<String, RaceData>,
}

impl PlayerData {
    /// Load a player file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn race(&self, id: &str) -> Option<&RaceData> {
        self.races.get(id)
    }
}

/// A data file could not be read or understood.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config: {err}"),
            Self::Parse(err) => write!(f, "config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}
