//! **omni** — the spatial core of a tile-based, turn-driven exploration
//! game: procedural room placement, doors, actors with fog-of-war memory,
//! and per-turn field-of-view computation over a single [`map::Map`].
//!
//! Rendering, input handling, combat and inventory live elsewhere; this
//! crate exposes tile state, the per-turn visible set and each actor's
//! discovered set for such layers to consume.

pub mod actor;
pub mod config;
pub mod map;
pub mod mapgen;
pub mod room;
pub mod tile;

pub use actor::{Accessory, Actor, ActorId};
pub use config::{ConfigError, LevelData, PlayerData, RaceData, WorldData};
pub use map::{Map, MoveOutcome};
pub use mapgen::{GenParams, GenerationError};
pub use room::Room;
pub use tile::{Appearance, Color, Item, ItemId, Piece, Prop, Tile};
