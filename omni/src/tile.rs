//! Tiles, props, items, and their appearance.
//!
//! A [`Tile`] is plain data in the map's arena. References out of a tile
//! (occupant, item) are integer handles into map-owned tables; the door is
//! a [`Prop`] variant stored inline, since it carries one boolean of state
//! and nothing refers back to it.

use crate::actor::ActorId;

/// Handle into the map's item table.
pub type ItemId = usize;

/// Named terminal colors, as the original data files spelled them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Color {
    #[default]
    White,
    Grey,
    Red,
    Yellow,
    Amber,
    DarkOrange,
    Green,
}

/// Glyph + color identity of something the render layer can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub glyph: char,
    pub color: Color,
}

impl Appearance {
    pub const fn new(glyph: char, color: Color) -> Self {
        Self { glyph, color }
    }
}

/// Fixture attached to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    Door { open: bool },
}

/// What every drawable thing on the map has in common: an appearance and
/// whether it blocks movement. Tiles, actors and items all qualify, so
/// the render layer can draw through one interface without caring which
/// it holds.
pub trait Piece {
    fn appearance(&self) -> Appearance;
    fn physical(&self) -> bool;
}

/// An item lying on the floor. Placement only; carrying and using items
/// is outside this crate.
#[derive(Debug, Clone)]
pub struct Item {
    pub name: String,
    pub appearance: Appearance,
}

/// A single map cell.
///
/// `physical` blocks movement, and blocks sight exactly when set: door
/// toggling keeps `physical` synchronized with the open flag, so closed
/// doors are opaque and open doors transparent with no special casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub appearance: Appearance,
    pub physical: bool,
    pub occupant: Option<ActorId>,
    pub item: Option<ItemId>,
    pub prop: Option<Prop>,
}

pub const FLOOR_GLYPH: char = '.';
pub const WALL_GLYPH: char = '#';
pub const DOOR_OPEN_GLYPH: char = '/';
pub const DOOR_CLOSED_GLYPH: char = '+';

impl Tile {
    /// A passable floor tile.
    pub fn floor() -> Self {
        Self {
            appearance: Appearance::new(FLOOR_GLYPH, Color::Amber),
            physical: false,
            occupant: None,
            item: None,
            prop: None,
        }
    }

    /// An impassable, sight-opaque wall tile.
    pub fn wall() -> Self {
        Self {
            appearance: Appearance::new(WALL_GLYPH, Color::DarkOrange),
            physical: true,
            occupant: None,
            item: None,
            prop: None,
        }
    }

    /// A door tile, initialized open (passable, transparent).
    pub fn door() -> Self {
        Self {
            appearance: Appearance::new(DOOR_OPEN_GLYPH, Color::Yellow),
            physical: false,
            occupant: None,
            item: None,
            prop: Some(Prop::Door { open: true }),
        }
    }

    pub fn is_door(&self) -> bool {
        matches!(self.prop, Some(Prop::Door { .. }))
    }

    /// Whether this tile holds an open door.
    pub fn door_open(&self) -> bool {
        matches!(self.prop, Some(Prop::Door { open: true }))
    }

    /// Flip a door between open and closed, keeping the open flag,
    /// `physical`, and the glyph in lockstep. Toggling twice restores the
    /// tile exactly. No-op on non-door tiles.
    pub fn toggle_door(&mut self) {
        if let Some(Prop::Door { open }) = &mut self.prop {
            *open = !*open;
            let open = *open;
            self.physical = !open;
            self.appearance.glyph = if open {
                DOOR_OPEN_GLYPH
            } else {
                DOOR_CLOSED_GLYPH
            };
        }
    }

    /// Whether the tile blocks line of sight.
    pub fn blocks_sight(&self) -> bool {
        self.physical
    }
}

impl Piece for Tile {
    fn appearance(&self) -> Appearance {
        self.appearance
    }

    fn physical(&self) -> bool {
        self.physical
    }
}

impl Piece for Item {
    fn appearance(&self) -> Appearance {
        self.appearance
    }

    /// Items never block movement.
    fn physical(&self) -> bool {
        false
    }
}
