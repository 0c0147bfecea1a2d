//! Actors: position, sight, and fog-of-war memory.

use std::collections::HashSet;

use omni_core::Point;
use omni_rl::SightShape;

use crate::tile::{Appearance, Color, Piece};

/// Handle into the map's actor table.
pub type ActorId = usize;

/// Cosmetic add-on drawn over an actor's base glyph by the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessory {
    Hat(Color),
    Cloak(Color),
}

/// A creature placed on the map.
///
/// Position changes only through [`Map::move_actor`](crate::map::Map::move_actor).
/// `discovered` is the actor's cumulative fog-of-war memory: every tile it
/// has ever seen, across turns, for the current map layout. It only grows.
#[derive(Debug, Clone)]
pub struct Actor {
    pub pos: Point,
    pub radius: i32,
    pub shape: SightShape,
    pub appearance: Appearance,
    pub accessories: Vec<Accessory>,
    pub discovered: HashSet<Point>,
}

impl Actor {
    /// Create an actor with the default `@` appearance.
    pub fn new(pos: Point, radius: i32, shape: SightShape) -> Self {
        Self {
            pos,
            radius,
            shape,
            appearance: Appearance::new('@', Color::White),
            accessories: Vec::new(),
            discovered: HashSet::new(),
        }
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    /// Switch the sight metric, rescaling the radius so the covered area
    /// stays comparable (see
    /// [`CIRCLE_TO_SQUARE_RADIUS`](omni_rl::fov::CIRCLE_TO_SQUARE_RADIUS)).
    pub fn set_shape(&mut self, shape: SightShape) {
        self.radius = self.shape.convert_radius(shape, self.radius);
        self.shape = shape;
    }
}

impl Piece for Actor {
    fn appearance(&self) -> Appearance {
        self.appearance
    }

    /// An occupied tile cannot be entered.
    fn physical(&self) -> bool {
        true
    }
}
