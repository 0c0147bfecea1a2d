//! **omni-core** — geometry primitives for the omni spatial core.
//!
//! Provides the two types everything else is built on: [`Point`], an
//! integer 2-D grid coordinate, and [`Rect`], a closed-interval
//! axis-aligned rectangle (rooms, vision frames, bounding boxes).

pub mod geom;

pub use geom::{Point, Rect};
