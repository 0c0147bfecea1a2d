//! Procedural room placement: rejection sampling with a bounded budget.

use std::fmt;

use omni_core::{Point, Rect};
use rand::{Rng, RngExt};

use crate::room::Room;
use crate::tile::Tile;

/// Smallest candidate room extent (walls included).
pub const ROOM_MIN_EXTENT: i32 = 2;
/// Largest candidate room extent (walls included).
pub const ROOM_MAX_EXTENT: i32 = 10;
/// Candidate rectangles tried per requested room before the placer
/// reports failure.
pub const PLACEMENT_ATTEMPTS_PER_ROOM: u32 = 64;

/// Parameters for one generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenParams {
    pub width: i32,
    pub height: i32,
    pub min_rooms: u32,
    pub max_rooms: u32,
}

/// Room placement could not complete.
#[derive(Debug)]
pub enum GenerationError {
    /// The candidate budget ran out before `wanted` rooms were accepted.
    AttemptsExhausted { placed: usize, wanted: u32 },
    /// The grid cannot hold the boundary ring plus any interior room.
    GridTooSmall { width: i32, height: i32 },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttemptsExhausted { placed, wanted } => write!(
                f,
                "room placement exhausted its attempt budget: placed {placed} of {wanted} rooms"
            ),
            Self::GridTooSmall { width, height } => {
                write!(f, "grid {width}x{height} is too small to hold any room")
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// A finished layout, handed to the map to own.
pub(crate) struct Layout {
    pub tiles: Vec<Tile>,
    pub rooms: Vec<Room>,
    pub boundary: Room,
    pub start: Point,
}

/// Place rooms, carve tiles, and punch doors.
///
/// Candidate rectangles are sampled until the accepted count reaches a
/// target drawn from `[min_rooms, max_rooms]`, rejecting any candidate
/// that leaves the grid interior or overlaps an accepted room
/// (closed-interval test). The budget is
/// [`PLACEMENT_ATTEMPTS_PER_ROOM`] candidates per targeted room; running
/// out below `min_rooms` is an error, running out at or above it is a
/// success with the rooms that fit.
pub(crate) fn generate(params: &GenParams, rng: &mut impl Rng) -> Result<Layout, GenerationError> {
    let GenParams { width, height, .. } = *params;
    if width < ROOM_MIN_EXTENT + 2 || height < ROOM_MIN_EXTENT + 2 {
        return Err(GenerationError::GridTooSmall { width, height });
    }
    let lo = params.min_rooms.min(params.max_rooms);
    let hi = params.min_rooms.max(params.max_rooms);
    let target = rng.random_range(lo..=hi);

    let mut rooms: Vec<Room> = Vec::with_capacity(target as usize);
    let mut attempts = PLACEMENT_ATTEMPTS_PER_ROOM * target.max(1);
    while (rooms.len() as u32) < target && attempts > 0 {
        attempts -= 1;

        let rw = rng.random_range(ROOM_MIN_EXTENT..=ROOM_MAX_EXTENT.min(width - 2));
        let rh = rng.random_range(ROOM_MIN_EXTENT..=ROOM_MAX_EXTENT.min(height - 2));
        // Keep the candidate strictly inside the outer ring, which
        // belongs to the boundary room.
        let left = rng.random_range(1..=width - 1 - rw);
        let top = rng.random_range(1..=height - 1 - rh);
        let candidate = Room::new(Rect::new(left, top, left + rw - 1, top + rh - 1));

        if rooms.iter().any(|r| r.overlaps(&candidate)) {
            continue;
        }
        log::debug!("placed room {} ({} of {target})", candidate.bounds, rooms.len() + 1);
        rooms.push(candidate);
    }

    if (rooms.len() as u32) < lo {
        log::warn!(
            "room placement gave up after budget exhaustion: {} of at least {lo} rooms",
            rooms.len()
        );
        return Err(GenerationError::AttemptsExhausted {
            placed: rooms.len(),
            wanted: lo,
        });
    }

    let boundary = Room::new(Rect::new(0, 0, width - 1, height - 1));
    let mut tiles = carve(width, height, &rooms, &boundary);
    let mut doors = 0;
    for room in &rooms {
        if let Some(p) = place_door(room, rng) {
            tiles[(p.y * width + p.x) as usize] = Tile::door();
            doors += 1;
        }
    }

    let start = rooms.first().map_or(boundary.center(), Room::center);
    log::info!(
        "generated {width}x{height} grid: {} rooms, {doors} doors, start {start}",
        rooms.len()
    );
    Ok(Layout {
        tiles,
        rooms,
        boundary,
        start,
    })
}

/// Carve the tile arena for a set of rooms: base floor, perimeter walls
/// and interior floor per room, and the boundary's enclosing wall ring.
pub(crate) fn carve(width: i32, height: i32, rooms: &[Room], boundary: &Room) -> Vec<Tile> {
    let mut tiles = vec![Tile::floor(); (width * height) as usize];
    for p in boundary.wall_points() {
        tiles[(p.y * width + p.x) as usize] = Tile::wall();
    }
    for room in rooms {
        for p in room.bounds {
            let idx = (p.y * width + p.x) as usize;
            tiles[idx] = if room.is_wall(p) {
                Tile::wall()
            } else {
                Tile::floor()
            };
        }
    }
    tiles
}

/// Pick a door position on one of the room's walls: the wall is chosen
/// uniformly among those long enough to hold a point strictly between
/// their corners, the point uniformly on that wall. `None` when no wall
/// qualifies (a 2×2 room).
fn place_door(room: &Room, rng: &mut impl Rng) -> Option<Point> {
    #[derive(Clone, Copy)]
    enum Wall {
        Top,
        Bottom,
        Left,
        Right,
    }

    let b = room.bounds;
    let mut walls = Vec::with_capacity(4);
    if b.width() >= 3 {
        walls.push(Wall::Top);
        walls.push(Wall::Bottom);
    }
    if b.height() >= 3 {
        walls.push(Wall::Left);
        walls.push(Wall::Right);
    }
    if walls.is_empty() {
        return None;
    }
    let p = match walls[rng.random_range(0..walls.len())] {
        Wall::Top => Point::new(rng.random_range(b.left + 1..b.right), b.top),
        Wall::Bottom => Point::new(rng.random_range(b.left + 1..b.right), b.bottom),
        Wall::Left => Point::new(b.left, rng.random_range(b.top + 1..b.bottom)),
        Wall::Right => Point::new(b.right, rng.random_range(b.top + 1..b.bottom)),
    };
    Some(p)
}
