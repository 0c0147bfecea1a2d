//! Map state and turn operations.
//!
//! The [`Map`] is the single shared mutable resource of the core: it owns
//! the tile arena, the room list, and the actor/item tables, and every
//! mutation (carving, door toggling, occupancy) goes through its methods.
//! Visibility is recomputed synchronously on registration, after a
//! successful move, and after a door toggle, never after a rejected move
//! or a pure wait.

use std::collections::HashSet;

use omni_core::{Point, Rect};
use omni_rl::{FillStrategy, Visibility};
use rand::Rng;

use crate::actor::{Actor, ActorId};
use crate::mapgen::{self, GenParams, GenerationError};
use crate::room::Room;
use crate::tile::{Item, ItemId, Tile};

/// What a [`Map::move_actor`] call did.
///
/// A move *ticks* when it consumed the actor's turn and *moves* when the
/// position actually changed:
///
/// | outcome      | ticked | moved |
/// |--------------|--------|-------|
/// | `Blocked`    | false  | false |
/// | `Wait`       | true   | false |
/// | `OpenedDoor` | true   | false |
/// | `Moved`      | true   | true  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Destination out of bounds, impassable, or occupied.
    Blocked,
    /// Zero-delta move; the turn passes in place.
    Wait,
    /// Destination was a closed door; opening it was the action.
    OpenedDoor,
    /// The actor stepped onto the destination tile.
    Moved,
}

impl MoveOutcome {
    /// Whether the action consumed the actor's turn.
    pub fn ticked(self) -> bool {
        !matches!(self, MoveOutcome::Blocked)
    }

    /// Whether the actor's position changed.
    pub fn moved(self) -> bool {
        matches!(self, MoveOutcome::Moved)
    }
}

/// A single grid instance: tiles, rooms, doors, actors, items, and the
/// current visibility state.
pub struct Map {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    rooms: Vec<Room>,
    boundary: Room,
    start: Point,
    actors: Vec<Actor>,
    items: Vec<Item>,
    /// Visible set of the most recent visibility pass.
    visible: HashSet<Point>,
    fov: Visibility,
}

impl Map {
    /// Generate a fresh map: rooms placed by rejection sampling, tiles
    /// carved, one door per room that can hold one.
    pub fn generate(params: &GenParams, rng: &mut impl Rng) -> Result<Self, GenerationError> {
        let layout = mapgen::generate(params, rng)?;
        Ok(Self::from_layout(params.width, params.height, layout))
    }

    /// Deterministic construction from prefabricated rooms: carves the
    /// given rooms and the enclosing boundary, places no doors.
    pub fn from_rooms(width: i32, height: i32, rooms: Vec<Room>) -> Self {
        let boundary = Room::new(Rect::new(0, 0, width - 1, height - 1));
        let tiles = mapgen::carve(width, height, &rooms, &boundary);
        let start = rooms.first().map_or(boundary.center(), Room::center);
        Self::from_layout(
            width,
            height,
            mapgen::Layout {
                tiles,
                rooms,
                boundary,
                start,
            },
        )
    }

    fn from_layout(width: i32, height: i32, layout: mapgen::Layout) -> Self {
        Self {
            width,
            height,
            tiles: layout.tiles,
            rooms: layout.rooms,
            boundary: layout.boundary,
            start: layout.start,
            actors: Vec::new(),
            items: Vec::new(),
            visible: HashSet::new(),
            fov: Visibility::new(Rect::new(0, 0, width - 1, height - 1)),
        }
    }

    /// Replace the layout wholesale: new rooms, tiles and doors under the
    /// given parameters. All actors and items are evicted, since old
    /// coordinates mean nothing on the new layout, and the cached
    /// visibility state is cleared. On error the map is untouched.
    pub fn regenerate(
        &mut self,
        params: &GenParams,
        rng: &mut impl Rng,
    ) -> Result<(), GenerationError> {
        let layout = mapgen::generate(params, rng)?;
        *self = Self::from_layout(params.width, params.height, layout);
        Ok(())
    }

    // ── Geometry and read access ───────────────────────────────────

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// The rectangle of valid positions.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width - 1, self.height - 1)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    /// Default actor start position: the first placed room's center.
    pub fn start(&self) -> Point {
        self.start
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// The enclosing boundary room spanning the whole grid.
    pub fn boundary(&self) -> &Room {
        &self.boundary
    }

    fn idx(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    pub fn tile(&self, p: Point) -> Option<&Tile> {
        if !self.contains(p) {
            return None;
        }
        Some(&self.tiles[self.idx(p)])
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// The visible set of the most recent visibility pass.
    pub fn visible(&self) -> &HashSet<Point> {
        &self.visible
    }

    pub fn is_visible(&self, p: Point) -> bool {
        self.visible.contains(&p)
    }

    /// Whether the actor has ever seen `p` on this layout (fog-of-war).
    pub fn is_discovered(&self, id: ActorId, p: Point) -> bool {
        self.actors.get(id).is_some_and(|a| a.discovered.contains(&p))
    }

    /// Which interior fill the visibility engine uses.
    pub fn fill_strategy(&self) -> FillStrategy {
        self.fov.strategy()
    }

    pub fn set_fill_strategy(&mut self, strategy: FillStrategy) {
        self.fov.set_strategy(strategy);
    }

    // ── Mutation ───────────────────────────────────────────────────

    /// Attach an actor to the tile at its position, marking it occupied,
    /// and run its initial visibility pass. Returns `None` when the tile
    /// is out of bounds, impassable, or already occupied.
    pub fn register(&mut self, actor: Actor) -> Option<ActorId> {
        if !self.contains(actor.pos) {
            return None;
        }
        let idx = self.idx(actor.pos);
        if self.tiles[idx].physical || self.tiles[idx].occupant.is_some() {
            return None;
        }
        let id = self.actors.len();
        self.tiles[idx].occupant = Some(id);
        self.actors.push(actor);
        self.calculate_visibility(id);
        Some(id)
    }

    /// Move an actor by a delta. See [`MoveOutcome`] for the contract:
    /// a closed door at the destination is opened instead of entered, a
    /// zero delta waits, and anything unreachable blocks without
    /// consuming the turn.
    pub fn move_actor(&mut self, id: ActorId, dx: i32, dy: i32) -> MoveOutcome {
        let Some(actor) = self.actors.get(id) else {
            return MoveOutcome::Blocked;
        };
        if dx == 0 && dy == 0 {
            return MoveOutcome::Wait;
        }
        let from = actor.pos;
        let dest = from.shift(dx, dy);
        if !self.contains(dest) {
            return MoveOutcome::Blocked;
        }
        let dest_idx = self.idx(dest);
        let tile = &self.tiles[dest_idx];
        let closed_door = tile.is_door() && !tile.door_open();
        let blocked = tile.physical || tile.occupant.is_some();
        if closed_door {
            self.toggle_door(dest);
            return MoveOutcome::OpenedDoor;
        }
        if blocked {
            return MoveOutcome::Blocked;
        }

        let from_idx = self.idx(from);
        self.tiles[from_idx].occupant = None;
        self.tiles[dest_idx].occupant = Some(id);
        self.actors[id].pos = dest;
        self.calculate_visibility(id);
        MoveOutcome::Moved
    }

    /// Convert a wall tile strictly between the corners of some room's
    /// wall into an open door. Returns whether a door was created.
    pub fn add_door(&mut self, p: Point) -> bool {
        if !self.contains(p) {
            return false;
        }
        let on_wall = self
            .rooms
            .iter()
            .any(|r| r.is_wall(p) && !r.corners().contains(&p));
        let idx = self.idx(p);
        if !on_wall || !self.tiles[idx].physical {
            return false;
        }
        self.tiles[idx] = Tile::door();
        true
    }

    /// Flip the door at `p` between open and closed (passability, sight
    /// opacity and glyph flip together) and recompute visibility for
    /// every registered actor. No-op if the tile is not a door.
    pub fn toggle_door(&mut self, p: Point) {
        if !self.tile(p).is_some_and(Tile::is_door) {
            return;
        }
        let idx = self.idx(p);
        self.tiles[idx].toggle_door();
        for id in 0..self.actors.len() {
            self.calculate_visibility(id);
        }
    }

    /// Place an item on a free floor tile.
    pub fn place_item(&mut self, item: Item, p: Point) -> Option<ItemId> {
        if !self.contains(p) {
            return None;
        }
        let idx = self.idx(p);
        if self.tiles[idx].physical || self.tiles[idx].item.is_some() {
            return None;
        }
        let id = self.items.len();
        self.tiles[idx].item = Some(id);
        self.items.push(item);
        Some(id)
    }

    /// Run the visibility engine for an actor: the transient visible set
    /// becomes the map's current one and is folded into the actor's
    /// discovered memory.
    pub fn calculate_visibility(&mut self, id: ActorId) -> &HashSet<Point> {
        let Some(actor) = self.actors.get(id) else {
            self.visible.clear();
            return &self.visible;
        };
        let (origin, radius, shape) = (actor.pos, actor.radius, actor.shape);

        let tiles = &self.tiles;
        let width = self.width;
        self.fov.view(origin, radius, shape, |p| {
            tiles[(p.y * width + p.x) as usize].blocks_sight()
        });

        self.visible.clear();
        self.visible.extend(self.fov.iter_visible());
        self.actors[id].discovered.extend(self.visible.iter().copied());
        &self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omni_rl::SightShape;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn square_eye(pos: Point, radius: i32) -> Actor {
        Actor::new(pos, radius, SightShape::Square)
    }

    /// 20×20 grid with one room spanning (2,2)-(10,10), no doors.
    fn one_room_map() -> Map {
        Map::from_rooms(20, 20, vec![Room::new(Rect::new(2, 2, 10, 10))])
    }

    #[test]
    fn one_room_square_fov_covers_exactly_the_room() {
        let mut map = one_room_map();
        let id = map.register(square_eye(Point::new(6, 6), 4)).expect("register");

        let room = Rect::new(2, 2, 10, 10);
        assert_eq!(map.visible().len(), room.len());
        for p in room {
            assert!(map.is_visible(p), "{p} should be visible");
        }
        // Walls are visible, nothing beyond them is.
        assert!(map.is_visible(Point::new(2, 2)));
        assert!(!map.is_visible(Point::new(11, 6)));
        assert!(!map.is_visible(Point::new(6, 1)));
        assert!(map.is_discovered(id, Point::new(10, 6)));
    }

    #[test]
    fn closed_door_hides_and_toggling_reveals() {
        let mut map = one_room_map();
        let door = Point::new(10, 6);
        assert!(map.add_door(door));
        map.toggle_door(door); // close it
        let tile = map.tile(door).expect("door tile");
        assert!(tile.is_door() && !tile.door_open() && tile.physical);

        map.register(square_eye(Point::new(6, 6), 6)).expect("register");
        assert!(map.is_visible(door));
        assert!(!map.is_visible(Point::new(11, 6)));
        assert!(!map.is_visible(Point::new(12, 6)));

        map.toggle_door(door); // open; visibility recomputes
        let tile = map.tile(door).expect("door tile");
        assert!(tile.door_open() && !tile.physical);
        assert!(map.is_visible(Point::new(11, 6)));
        assert!(map.is_visible(Point::new(12, 6)));
    }

    #[test]
    fn move_into_closed_door_opens_it_in_place() {
        let mut map = one_room_map();
        let door = Point::new(10, 6);
        assert!(map.add_door(door));
        map.toggle_door(door);

        let id = map.register(square_eye(Point::new(9, 6), 4)).expect("register");
        let outcome = map.move_actor(id, 1, 0);
        assert_eq!(outcome, MoveOutcome::OpenedDoor);
        assert!(outcome.ticked() && !outcome.moved());
        assert_eq!(map.actor(id).expect("actor").pos, Point::new(9, 6));
        assert!(map.tile(door).expect("tile").door_open());
    }

    #[test]
    fn move_into_occupied_tile_is_blocked() {
        let mut map = one_room_map();
        let a = map.register(square_eye(Point::new(6, 6), 4)).expect("a");
        map.register(square_eye(Point::new(7, 6), 4)).expect("b");

        let outcome = map.move_actor(a, 1, 0);
        assert_eq!(outcome, MoveOutcome::Blocked);
        assert!(!outcome.ticked() && !outcome.moved());
        assert_eq!(map.actor(a).expect("actor").pos, Point::new(6, 6));
    }

    #[test]
    fn zero_delta_move_waits() {
        let mut map = one_room_map();
        let id = map.register(square_eye(Point::new(6, 6), 4)).expect("register");
        let outcome = map.move_actor(id, 0, 0);
        assert_eq!(outcome, MoveOutcome::Wait);
        assert!(outcome.ticked() && !outcome.moved());
    }

    #[test]
    fn out_of_bounds_and_walls_block_without_ticking() {
        let mut map = one_room_map();
        let id = map.register(square_eye(Point::new(3, 3), 4)).expect("register");
        // Through the room wall.
        assert_eq!(map.move_actor(id, -1, 0), MoveOutcome::Blocked);
        // Far out of the grid.
        assert_eq!(map.move_actor(id, -10, 0), MoveOutcome::Blocked);
        assert_eq!(map.actor(id).expect("actor").pos, Point::new(3, 3));
    }

    #[test]
    fn successful_move_updates_occupancy_and_visibility() {
        let mut map = one_room_map();
        let id = map.register(square_eye(Point::new(6, 6), 4)).expect("register");
        let outcome = map.move_actor(id, 1, 0);
        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(map.tile(Point::new(6, 6)).expect("tile").occupant, None);
        assert_eq!(map.tile(Point::new(7, 6)).expect("tile").occupant, Some(id));
        // The new position saw new tiles; memory kept the old ones.
        assert!(map.is_visible(Point::new(7, 6)));
        assert!(map.is_discovered(id, Point::new(6, 6)));
    }

    #[test]
    fn discovered_memory_only_grows() {
        let mut map = one_room_map();
        let id = map.register(square_eye(Point::new(4, 4), 2)).expect("register");
        let before: HashSet<Point> = map.actor(id).expect("actor").discovered.clone();
        map.move_actor(id, 1, 1);
        map.move_actor(id, 1, 1);
        let after = &map.actor(id).expect("actor").discovered;
        assert!(before.is_subset(after));
        assert!(after.len() >= before.len());
    }

    #[test]
    fn register_rejects_walls_and_occupied_tiles() {
        let mut map = one_room_map();
        assert!(map.register(square_eye(Point::new(2, 2), 4)).is_none());
        assert!(map.register(square_eye(Point::new(40, 4), 4)).is_none());
        assert!(map.register(square_eye(Point::new(6, 6), 4)).is_some());
        assert!(map.register(square_eye(Point::new(6, 6), 4)).is_none());
    }

    #[test]
    fn generated_map_start_is_playable() {
        let mut rng = StdRng::seed_from_u64(42);
        let params = GenParams {
            width: 48,
            height: 32,
            min_rooms: 3,
            max_rooms: 7,
        };
        let mut map = Map::generate(&params, &mut rng).expect("generation");
        assert_eq!(map.start(), map.rooms()[0].center());
        let id = map.register(square_eye(map.start(), 5)).expect("register at start");
        assert!(map.is_visible(map.actor(id).expect("actor").pos));
    }

    #[test]
    fn regenerate_evicts_actors_and_clears_visibility() {
        let mut rng = StdRng::seed_from_u64(9);
        let params = GenParams {
            width: 40,
            height: 30,
            min_rooms: 2,
            max_rooms: 5,
        };
        let mut map = Map::generate(&params, &mut rng).expect("generation");
        map.register(square_eye(map.start(), 5)).expect("register");
        assert!(!map.visible().is_empty());

        map.regenerate(&params, &mut rng).expect("regeneration");
        assert!(map.actors().is_empty());
        assert!(map.visible().is_empty());
        for p in map.bounds() {
            assert_eq!(map.tile(p).expect("tile").occupant, None);
        }
        // The new layout accepts registrations again.
        assert!(map.register(square_eye(map.start(), 5)).is_some());
    }

    #[test]
    fn failed_regeneration_leaves_the_map_untouched() {
        let mut rng = StdRng::seed_from_u64(5);
        let params = GenParams {
            width: 40,
            height: 30,
            min_rooms: 2,
            max_rooms: 4,
        };
        let mut map = Map::generate(&params, &mut rng).expect("generation");
        let id = map.register(square_eye(map.start(), 5)).expect("register");
        let rooms_before = map.rooms().to_vec();

        let impossible = GenParams {
            width: 6,
            height: 6,
            min_rooms: 30,
            max_rooms: 30,
        };
        assert!(map.regenerate(&impossible, &mut rng).is_err());
        assert_eq!(map.rooms(), rooms_before.as_slice());
        assert!(map.actor(id).is_some());
    }

    #[test]
    fn flood_strategy_swaps_without_touching_callers() {
        let mut map = one_room_map();
        map.set_fill_strategy(FillStrategy::Flood);
        let id = map.register(square_eye(Point::new(6, 6), 4)).expect("register");
        let flooded = map.calculate_visibility(id).clone();
        // Interior fully covered either way; corners are the only loss.
        let interior = Rect::new(3, 3, 9, 9);
        for p in interior {
            assert!(flooded.contains(&p), "{p} missing under flood fill");
        }
        map.set_fill_strategy(FillStrategy::EvenOdd);
        let filled = map.calculate_visibility(id).clone();
        assert!(flooded.is_subset(&filled));
    }

    #[test]
    fn items_occupy_tiles_by_handle() {
        let mut map = one_room_map();
        let p = Point::new(5, 5);
        let id = map
            .place_item(
                Item {
                    name: "lantern".into(),
                    appearance: crate::tile::Appearance::new('(', crate::tile::Color::Yellow),
                },
                p,
            )
            .expect("place");
        assert_eq!(map.tile(p).expect("tile").item, Some(id));
        assert_eq!(map.item(id).expect("item").name, "lantern");
        // One item per tile; walls take none.
        assert!(map.place_item(
            Item {
                name: "coin".into(),
                appearance: crate::tile::Appearance::new('$', crate::tile::Color::Yellow),
            },
            p
        )
        .is_none());
    }
}
