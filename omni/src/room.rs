//! Rectangular rooms and their derived wall geometry.

use omni_core::{Point, Rect};
use omni_rl::line;

/// An axis-aligned room. The bounds are closed on all sides: the
/// perimeter cells are the room's walls, everything inside them its floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub bounds: Rect,
}

impl Room {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    /// Center cell; the default start position when this is the first
    /// room placed.
    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// The four corner points, clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        self.bounds.corners()
    }

    /// The ordered perimeter, traced corner to corner: top edge left to
    /// right, right edge down, bottom edge right to left, left edge back
    /// up. Each wall cell appears exactly once.
    pub fn wall_points(&self) -> Vec<Point> {
        // A single row or column is all wall; walk it directly rather
        // than tracing its collapsed edges twice.
        if self.bounds.width() == 1 || self.bounds.height() == 1 {
            return self.bounds.iter().collect();
        }
        let [tl, tr, br, bl] = self.corners();
        let mut points =
            Vec::with_capacity((2 * (self.bounds.width() + self.bounds.height())) as usize);
        for edge in [[tl, tr], [tr, br], [br, bl], [bl, tl]] {
            let run = line::trace(edge[0], edge[1]);
            // The shared corner starts the next edge.
            points.extend(&run[..run.len() - 1]);
        }
        points
    }

    /// Whether `p` is one of this room's wall cells.
    pub fn is_wall(&self, p: Point) -> bool {
        self.bounds.on_perimeter(p)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Closed-interval overlap with another room.
    pub fn overlaps(&self, other: &Room) -> bool {
        self.bounds.overlaps(other.bounds)
    }

    /// The floor rectangle inside the walls, if any.
    pub fn interior(&self) -> Option<Rect> {
        self.bounds.interior()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn wall_points_cover_the_perimeter_once() {
        let room = Room::new(Rect::new(2, 2, 6, 5));
        let walls = room.wall_points();
        // 5 wide, 4 tall: 2*5 + 2*4 - 4 corners = 14 perimeter cells.
        assert_eq!(walls.len(), 14);
        let unique: HashSet<_> = walls.iter().copied().collect();
        assert_eq!(unique.len(), walls.len());
        for p in &walls {
            assert!(room.is_wall(*p));
        }
        for p in room.bounds {
            assert_eq!(room.is_wall(p), unique.contains(&p));
        }
    }

    #[test]
    fn wall_points_are_ordered_around_the_ring() {
        let room = Room::new(Rect::new(0, 0, 3, 3));
        let walls = room.wall_points();
        assert_eq!(walls[0], Point::new(0, 0));
        // Consecutive wall cells (wrapping) are 8-adjacent.
        for i in 0..walls.len() {
            let a = walls[i];
            let b = walls[(i + 1) % walls.len()];
            assert_eq!(a.chebyshev(b), 1, "{a} and {b} not adjacent");
        }
    }

    #[test]
    fn smallest_room_has_no_interior() {
        let room = Room::new(Rect::new(4, 4, 5, 5));
        assert_eq!(room.interior(), None);
        assert_eq!(room.wall_points().len(), 4);
    }

    #[test]
    fn overlap_uses_closed_intervals() {
        let a = Room::new(Rect::new(0, 0, 4, 4));
        let b = Room::new(Rect::new(4, 0, 8, 4));
        assert!(a.overlaps(&b), "shared edge cells overlap");
        let c = Room::new(Rect::new(5, 0, 8, 4));
        assert!(!a.overlaps(&c));
    }
}
