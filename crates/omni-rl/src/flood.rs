//! Boundary-respecting breadth-first fill.

use std::collections::{HashSet, VecDeque};

use omni_core::{Point, Rect};

/// Expand outward from `start`, never crossing boundary points, and return
/// every point reached.
///
/// Expansion is 4-directional and clipped to `within`. A boundary point
/// that the frontier touches is recorded in the result but never expanded,
/// so walls are seen without being crossed. An 8-connected boundary line
/// (such as a traced polygon edge) is therefore never leaked through: the
/// two cells of a diagonal gap are not 4-adjacent.
///
/// Returns the empty set when `start` lies outside `within`.
pub fn flood(
    start: Point,
    is_boundary: impl Fn(Point) -> bool,
    within: Rect,
) -> HashSet<Point> {
    let mut reached = HashSet::new();
    if !within.contains(start) {
        return reached;
    }
    reached.insert(start);
    if is_boundary(start) {
        return reached;
    }

    let mut frontier = VecDeque::new();
    frontier.push_back(start);

    while let Some(cur) = frontier.pop_front() {
        for next in cur.neighbors_4() {
            if !within.contains(next) || !reached.insert(next) {
                continue;
            }
            if !is_boundary(next) {
                frontier.push_back(next);
            }
        }
    }
    reached
}
