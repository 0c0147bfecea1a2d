//! Field of vision: ray casting, angular polygon assembly, interior fill.
//!
//! A [`Visibility`] value owns reusable buffers and a grid bounds
//! rectangle. Each [`view`](Visibility::view) call runs the full pipeline:
//!
//! 1. frame a bounding square of half-width `radius` on the observer;
//! 2. cast a ray (via [`line::trace`]) to every frame-perimeter point and
//!    keep its terminal: the first sight-opaque point, or the rim point
//!    itself when nothing obstructs;
//! 3. sort the distinct terminals by angle around the observer;
//! 4. re-trace consecutive terminal pairs (wrapping) into a dense polygon
//!    edge set;
//! 5. fill the interior with the even-odd crossing test, or with the
//!    flood-fill alternate ([`FillStrategy::Flood`]) behind the same
//!    entry point;
//! 6. clip to the active distance metric.
//!
//! Opacity is supplied by the caller as a plain point predicate, so the
//! engine never learns about tiles, rooms, or doors.

use std::collections::HashSet;
use std::f64::consts::TAU;

use omni_core::{Point, Rect};

use crate::flood;
use crate::line;

/// Ratio of a Chebyshev (square) sight radius to the Euclidean (circle)
/// sight radius covering the same area: a disc of radius `r` and a square
/// of half-width `r·√π/2` both span `πr²` cells.
pub const CIRCLE_TO_SQUARE_RADIUS: f64 = 0.886_226_925_452_758;

/// The distance metric bounding an observer's sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SightShape {
    /// Euclidean distance; sight contours are circles.
    #[default]
    Circle,
    /// Chebyshev distance; sight contours are squares.
    Square,
}

impl SightShape {
    /// Convert a sight radius between metrics, preserving covered area in
    /// both directions (see [`CIRCLE_TO_SQUARE_RADIUS`]). Integer rounding
    /// means a round trip may drift by one cell.
    pub fn convert_radius(self, to: SightShape, radius: i32) -> i32 {
        match (self, to) {
            (SightShape::Circle, SightShape::Square) => {
                (radius as f64 * CIRCLE_TO_SQUARE_RADIUS).round() as i32
            }
            (SightShape::Square, SightShape::Circle) => {
                (radius as f64 / CIRCLE_TO_SQUARE_RADIUS).round() as i32
            }
            _ => radius,
        }
    }

    /// Distance between two points under this metric, squared for
    /// `Circle` comparisons to stay in integers.
    fn within(self, a: Point, b: Point, radius: i32) -> bool {
        match self {
            SightShape::Circle => a.euclid_sq(b) <= (radius as i64) * (radius as i64),
            SightShape::Square => a.chebyshev(b) <= radius,
        }
    }
}

/// How step 5 classifies interior cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillStrategy {
    /// Even-odd (ray-crossing) point-in-polygon classification.
    #[default]
    EvenOdd,
    /// Breadth-first expansion from the observer, bounded by the polygon
    /// edge. Cheaper, less precise: edge cells with no 4-neighbor inside
    /// the polygon (e.g. room corners) are missed.
    Flood,
}

/// Field of vision computation with reusable buffers.
pub struct Visibility {
    /// The rectangle of valid grid positions.
    bounds: Rect,
    strategy: FillStrategy,
    /// Polygon vertices from the last `view` call, in angular order.
    vertices: Vec<Point>,
    /// Dense polygon edge from the last `view` call.
    edge: HashSet<Point>,
    /// Visible set from the last `view` call.
    visible: HashSet<Point>,
}

impl Visibility {
    /// Create an engine for the given grid bounds with the default
    /// even-odd fill.
    pub fn new(bounds: Rect) -> Self {
        Self::with_strategy(bounds, FillStrategy::default())
    }

    /// Create an engine with an explicit fill strategy.
    pub fn with_strategy(bounds: Rect, strategy: FillStrategy) -> Self {
        Self {
            bounds,
            strategy,
            vertices: Vec::new(),
            edge: HashSet::new(),
            visible: HashSet::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Replace the grid bounds (after a regeneration with new dimensions).
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn strategy(&self) -> FillStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: FillStrategy) {
        self.strategy = strategy;
    }

    /// Compute the set of points visible from `origin` with the given
    /// sight radius and metric. `opaque` reports whether a point blocks
    /// sight; out-of-bounds points are never queried as obstructions, so
    /// rays simply run to their rim point there.
    ///
    /// Returns the computed set, which stays queryable through
    /// [`visible`](Self::visible) until the next call.
    pub fn view(
        &mut self,
        origin: Point,
        radius: i32,
        shape: SightShape,
        opaque: impl Fn(Point) -> bool,
    ) -> &HashSet<Point> {
        self.vertices.clear();
        self.edge.clear();
        self.visible.clear();
        if !self.bounds.contains(origin) {
            return &self.visible;
        }

        let radius = radius.max(0);
        let frame = Rect::centered(origin, radius);

        // Ray casting: one ray per frame-perimeter point, terminal kept.
        let mut seen = HashSet::new();
        for rim in perimeter(frame) {
            let ray = line::trace(origin, rim);
            let mut terminal = rim;
            for &q in ray.iter().skip(1) {
                if self.bounds.contains(q) && opaque(q) {
                    terminal = q;
                    break;
                }
            }
            if seen.insert(terminal) {
                self.vertices.push(terminal);
            }
        }

        // Angular sort around the origin, normalized into [0, 2π).
        self.vertices
            .sort_by(|a, b| angle_from(origin, *a).total_cmp(&angle_from(origin, *b)));

        if self.vertices.len() < 3 {
            // Degenerate polygon: the whole vision frame is visible.
            if let Some(clipped) = frame.intersect(self.bounds) {
                self.visible.extend(clipped);
            }
        } else {
            // Densify: wrap-around re-trace between consecutive vertices.
            for i in 0..self.vertices.len() {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % self.vertices.len()];
                self.edge.extend(line::trace(a, b));
            }

            let bbox = Rect::bounding(self.edge.iter().copied())
                .and_then(|r| r.intersect(self.bounds));
            if let Some(bbox) = bbox {
                match self.strategy {
                    FillStrategy::EvenOdd => {
                        for p in bbox {
                            if self.edge.contains(&p) || even_odd(p, &self.vertices) {
                                self.visible.insert(p);
                            }
                        }
                    }
                    FillStrategy::Flood => {
                        let edge = &self.edge;
                        self.visible
                            .extend(flood::flood(origin, |p| edge.contains(&p), bbox));
                    }
                }
            }
        }

        // Metric clip. Edge points get one extra step of slack: rays
        // terminate on walls, and a wall one past the radius is still the
        // thing that stopped the ray.
        let edge = &self.edge;
        self.visible.retain(|&p| {
            let slack = if edge.contains(&p) { 1 } else { 0 };
            shape.within(origin, p, radius + slack)
        });
        self.visible.insert(origin);

        &self.visible
    }

    /// Whether `p` was visible in the last [`view`](Self::view) call.
    pub fn visible(&self, p: Point) -> bool {
        self.visible.contains(&p)
    }

    /// Iterate over the last computed visible set.
    pub fn iter_visible(&self) -> impl Iterator<Item = Point> + '_ {
        self.visible.iter().copied()
    }

    /// The polygon vertices of the last [`view`](Self::view) call, in
    /// angular order.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }
}

/// The perimeter points of a closed rectangle, each exactly once.
fn perimeter(r: Rect) -> Vec<Point> {
    let mut out = Vec::with_capacity((2 * (r.width() + r.height()) - 4).max(1) as usize);
    for x in r.left..=r.right {
        out.push(Point::new(x, r.top));
    }
    if r.bottom > r.top {
        for x in r.left..=r.right {
            out.push(Point::new(x, r.bottom));
        }
    }
    for y in (r.top + 1)..r.bottom {
        out.push(Point::new(r.left, y));
        if r.right > r.left {
            out.push(Point::new(r.right, y));
        }
    }
    out
}

/// Angle of `p` around `origin`, normalized into [0, 2π).
fn angle_from(origin: Point, p: Point) -> f64 {
    let a = ((p.y - origin.y) as f64).atan2((p.x - origin.x) as f64);
    if a < 0.0 { a + TAU } else { a }
}

/// Even-odd (ray-crossing) point-in-polygon test.
///
/// The straddle condition `(yi > py) != (yj > py)` excludes horizontal
/// edges, so the crossing division never sees a zero vertical delta.
fn even_odd(p: Point, poly: &[Point]) -> bool {
    let (px, py) = (p.x as f64, p.y as f64);
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (xi, yi) = (poly[i].x as f64, poly[i].y as f64);
        let (xj, yj) = (poly[j].x as f64, poly[j].y as f64);
        if (yi > py) != (yj > py) {
            let cross = xi + (py - yi) * (xj - xi) / (yj - yi);
            if px < cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
