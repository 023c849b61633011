//! Collision Geometry
//!
//! Axis-aligned probe rectangles, simple polygons, and the immutable obstacle
//! set the movement resolver tests against.
//!
//! Overlap is measured as the area of the polygon clipped to the rectangle
//! (Sutherland-Hodgman against the four rectangle edges). Shapes that only
//! share an edge or a corner have zero overlap area and do not collide, so a
//! hitbox resting flush against a wall can still slide along it.

use serde::{Serialize, Deserialize};

use super::vec2::Vec2;

/// Overlap area (px²) below which two shapes are considered touching only.
pub const OVERLAP_EPSILON: f32 = 1e-3;

// =============================================================================
// RECT
// =============================================================================

/// Axis-aligned rectangle in world pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Rect {
    /// Create from top-left corner and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Create a rectangle of the given size centered on `center`.
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        let half = Vec2::new(width * 0.5, height * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Strict overlap test (shared edges do not count).
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Corners in clockwise order (screen space).
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

// =============================================================================
// POLYGON
// =============================================================================

/// Simple (non self-intersecting) polygon; convex or concave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Vec2>,
    #[serde(skip)]
    bounds: Option<Rect>,
}

impl Polygon {
    /// Create a polygon from its vertices (either winding).
    pub fn new(points: Vec<Vec2>) -> Self {
        let bounds = bounding_rect(&points);
        Self { points, bounds }
    }

    /// Axis-aligned rectangle as a polygon (Tiled rectangle objects).
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.corners().to_vec())
    }

    /// Vertices.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Bounding box, `None` for an empty polygon.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds.or_else(|| bounding_rect(&self.points))
    }

    /// Unsigned area (shoelace formula).
    pub fn area(&self) -> f32 {
        polygon_area(&self.points)
    }

    /// Area of this polygon lying inside `rect`.
    pub fn overlap_area(&self, rect: &Rect) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }
        match self.bounds() {
            Some(b) if b.overlaps(rect) => {}
            _ => return 0.0,
        }

        let mut clipped = self.points.clone();
        clipped = clip_edge(&clipped, |p| p.x >= rect.min.x, |a, b| lerp_x(a, b, rect.min.x));
        clipped = clip_edge(&clipped, |p| p.x <= rect.max.x, |a, b| lerp_x(a, b, rect.max.x));
        clipped = clip_edge(&clipped, |p| p.y >= rect.min.y, |a, b| lerp_y(a, b, rect.min.y));
        clipped = clip_edge(&clipped, |p| p.y <= rect.max.y, |a, b| lerp_y(a, b, rect.max.y));

        polygon_area(&clipped)
    }

    /// Check if this polygon and `rect` share a region of positive area.
    #[inline]
    pub fn intersects(&self, rect: &Rect) -> bool {
        self.overlap_area(rect) > OVERLAP_EPSILON
    }
}

fn bounding_rect(points: &[Vec2]) -> Option<Rect> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(Rect { min, max })
}

fn polygon_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice += a.x * b.y - b.x * a.y;
    }
    (twice * 0.5).abs()
}

/// One Sutherland-Hodgman pass against a single half-plane.
fn clip_edge<I, X>(points: &[Vec2], inside: I, intersect: X) -> Vec<Vec2>
where
    I: Fn(Vec2) -> bool,
    X: Fn(Vec2, Vec2) -> Vec2,
{
    let mut out = Vec::with_capacity(points.len() + 4);
    if points.is_empty() {
        return out;
    }

    let mut prev = points[points.len() - 1];
    for &cur in points {
        match (inside(prev), inside(cur)) {
            (true, true) => out.push(cur),
            (true, false) => out.push(intersect(prev, cur)),
            (false, true) => {
                out.push(intersect(prev, cur));
                out.push(cur);
            }
            (false, false) => {}
        }
        prev = cur;
    }
    out
}

fn lerp_x(a: Vec2, b: Vec2, x: f32) -> Vec2 {
    let t = (x - a.x) / (b.x - a.x);
    Vec2::new(x, a.y + (b.y - a.y) * t)
}

fn lerp_y(a: Vec2, b: Vec2, y: f32) -> Vec2 {
    let t = (y - a.y) / (b.y - a.y);
    Vec2::new(a.x + (b.x - a.x) * t, y)
}

// =============================================================================
// COLLISION GEOMETRY
// =============================================================================

/// Immutable set of impassable polygons, built once from a pre-parsed map.
///
/// Shared read-only (behind an `Arc`) by every movement resolution.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollisionGeometry {
    obstacles: Vec<Polygon>,
}

impl CollisionGeometry {
    /// Geometry with no obstacles.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from obstacle polygons.
    pub fn new(obstacles: Vec<Polygon>) -> Self {
        Self { obstacles }
    }

    /// All obstacles.
    pub fn obstacles(&self) -> &[Polygon] {
        &self.obstacles
    }

    /// Number of obstacles.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// True if there are no obstacles.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Check if any obstacle overlaps the probe.
    pub fn blocks(&self, probe: &Rect) -> bool {
        self.obstacles.iter().any(|o| o.intersects(probe))
    }
}

impl FromIterator<Polygon> for CollisionGeometry {
    fn from_iter<T: IntoIterator<Item = Polygon>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, size: f32) -> Polygon {
        Polygon::from_rect(Rect::new(x, y, size, size))
    }

    #[test]
    fn test_rect_from_center() {
        let r = Rect::from_center(Vec2::new(8.0, 24.0), 14.0, 14.0);
        assert_eq!(r.min, Vec2::new(1.0, 17.0));
        assert_eq!(r.max, Vec2::new(15.0, 31.0));
        assert_eq!(r.center(), Vec2::new(8.0, 24.0));
        assert_eq!(r.width(), 14.0);
        assert_eq!(r.height(), 14.0);
    }

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 16.0, 16.0);
        let touching = Rect::new(16.0, 0.0, 16.0, 16.0);
        let inside = Rect::new(4.0, 4.0, 4.0, 4.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
    }

    #[test]
    fn test_polygon_area() {
        assert!((square(0.0, 0.0, 10.0).area() - 100.0).abs() < 1e-3);

        let triangle = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 3.0),
        ]);
        assert!((triangle.area() - 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_overlap_area_partial() {
        let wall = square(10.0, 0.0, 10.0);
        let probe = Rect::new(5.0, 0.0, 10.0, 10.0);
        // Overlap is x in [10,15], y in [0,10]
        assert!((wall.overlap_area(&probe) - 50.0).abs() < 1e-3);
        assert!(wall.intersects(&probe));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let wall = square(16.0, 0.0, 16.0);
        let probe = Rect::new(0.0, 0.0, 16.0, 16.0);
        assert!(!wall.intersects(&probe));
    }

    #[test]
    fn test_probe_inside_polygon() {
        let big = square(0.0, 0.0, 100.0);
        let probe = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!((big.overlap_area(&probe) - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_concave_polygon() {
        // L-shape; the notch at top-right is empty
        let l_shape = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 20.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(20.0, 30.0),
            Vec2::new(0.0, 30.0),
        ]);

        let in_notch = Rect::new(12.0, 2.0, 6.0, 6.0);
        assert!(!l_shape.intersects(&in_notch));

        let in_foot = Rect::new(12.0, 22.0, 6.0, 6.0);
        assert!(l_shape.intersects(&in_foot));
    }

    #[test]
    fn test_degenerate_polygon_never_blocks() {
        let line = Polygon::new(vec![Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0)]);
        assert_eq!(line.overlap_area(&Rect::new(0.0, 0.0, 50.0, 50.0)), 0.0);
        assert!(Polygon::new(Vec::new()).bounds().is_none());
    }

    #[test]
    fn test_geometry_blocks() {
        let geometry: CollisionGeometry =
            vec![square(100.0, 100.0, 16.0), square(200.0, 0.0, 16.0)]
                .into_iter()
                .collect();
        assert_eq!(geometry.len(), 2);
        assert!(geometry.blocks(&Rect::new(105.0, 105.0, 4.0, 4.0)));
        assert!(!geometry.blocks(&Rect::new(150.0, 150.0, 4.0, 4.0)));
        assert!(CollisionGeometry::empty().is_empty());
    }
}
