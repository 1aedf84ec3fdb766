use serde::{Deserialize, Serialize};

/// A point in a sketch plane's local 2D coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point2) -> Point2 {
        Point2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Axis-aligned 2D extent. `min` is always component-wise below `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect2 {
    pub min: Point2,
    pub max: Point2,
}

impl Rect2 {
    /// Build from any two opposite corners.
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::from_corners(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point2 {
        self.min.midpoint(self.max)
    }

    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Area shared with `other`; zero when they only touch.
    pub fn overlap_area(&self, other: &Rect2) -> f64 {
        let w = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let h = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }
}

/// Which side of a rectangle an edge lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeSide {
    Bottom,
    Right,
    Top,
    Left,
}

/// Orientation tag used when attaching constraints and dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeRole {
    Horizontal,
    Vertical,
}

/// One oriented edge of a [`Rectangle`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectEdge {
    pub side: EdgeSide,
    pub role: EdgeRole,
    pub start: Point2,
    pub end: Point2,
}

impl RectEdge {
    pub fn midpoint(&self) -> Point2 {
        self.start.midpoint(self.end)
    }

    pub fn length(&self) -> f64 {
        ((self.end.x - self.start.x).powi(2) + (self.end.y - self.start.y).powi(2)).sqrt()
    }
}

/// A rectangle as drawn: four corners and four edges ordered
/// bottom, right, top, left. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    corners: [Point2; 4],
    edges: [RectEdge; 4],
}

impl Rectangle {
    /// Draw the rectangle spanned by `(x1, y1)` and `(x2, y2)`.
    ///
    /// Corners run (x1,y1), (x2,y1), (x2,y2), (x1,y2) and each edge starts
    /// where the previous one ends.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let corners = [
            Point2::new(x1, y1),
            Point2::new(x2, y1),
            Point2::new(x2, y2),
            Point2::new(x1, y2),
        ];
        let sides = [
            (EdgeSide::Bottom, EdgeRole::Horizontal),
            (EdgeSide::Right, EdgeRole::Vertical),
            (EdgeSide::Top, EdgeRole::Horizontal),
            (EdgeSide::Left, EdgeRole::Vertical),
        ];
        let edges = std::array::from_fn(|i| RectEdge {
            side: sides[i].0,
            role: sides[i].1,
            start: corners[i],
            end: corners[(i + 1) % 4],
        });
        Self { corners, edges }
    }

    pub fn corners(&self) -> &[Point2; 4] {
        &self.corners
    }

    pub fn edges(&self) -> &[RectEdge; 4] {
        &self.edges
    }

    pub fn edge(&self, side: EdgeSide) -> &RectEdge {
        match side {
            EdgeSide::Bottom => &self.edges[0],
            EdgeSide::Right => &self.edges[1],
            EdgeSide::Top => &self.edges[2],
            EdgeSide::Left => &self.edges[3],
        }
    }

    pub fn bounds(&self) -> Rect2 {
        Rect2::from_corners(self.corners[0], self.corners[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_edges_are_closed_loop() {
        let rect = Rectangle::from_corners(0.0, 0.0, 4.0, 2.0);
        let edges = rect.edges();
        for i in 0..4 {
            assert_eq!(edges[i].end, edges[(i + 1) % 4].start);
        }
        assert_eq!(rect.edge(EdgeSide::Top).role, EdgeRole::Horizontal);
        assert_eq!(rect.edge(EdgeSide::Left).role, EdgeRole::Vertical);
        assert_eq!(rect.edge(EdgeSide::Bottom).length(), 4.0);
    }

    #[test]
    fn bounds_normalize_reversed_corners() {
        let rect = Rectangle::from_corners(3.0, 5.0, 1.0, 2.0);
        let b = rect.bounds();
        assert_eq!(b.min, Point2::new(1.0, 2.0));
        assert_eq!(b.max, Point2::new(3.0, 5.0));
    }

    #[test]
    fn touching_rects_share_no_area() {
        let a = Rect2::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect2::new(1.0, 0.0, 2.0, 1.0);
        assert_eq!(a.overlap_area(&b), 0.0);
        let c = Rect2::new(0.5, 0.5, 2.0, 2.0);
        assert!((a.overlap_area(&c) - 0.25).abs() < 1e-12);
    }
}
