//! Geometry resolver: points, rectangles, and the pure functions the
//! destination search is built from.
//!
//! All coordinates are viewport (client) CSS pixels as reported by pointer
//! events and `getBoundingClientRect`.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle, stored as its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size { width: self.width, height: self.height }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Whether `pt` lies inside the rectangle. Edges count as inside.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left && pt.x <= self.right() && pt.y >= self.top && pt.y <= self.bottom()
    }
}

/// Direction along which a container lays out its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Euclidean distance from `pt` to the nearest point of `rect`; `0.0` inside.
#[must_use]
pub fn distance_to_rect(pt: Point, rect: &Rect) -> f64 {
    let dx = (rect.left - pt.x).max(pt.x - rect.right()).max(0.0);
    let dy = (rect.top - pt.y).max(pt.y - rect.bottom()).max(0.0);
    dx.hypot(dy)
}

/// Infer a container's layout axis from the centers of its items.
///
/// Returns `None` with fewer than two centers; the caller picks a default.
#[must_use]
pub fn infer_axis(centers: &[Point]) -> Option<Axis> {
    if centers.len() < 2 {
        return None;
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for c in centers {
        min_x = min_x.min(c.x);
        max_x = max_x.max(c.x);
        min_y = min_y.min(c.y);
        max_y = max_y.max(c.y);
    }

    if max_x - min_x > max_y - min_y {
        Some(Axis::Horizontal)
    } else {
        Some(Axis::Vertical)
    }
}
