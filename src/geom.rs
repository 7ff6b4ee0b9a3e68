//! Geometry helpers: points, rectangles, and the screen ↔ percent mapping.
//!
//! Screen space is CSS pixels relative to the page. Container space is CSS
//! pixels relative to the tank container's top-left corner. Percent space is
//! the normalized `[0, 100]` coordinate stored on scene objects, independent
//! of the container's measured size.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in screen, container, or percent space.
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

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    #[must_use]
    pub fn sub(self, other: Point) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }

    /// Rotate this point by `deg` degrees (clockwise in screen space) around `pivot`.
    #[must_use]
    pub fn rotate_around(self, pivot: Point, deg: f64) -> Self {
        let (sin, cos) = deg.to_radians().sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Self {
            x: pivot.x + dx * cos - dy * sin,
            y: pivot.y + dx * sin + dy * cos,
        }
    }
}

/// An axis-aligned rectangle: top-left origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Whether both sides are strictly positive and finite.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom.
    #[must_use]
    pub fn inset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: (self.width - 2.0 * dx).max(0.0),
            height: (self.height - 2.0 * dy).max(0.0),
        }
    }

    /// Corners in clockwise order starting at the top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }
}

/// Map a screen-space pointer into percent space for a container.
///
/// `grab` is the pointer's offset from the dragged item's anchor, captured at
/// press time. Returns `None` if the container has no measured size yet.
#[must_use]
pub fn screen_to_percent(screen: Point, container: &Rect, grab: Point) -> Option<Point> {
    if !container.is_measured() {
        return None;
    }
    Some(Point {
        x: (screen.x - container.x - grab.x) / container.width * 100.0,
        y: (screen.y - container.y - grab.y) / container.height * 100.0,
    })
}

/// Map a percent-space point into container-local pixels.
#[must_use]
pub fn percent_to_local(percent: Point, width: f64, height: f64) -> Point {
    Point::new(percent.x / 100.0 * width, percent.y / 100.0 * height)
}

/// Angle in degrees of the vector from `center` to `p`, in `(-180, 180]`.
#[must_use]
pub fn angle_deg(center: Point, p: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x).to_degrees()
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Normalize an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    ((deg % 360.0) + 360.0) % 360.0
}

/// Clamp `value` into `[lo, hi]`, returning `None` for non-finite input.
#[must_use]
pub fn clamp_finite(value: f64, lo: f64, hi: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(lo, hi))
}
