//! Planar geometry primitives shared by the validity engine, view transform
//! and drag controller.
//!
//! Rectangles are axis-aligned and described by their minimum corner plus
//! size, matching how items store `(x, y, width, height)`.

use serde::{Deserialize, Serialize};

/// A 2D point or displacement. Which space it lives in (room, rotated room,
/// screen) is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// True when both components match within `tolerance`, scaled by the
    /// larger magnitude once values exceed 1.
    pub fn approx_eq(&self, other: Vec2, tolerance: f64) -> bool {
        approx_eq(self.x, other.x, tolerance) && approx_eq(self.y, other.y, tolerance)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A point in 3D: grid X, grid Y, elevation above the floor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Axis-aligned rectangle in room space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }
    pub fn min_y(&self) -> f64 {
        self.y
    }
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Same size, new minimum corner.
    pub fn with_origin(&self, origin: Vec2) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    /// Strict overlap on both axes. Rectangles that only share an edge or a
    /// corner do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x()
            && self.max_x() > other.min_x()
            && self.min_y() < other.max_y()
            && self.max_y() > other.min_y()
    }

    /// True when the rectangle lies inside `[0, width] × [0, height]`.
    /// Touching the walls is inside.
    pub fn within(&self, width: f64, height: f64) -> bool {
        self.min_x() >= 0.0 && self.min_y() >= 0.0 && self.max_x() <= width && self.max_y() <= height
    }
}

/// Relative comparison with an absolute floor of `tolerance` near zero.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= tolerance * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_interior() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        let corner = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
        assert!(!a.overlaps(&corner));
    }

    #[test]
    fn test_within_room() {
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).within(100.0, 100.0));
        assert!(Rect::new(90.0, 90.0, 10.0, 10.0).within(100.0, 100.0));
        assert!(!Rect::new(-1.0, 0.0, 10.0, 10.0).within(100.0, 100.0));
        assert!(!Rect::new(95.0, 0.0, 10.0, 10.0).within(100.0, 100.0));
    }

    #[test]
    fn test_approx_eq_is_relative() {
        assert!(approx_eq(1_000_000.0, 1_000_000.5, 1e-6));
        assert!(!approx_eq(1.0, 1.01, 1e-6));
        assert!(approx_eq(0.0, 1e-7, 1e-6));
    }
}
