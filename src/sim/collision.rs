//! Rectangle vs. circle overlap
//!
//! One primitive serves both the live catch check and placement validation,
//! so the two can never disagree about what "overlapping" means.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Square of side `size` centered on `center`
    pub fn square(center: Vec2, size: f32) -> Self {
        let half = Vec2::splat(size / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Closest point on or inside the rectangle
    #[inline]
    pub fn nearest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Check whether a rectangle and a circle overlap
///
/// The circle center is clamped onto the rectangle to find the nearest point;
/// the shapes overlap when that point lies strictly inside the circle. A circle
/// that only touches the edge (distance == radius) does not count.
pub fn rect_intersects_circle(rect: &Rect, circle: &Circle) -> bool {
    let nearest = rect.nearest_point(circle.center);
    nearest.distance_squared(circle.center) < circle.radius * circle.radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_rect() -> Rect {
        Rect {
            min: Vec2::ZERO,
            max: Vec2::new(10.0, 10.0),
        }
    }

    #[test]
    fn test_zero_radius_at_corner_misses() {
        let circle = Circle::new(Vec2::new(10.0, 10.0), 0.0);
        assert!(!rect_intersects_circle(&unit_rect(), &circle));
    }

    #[test]
    fn test_enclosing_circle_hits() {
        let circle = Circle::new(Vec2::new(5.0, 5.0), 100.0);
        assert!(rect_intersects_circle(&unit_rect(), &circle));
    }

    #[test]
    fn test_center_inside_rect_hits() {
        let circle = Circle::new(Vec2::new(3.0, 7.0), 0.5);
        assert!(rect_intersects_circle(&unit_rect(), &circle));
    }

    #[test]
    fn test_touching_edge_misses() {
        // Nearest point (10, 5) sits exactly one radius away
        let circle = Circle::new(Vec2::new(15.0, 5.0), 5.0);
        assert!(!rect_intersects_circle(&unit_rect(), &circle));

        let circle = Circle::new(Vec2::new(14.9, 5.0), 5.0);
        assert!(rect_intersects_circle(&unit_rect(), &circle));
    }

    #[test]
    fn test_diagonal_near_corner() {
        // 3-4-5 triangle off the top-right corner
        let touching = Circle::new(Vec2::new(13.0, 14.0), 5.0);
        assert!(!rect_intersects_circle(&unit_rect(), &touching));

        let overlapping = Circle::new(Vec2::new(13.0, 14.0), 5.01);
        assert!(rect_intersects_circle(&unit_rect(), &overlapping));
    }

    #[test]
    fn test_square_construction() {
        let rect = Rect::square(Vec2::new(150.0, 0.0), 70.0);
        assert_eq!(rect.min, Vec2::new(115.0, -35.0));
        assert_eq!(rect.max, Vec2::new(185.0, 35.0));
        assert_eq!(rect.center(), Vec2::new(150.0, 0.0));
    }
}
