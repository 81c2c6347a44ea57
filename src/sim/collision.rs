//! Hit regions and link reach
//!
//! Balls are circles for hit-testing. Two balls can be linked when their
//! centers are strictly closer than the configured link distance.

use glam::Vec2;

use crate::within_distance;

/// Check if a point lies inside (or on the edge of) a ball
pub fn point_in_ball(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Check if two ball centers are close enough to link
pub fn can_link(from: Vec2, to: Vec2, link_distance: f32) -> bool {
    within_distance(from, to, link_distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_in_ball() {
        let center = Vec2::new(10.0, 10.0);
        assert!(point_in_ball(Vec2::new(10.0, 10.0), center, 5.0));
        assert!(point_in_ball(Vec2::new(15.0, 10.0), center, 5.0));
        assert!(!point_in_ball(Vec2::new(15.1, 10.0), center, 5.0));
        assert!(!point_in_ball(Vec2::new(14.0, 14.0), center, 5.0));
    }

    #[test]
    fn test_can_link_is_strict() {
        let a = Vec2::ZERO;
        assert!(can_link(a, Vec2::new(99.9, 0.0), 100.0));
        assert!(!can_link(a, Vec2::new(100.0, 0.0), 100.0));
        assert!(can_link(a, Vec2::new(60.0, 60.0), 100.0));
        assert!(!can_link(a, Vec2::new(80.0, 80.0), 100.0));
    }
}
