//! Axis-aligned collision primitives
//!
//! Cars and effects are plain rectangles in screen space (top-left origin,
//! y grows downward); overlap is the standard AABB test.

use glam::Vec2;

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict AABB overlap: rectangles that merely touch do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn test_overlapping_rects() {
        let a = Rect::new(vec2(0.0, 0.0), vec2(50.0, 80.0));
        let b = Rect::new(vec2(40.0, 70.0), vec2(50.0, 90.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_separated_rects() {
        let a = Rect::new(vec2(0.0, 0.0), vec2(50.0, 80.0));
        let b = Rect::new(vec2(200.0, 0.0), vec2(50.0, 90.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(vec2(0.0, 0.0), vec2(50.0, 80.0));
        let b = Rect::new(vec2(50.0, 0.0), vec2(50.0, 80.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_contained_rect() {
        let outer = Rect::new(vec2(0.0, 0.0), vec2(100.0, 100.0));
        let inner = Rect::new(vec2(25.0, 25.0), vec2(10.0, 10.0));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_center() {
        let r = Rect::new(vec2(10.0, 20.0), vec2(50.0, 80.0));
        assert_eq!(r.center(), vec2(35.0, 60.0));
    }
}
