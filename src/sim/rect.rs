//! Axis-aligned rectangle geometry
//!
//! World space is y-down: `y` is the top edge and grows toward the floor.
//! A rectangle with non-positive width carries no solid geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Whether this rectangle represents solid geometry at all
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Strict overlap test (touching edges do not overlap)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.is_solid()
            && other.is_solid()
            && self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Minimum translation that pushes `self` out of `other`
    ///
    /// Each axis picks the nearer edge; then the axis with the larger push is
    /// zeroed so only one axis moves. Returns zero when there is no overlap.
    pub fn mtv(&self, other: &Rect) -> Vec2 {
        if !self.overlaps(other) {
            return Vec2::ZERO;
        }

        let push_left = other.left() - self.right();
        let push_right = other.right() - self.left();
        let x = if push_right.abs() < push_left.abs() {
            push_right
        } else {
            push_left
        };

        let push_up = other.top() - self.bottom();
        let push_down = other.bottom() - self.top();
        let y = if push_down.abs() < push_up.abs() {
            push_down
        } else {
            push_up
        };

        if x.abs() > y.abs() {
            Vec2::new(0.0, y)
        } else {
            Vec2::new(x, 0.0)
        }
    }

    /// Does the segment `a -> b` touch this rectangle (Liang-Barsky clip)
    pub fn intersects_segment(&self, a: Vec2, b: Vec2) -> bool {
        if !self.is_solid() {
            return false;
        }

        let d = b - a;
        let mut t0 = 0.0_f32;
        let mut t1 = 1.0_f32;

        let checks = [
            (-d.x, a.x - self.left()),
            (d.x, self.right() - a.x),
            (-d.y, a.y - self.top()),
            (d.y, self.bottom() - a.y),
        ];

        for (p, q) in checks {
            if p == 0.0 {
                // Parallel to this edge pair
                if q < 0.0 {
                    return false;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return false;
            }
        }

        true
    }
}
