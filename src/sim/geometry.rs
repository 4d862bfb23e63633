//! Collision and visibility primitives for axis-aligned obstacles
//!
//! Pure functions, no owned state. Used by movement (circle vs rect),
//! projectile impact (point vs rect) and enemy line of sight (segment vs rect).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world space (x, y is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Closed-interval containment test
///
/// Projectiles are tested as points at their current position only, so a
/// fast shot can step over a thin obstacle between two ticks.
#[inline]
pub fn point_in_rect(rect: &Rect, p: Vec2) -> bool {
    p.x >= rect.x && p.x <= rect.right() && p.y >= rect.y && p.y <= rect.bottom()
}

/// Circle overlap via the nearest point of the rectangle to the circle center
#[inline]
pub fn circle_intersects_rect(rect: &Rect, center: Vec2, radius: f32) -> bool {
    let nearest = Vec2::new(
        center.x.clamp(rect.x, rect.right()),
        center.y.clamp(rect.y, rect.bottom()),
    );
    (center - nearest).length_squared() <= radius * radius
}

/// Segment vs rectangle by clipping the segment parameter t ∈ [0, 1]
/// against the four half-planes of the rectangle (Liang-Barsky).
pub fn segment_intersects_rect(a: Vec2, b: Vec2, rect: &Rect) -> bool {
    let d = b - a;
    let p = [-d.x, d.x, -d.y, d.y];
    let q = [
        a.x - rect.x,
        rect.right() - a.x,
        a.y - rect.y,
        rect.bottom() - a.y,
    ];

    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;

    for (pi, qi) in p.into_iter().zip(q) {
        if pi == 0.0 {
            // Parallel to this edge: reject if outside its half-plane
            if qi < 0.0 {
                return false;
            }
            continue;
        }
        let t = qi / pi;
        if pi < 0.0 {
            if t > t1 {
                return false;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return false;
            }
            t1 = t1.min(t);
        }
    }

    t0 <= t1
}

/// True when nothing in `rects` blocks the straight path from `a` to `b`
pub fn line_of_sight<'a, I>(a: Vec2, b: Vec2, rects: I) -> bool
where
    I: IntoIterator<Item = &'a Rect>,
{
    !rects.into_iter().any(|r| segment_intersects_rect(a, b, r))
}
