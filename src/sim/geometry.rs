//! Axis-aligned bounding boxes
//!
//! Every collision in the runner is box-vs-box. Overlap is strict on both
//! axes: boxes that only share an edge do not collide.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (top-left corner + size, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec2,
    pub size: DVec2,
}

impl Aabb {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            min: DVec2::new(x, y),
            size: DVec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        self.min + self.size
    }

    /// Strict overlap test
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        intersects(self, other)
    }
}

/// Half-open overlap on both axes; zero-area contact is not a hit
#[inline]
pub fn intersects(a: &Aabb, b: &Aabb) -> bool {
    a.min.x < b.min.x + b.size.x
        && a.min.x + a.size.x > b.min.x
        && a.min.y < b.min.y + b.size.y
        && a.min.y + a.size.y > b.min.y
}
