//! Actor-vs-actor overlap
//!
//! Static geometry is handled by `Level::touches`; this module only answers
//! whether two movable boxes intersect.

use serde::{Deserialize, Serialize};

use crate::Vector;

/// Axis-aligned box in grid units (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub pos: Vector,
    pub size: Vector,
}

impl Bounds {
    pub const fn new(pos: Vector, size: Vector) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn max(&self) -> Vector {
        self.pos + self.size
    }

    /// Open-interval intersection on both axes: boxes that only share an
    /// edge do not overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        a_max.x > other.pos.x
            && self.pos.x < b_max.x
            && a_max.y > other.pos.y
            && self.pos.y < b_max.y
    }
}
