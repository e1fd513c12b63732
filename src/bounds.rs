//! Axis-aligned bounds over module positions.
//!
//! Plain vector arithmetic (add, subtract, scale) uses the [`glam::Vec3`] operators.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Below this length a direction is treated as undefined.
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// The axis-aligned box enclosing a point cloud.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Per-axis minimum corner.
    pub min: Vec3,
    /// Per-axis maximum corner.
    pub max: Vec3,
    /// Euclidean length of the box diagonal.
    pub diagonal: f32,
}

impl Bounds {
    /// Returns `None` for an empty input.
    pub fn from_positions<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut positions = positions.into_iter();
        let first = positions.next()?;
        let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self {
            min,
            max,
            diagonal: (max - min).length(),
        })
    }

    /// Inclusive on every axis.
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Per-axis clamp of `p` into the box.
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        p.max(self.min).min(self.max)
    }
}

/// Unit vector along `v`, or straight up when `v` is (nearly) zero.
pub fn normalize_or_up(v: Vec3) -> Vec3 {
    let len = v.length();
    if len < DIRECTION_EPSILON {
        return Vec3::Y;
    }
    v / len
}
