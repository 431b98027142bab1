//! Axis-aligned bounding boxes with inclusive bounds.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned box `[min, max]`, inclusive on both ends.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn new(min: impl Into<DVec2>, max: impl Into<DVec2>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Box of the given extent centred on `centre`.
    pub fn from_centre_extent(centre: DVec2, extent: DVec2) -> Self {
        let half = extent / 2.0;
        Self::new(centre - half, centre + half)
    }

    /// Square box circumscribing the circle `(centre, radius)`.
    pub fn around(centre: DVec2, radius: f64) -> Self {
        Self::new(centre - DVec2::splat(radius), centre + DVec2::splat(radius))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn centre(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }

    /// A box with `min > max` on either axis contains nothing.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Both extents strictly positive and finite.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.width() > 0.0 && self.height() > 0.0
    }

    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// `other` lies entirely inside `self`.
    #[inline]
    pub fn contains_box(&self, other: &Aabb) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// The four quadrants split at the centre, indexed by
    /// `(x > mid.x) as usize + 2 * (y > mid.y) as usize`.
    pub fn quadrants(&self) -> [Aabb; 4] {
        let mid = self.centre();
        [
            Aabb::new(self.min, mid),
            Aabb::new(DVec2::new(mid.x, self.min.y), DVec2::new(self.max.x, mid.y)),
            Aabb::new(DVec2::new(self.min.x, mid.y), DVec2::new(mid.x, self.max.y)),
            Aabb::new(mid, self.max),
        ]
    }

    /// Index into [`Aabb::quadrants`] of the quadrant holding `p`.
    #[inline]
    pub fn quadrant_of(&self, p: DVec2) -> usize {
        let mid = self.centre();
        (p.x > mid.x) as usize + 2 * (p.y > mid.y) as usize
    }
}
