//! Basis fields: local influences that are superposed into a [`crate::field::TensorField`].
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::field::tensor::Tensor;

/// Kind-specific part of a basis field.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BasisKind {
    /// Constant direction `theta` (radians) everywhere inside the falloff region.
    Grid { theta: f64 },
    /// Directions circulating around (major) and radiating from (minor) the centre.
    Radial,
}

/// A single local influence on the tensor field.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasisField {
    pub kind: BasisKind,
    /// Centre of the influence in world units.
    pub centre: DVec2,
    /// Radius of influence. `0` means the influence is unbounded.
    pub size: f64,
    /// Falloff exponent applied to `1 - d/size`.
    pub decay: f64,
}

impl BasisField {
    /// Unbounded grid influence.
    pub fn grid(theta: f64, centre: impl Into<DVec2>) -> Self {
        Self::grid_with_falloff(theta, centre, 0.0, 0.0)
    }

    pub fn grid_with_falloff(theta: f64, centre: impl Into<DVec2>, size: f64, decay: f64) -> Self {
        Self {
            kind: BasisKind::Grid { theta },
            centre: centre.into(),
            size,
            decay,
        }
    }

    /// Unbounded radial influence.
    pub fn radial(centre: impl Into<DVec2>) -> Self {
        Self::radial_with_falloff(centre, 0.0, 0.0)
    }

    pub fn radial_with_falloff(centre: impl Into<DVec2>, size: f64, decay: f64) -> Self {
        Self {
            kind: BasisKind::Radial,
            centre: centre.into(),
            size,
            decay,
        }
    }

    pub fn is_grid(&self) -> bool {
        matches!(self.kind, BasisKind::Grid { .. })
    }

    pub fn is_radial(&self) -> bool {
        matches!(self.kind, BasisKind::Radial)
    }

    /// Grid angle, `None` for radial influences.
    pub fn theta(&self) -> Option<f64> {
        match self.kind {
            BasisKind::Grid { theta } => Some(theta),
            BasisKind::Radial => None,
        }
    }

    /// Set the grid angle. Returns `false` (and does nothing) for radial influences.
    pub fn set_theta(&mut self, new_theta: f64) -> bool {
        match &mut self.kind {
            BasisKind::Grid { theta } => {
                *theta = new_theta;
                true
            }
            BasisKind::Radial => false,
        }
    }

    /// Unweighted tensor of this influence at `pos`.
    pub fn tensor_at(&self, pos: DVec2) -> Tensor {
        match self.kind {
            BasisKind::Grid { theta } => Tensor::from_r_theta(1.0, theta),
            BasisKind::Radial => Tensor::from_xy(pos - self.centre),
        }
    }

    /// Falloff weight at `pos`, in `[0, 1]`.
    pub fn weight_at(&self, pos: DVec2) -> f64 {
        if self.size == 0.0 {
            return 1.0;
        }

        let t = pos.distance(self.centre) / self.size;
        if self.decay == 0.0 && t >= 1.0 {
            return 0.0;
        }

        let w = (1.0 - t).max(0.0).powf(self.decay);
        if w.abs() < f64::EPSILON {
            return 0.0;
        }
        w
    }

    pub fn weighted_tensor_at(&self, pos: DVec2) -> Tensor {
        self.tensor_at(pos) * self.weight_at(pos)
    }
}
