//! Tensor field authoring and sampling.
//!
//! A [`TensorField`] is an ordered list of [`BasisField`] influences. Sampling sums the
//! weighted tensor of every influence at a position. The field is linear in its
//! influences: sampling the union of two influence sets equals the componentwise sum of
//! sampling each set on its own.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod basis;
pub mod eigen;
pub mod tensor;

pub use basis::{BasisField, BasisKind};
pub use eigen::{Eigenfield, EigenfieldMask};
pub use tensor::Tensor;

/// Superposition of basis fields.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct TensorField {
    basis_fields: Vec<BasisField>,
}

impl TensorField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a basis field and return the field (builder style).
    pub fn with_basis(mut self, basis: BasisField) -> Self {
        self.add_basis(basis);
        self
    }

    /// Append a basis field, returning its index.
    pub fn add_basis(&mut self, basis: BasisField) -> usize {
        self.basis_fields.push(basis);
        self.basis_fields.len() - 1
    }

    /// Remove the basis field at `idx`. Panics if `idx` is out of range.
    pub fn remove(&mut self, idx: usize) -> BasisField {
        self.basis_fields.remove(idx)
    }

    pub fn clear(&mut self) {
        self.basis_fields.clear();
    }

    pub fn len(&self) -> usize {
        self.basis_fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basis_fields.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&BasisField> {
        self.basis_fields.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut BasisField> {
        self.basis_fields.get_mut(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BasisField> {
        self.basis_fields.iter()
    }

    pub fn centre(&self, idx: usize) -> DVec2 {
        self.basis_fields[idx].centre
    }

    pub fn size(&self, idx: usize) -> f64 {
        self.basis_fields[idx].size
    }

    pub fn decay(&self, idx: usize) -> f64 {
        self.basis_fields[idx].decay
    }

    pub fn set_centre(&mut self, idx: usize, centre: impl Into<DVec2>) {
        self.basis_fields[idx].centre = centre.into();
    }

    pub fn set_size(&mut self, idx: usize, size: f64) {
        self.basis_fields[idx].size = size;
    }

    pub fn set_decay(&mut self, idx: usize, decay: f64) {
        self.basis_fields[idx].decay = decay;
    }

    /// Sample the field at `pos`.
    pub fn sample(&self, pos: impl Into<DVec2>) -> Tensor {
        let pos = pos.into();
        let mut total = self
            .basis_fields
            .iter()
            .fold(Tensor::degenerate(), |acc, basis| {
                acc + basis.weighted_tensor_at(pos)
            });
        total.set_r_theta();
        total
    }
}

impl FromIterator<BasisField> for TensorField {
    fn from_iter<T: IntoIterator<Item = BasisField>>(iter: T) -> Self {
        Self {
            basis_fields: iter.into_iter().collect(),
        }
    }
}
