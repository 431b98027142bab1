//! Numerical integration along the principal directions of a tensor field.
use glam::DVec2;

use crate::field::{Eigenfield, TensorField};

/// Advances points along one eigenvector family of the field it owns.
pub trait FieldIntegrator: Send + Sync {
    fn field(&self) -> &TensorField;

    fn field_mut(&mut self) -> &mut TensorField;

    /// Displacement for a step of length parameter `dl` from `x` along `ef`.
    fn integrate(&self, x: DVec2, ef: Eigenfield, dl: f64) -> DVec2;

    /// The requested eigenvector of the sampled tensor at `x`, zero if degenerate.
    fn eigenvector(&self, x: DVec2, ef: Eigenfield) -> DVec2 {
        let t = self.field().sample(x);
        match ef {
            Eigenfield::Major => t.major_eigenvector(),
            Eigenfield::Minor => t.minor_eigenvector(),
        }
    }
}

/// Three-tap weighted integrator.
///
/// Taps the field at `x`, `x + (dl/2, dl/2)` and `x + (dl, dl)` and combines the
/// eigenvectors with weights 1, 4 and 1 over six. This is not classical RK4: there is no
/// fourth tap, and the spacing thresholds of the generator are tuned against this scheme.
#[derive(Clone, Debug, Default)]
pub struct ThreeTapIntegrator {
    field: TensorField,
}

impl ThreeTapIntegrator {
    pub fn new(field: TensorField) -> Self {
        Self { field }
    }

    pub fn into_field(self) -> TensorField {
        self.field
    }
}

impl FieldIntegrator for ThreeTapIntegrator {
    fn field(&self) -> &TensorField {
        &self.field
    }

    fn field_mut(&mut self) -> &mut TensorField {
        &mut self.field
    }

    fn integrate(&self, x: DVec2, ef: Eigenfield, dl: f64) -> DVec2 {
        let dx = DVec2::splat(dl);

        let k1 = self.eigenvector(x, ef);
        let k2 = self.eigenvector(x + dx / 2.0, ef);
        let k3 = self.eigenvector(x + dx, ef);

        (k1 + k2 * 4.0 + k3) / 6.0
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_6;

    use super::*;
    use crate::field::BasisField;

    #[test]
    fn degenerate_field_gives_zero_displacement() {
        let integrator = ThreeTapIntegrator::default();
        let d = integrator.integrate(DVec2::new(3.0, 4.0), Eigenfield::Major, 1.0);
        assert_eq!(d, DVec2::ZERO);
    }

    #[test]
    fn uniform_field_displacement_is_the_unit_eigenvector() {
        let field = TensorField::new().with_basis(BasisField::grid(FRAC_PI_6, DVec2::ZERO));
        let integrator = ThreeTapIntegrator::new(field);

        let major = integrator.integrate(DVec2::ZERO, Eigenfield::Major, 1.0);
        let minor = integrator.integrate(DVec2::ZERO, Eigenfield::Minor, 1.0);
        let expected = DVec2::new(FRAC_PI_6.cos(), FRAC_PI_6.sin());
        assert!((major - expected).length() < 1e-12);
        assert!(major.dot(minor).abs() < 1e-12);
    }

    #[test]
    fn taps_are_weighted_one_four_one() {
        // Two huge hard-edged grids whose boundary runs close to x = 0.75:
        // +x to the left of it, +y to the right.
        let field = TensorField::new()
            .with_basis(BasisField::grid_with_falloff(
                0.0,
                DVec2::new(-1.0e6 + 0.75, 0.0),
                1.0e6,
                0.0,
            ))
            .with_basis(BasisField::grid_with_falloff(
                std::f64::consts::FRAC_PI_2,
                DVec2::new(1.0e6 + 0.75, 0.0),
                1.0e6,
                0.0,
            ));
        let integrator = ThreeTapIntegrator::new(field);

        // (0, 0) and (0.5, 0.5) tap the first grid, (1, 1) taps the second.
        let d = integrator.integrate(DVec2::new(0.0, 0.0), Eigenfield::Major, 1.0);
        assert!((d - DVec2::new(5.0 / 6.0, 1.0 / 6.0)).length() < 1e-12);
    }

    #[test]
    fn field_mut_edits_are_visible_to_integration() {
        let mut integrator = ThreeTapIntegrator::default();
        integrator
            .field_mut()
            .add_basis(BasisField::grid(0.0, DVec2::ZERO));
        let d = integrator.integrate(DVec2::ZERO, Eigenfield::Major, 2.0);
        assert!((d - DVec2::X).length() < 1e-12);
        assert_eq!(integrator.into_field().len(), 1);
    }
}
