//! Symmetric traceless 2x2 tensors in double-angle form.
use std::f64::consts::TAU;
use std::ops::{Add, Mul};

use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A symmetric, traceless 2x2 matrix
///
/// ```text
/// r * | cos(2θ)  sin(2θ) |  =  | a  b |
///     | sin(2θ) -cos(2θ) |     | b -a |
/// ```
///
/// stored as the double-angle pair `(a, b)` together with the derived magnitude `r`
/// and half-angle `theta`. Because the angle is doubled, an eigenvector's sign is
/// ambiguous; consumers have to pick a consistent sign themselves.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tensor {
    pub a: f64,
    pub b: f64,
    pub r: f64,
    pub theta: f64,
}

impl Default for Tensor {
    fn default() -> Self {
        Self::degenerate()
    }
}

impl Tensor {
    /// The zero tensor. Both eigenvectors are undefined.
    pub fn degenerate() -> Self {
        Self::from_a_b(0.0, 0.0)
    }

    pub fn from_a_b(a: f64, b: f64) -> Self {
        let mut out = Self {
            a,
            b,
            r: 0.0,
            theta: 0.0,
        };
        out.set_r_theta();
        out
    }

    pub fn from_r_theta(r: f64, theta: f64) -> Self {
        Self {
            a: r * (2.0 * theta).cos(),
            b: r * (2.0 * theta).sin(),
            r,
            theta,
        }
    }

    /// Tensor whose major eigenvector is perpendicular to `xy`.
    pub fn from_xy(xy: DVec2) -> Self {
        let (x, y) = (xy.x, xy.y);
        Self::from_a_b(y * y - x * x, -2.0 * x * y)
    }

    /// Re-derive `r` and `theta` from the `(a, b)` pair.
    pub fn set_r_theta(&mut self) {
        self.r = self.a.hypot(self.b);
        self.theta = if self.is_degenerate() {
            0.0
        } else {
            (self.b / self.r).atan2(self.a / self.r) / 2.0
        };
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.r.abs() <= f64::EPSILON
    }

    pub fn major_eigenvector(&self) -> DVec2 {
        if self.is_degenerate() {
            return DVec2::ZERO;
        }
        DVec2::new(self.theta.cos(), self.theta.sin())
    }

    pub fn minor_eigenvector(&self) -> DVec2 {
        if self.is_degenerate() {
            return DVec2::ZERO;
        }
        DVec2::new(self.theta.sin(), -self.theta.cos())
    }

    /// Rotate both principal directions by `angle` radians, keeping the magnitude.
    pub fn rotate(&self, angle: f64) -> Self {
        Self::from_r_theta(self.r, (self.theta + angle) % TAU)
    }
}

impl Add for Tensor {
    type Output = Tensor;

    fn add(self, rhs: Tensor) -> Tensor {
        Tensor::from_a_b(self.a + rhs.a, self.b + rhs.b)
    }
}

impl Mul<f64> for Tensor {
    type Output = Tensor;

    fn mul(self, rhs: f64) -> Tensor {
        Tensor::from_a_b(rhs * self.a, rhs * self.b)
    }
}

impl Mul<Tensor> for f64 {
    type Output = Tensor;

    fn mul(self, rhs: Tensor) -> Tensor {
        rhs * self
    }
}
