//! Road categories and the per-category generation parameters.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Road category. The derived ordering is the order in which categories are generated.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoadType {
    Main,
    HighStreet,
    SideStreet,
}

impl RoadType {
    pub const COUNT: usize = 3;
    pub const ALL: [RoadType; RoadType::COUNT] =
        [RoadType::Main, RoadType::HighStreet, RoadType::SideStreet];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Parameters of one road category.
///
/// Distances are in world units, `theta_max` in radians. Squared distances are cached
/// alongside; use the setters (or [`GeneratorParameters::new`]) to keep them in sync.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawParameters", into = "RawParameters"))]
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorParameters {
    /// Random seed attempts once the seed queue is exhausted.
    pub max_seed_retries: u32,
    /// Combined step budget of both integration fronts of a streamline.
    pub max_integration_iterations: u32,
    /// Minimum distance of a new seed to existing points of its eigenfield.
    pub d_sep: f64,
    pub d_sep2: f64,
    /// Distance to an existing point of the same eigenfield that ends a front.
    pub d_test: f64,
    pub d_test2: f64,
    /// Loop closure distance.
    pub d_circle: f64,
    pub d_circle2: f64,
    /// Integration step length.
    pub dl: f64,
    pub dl2: f64,
    /// Search radius of the joining pass.
    pub d_lookahead: f64,
    /// Maximum angle between a road's end tangent and a joining segment.
    pub theta_max: f64,
    /// Douglas-Peucker tolerance.
    pub epsilon: f64,
    /// Minimum spacing of points kept after simplification.
    pub node_sep: f64,
    pub node_sep2: f64,
}

impl GeneratorParameters {
    /// Build a parameter set. `d_test` is clamped to at most `d_sep`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        max_seed_retries: u32,
        max_integration_iterations: u32,
        d_sep: f64,
        d_test: f64,
        d_circle: f64,
        dl: f64,
        d_lookahead: f64,
        theta_max: f64,
        epsilon: f64,
        node_sep: f64,
    ) -> Self {
        let d_test = d_test.min(d_sep);
        Self {
            max_seed_retries,
            max_integration_iterations,
            d_sep,
            d_sep2: d_sep * d_sep,
            d_test,
            d_test2: d_test * d_test,
            d_circle,
            d_circle2: d_circle * d_circle,
            dl,
            dl2: dl * dl,
            d_lookahead,
            theta_max,
            epsilon,
            node_sep,
            node_sep2: node_sep * node_sep,
        }
    }

    pub fn with_d_sep(mut self, d_sep: f64) -> Self {
        self.d_sep = d_sep;
        self.d_sep2 = d_sep * d_sep;
        let d_test = self.d_test;
        self.with_d_test(d_test)
    }

    pub fn with_d_test(mut self, d_test: f64) -> Self {
        self.d_test = d_test.min(self.d_sep);
        self.d_test2 = self.d_test * self.d_test;
        self
    }

    pub fn with_d_circle(mut self, d_circle: f64) -> Self {
        self.d_circle = d_circle;
        self.d_circle2 = d_circle * d_circle;
        self
    }

    pub fn with_dl(mut self, dl: f64) -> Self {
        self.dl = dl;
        self.dl2 = dl * dl;
        self
    }

    pub fn with_node_sep(mut self, node_sep: f64) -> Self {
        self.node_sep = node_sep;
        self.node_sep2 = node_sep * node_sep;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_max_seed_retries(mut self, max_seed_retries: u32) -> Self {
        self.max_seed_retries = max_seed_retries;
        self
    }

    pub fn with_max_integration_iterations(mut self, max_integration_iterations: u32) -> Self {
        self.max_integration_iterations = max_integration_iterations;
        self
    }

    pub fn with_joining(mut self, d_lookahead: f64, theta_max: f64) -> Self {
        self.d_lookahead = d_lookahead;
        self.theta_max = theta_max;
        self
    }

    /// Clamps `d_test` to `d_sep` and recomputes every cached square from its distance.
    ///
    /// Needed after assigning distance fields directly instead of through the setters.
    pub fn normalize(&mut self) {
        self.d_test = self.d_test.min(self.d_sep);
        self.d_sep2 = self.d_sep * self.d_sep;
        self.d_test2 = self.d_test * self.d_test;
        self.d_circle2 = self.d_circle * self.d_circle;
        self.dl2 = self.dl * self.dl;
        self.node_sep2 = self.node_sep * self.node_sep;
    }

    /// Validates the parameters, returning an error naming the first offending field.
    pub fn validate(&self, road_type: RoadType) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidParameters {
            road_type,
            reason: reason.to_owned(),
        };

        if self.max_seed_retries == 0 {
            return Err(invalid("max_seed_retries must be > 0"));
        }
        if self.max_integration_iterations == 0 {
            return Err(invalid("max_integration_iterations must be > 0"));
        }

        let distances = [
            ("d_sep", self.d_sep),
            ("d_test", self.d_test),
            ("d_circle", self.d_circle),
            ("dl", self.dl),
            ("d_lookahead", self.d_lookahead),
            ("theta_max", self.theta_max),
            ("epsilon", self.epsilon),
            ("node_sep", self.node_sep),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(&format!("{name} must be finite and > 0, got {value}")));
            }
        }
        Ok(())
    }
}

/// Parameter set per road category, iterated in generation order.
pub type ParameterTable = BTreeMap<RoadType, GeneratorParameters>;

/// Tuned parameters for a viewport of roughly 1920x1080 world units.
pub fn default_parameters() -> ParameterTable {
    BTreeMap::from([
        (
            RoadType::Main,
            GeneratorParameters::new(300, 1900, 400.0, 200.0, 10.0, 1.0, 500.0, 0.1, 0.5, 10.0),
        ),
        (
            RoadType::HighStreet,
            GeneratorParameters::new(300, 3020, 100.0, 30.0, 8.0, 1.0, 200.0, 0.1, 0.5, 10.0),
        ),
        (
            RoadType::SideStreet,
            GeneratorParameters::new(300, 1970, 20.0, 15.0, 5.0, 1.0, 40.0, 0.1, 0.5, 10.0),
        ),
    ])
}

/// Serialized form without the cached squares.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawParameters {
    max_seed_retries: u32,
    max_integration_iterations: u32,
    d_sep: f64,
    d_test: f64,
    d_circle: f64,
    dl: f64,
    d_lookahead: f64,
    theta_max: f64,
    epsilon: f64,
    node_sep: f64,
}

#[cfg(feature = "serde")]
impl From<RawParameters> for GeneratorParameters {
    fn from(raw: RawParameters) -> Self {
        GeneratorParameters::new(
            raw.max_seed_retries,
            raw.max_integration_iterations,
            raw.d_sep,
            raw.d_test,
            raw.d_circle,
            raw.dl,
            raw.d_lookahead,
            raw.theta_max,
            raw.epsilon,
            raw.node_sep,
        )
    }
}

#[cfg(feature = "serde")]
impl From<GeneratorParameters> for RawParameters {
    fn from(p: GeneratorParameters) -> Self {
        RawParameters {
            max_seed_retries: p.max_seed_retries,
            max_integration_iterations: p.max_integration_iterations,
            d_sep: p.d_sep,
            d_test: p.d_test,
            d_circle: p.d_circle,
            dl: p.dl,
            d_lookahead: p.d_lookahead,
            theta_max: p.theta_max,
            epsilon: p.epsilon,
            node_sep: p.node_sep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn d_test_is_clamped_to_d_sep() {
        let p = GeneratorParameters::new(10, 100, 20.0, 50.0, 5.0, 1.0, 40.0, 0.1, 0.5, 10.0);
        assert_eq!(p.d_test, 20.0);
        assert_eq!(p.d_test2, 400.0);

        let p = p.with_d_sep(8.0);
        assert_eq!(p.d_test, 8.0);
        assert_eq!(p.d_sep2, 64.0);
    }

    #[test]
    fn with_d_sep_keeps_a_smaller_d_test() {
        let p = default_parameters()[&RoadType::SideStreet].clone().with_d_sep(100.0);
        assert_eq!((p.d_sep, p.d_test), (100.0, 15.0));
        assert_eq!(p.d_sep2, 10_000.0);
    }

    #[test]
    fn normalize_refreshes_directly_assigned_fields() {
        let mut p = default_parameters()[&RoadType::Main].clone();
        p.node_sep = 1.0;
        p.d_circle = 3.0;
        p.dl = 0.5;
        p.d_sep = 50.0;
        p.normalize();

        assert_eq!(p.node_sep2, 1.0);
        assert_eq!(p.d_circle2, 9.0);
        assert_eq!(p.dl2, 0.25);
        assert_eq!((p.d_test, p.d_test2, p.d_sep2), (50.0, 2500.0, 2500.0));
    }

    #[test]
    fn validate_accepts_d_test_above_d_sep() {
        let mut p = default_parameters()[&RoadType::Main].clone();
        p.d_test = 1000.0;
        assert!(p.validate(RoadType::Main).is_ok());
    }

    #[test]
    fn squares_follow_setters() {
        let p = default_parameters()[&RoadType::Main]
            .clone()
            .with_dl(2.0)
            .with_node_sep(3.0)
            .with_d_circle(4.0);
        assert_eq!((p.dl2, p.node_sep2, p.d_circle2), (4.0, 9.0, 16.0));
    }

    #[test]
    fn defaults_are_valid_and_ordered() {
        let table = default_parameters();
        let order: Vec<_> = table.keys().copied().collect();
        assert_eq!(order, RoadType::ALL.to_vec());
        for (road_type, params) in &table {
            params.validate(*road_type).expect("default parameters validate");
        }
    }

    #[test]
    fn validate_rejects_non_positive_epsilon() {
        let p = default_parameters()[&RoadType::SideStreet]
            .clone()
            .with_epsilon(0.0);
        let err = p.validate(RoadType::SideStreet).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameters { road_type: RoadType::SideStreet, ref reason } if reason.contains("epsilon")
        ));
    }

    #[test]
    fn validate_rejects_zero_budgets_and_nan() {
        let base = default_parameters()[&RoadType::Main].clone();
        assert!(base.clone().with_max_seed_retries(0).validate(RoadType::Main).is_err());
        assert!(base
            .clone()
            .with_max_integration_iterations(0)
            .validate(RoadType::Main)
            .is_err());
        assert!(base.with_dl(f64::NAN).validate(RoadType::Main).is_err());
    }
}
