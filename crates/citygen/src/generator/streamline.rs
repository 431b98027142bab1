//! Bidirectional streamline tracing.
//!
//! A streamline grows from a seed along two integration fronts, one following the
//! integrator's displacement and one following its negation. Each front moves through
//! [`IntegrationStatus`]: it keeps going while `Continue`, stops gracefully (keeping its
//! last point) on `Terminate`, and stops without a point on `Abort`.
use glam::DVec2;

use crate::field::Eigenfield;
use crate::generator::params::GeneratorParameters;
use crate::integrator::FieldIntegrator;
use crate::storage::RoadStorage;

/// Squared displacements below this are treated as a stalled (degenerate) field.
pub const MIN_STEP_LENGTH2: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegrationStatus {
    Continue,
    Terminate,
    Abort,
}

/// One end of a streamline being traced.
#[derive(Clone, Debug)]
pub struct IntegrationFront {
    pub status: IntegrationStatus,
    /// Displacement of the previous step, used to keep a consistent heading.
    pub delta: Option<DVec2>,
    pub position: DVec2,
    pub negate: bool,
    /// Points in the order the front produced them, starting with the seed.
    pub points: Vec<DVec2>,
}

impl IntegrationFront {
    pub fn new(seed: DVec2, negate: bool) -> Self {
        Self {
            status: IntegrationStatus::Continue,
            delta: None,
            position: seed,
            negate,
            points: vec![seed],
        }
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.status == IntegrationStatus::Abort
    }

    fn last(&self) -> DVec2 {
        self.points.last().copied().unwrap_or(self.position)
    }
}

/// Raw traced polyline, before simplification.
#[derive(Clone, Debug, PartialEq)]
pub struct Streamline {
    pub points: Vec<DVec2>,
    /// Both fronts met again; the last point repeats the first.
    pub closed: bool,
}

/// Traces streamlines of one road category against the current storage.
pub struct StreamlineTracer<'a> {
    pub integrator: &'a dyn FieldIntegrator,
    pub storage: &'a RoadStorage,
    pub params: &'a GeneratorParameters,
}

impl<'a> StreamlineTracer<'a> {
    pub fn new(
        integrator: &'a dyn FieldIntegrator,
        storage: &'a RoadStorage,
        params: &'a GeneratorParameters,
    ) -> Self {
        Self {
            integrator,
            storage,
            params,
        }
    }

    /// Advance `front` by one step along `ef`.
    pub fn extend(&self, front: &mut IntegrationFront, ef: Eigenfield) {
        if front.status != IntegrationStatus::Continue {
            front.status = IntegrationStatus::Abort;
            return;
        }

        let mut delta = self.integrator.integrate(front.position, ef, self.params.dl);
        if front.negate {
            delta = -delta;
        }
        if front.delta.is_some_and(|prev| prev.dot(delta) < 0.0) {
            delta = -delta;
        }

        if delta.length_squared() < MIN_STEP_LENGTH2 {
            front.status = IntegrationStatus::Abort;
            return;
        }

        front.position += delta;
        front.delta = Some(delta);
        if !self.storage.viewport().contains(front.position) {
            front.status = IntegrationStatus::Abort;
            return;
        }

        front.status = if self
            .storage
            .has_nearby_point(front.position, self.params.d_test, ef)
        {
            IntegrationStatus::Terminate
        } else {
            IntegrationStatus::Continue
        };
    }

    /// Trace a full streamline through `seed`.
    pub fn trace(&self, seed: DVec2, ef: Eigenfield) -> Streamline {
        let mut forward = IntegrationFront::new(seed, false);
        let mut backward = IntegrationFront::new(seed, true);

        let mut diverged = false;
        let mut closed = false;
        let mut count = 0;

        while count < self.params.max_integration_iterations {
            self.extend(&mut forward, ef);
            self.extend(&mut backward, ef);

            if forward.is_aborted() && backward.is_aborted() {
                break;
            }

            for front in [&mut forward, &mut backward] {
                if !front.is_aborted() {
                    front.points.push(front.position);
                    count += 1;
                }
            }

            let sep2 = forward.last().distance_squared(backward.last());
            if diverged && sep2 < self.params.d_circle2 {
                closed = true;
                break;
            } else if !diverged && sep2 > self.params.d_circle2 {
                diverged = true;
            }
        }

        // Backward points run away from the seed; drop the shared seed and reverse them.
        let mut points: Vec<DVec2> = backward.points.into_iter().skip(1).rev().collect();
        points.extend(forward.points);
        if closed {
            points.push(points[0]);
        }

        Streamline { points, closed }
    }
}
