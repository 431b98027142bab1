//! Road generation: seeding, tracing, simplification and insertion of streamlines.
//!
//! [`RoadGenerator`] runs one category at a time in [`RoadType`] order. Within a
//! category it alternates between the two eigenfields: every accepted streamline flips
//! the eigenfield of the next draw and offers its endpoints as seeds to the other one,
//! which is what produces the crossing street pattern.
use glam::{DVec2, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

pub mod join;
pub mod params;
pub mod seeding;
pub mod simplify;
pub mod streamline;

pub use params::{default_parameters, GeneratorParameters, ParameterTable, RoadType};
pub use seeding::SeedQueues;
pub use streamline::{IntegrationFront, IntegrationStatus, Streamline, StreamlineTracer};

use crate::error::{Error, Result};
use crate::field::{Eigenfield, TensorField};
use crate::integrator::FieldIntegrator;
use crate::storage::{Aabb, PointHandle, RoadHandle, RoadStorage};

/// Streamlines with fewer points are discarded.
pub const MIN_STREAMLINE_NODES: usize = 5;

/// Seed of the generator's random source unless [`RoadGenerator::with_seed`] is used.
pub const DEFAULT_SEED: u64 = 0x5EED_C17F;

/// Outcome of one category of a generation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategorySummary {
    pub accepted: usize,
    pub discarded: usize,
    pub closed_loops: usize,
    /// The category ended on the consecutive discard limit rather than on seed exhaustion.
    pub discard_limited: bool,
}

/// Outcome of [`RoadGenerator::generate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub categories: Vec<(RoadType, CategorySummary)>,
}

impl GenerationSummary {
    pub fn total_accepted(&self) -> usize {
        self.categories.iter().map(|(_, c)| c.accepted).sum()
    }

    pub fn total_discarded(&self) -> usize {
        self.categories.iter().map(|(_, c)| c.discarded).sum()
    }

    pub fn category(&self, road_type: RoadType) -> Option<&CategorySummary> {
        self.categories
            .iter()
            .find(|(t, _)| *t == road_type)
            .map(|(_, c)| c)
    }
}

/// Generates road networks for one field, parameter table and viewport.
pub struct RoadGenerator {
    integrator: Box<dyn FieldIntegrator>,
    road_types: Vec<RoadType>,
    params: ParameterTable,
    seeds: SeedQueues,
    rng: StdRng,
    viewport: Aabb,
    storage: RoadStorage,
}

impl std::fmt::Debug for RoadGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadGenerator")
            .field("road_types", &self.road_types)
            .field("viewport", &self.viewport)
            .field("points", &self.storage.point_count())
            .finish_non_exhaustive()
    }
}

impl RoadGenerator {
    /// Creates a generator. Parameters and viewport are only checked in debug builds; use
    /// [`RoadGenerator::try_new`] for input that is not known to be valid.
    pub fn new(integrator: Box<dyn FieldIntegrator>, mut params: ParameterTable, viewport: Aabb) -> Self {
        params.values_mut().for_each(GeneratorParameters::normalize);
        debug_assert!(viewport.is_valid(), "invalid viewport {viewport:?}");
        debug_assert!(
            params.iter().all(|(t, p)| p.validate(*t).is_ok()),
            "invalid generator parameters"
        );

        Self {
            integrator,
            road_types: params.keys().copied().collect(),
            params,
            seeds: SeedQueues::default(),
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
            viewport,
            storage: RoadStorage::new(viewport),
        }
    }

    /// Creates a generator after validating the viewport and every parameter set.
    pub fn try_new(
        integrator: Box<dyn FieldIntegrator>,
        mut params: ParameterTable,
        viewport: Aabb,
    ) -> Result<Self> {
        if !viewport.is_valid() {
            return Err(Error::InvalidViewport(format!(
                "viewport must be finite with min <= max, got {viewport:?}"
            )));
        }
        if params.is_empty() {
            return Err(Error::EmptyParameterTable);
        }
        for (road_type, p) in params.iter_mut() {
            p.normalize();
            p.validate(*road_type)?;
        }
        Ok(Self::new(integrator, params, viewport))
    }

    /// Replaces the random source with one seeded from `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn get_road_types(&self) -> &[RoadType] {
        &self.road_types
    }

    pub fn get_parameters(&self) -> &ParameterTable {
        &self.params
    }

    pub fn viewport(&self) -> Aabb {
        self.viewport
    }

    pub fn integrator(&self) -> &dyn FieldIntegrator {
        self.integrator.as_ref()
    }

    pub fn field(&self) -> &TensorField {
        self.integrator.field()
    }

    /// The field, for editing between generation passes.
    pub fn field_mut(&mut self) -> &mut TensorField {
        self.integrator.field_mut()
    }

    pub fn storage(&self) -> &RoadStorage {
        &self.storage
    }

    /// Clears all generated state and adopts `viewport`. The random source keeps its state.
    pub fn reset(&mut self, viewport: Aabb) {
        self.viewport = viewport;
        self.clear();
    }

    /// Clears roads and pending seeds, keeping the viewport.
    pub fn clear(&mut self) {
        self.seeds.clear();
        self.storage.reset(self.viewport);
    }

    /// Runs every category in order on a cleared storage.
    pub fn generate(&mut self) -> GenerationSummary {
        self.clear();

        let mut summary = GenerationSummary::default();
        for road_type in self.road_types.clone() {
            let category = self.generate_all_roads(road_type);
            info!(
                "{:?}: {} roads accepted ({} closed), {} discarded{}.",
                road_type,
                category.accepted,
                category.closed_loops,
                category.discarded,
                if category.discard_limited {
                    ", stopped on discard limit"
                } else {
                    ""
                },
            );
            summary.categories.push((road_type, category));
        }

        info!(
            "Generated {} roads with {} points.",
            summary.total_accepted(),
            self.storage.point_count()
        );
        summary
    }

    /// Next seed for `road_type` and `ef`: a queued candidate, else a random viewport point.
    ///
    /// A seed lies at least `d_sep` from every existing point of the same eigenfield.
    pub fn get_seed(&mut self, road_type: RoadType, ef: Eigenfield) -> Option<DVec2> {
        let params = &self.params[&road_type];

        while let Some(seed) = self.seeds.pop(ef) {
            if !self.storage.has_point_closer_than(seed, params.d_sep, ef) {
                return Some(seed);
            }
        }

        for _ in 0..params.max_seed_retries {
            let seed = seeding::random_point_in(&self.viewport, &mut self.rng);
            if !self.storage.has_point_closer_than(seed, params.d_sep, ef) {
                return Some(seed);
            }
        }

        None
    }

    /// Traces an unsimplified streamline of `ef` through `seed`.
    pub fn trace_streamline(&self, road_type: RoadType, seed: DVec2, ef: Eigenfield) -> Streamline {
        StreamlineTracer::new(self.integrator.as_ref(), &self.storage, &self.params[&road_type])
            .trace(seed, ef)
    }

    /// Stores a road and queues its endpoints as seeds for the other eigenfield.
    ///
    /// Closed loops (first point equal to the last) contribute no seeds.
    pub fn push_road(
        &mut self,
        points: &[DVec2],
        road_type: RoadType,
        ef: Eigenfield,
    ) -> Option<RoadHandle> {
        let (&first, &last) = (points.first()?, points.last()?);
        if first != last {
            self.seeds.push(first, ef.opposite());
            self.seeds.push(last, ef.opposite());
        }
        self.storage.insert(points, road_type, ef, false)
    }

    fn generate_all_roads(&mut self, road_type: RoadType) -> CategorySummary {
        let params = self.params[&road_type].clone();
        let mut summary = CategorySummary::default();
        let mut ef = Eigenfield::Major;
        let mut consecutive_discards = 0;

        while let Some(seed) = self.get_seed(road_type, ef) {
            let Streamline { mut points, closed } = self.trace_streamline(road_type, seed, ef);
            if points.len() >= MIN_STREAMLINE_NODES {
                simplify::simplify(&mut points, params.epsilon, params.node_sep2);
            }

            if points.len() < MIN_STREAMLINE_NODES {
                summary.discarded += 1;
                consecutive_discards += 1;
                if consecutive_discards >= params.max_seed_retries {
                    summary.discard_limited = true;
                    break;
                }
                continue;
            }

            debug!(
                "{:?}/{:?} road from {:?}: {} points{}.",
                road_type,
                ef,
                seed,
                points.len(),
                if closed { ", closed" } else { "" },
            );
            self.push_road(&points, road_type, ef);
            summary.accepted += 1;
            if closed {
                summary.closed_loops += 1;
            }
            consecutive_discards = 0;
            ef = ef.opposite();
        }

        summary
    }

    /// Best joining target for a road point, see [`join::joining_candidate`].
    pub fn joining_candidate(&self, point: PointHandle) -> Option<PointHandle> {
        join::joining_candidate(&self.storage, point, &self.params[&point.road.road_type])
    }

    /// Connects both ends of every `road_type`/`ef` road to a nearby road where possible.
    ///
    /// Returns the number of joining roads added. Joining roads are never extended.
    pub fn connect_roads(&mut self, road_type: RoadType, ef: Eigenfield) -> usize {
        let params = &self.params[&road_type];
        let handles: Vec<RoadHandle> = self
            .storage
            .road_handles(road_type, ef)
            .filter(|h| !self.storage.is_connective_road(*h))
            .collect();

        let mut joins = Vec::new();
        for road in handles {
            let range = *self.storage.road(road);
            let ends = [
                PointHandle { index: range.begin, road },
                PointHandle { index: range.end - 1, road },
            ];
            for end in ends {
                if let Some(target) = join::joining_candidate(&self.storage, end, params) {
                    joins.push(join::joining_streamline(
                        params.node_sep,
                        self.storage.position(end),
                        self.storage.position(target),
                    ));
                }
            }
        }

        let added = joins.len();
        for points in joins {
            self.storage.insert(&points, road_type, ef, true);
        }
        debug!("{:?}/{:?}: {} joining roads.", road_type, ef, added);
        added
    }

    /// Runs [`RoadGenerator::connect_roads`] for every category and eigenfield.
    pub fn connect_all(&mut self) -> usize {
        let mut added = 0;
        for road_type in self.road_types.clone() {
            for ef in Eigenfield::ALL {
                added += self.connect_roads(road_type, ef);
            }
        }
        info!("Added {} joining roads.", added);
        added
    }

    pub fn get_road_points(&self, handle: RoadHandle) -> &[Vec2] {
        self.storage.get_road_points(handle)
    }

    pub fn road_count(&self, road_type: RoadType, ef: Eigenfield) -> u32 {
        self.storage.road_count(road_type, ef)
    }

    pub fn is_connective_road(&self, handle: RoadHandle) -> bool {
        self.storage.is_connective_road(handle)
    }

    /// Handles of every stored road, in category then eigenfield then insertion order.
    pub fn road_handles(&self) -> impl Iterator<Item = RoadHandle> + '_ {
        self.road_types.iter().flat_map(move |&road_type| {
            Eigenfield::ALL
                .into_iter()
                .flat_map(move |ef| self.storage.road_handles(road_type, ef))
        })
    }
}
