#![forbid(unsafe_code)]
//! citygen: Procedural road networks traced as streamlines of a tensor field.
//!
//! Modules:
//! - field: tensors, eigenfields and the basis fields superposed into a tensor field
//! - integrator: stepping along the major or minor eigenvector family
//! - storage: road and point storage with a masked quadtree for proximity queries
//! - generator: seeding, tracing, simplification and joining of roads
//!
//! For examples and docs, see README and docs.rs.
pub mod error;
pub mod field;
pub mod generator;
pub mod integrator;
pub mod storage;

/// Convenient re-exports for common types. Import with `use citygen::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::field::{BasisField, BasisKind, Eigenfield, EigenfieldMask, Tensor, TensorField};
    pub use crate::generator::params::{
        default_parameters, GeneratorParameters, ParameterTable, RoadType,
    };
    pub use crate::generator::{
        CategorySummary, GenerationSummary, RoadGenerator, DEFAULT_SEED, MIN_STREAMLINE_NODES,
    };
    pub use crate::integrator::{FieldIntegrator, ThreeTapIntegrator};
    pub use crate::storage::{Aabb, PointHandle, Road, RoadHandle, RoadStorage};
}
