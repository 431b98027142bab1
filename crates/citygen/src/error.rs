//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Only configuration problems surface as errors. Missing seeds, missing joining
//! candidates and aborted integration fronts are ordinary `Option`/status values.
use thiserror::Error;

use crate::generator::params::RoadType;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameters for {road_type:?}: {reason}")]
    InvalidParameters { road_type: RoadType, reason: String },

    #[error("invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("parameter table is empty")]
    EmptyParameterTable,
}
