//! Simulation driver shared by the ripple and dune models.
//!
//! A [`SurfaceModel`] owns its surface and advances it one nominal timestep at
//! a time. The [`Pipeline`] runs a model for a fixed number of steps, handing
//! snapshots to a [`FrameSink`] at a fixed interval.

mod model;
mod runner;
mod sink;

use thiserror::Error;

use crate::dunes::DuneError;
use crate::error::ConfigError;

pub use model::{DuneModel, DuneStepStats, RippleModel, SurfaceModel};
pub use runner::{Pipeline, RunConfig, RunSummary};
pub use sink::{FrameSink, MemorySink, NullSink, TeeSink};

/// Errors that can occur while driving a simulation.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Dune model error at step {step}: {source}")]
    Dune {
        step: u32,
        #[source]
        source: DuneError,
    },
    #[error("Frame sink failed at step {step}: {message}")]
    Sink { step: u32, message: String },
}

impl From<DuneError> for PipelineError {
    fn from(err: DuneError) -> Self {
        match err {
            DuneError::Config(e) => PipelineError::Config(e),
            other => PipelineError::Dune { step: 0, source: other },
        }
    }
}
