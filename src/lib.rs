//! Cellular-automaton models of wind-blown sand.
//!
//! Two models share a periodic 2D height lattice with the wind blowing toward
//! increasing column index:
//!
//! - [`ripples`]: Nishimori-Ouchi ripples, a real-valued bed evolved by
//!   height-dependent saltation followed by 8-neighbor creep.
//! - [`dunes`]: Werner dunes, integer slab stacks evolved by random slab
//!   transport with wind shadows and angle-of-repose avalanching.
//!
//! The [`pipeline`] module drives either model for a fixed number of steps and
//! hands snapshots to a frame sink; [`export`] turns snapshots into images.

pub mod dunes;
pub mod error;
pub mod export;
pub mod lattice;
pub mod pipeline;
pub mod ripples;

pub use dunes::{DuneConfig, DuneError, ReposeMode, TransportOutcome};
pub use error::ConfigError;
pub use lattice::{Compass, HeightField};
pub use pipeline::{DuneModel, FrameSink, Pipeline, PipelineError, RippleModel, RunConfig, RunSummary, SurfaceModel};
pub use ripples::RippleConfig;
