//! Werner slab dune model with shadow zones and avalanching.
//!
//! Sand is a stack of unit slabs per cell. A randomly chosen slab is eroded,
//! hops downwind in fixed jumps until it is deposited (always in the lee of
//! upwind topography, otherwise with a surface-dependent probability), and the
//! angle of repose is restored after every removal and deposit.

mod config;
mod init;
mod repose;
mod shadow;
mod slope;
mod transport;

use thiserror::Error;

use crate::error::ConfigError;

pub use config::DuneConfig;
pub use init::seed_slabs;
pub use repose::{enforce_angle_of_repose, neighbor_slopes, relax_once, Avalanche, ReposeMode, ReposeStep};
pub use shadow::{in_shadow, max_upwind_slope};
pub use slope::{repose_angle_deg, slope_deg};
pub use transport::{transport_event, TransportOutcome};

/// Fatal conditions in the dune model. Any of these means the run must stop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DuneError {
    #[error("Slope sign violation at {cell:?} during {mode} stabilization: steepest slope {slope_deg:.2} deg")]
    SlopeSignViolation {
        cell: (usize, usize),
        mode: ReposeMode,
        slope_deg: f32,
    },
    #[error("Invalid dune configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Avalanche starting at {start:?} did not settle after {moves} slab moves")]
    AvalancheDidNotSettle { start: (usize, usize), moves: u32 },
}
