//! Nishimori–Ouchi ripple model.
//!
//! A continuous bed height evolves through two grid-wide passes per timestep:
//! saltation (a fixed grain quantum hops a height-dependent distance downwind)
//! followed by creep (an 8-neighbor smoothing stencil).

mod config;
mod diffusion;
mod init;
mod saltation;

pub use config::RippleConfig;
pub use diffusion::{diffuse, neighbor_sums};
pub use init::random_bed;
pub use saltation::{jump_length, saltate};
