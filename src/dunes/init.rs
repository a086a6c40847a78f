//! Initial slab placement.

use rand::Rng;
use tracing::debug;

use super::repose::{enforce_angle_of_repose, ReposeMode};
use super::{DuneConfig, DuneError};
use crate::lattice::HeightField;

/// Builds the starting surface: `mean_slab_height * nx * ny` slabs dropped one
/// at a time on uniformly random cells, each followed by an avalanche so the
/// returned surface already respects the angle of repose.
pub fn seed_slabs<R: Rng + ?Sized>(config: &DuneConfig, rng: &mut R) -> Result<HeightField<u32>, DuneError> {
    config.validate()?;
    let mut field: HeightField<u32> = HeightField::new(config.nx, config.ny)?;

    let mut avalanche_moves = 0u64;
    for _ in 0..config.initial_slabs() {
        let cell = (rng.random_range(0..config.ny), rng.random_range(0..config.nx));
        field[cell] += 1;
        avalanche_moves += enforce_angle_of_repose(&mut field, cell, ReposeMode::Add, config, rng)?.moves as u64;
    }

    debug!(
        "Seeded {} slabs on {}x{} ({} avalanche moves)",
        config.initial_slabs(),
        config.nx,
        config.ny,
        avalanche_moves
    );
    Ok(field)
}
