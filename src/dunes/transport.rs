//! Single-slab erosion, saltation and deposition.

use rand::Rng;
use tracing::warn;

use super::repose::{enforce_angle_of_repose, ReposeMode};
use super::shadow::in_shadow;
use super::{DuneConfig, DuneError};
use crate::lattice::HeightField;

/// What happened during one transport attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportOutcome {
    /// The picked cell was bare substrate; nothing moved.
    EmptyCell { cell: (usize, usize) },
    /// The picked cell was sheltered from the wind; nothing moved.
    Shadowed { cell: (usize, usize) },
    /// A slab left `from` and came to rest at `to` after `hops` saltation jumps.
    Moved {
        from: (usize, usize),
        to: (usize, usize),
        hops: u32,
        /// Slab moves performed by the two avalanches (erosion and deposit sites).
        avalanche_moves: u32,
    },
}

/// Runs one transport event: pick a cell, erode a slab, hop it downwind until
/// it is deposited, and restore the angle of repose at both ends.
///
/// Each event accounts for `1 / (nx * ny)` of a nominal timestep.
pub fn transport_event<R: Rng + ?Sized>(
    field: &mut HeightField<u32>,
    config: &DuneConfig,
    rng: &mut R,
) -> Result<TransportOutcome, DuneError> {
    let nx = field.nx();
    let origin = (rng.random_range(0..field.ny()), rng.random_range(0..nx));

    if field[origin] == 0 {
        return Ok(TransportOutcome::EmptyCell { cell: origin });
    }
    if in_shadow(field, origin, config) {
        return Ok(TransportOutcome::Shadowed { cell: origin });
    }

    field[origin] -= 1;
    let eroded = enforce_angle_of_repose(field, origin, ReposeMode::Remove, config, rng)?;

    // The slab leaves from where it was picked, not from where the hole settled.
    let (i, mut j) = origin;
    let mut hops = 0u32;
    loop {
        j = (j + config.jump_length) % nx;
        hops += 1;

        let site = (i, j);
        let deposit = if in_shadow(field, site, config) {
            true
        } else if field[site] > 0 {
            rng.random::<f32>() < config.p_sand
        } else {
            rng.random::<f32>() < config.p_nosand
        };

        if deposit {
            break;
        }
        if hops >= config.max_hops {
            warn!(
                "Slab from {:?} still airborne after {} hops; dropping it at {:?}",
                origin, hops, site
            );
            break;
        }
    }

    let site = (i, j);
    field[site] += 1;
    let deposited = enforce_angle_of_repose(field, site, ReposeMode::Add, config, rng)?;

    Ok(TransportOutcome::Moved {
        from: origin,
        to: site,
        hops,
        avalanche_moves: eroded.moves + deposited.moves,
    })
}
