//! Angle-of-repose stabilization.
//!
//! After a single slab is added to or removed from a cell, the steepest of its
//! eight neighbor slopes is compared against the repose angle. If it is too
//! steep one slab slides (downhill after an add, into the hole after a
//! remove) and the check moves with the disturbance until it settles.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use super::slope::{repose_angle_deg, slope_deg};
use super::{DuneConfig, DuneError};
use crate::error::ConfigError;
use crate::lattice::{Compass, HeightField};

/// Which single-slab change the stabilizer is reacting to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReposeMode {
    /// A slab was deposited; excess slides off to the steepest lower neighbor.
    Add,
    /// A slab was eroded; the steepest higher neighbor sheds a slab into the hole.
    Remove,
}

impl fmt::Display for ReposeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReposeMode::Add => f.write_str("add"),
            ReposeMode::Remove => f.write_str("remove"),
        }
    }
}

impl FromStr for ReposeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(ReposeMode::Add),
            "remove" => Ok(ReposeMode::Remove),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// Result of a single stabilization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReposeStep {
    /// Cell to check next (the slab's new location), or the checked cell if stable.
    pub cell: (usize, usize),
    /// True if no slab had to move.
    pub stable: bool,
}

/// A completed avalanche.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Avalanche {
    /// Where the disturbance came to rest.
    pub cell: (usize, usize),
    /// Number of single-slab moves performed.
    pub moves: u32,
}

/// Slopes (degrees) from `cell` to each of its eight neighbors, one cell apart.
///
/// Positive means the neighbor is lower.
pub fn neighbor_slopes(
    field: &HeightField<u32>,
    cell: (usize, usize),
    aspect_ratio: f32,
) -> [(Compass, (usize, usize), f32); 8] {
    let h0 = field[cell] as f32;
    field.neighbors(cell.0, cell.1).map(|(dir, nb)| {
        let dh = h0 - field[nb] as f32;
        (dir, nb, slope_deg(dh, 1.0, aspect_ratio))
    })
}

/// Performs one stabilization check at `cell`, moving at most one slab.
///
/// Ties for the steepest slope are broken uniformly at random with `rng`.
pub fn relax_once<R: Rng + ?Sized>(
    field: &mut HeightField<u32>,
    cell: (usize, usize),
    mode: ReposeMode,
    config: &DuneConfig,
    rng: &mut R,
) -> Result<ReposeStep, DuneError> {
    let slopes = neighbor_slopes(field, cell, config.slab_aspect_ratio);

    let mut steepest = 0;
    for k in 1..slopes.len() {
        if slopes[k].2.abs() > slopes[steepest].2.abs() {
            steepest = k;
        }
    }
    let max_slope = slopes[steepest].2;

    if max_slope.abs() <= repose_angle_deg() {
        return Ok(ReposeStep { cell, stable: true });
    }

    let consistent = match mode {
        ReposeMode::Add => max_slope > 0.0,
        ReposeMode::Remove => max_slope < 0.0,
    };
    if !consistent {
        return Err(DuneError::SlopeSignViolation {
            cell,
            mode,
            slope_deg: max_slope,
        });
    }

    let mut ties = [(0usize, 0usize); 8];
    let mut count = 0usize;
    for &(_, nb, s) in &slopes {
        if s == max_slope {
            ties[count] = nb;
            count += 1;
        }
    }
    let fall = if count > 1 {
        ties[rng.random_range(0..count)]
    } else {
        ties[0]
    };

    match mode {
        ReposeMode::Add => {
            field[cell] -= 1;
            field[fall] += 1;
        }
        ReposeMode::Remove => {
            field[cell] += 1;
            field[fall] -= 1;
        }
    }

    Ok(ReposeStep {
        cell: fall,
        stable: false,
    })
}

/// Follows a disturbance from `start` until its neighborhood is within the repose angle.
///
/// Fails with [`DuneError::AvalancheDidNotSettle`] after more than
/// `config.max_avalanche_moves` slab moves.
pub fn enforce_angle_of_repose<R: Rng + ?Sized>(
    field: &mut HeightField<u32>,
    start: (usize, usize),
    mode: ReposeMode,
    config: &DuneConfig,
    rng: &mut R,
) -> Result<Avalanche, DuneError> {
    let mut cell = start;
    let mut moves = 0u32;

    loop {
        let step = relax_once(field, cell, mode, config, rng)?;
        if step.stable {
            return Ok(Avalanche { cell, moves });
        }
        moves += 1;
        if moves > config.max_avalanche_moves {
            return Err(DuneError::AvalancheDidNotSettle { start, moves });
        }
        cell = step.cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config(nx: usize, ny: usize) -> DuneConfig {
        DuneConfig {
            nx,
            ny,
            slab_aspect_ratio: 0.2,
            ..Default::default()
        }
    }

    fn assert_settled(field: &HeightField<u32>, cell: (usize, usize), cfg: &DuneConfig) {
        for (_, nb, s) in neighbor_slopes(field, cell, cfg.slab_aspect_ratio) {
            assert!(s.abs() <= repose_angle_deg(), "slope {s} to {nb:?} exceeds repose");
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("add".parse::<ReposeMode>().unwrap(), ReposeMode::Add);
        assert_eq!(" Remove ".parse::<ReposeMode>().unwrap(), ReposeMode::Remove);
        assert_eq!(
            "topple".parse::<ReposeMode>().unwrap_err(),
            ConfigError::UnknownMode("topple".to_string())
        );
        assert_eq!(ReposeMode::Remove.to_string(), "remove");
    }

    #[test]
    fn test_gentle_surface_is_stable() {
        let cfg = config(5, 5);
        let mut field = HeightField::filled(5, 5, 2u32).unwrap();
        field.set(2, 2, 5);
        let before = field.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let step = relax_once(&mut field, (2, 2), ReposeMode::Add, &cfg, &mut rng).unwrap();
        assert!(step.stable);
        assert_eq!(step.cell, (2, 2));
        assert_eq!(field, before);
    }

    #[test]
    fn test_unique_steepest_neighbor_receives_slab() {
        let cfg = config(5, 5);
        let mut field: HeightField<u32> = HeightField::new(5, 5).unwrap();
        field.set(2, 2, 5);
        for (dir, nb) in field.neighbors(2, 2) {
            if dir != Compass::N {
                field[nb] = 1;
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let avalanche = enforce_angle_of_repose(&mut field, (2, 2), ReposeMode::Add, &cfg, &mut rng).unwrap();
        assert_eq!(avalanche.moves, 1);
        assert_eq!(avalanche.cell, (2, 3));
        assert_eq!(field.get(2, 2), 4);
        assert_eq!(field.get(2, 3), 1);
        assert_eq!(field.total_slabs(), 4 + 8);
        assert_settled(&field, avalanche.cell, &cfg);
    }

    #[test]
    fn test_tie_break_picks_one_of_the_ties() {
        let cfg = config(5, 5);
        let mut field: HeightField<u32> = HeightField::new(5, 5).unwrap();
        field.set(2, 2, 4);
        let ring: Vec<(usize, usize)> = field.neighbors(2, 2).iter().map(|&(_, nb)| nb).collect();

        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let avalanche = enforce_angle_of_repose(&mut field, (2, 2), ReposeMode::Add, &cfg, &mut rng).unwrap();

        assert_eq!(avalanche.moves, 1);
        assert!(ring.contains(&avalanche.cell));
        assert_eq!(field[avalanche.cell], 1);
        assert_eq!(field.get(2, 2), 3);
        assert_eq!(field.total_slabs(), 4);
    }

    #[test]
    fn test_tie_break_is_reproducible() {
        let cfg = config(5, 5);
        let run = |seed: u64| {
            let mut field: HeightField<u32> = HeightField::new(5, 5).unwrap();
            field.set(2, 2, 4);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            enforce_angle_of_repose(&mut field, (2, 2), ReposeMode::Add, &cfg, &mut rng).unwrap()
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn test_tie_break_reaches_every_direction() {
        let cfg = config(5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let mut field: HeightField<u32> = HeightField::new(5, 5).unwrap();
            field.set(2, 2, 4);
            let step = relax_once(&mut field, (2, 2), ReposeMode::Add, &cfg, &mut rng).unwrap();
            seen.insert(step.cell);
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_remove_fills_hole_from_higher_neighbor() {
        let cfg = config(5, 5);
        let mut field = HeightField::filled(5, 5, 3u32).unwrap();
        field.set(2, 2, 0);
        field.set(2, 1, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let step = relax_once(&mut field, (2, 2), ReposeMode::Remove, &cfg, &mut rng).unwrap();
        assert!(!step.stable);
        assert_eq!(step.cell, (2, 1));
        assert_eq!(field.get(2, 2), 1);
        assert_eq!(field.get(2, 1), 3);
    }

    #[test]
    fn test_add_into_pit_is_sign_violation() {
        let cfg = config(5, 5);
        let mut field: HeightField<u32> = HeightField::new(5, 5).unwrap();
        field.set(2, 3, 6);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let err = relax_once(&mut field, (2, 2), ReposeMode::Add, &cfg, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            DuneError::SlopeSignViolation { cell: (2, 2), mode: ReposeMode::Add, .. }
        ));
        assert_eq!(field.get(2, 3), 6);
    }

    #[test]
    fn test_remove_next_to_pit_is_sign_violation() {
        let cfg = config(5, 5);
        let mut field = HeightField::filled(5, 5, 6u32).unwrap();
        field.set(2, 3, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let err = relax_once(&mut field, (2, 2), ReposeMode::Remove, &cfg, &mut rng).unwrap_err();
        assert!(matches!(err, DuneError::SlopeSignViolation { mode: ReposeMode::Remove, .. }));
    }

    #[test]
    fn test_cascade_settles_below_repose() {
        let cfg = config(9, 9);
        let mut field: HeightField<u32> = HeightField::new(9, 9).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(17);

        // Pile slabs on one cell; every addition must settle.
        for _ in 0..60 {
            field[(4, 4)] += 1;
            let avalanche = enforce_angle_of_repose(&mut field, (4, 4), ReposeMode::Add, &cfg, &mut rng).unwrap();
            assert_settled(&field, avalanche.cell, &cfg);
        }
        assert_eq!(field.total_slabs(), 60);
        assert!(field.get(4, 4) < 60);
    }

    #[test]
    fn test_move_guard_aborts_endless_avalanche() {
        // With a steep aspect ratio a lone slab on bare ground is never stable.
        let cfg = DuneConfig {
            nx: 5,
            ny: 1,
            slab_aspect_ratio: 1.0,
            max_avalanche_moves: 50,
            ..Default::default()
        };
        let mut field: HeightField<u32> = HeightField::new(5, 1).unwrap();
        field.set(0, 2, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let err = enforce_angle_of_repose(&mut field, (0, 2), ReposeMode::Add, &cfg, &mut rng).unwrap_err();
        assert_eq!(err, DuneError::AvalancheDidNotSettle { start: (0, 2), moves: 51 });
        assert_eq!(field.total_slabs(), 1);
    }
}
