//! Surface models the pipeline can drive.

use rand::RngCore;
use tracing::debug;

use super::PipelineError;
use crate::dunes::{seed_slabs, transport_event, DuneConfig, DuneError, TransportOutcome};
use crate::error::ConfigError;
use crate::lattice::HeightField;
use crate::ripples::{diffuse, random_bed, saltate, RippleConfig};

/// A surface that evolves one nominal timestep at a time.
pub trait SurfaceModel {
    /// Human-readable model name.
    fn name(&self) -> &str;

    /// Advances the surface by one nominal timestep.
    fn step(&mut self, rng: &mut dyn RngCore) -> Result<(), PipelineError>;

    /// Copy of the current surface as real heights.
    fn snapshot(&self) -> HeightField<f32>;

    /// Total amount of sand on the surface.
    fn total_mass(&self) -> f64;
}

/// Rejects a surface whose shape differs from the configured lattice.
fn check_shape<T: Copy>(field: &HeightField<T>, nx: usize, ny: usize) -> Result<(), ConfigError> {
    if field.nx() != nx || field.ny() != ny {
        return Err(ConfigError::DimensionMismatch {
            nx,
            ny,
            actual_nx: field.nx(),
            actual_ny: field.ny(),
        });
    }
    Ok(())
}

/// Nishimori-Ouchi ripples: one saltation sweep followed by one creep pass per step.
#[derive(Debug, Clone)]
pub struct RippleModel {
    config: RippleConfig,
    field: HeightField<f32>,
}

impl RippleModel {
    /// Validates the configuration and draws the random initial bed.
    pub fn new(config: RippleConfig, rng: &mut dyn RngCore) -> Result<Self, PipelineError> {
        config.validate()?;
        let field = random_bed(&config, rng)?;
        Ok(Self { config, field })
    }

    /// Wraps an existing surface, which must match the configured lattice.
    pub fn from_field(config: RippleConfig, field: HeightField<f32>) -> Result<Self, PipelineError> {
        config.validate()?;
        check_shape(&field, config.nx, config.ny)?;
        Ok(Self { config, field })
    }

    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    pub fn field(&self) -> &HeightField<f32> {
        &self.field
    }
}

impl SurfaceModel for RippleModel {
    fn name(&self) -> &str {
        "Ripples"
    }

    fn step(&mut self, _rng: &mut dyn RngCore) -> Result<(), PipelineError> {
        saltate(&mut self.field, &self.config);
        diffuse(&mut self.field, self.config.d);
        Ok(())
    }

    fn snapshot(&self) -> HeightField<f32> {
        self.field.clone()
    }

    fn total_mass(&self) -> f64 {
        self.field.total()
    }
}

/// Event counts for one or more dune timesteps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuneStepStats {
    /// Slabs that were eroded and redeposited.
    pub moved: u64,
    /// Picks that landed on bare substrate.
    pub empty: u64,
    /// Picks that landed in a wind shadow.
    pub shadowed: u64,
    /// Single-slab avalanche moves triggered by erosion and deposition.
    pub avalanche_moves: u64,
}

impl DuneStepStats {
    fn record(&mut self, outcome: TransportOutcome) {
        match outcome {
            TransportOutcome::EmptyCell { .. } => self.empty += 1,
            TransportOutcome::Shadowed { .. } => self.shadowed += 1,
            TransportOutcome::Moved { avalanche_moves, .. } => {
                self.moved += 1;
                self.avalanche_moves += avalanche_moves as u64;
            }
        }
    }

    /// Total transport attempts.
    pub fn events(&self) -> u64 {
        self.moved + self.empty + self.shadowed
    }

    fn accumulate(&mut self, other: &DuneStepStats) {
        self.moved += other.moved;
        self.empty += other.empty;
        self.shadowed += other.shadowed;
        self.avalanche_moves += other.avalanche_moves;
    }
}

/// Werner slab dunes: one step is `nx * ny` single-slab transport events.
#[derive(Debug, Clone)]
pub struct DuneModel {
    config: DuneConfig,
    field: HeightField<u32>,
    totals: DuneStepStats,
}

impl DuneModel {
    /// Validates the configuration and seeds the initial slab field.
    pub fn new(config: DuneConfig, rng: &mut dyn RngCore) -> Result<Self, PipelineError> {
        let field = seed_slabs(&config, rng)?;
        Ok(Self {
            config,
            field,
            totals: DuneStepStats::default(),
        })
    }

    /// Wraps an existing slab field, which must match the configured lattice.
    pub fn from_field(config: DuneConfig, field: HeightField<u32>) -> Result<Self, PipelineError> {
        config.validate()?;
        check_shape(&field, config.nx, config.ny)?;
        Ok(Self {
            config,
            field,
            totals: DuneStepStats::default(),
        })
    }

    pub fn config(&self) -> &DuneConfig {
        &self.config
    }

    pub fn field(&self) -> &HeightField<u32> {
        &self.field
    }

    /// Counts accumulated over every completed step.
    pub fn totals(&self) -> DuneStepStats {
        self.totals
    }

    /// Runs one nominal timestep and reports what happened during it.
    pub fn advance(&mut self, rng: &mut dyn RngCore) -> Result<DuneStepStats, DuneError> {
        let mut stats = DuneStepStats::default();
        for _ in 0..self.config.events_per_timestep() {
            stats.record(transport_event(&mut self.field, &self.config, rng)?);
        }
        self.totals.accumulate(&stats);
        Ok(stats)
    }
}

impl SurfaceModel for DuneModel {
    fn name(&self) -> &str {
        "Dunes"
    }

    fn step(&mut self, rng: &mut dyn RngCore) -> Result<(), PipelineError> {
        let stats = self.advance(rng)?;
        debug!(
            "moved={} empty={} shadowed={} avalanche_moves={}",
            stats.moved, stats.empty, stats.shadowed, stats.avalanche_moves
        );
        Ok(())
    }

    fn snapshot(&self) -> HeightField<f32> {
        self.field.to_f32()
    }

    fn total_mass(&self) -> f64 {
        self.field.total_slabs() as f64
    }
}
