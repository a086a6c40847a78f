//! Dune model configuration.

use serde::{Deserialize, Serialize};

use super::slope::repose_angle_deg;
use crate::error::ConfigError;

/// Parameters of a dune run. Fixed for the lifetime of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuneConfig {
    /// Lattice columns (wind axis).
    pub nx: usize,
    /// Lattice rows.
    pub ny: usize,
    /// Nominal timesteps; each is `nx * ny` slab transport events.
    pub timesteps: u32,
    /// Mean number of slabs per cell deposited by the initializer.
    pub mean_slab_height: u32,
    /// Deposition probability on a sand-covered cell.
    pub p_sand: f32,
    /// Deposition probability on bare substrate.
    pub p_nosand: f32,
    /// Saltation hop length in cells.
    pub jump_length: usize,
    /// Upwind slope above which a cell lies in the wind shadow (degrees).
    pub shadow_angle_deg: f32,
    /// Slab height relative to cell width, used to turn slab counts into angles.
    pub slab_aspect_ratio: f32,
    /// Hand a frame to the sink every `frame_interval` timesteps (0 disables frames).
    pub frame_interval: u32,
    /// Upper bound on slab moves in one avalanche before the run is aborted.
    pub max_avalanche_moves: u32,
    /// Upper bound on saltation hops before a slab is dropped where it lands.
    pub max_hops: u32,
}

impl Default for DuneConfig {
    fn default() -> Self {
        Self {
            nx: 100,
            ny: 100,
            timesteps: 50,
            mean_slab_height: 3,
            p_sand: 0.6,
            p_nosand: 0.4,
            jump_length: 5,
            shadow_angle_deg: 15.0,
            slab_aspect_ratio: 0.2,
            frame_interval: 1,
            max_avalanche_moves: 100_000,
            max_hops: 10_000,
        }
    }
}

impl DuneConfig {
    /// Number of single-slab events in one nominal timestep.
    pub fn events_per_timestep(&self) -> u64 {
        (self.nx as u64) * (self.ny as u64)
    }

    /// Total slabs placed by the initializer.
    pub fn initial_slabs(&self) -> u64 {
        self.events_per_timestep() * self.mean_slab_height as u64
    }

    /// Repose threshold in degrees (fixed slope ratio of 2/3).
    pub fn repose_angle_deg(&self) -> f32 {
        repose_angle_deg()
    }

    /// Checks dimensions, probabilities and angles before a run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nx == 0 || self.ny == 0 {
            return Err(ConfigError::InvalidDimensions {
                nx: self.nx,
                ny: self.ny,
            });
        }
        // Strictly positive deposition probabilities keep the hop loop finite.
        if !(self.p_sand > 0.0 && self.p_sand <= 1.0) {
            return Err(ConfigError::out_of_range("p_sand", self.p_sand, "0 < p <= 1"));
        }
        if !(self.p_nosand > 0.0 && self.p_nosand <= 1.0) {
            return Err(ConfigError::out_of_range("p_nosand", self.p_nosand, "0 < p <= 1"));
        }
        if self.jump_length == 0 {
            return Err(ConfigError::out_of_range("jump_length", self.jump_length as f64, ">= 1"));
        }
        if !(self.shadow_angle_deg > 0.0 && self.shadow_angle_deg < 90.0) {
            return Err(ConfigError::out_of_range(
                "shadow_angle_deg",
                self.shadow_angle_deg,
                "0 < angle < 90",
            ));
        }
        if !(self.slab_aspect_ratio > 0.0 && self.slab_aspect_ratio.is_finite()) {
            return Err(ConfigError::out_of_range(
                "slab_aspect_ratio",
                self.slab_aspect_ratio,
                "> 0",
            ));
        }
        if self.max_avalanche_moves == 0 {
            return Err(ConfigError::out_of_range("max_avalanche_moves", 0, ">= 1"));
        }
        if self.max_hops == 0 {
            return Err(ConfigError::out_of_range("max_hops", 0, ">= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = DuneConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.events_per_timestep(), 10_000);
        assert_eq!(cfg.initial_slabs(), 30_000);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = [
            DuneConfig { ny: 0, ..Default::default() },
            DuneConfig { p_sand: 0.0, ..Default::default() },
            DuneConfig { p_nosand: 1.2, ..Default::default() },
            DuneConfig { jump_length: 0, ..Default::default() },
            DuneConfig { shadow_angle_deg: 90.0, ..Default::default() },
            DuneConfig { slab_aspect_ratio: -1.0, ..Default::default() },
            DuneConfig { max_hops: 0, ..Default::default() },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?} should be rejected");
        }
    }

    #[test]
    fn test_config_json_roundtrip_keeps_fields() {
        let cfg = DuneConfig { nx: 40, p_sand: 0.5, ..Default::default() };
        let text = serde_json::to_string(&cfg).unwrap();
        let back: DuneConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
