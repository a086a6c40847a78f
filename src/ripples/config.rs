//! Ripple model configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameters of a ripple run. Fixed for the lifetime of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Lattice columns (wind axis).
    pub nx: usize,
    /// Lattice rows.
    pub ny: usize,
    /// Number of saltation + creep passes.
    pub steps: u32,
    /// Amplitude of the random initial bed.
    pub eps: f32,
    /// Grain quantum in units of `eps` (`Q = q0 * eps`).
    pub q0: f32,
    /// Base saltation length (proportional to wind force).
    pub l0: f32,
    /// Height coupling of the saltation length (proportional to mean flow velocity).
    pub b: f32,
    /// Creep (diffusion) coefficient.
    pub d: f32,
    /// Hand a frame to the sink after every pass.
    pub write_frames: bool,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            nx: 100,
            ny: 100,
            steps: 100,
            eps: 0.1,
            q0: 1.0,
            l0: 5.0,
            b: 2.0,
            d: 0.25,
            write_frames: true,
        }
    }
}

impl RippleConfig {
    /// Transferred height of one saltation event.
    pub fn quantum(&self) -> f32 {
        self.q0 * self.eps
    }

    /// Checks dimensions and coefficients before a run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nx == 0 || self.ny == 0 {
            return Err(ConfigError::InvalidDimensions {
                nx: self.nx,
                ny: self.ny,
            });
        }
        if !(self.eps >= 0.0 && self.eps.is_finite()) {
            return Err(ConfigError::out_of_range("eps", self.eps, ">= 0"));
        }
        if !self.q0.is_finite() {
            return Err(ConfigError::out_of_range("q0", self.q0, "finite"));
        }
        if !self.l0.is_finite() || !self.b.is_finite() {
            return Err(ConfigError::out_of_range("l0/b", self.l0, "finite"));
        }
        // Outside [0, 1] the creep update stops being a convex combination.
        if !(0.0..=1.0).contains(&self.d) {
            return Err(ConfigError::out_of_range("d", self.d, "0 <= d <= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = RippleConfig::default();
        assert!(cfg.validate().is_ok());
        assert!((cfg.quantum() - 0.1).abs() < 1e-7);
    }

    #[test]
    fn test_rejects_bad_values() {
        let cfg = RippleConfig { nx: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidDimensions { .. })));

        let cfg = RippleConfig { d: 1.5, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::OutOfRange { name: "d", .. })));

        let cfg = RippleConfig { eps: -0.1, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: RippleConfig = serde_json::from_str(r#"{ "nx": 32, "b": 1.5 }"#).unwrap();
        assert_eq!(cfg.nx, 32);
        assert_eq!(cfg.ny, 100);
        assert_eq!(cfg.b, 1.5);
        assert_eq!(cfg.l0, 5.0);
    }
}
