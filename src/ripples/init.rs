//! Random initial bed.

use rand::Rng;
use rand_distr::StandardNormal;

use super::RippleConfig;
use crate::error::ConfigError;
use crate::lattice::HeightField;

/// Creates the initial bed: independent `eps * N(0, 1)` heights per cell.
pub fn random_bed<R: Rng + ?Sized>(config: &RippleConfig, rng: &mut R) -> Result<HeightField<f32>, ConfigError> {
    let mut field = HeightField::new(config.nx, config.ny)?;
    for h in field.as_mut_slice() {
        let z: f32 = rng.sample(StandardNormal);
        *h = config.eps * z;
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_bed_reproducible() {
        let cfg = RippleConfig { nx: 16, ny: 8, ..Default::default() };
        let a = random_bed(&cfg, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let b = random_bed(&cfg, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.nx(), 16);
        assert_eq!(a.ny(), 8);
    }

    #[test]
    fn test_random_bed_amplitude() {
        let cfg = RippleConfig { nx: 64, ny: 64, eps: 0.1, ..Default::default() };
        let field = random_bed(&cfg, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();

        let n = field.len() as f64;
        let mean = field.total() / n;
        let var = field
            .as_slice()
            .iter()
            .map(|&h| (h as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        assert!(mean.abs() < 0.01, "mean {mean}");
        assert!((var.sqrt() - 0.1).abs() < 0.01, "std {}", var.sqrt());
    }

    #[test]
    fn test_zero_eps_gives_flat_bed() {
        let cfg = RippleConfig { nx: 4, ny: 4, eps: 0.0, ..Default::default() };
        let field = random_bed(&cfg, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert!(field.as_slice().iter().all(|&h| h == 0.0));
    }
}
