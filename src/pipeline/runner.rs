//! Fixed-length run loop with frame capture.

use std::time::{Duration, Instant};

use rand::RngCore;
use tracing::{debug, info};

use super::{FrameSink, PipelineError, SurfaceModel};
use crate::dunes::DuneConfig;
use crate::ripples::RippleConfig;

/// How long to run and how often to capture frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Nominal timesteps to run.
    pub steps: u32,
    /// Capture a frame after every `frame_interval`-th step; 0 disables capture.
    pub frame_interval: u32,
}

impl RunConfig {
    pub fn for_ripples(config: &RippleConfig) -> Self {
        Self {
            steps: config.steps,
            frame_interval: u32::from(config.write_frames),
        }
    }

    pub fn for_dunes(config: &DuneConfig) -> Self {
        Self {
            steps: config.timesteps,
            frame_interval: config.frame_interval,
        }
    }

    fn captures(&self, step: u32) -> bool {
        self.frame_interval > 0 && step % self.frame_interval == 0
    }
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: u32,
    pub frames: u32,
    pub initial_mass: f64,
    pub final_mass: f64,
    pub elapsed: Duration,
}

/// Drives a [`SurfaceModel`] through a fixed number of steps.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RunConfig,
}

impl Pipeline {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every step, handing frames to `sink`.
    pub fn run(
        &self,
        model: &mut dyn SurfaceModel,
        rng: &mut dyn RngCore,
        sink: &mut dyn FrameSink,
    ) -> Result<RunSummary, PipelineError> {
        self.run_with_callbacks(model, rng, sink, |_, _| {})
    }

    /// Runs every step, calling `on_step(step, total)` after each one.
    pub fn run_with_callbacks<F>(
        &self,
        model: &mut dyn SurfaceModel,
        rng: &mut dyn RngCore,
        sink: &mut dyn FrameSink,
        mut on_step: F,
    ) -> Result<RunSummary, PipelineError>
    where
        F: FnMut(u32, u32),
    {
        let total = self.config.steps;
        let start = Instant::now();
        let initial_mass = model.total_mass();
        let mut frames = 0u32;

        info!("{}: running {} steps", model.name(), total);

        for step in 1..=total {
            model.step(rng).map_err(|e| e.at_step(step))?;

            if self.config.captures(step) {
                sink.capture(step, &model.snapshot()).map_err(|e| e.at_step(step))?;
                frames += 1;
            }

            debug!("{}: step {}/{} mass={:.4}", model.name(), step, total, model.total_mass());
            on_step(step, total);
        }

        sink.finish()?;

        let summary = RunSummary {
            steps: total,
            frames,
            initial_mass,
            final_mass: model.total_mass(),
            elapsed: start.elapsed(),
        };
        info!(
            "{}: finished {} steps in {:.2?} ({} frames, mass {:.4} -> {:.4})",
            model.name(),
            summary.steps,
            summary.elapsed,
            summary.frames,
            summary.initial_mass,
            summary.final_mass
        );
        Ok(summary)
    }
}

impl PipelineError {
    /// Attaches the step number to errors that carry one.
    fn at_step(self, step: u32) -> Self {
        match self {
            PipelineError::Dune { source, .. } => PipelineError::Dune { step, source },
            PipelineError::Sink { message, .. } => PipelineError::Sink { step, message },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::HeightField;
    use crate::pipeline::{DuneModel, MemorySink, NullSink, RippleModel};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn capture(&mut self, _step: u32, _surface: &HeightField<f32>) -> Result<(), PipelineError> {
            Err(PipelineError::Sink { step: 0, message: "disk full".into() })
        }
    }

    #[test]
    fn test_frames_follow_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let cfg = DuneConfig { nx: 6, ny: 4, timesteps: 7, frame_interval: 3, ..Default::default() };
        let mut model = DuneModel::new(cfg.clone(), &mut rng).unwrap();
        let mut sink = MemorySink::default();

        let summary = Pipeline::new(RunConfig::for_dunes(&cfg))
            .run(&mut model, &mut rng, &mut sink)
            .unwrap();

        assert_eq!(summary.steps, 7);
        assert_eq!(summary.frames, 2);
        let steps: Vec<u32> = sink.frames.iter().map(|(s, _)| *s).collect();
        assert_eq!(steps, vec![3, 6]);
        assert_eq!(summary.initial_mass, summary.final_mass);
    }

    #[test]
    fn test_zero_interval_disables_frames() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let cfg = RippleConfig { nx: 8, ny: 8, steps: 4, write_frames: false, ..Default::default() };
        let mut model = RippleModel::new(cfg.clone(), &mut rng).unwrap();
        let mut sink = MemorySink::default();

        let summary = Pipeline::new(RunConfig::for_ripples(&cfg))
            .run(&mut model, &mut rng, &mut sink)
            .unwrap();
        assert_eq!(summary.frames, 0);
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_callbacks_see_every_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let cfg = RippleConfig { nx: 8, ny: 8, steps: 5, ..Default::default() };
        let mut model = RippleModel::new(cfg.clone(), &mut rng).unwrap();
        let mut seen = Vec::new();

        Pipeline::new(RunConfig::for_ripples(&cfg))
            .run_with_callbacks(&mut model, &mut rng, &mut NullSink, |step, total| {
                assert_eq!(total, 5);
                seen.push(step);
            })
            .unwrap();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sink_error_reports_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let cfg = RippleConfig { nx: 4, ny: 4, steps: 3, ..Default::default() };
        let mut model = RippleModel::new(cfg, &mut rng).unwrap();
        let run = RunConfig { steps: 3, frame_interval: 2 };

        let err = Pipeline::new(run)
            .run(&mut model, &mut rng, &mut FailingSink)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Sink { step: 2, .. }));
    }
}
