//! Destinations for surface snapshots.

use super::PipelineError;
use crate::lattice::HeightField;

/// Receives a copy of the surface after selected steps.
pub trait FrameSink {
    /// Called with the 1-based step number and the surface after that step.
    fn capture(&mut self, step: u32, surface: &HeightField<f32>) -> Result<(), PipelineError>;

    /// Called once after the last step.
    fn finish(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn capture(&mut self, _step: u32, _surface: &HeightField<f32>) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// Keeps every frame in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub frames: Vec<(u32, HeightField<f32>)>,
}

impl FrameSink for MemorySink {
    fn capture(&mut self, step: u32, surface: &HeightField<f32>) -> Result<(), PipelineError> {
        self.frames.push((step, surface.clone()));
        Ok(())
    }
}

/// Forwards every frame to each of its sinks in order.
#[derive(Default)]
pub struct TeeSink<'a> {
    sinks: Vec<&'a mut dyn FrameSink>,
}

impl<'a> TeeSink<'a> {
    pub fn new(sinks: Vec<&'a mut dyn FrameSink>) -> Self {
        Self { sinks }
    }
}

impl FrameSink for TeeSink<'_> {
    fn capture(&mut self, step: u32, surface: &HeightField<f32>) -> Result<(), PipelineError> {
        for sink in self.sinks.iter_mut() {
            sink.capture(step, surface)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), PipelineError> {
        for sink in self.sinks.iter_mut() {
            sink.finish()?;
        }
        Ok(())
    }
}
