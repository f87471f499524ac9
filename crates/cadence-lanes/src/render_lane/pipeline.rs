// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::{
    ClearStep, ComposeStep, FrameContext, GeometryStep, LightingStep, PresentStep, RenderStep,
    StepError,
};
use cadence_core::renderer::GraphicsDevice;
use std::fmt;

/// An ordered list of [`RenderStep`]s run once per frame.
pub struct RenderStepPipeline {
    steps: Vec<Box<dyn RenderStep>>,
}

impl RenderStepPipeline {
    /// Creates a pipeline with no steps.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// The standard frame: clear, geometry, lighting, compose, present.
    pub fn standard(frames_in_flight: usize) -> Self {
        Self::new()
            .with_step(ClearStep::default())
            .with_step(GeometryStep)
            .with_step(LightingStep::new(frames_in_flight))
            .with_step(ComposeStep)
            .with_step(PresentStep)
    }

    /// Appends a step, builder style.
    pub fn with_step(mut self, step: impl RenderStep + 'static) -> Self {
        self.push(Box::new(step));
        self
    }

    /// Appends a step.
    pub fn push(&mut self, step: Box<dyn RenderStep>) {
        self.steps.push(step);
    }

    /// Step names in execution order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the pipeline has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step in order, stopping at the first failure.
    pub fn run(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), StepError> {
        for step in &mut self.steps {
            if let Err(e) = step.execute(ctx) {
                let e = e.in_step(step.name());
                log::error!("Frame {}: {e}", ctx.frame_index);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Lets every step release its resources, last step first.
    pub fn shutdown(&mut self, device: &dyn GraphicsDevice) {
        for step in self.steps.iter_mut().rev() {
            log::debug!("Shutting down render step '{}'", step.name());
            step.on_shutdown(device);
        }
    }
}

impl Default for RenderStepPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RenderStepPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderStepPipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}
