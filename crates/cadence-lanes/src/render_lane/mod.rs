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

//! The render step pipeline.

mod clear_step;
mod compose_step;
mod context;
mod error;
mod geometry_step;
mod lighting_step;
mod pipeline;
mod present_step;

pub use self::clear_step::ClearStep;
pub use self::compose_step::ComposeStep;
pub use self::context::{FrameContext, FrameStats, FrameTargets};
pub use self::error::StepError;
pub use self::geometry_step::GeometryStep;
pub use self::lighting_step::{
    CapsuleLightUniform, LightingStep, LightingUniforms, PointLightUniform, LIGHTING_SLOT,
    MAX_CAPSULE_LIGHTS, MAX_POINT_LIGHTS,
};
pub use self::pipeline::RenderStepPipeline;
pub use self::present_step::PresentStep;

use cadence_core::renderer::GraphicsDevice;

/// One stage of a frame.
///
/// Steps run in pipeline order on the render thread. They read the scenes and
/// the frame's targets from the [`FrameContext`] and record commands into its
/// command list. A step may own per-frame resources, which it releases in
/// [`on_shutdown`](RenderStep::on_shutdown).
pub trait RenderStep: Send + Sync {
    /// A human-readable identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Records this step's work for the frame.
    ///
    /// # Arguments
    ///
    /// * `ctx`: The frame being recorded.
    fn execute(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), StepError>;

    /// Releases device resources owned by the step.
    fn on_shutdown(&mut self, _device: &dyn GraphicsDevice) {}
}
