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

use super::{FrameContext, RenderStep, StepError};
use cadence_core::renderer::api::GpuCommand;

/// Clears the color and depth targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearStep {
    /// Depth clear value.
    pub depth: f32,
    /// Stencil clear value.
    pub stencil: u32,
}

impl Default for ClearStep {
    fn default() -> Self {
        Self {
            depth: 1.0,
            stencil: 0,
        }
    }
}

impl RenderStep for ClearStep {
    fn name(&self) -> &'static str {
        "Clear"
    }

    fn execute(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), StepError> {
        ctx.record(GpuCommand::ClearColor {
            target: ctx.targets.color,
            color: ctx.clear_color,
        });
        ctx.record(GpuCommand::ClearDepth {
            target: ctx.targets.depth,
            depth: self.depth,
            stencil: self.stencil,
        });
        Ok(())
    }
}
