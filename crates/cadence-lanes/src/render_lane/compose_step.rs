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

/// Resolves the scene color target into the backbuffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComposeStep;

impl RenderStep for ComposeStep {
    fn name(&self) -> &'static str {
        "Compose"
    }

    fn execute(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), StepError> {
        ctx.record(GpuCommand::Resolve {
            source: ctx.targets.color,
            destination: ctx.targets.backbuffer,
        });
        Ok(())
    }
}
