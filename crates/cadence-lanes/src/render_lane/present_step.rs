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
use cadence_core::renderer::api::{CommandList, GpuCommand};

/// Presents the backbuffer and submits the frame's command list.
///
/// Must be the last step: commands recorded after it belong to no submission.
#[derive(Debug, Default, Clone, Copy)]
pub struct PresentStep;

impl RenderStep for PresentStep {
    fn name(&self) -> &'static str {
        "Present"
    }

    fn execute(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), StepError> {
        ctx.record(GpuCommand::Present {
            target: ctx.targets.backbuffer,
        });

        let label = ctx.commands.label.clone();
        let commands = std::mem::replace(&mut ctx.commands, CommandList::new(label));
        ctx.stats.commands = commands.len();
        let id = ctx.device.submit(commands)?;
        ctx.stats.command_buffer = Some(id);
        log::trace!(
            "Frame {} submitted as {id:?} ({} commands)",
            ctx.frame_index,
            ctx.stats.commands
        );
        Ok(())
    }
}
