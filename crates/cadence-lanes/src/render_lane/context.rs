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

use cadence_core::math::LinearRgba;
use cadence_core::renderer::api::{CommandBufferId, CommandList, GpuCommand, TextureId};
use cadence_core::renderer::GraphicsDevice;
use cadence_core::scene::SceneRegistry;

/// The surfaces a frame renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTargets {
    /// The scene color target for the current frame slot.
    pub color: TextureId,
    /// The depth target for the current frame slot.
    pub depth: TextureId,
    /// The presentation surface acquired for this frame.
    pub backbuffer: TextureId,
}

/// What one frame recorded and submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Index of the frame.
    pub frame_index: u64,
    /// Visible scenes with at least one camera.
    pub scenes_drawn: usize,
    /// Non-empty batches drawn, summed over cameras.
    pub draw_calls: usize,
    /// Object instances drawn, summed over cameras.
    pub instances: usize,
    /// Point lights uploaded.
    pub point_lights: usize,
    /// Capsule lights uploaded.
    pub capsule_lights: usize,
    /// Commands in the submitted list.
    pub commands: usize,
    /// The device's handle for the submission, once submitted.
    pub command_buffer: Option<CommandBufferId>,
}

/// Shared state of the frame being recorded.
pub struct FrameContext<'a> {
    /// The device commands are submitted to.
    pub device: &'a dyn GraphicsDevice,
    /// Scene state as of the end of this frame's `StartOfFrame` drain.
    pub scenes: &'a SceneRegistry,
    /// Index of the frame being recorded.
    pub frame_index: u64,
    /// The frame's render targets.
    pub targets: FrameTargets,
    /// Color the color target is cleared to.
    pub clear_color: LinearRgba,
    /// Commands recorded so far.
    pub commands: CommandList,
    /// Counters filled in by the steps.
    pub stats: FrameStats,
}

impl<'a> FrameContext<'a> {
    /// Starts recording a frame.
    pub fn new(
        device: &'a dyn GraphicsDevice,
        scenes: &'a SceneRegistry,
        frame_index: u64,
        targets: FrameTargets,
        clear_color: LinearRgba,
    ) -> Self {
        Self {
            device,
            scenes,
            frame_index,
            targets,
            clear_color,
            commands: CommandList::new(format!("frame_{frame_index}")),
            stats: FrameStats {
                frame_index,
                ..Default::default()
            },
        }
    }

    /// Appends a command to the frame's list.
    pub fn record(&mut self, command: GpuCommand) {
        self.commands.push(command);
    }
}
