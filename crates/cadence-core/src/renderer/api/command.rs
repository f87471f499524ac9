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

//! Recorded GPU commands and the command lists submitted to the device.

use crate::math::LinearRgba;
use crate::renderer::api::{BufferId, TextureId};
use crate::scene::{LayerId, RenderableId};

/// An opaque handle to a compute pipeline owned by the graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComputePipelineId(pub u64);

/// Identifies a command list once it has been submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandBufferId(pub u64);

/// A single recorded GPU operation.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCommand {
    /// Clears a color render target.
    ClearColor {
        /// The texture to clear.
        target: TextureId,
        /// The clear value.
        color: LinearRgba,
    },
    /// Clears a depth render target.
    ClearDepth {
        /// The texture to clear.
        target: TextureId,
        /// Depth clear value.
        depth: f32,
        /// Stencil clear value, ignored for formats without stencil.
        stencil: u32,
    },
    /// Dispatches a compute pipeline.
    Dispatch {
        /// The compute pipeline to run.
        pipeline: ComputePipelineId,
        /// Workgroup counts along x, y and z.
        workgroups: [u32; 3],
    },
    /// Binds a buffer for the following draws.
    BindBuffer {
        /// Binding slot.
        slot: u32,
        /// The buffer to bind.
        buffer: BufferId,
    },
    /// Draws every instance of one renderable batch.
    Draw {
        /// The layer the batch belongs to.
        layer: LayerId,
        /// The renderable being drawn.
        renderable: RenderableId,
        /// Number of instances in the batch.
        instances: u32,
    },
    /// Resolves or copies one surface into another.
    Resolve {
        /// Source surface.
        source: TextureId,
        /// Destination surface.
        destination: TextureId,
    },
    /// Marks the backbuffer as ready for presentation.
    Present {
        /// The backbuffer texture.
        target: TextureId,
    },
}

/// An ordered list of commands, submitted to the device as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandList {
    /// Debug label.
    pub label: String,
    /// Commands in execution order.
    pub commands: Vec<GpuCommand>,
}

impl CommandList {
    /// Creates an empty command list.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
        }
    }

    /// A list holding a single command.
    pub fn single(label: impl Into<String>, command: GpuCommand) -> Self {
        Self {
            label: label.into(),
            commands: vec![command],
        }
    }

    /// Appends a command.
    pub fn push(&mut self, command: GpuCommand) {
        self.commands.push(command);
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
