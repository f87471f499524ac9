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

use crate::math::Extent2D;
use crate::renderer::api::*;
use crate::renderer::error::{RenderError, ResourceError};
use std::fmt::Debug;

/// The boundary between the scheduling core and a native graphics backend.
///
/// A device is three services behind one trait: a resource factory that hands
/// out opaque handles, a command submission queue, and the frame fence that
/// tells the core which frame slots the GPU has retired. Every method takes
/// `&self`; implementations synchronize internally so the device can be shared
/// as an `Arc<dyn GraphicsDevice>`.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// Creates a new GPU texture.
    /// ## Arguments
    /// * `descriptor` - Size, format, quality level and usage of the texture.
    /// ## Returns
    /// The handle of the created texture.
    /// ## Errors
    /// * `ResourceError::InvalidExtent` - If the descriptor has a zero-sized extent.
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError>;

    /// Destroys a GPU texture.
    /// ## Arguments
    /// * `id` - The handle of the texture to be destroyed.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Reallocates the storage of a texture at a new size, keeping its handle.
    ///
    /// Callers must only resize a texture once no in-flight frame still reads it.
    /// ## Arguments
    /// * `id` - The texture to resize.
    /// * `extent` - The new size in pixels.
    fn resize_texture(&self, id: TextureId, extent: Extent2D) -> Result<(), ResourceError>;

    /// Returns the descriptor a live texture was created (or last resized) with.
    ///
    /// `None` means the handle is stale.
    fn texture_descriptor(&self, id: TextureId) -> Option<TextureDescriptor>;

    /// Creates a new GPU buffer.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError>;

    /// Destroys a GPU buffer.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Writes data to a GPU buffer.
    /// ## Arguments
    /// * `id` - The buffer to write to.
    /// * `offset` - Byte offset into the buffer.
    /// * `data` - Bytes to copy.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Submits a finished command list for execution in the current frame.
    fn submit(&self, commands: CommandList) -> Result<CommandBufferId, ResourceError>;

    /// (Re)configures the presentation surface.
    fn configure_surface(&self, extent: Extent2D, format: TextureFormat)
        -> Result<(), RenderError>;

    /// Returns the backbuffer texture for the current frame.
    fn acquire_backbuffer(&self) -> Result<TextureId, RenderError>;

    /// Starts a frame, waiting on the frame fence until the slot the frame will
    /// reuse has been retired by the GPU.
    /// ## Returns
    /// The index of the frame being started.
    fn begin_frame(&self) -> Result<u64, RenderError>;

    /// Presents the current frame, signals its fence and advances the frame index.
    fn end_frame(&self) -> Result<(), RenderError>;

    /// The index of the frame currently being recorded.
    fn current_frame_index(&self) -> u64;

    /// Returns `true` once the GPU has finished consuming `frame`.
    fn is_frame_retired(&self, frame: u64) -> bool;

    /// The number of frames the device allows in flight.
    fn frames_in_flight(&self) -> usize;

    /// Resources created through this device and not yet destroyed, the
    /// backbuffer excluded.
    ///
    /// Used to report leaks at shutdown. Backends that do not track their
    /// allocations return `None`.
    fn live_resources(&self) -> Option<LiveResources> {
        None
    }
}
