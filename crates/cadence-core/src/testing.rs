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

//! A recording mock device shared by the unit tests of this crate.

use crate::math::Extent2D;
use crate::renderer::api::*;
use crate::renderer::{GraphicsDevice, RenderError, ResourceError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Counts every resource call and keeps the descriptors of live textures.
#[derive(Debug, Default)]
pub(crate) struct MockDevice {
    next_id: AtomicUsize,
    frame: AtomicU64,
    textures: Mutex<HashMap<TextureId, TextureDescriptor>>,
    buffers: Mutex<HashMap<BufferId, Vec<u8>>>,
    pub(crate) submitted: Mutex<Vec<CommandList>>,
    pub(crate) created: AtomicUsize,
    pub(crate) resized: AtomicUsize,
    pub(crate) destroyed: AtomicUsize,
    pub(crate) panic_on_resize: AtomicBool,
}

impl MockDevice {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(1),
            ..Default::default()
        }
    }

    pub(crate) fn set_frame(&self, frame: u64) {
        self.frame.store(frame, Ordering::SeqCst);
    }

    pub(crate) fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub(crate) fn resized(&self) -> usize {
        self.resized.load(Ordering::SeqCst)
    }

    pub(crate) fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub(crate) fn live_textures(&self) -> usize {
        self.textures.lock().unwrap().len()
    }

    pub(crate) fn render_target(&self, format: TextureFormat) -> TextureId {
        self.create_texture(&TextureDescriptor::render_target(
            "target",
            Extent2D::new(64, 64),
            format,
            AntiAliasLevel::X1,
        ))
        .unwrap()
    }
}

impl GraphicsDevice for MockDevice {
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        if descriptor.extent.is_empty() {
            return Err(ResourceError::InvalidExtent);
        }
        let id = TextureId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.textures.lock().unwrap().insert(id, descriptor.clone());
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        self.textures
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(ResourceError::NotFound)?;
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn resize_texture(&self, id: TextureId, extent: Extent2D) -> Result<(), ResourceError> {
        if self.panic_on_resize.load(Ordering::SeqCst) {
            panic!("mock device refused to resize {id:?}");
        }
        let mut textures = self.textures.lock().unwrap();
        let desc = textures.get_mut(&id).ok_or(ResourceError::NotFound)?;
        desc.extent = extent;
        self.resized.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn texture_descriptor(&self, id: TextureId) -> Option<TextureDescriptor> {
        self.textures.lock().unwrap().get(&id).cloned()
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        let id = BufferId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.buffers
            .lock()
            .unwrap()
            .insert(id, vec![0; descriptor.size as usize]);
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        self.buffers
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(ResourceError::NotFound)
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let mut buffers = self.buffers.lock().unwrap();
        let buffer = buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        let start = offset as usize;
        let end = start + data.len();
        if end > buffer.len() {
            return Err(ResourceError::OutOfBounds);
        }
        buffer[start..end].copy_from_slice(data);
        Ok(())
    }

    fn submit(&self, commands: CommandList) -> Result<CommandBufferId, ResourceError> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(commands);
        Ok(CommandBufferId(submitted.len() as u64))
    }

    fn configure_surface(
        &self,
        _extent: Extent2D,
        _format: TextureFormat,
    ) -> Result<(), RenderError> {
        Ok(())
    }

    fn acquire_backbuffer(&self) -> Result<TextureId, RenderError> {
        Err(RenderError::SurfaceAcquisitionFailed(
            "mock device has no surface".into(),
        ))
    }

    fn begin_frame(&self) -> Result<u64, RenderError> {
        Ok(self.current_frame_index())
    }

    fn end_frame(&self) -> Result<(), RenderError> {
        self.frame.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn current_frame_index(&self) -> u64 {
        self.frame.load(Ordering::SeqCst)
    }

    fn is_frame_retired(&self, frame: u64) -> bool {
        frame < self.current_frame_index()
    }

    fn frames_in_flight(&self) -> usize {
        2
    }
}
