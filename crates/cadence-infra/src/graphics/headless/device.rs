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

use super::DeviceStats;
use ahash::AHashMap;
use cadence_core::math::Extent2D;
use cadence_core::renderer::api::{
    BufferDescriptor, BufferId, CommandBufferId, CommandList, GpuCommand, LiveResources,
    SurfaceKind, TextureDescriptor, TextureFormat, TextureId, TextureUsage, MAX_FRAMES_IN_FLIGHT,
};
use cadence_core::renderer::{GraphicsDevice, RenderError, ResourceError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

#[derive(Debug)]
struct BufferEntry {
    descriptor: BufferDescriptor,
    data: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
struct SurfaceState {
    backbuffer: TextureId,
    format: TextureFormat,
}

#[derive(Debug, Default)]
struct Counters {
    textures_created: AtomicUsize,
    textures_resized: AtomicUsize,
    textures_destroyed: AtomicUsize,
    buffers_created: AtomicUsize,
    buffers_destroyed: AtomicUsize,
}

/// An in-memory [`GraphicsDevice`].
///
/// Resources live in hash tables behind `parking_lot` mutexes; handles come
/// from a single atomic counter and are never reused. The frame fence is
/// simulated with a GPU that lags `frames_in_flight - 1` frames behind the
/// CPU, so slot reuse follows the same retire order a real queue would give.
#[derive(Debug)]
pub struct HeadlessDevice {
    frames_in_flight: usize,
    next_id: AtomicUsize,
    frame_index: AtomicU64,
    retired_below: AtomicU64,
    frame_open: AtomicBool,
    textures: Mutex<AHashMap<TextureId, TextureDescriptor>>,
    buffers: Mutex<AHashMap<BufferId, BufferEntry>>,
    surface: Mutex<Option<SurfaceState>>,
    submissions: Mutex<Vec<CommandList>>,
    counters: Counters,
}

impl HeadlessDevice {
    /// Creates a device allowing `frames_in_flight` frames in flight,
    /// clamped to `1..=MAX_FRAMES_IN_FLIGHT`.
    pub fn new(frames_in_flight: usize) -> Self {
        let clamped = frames_in_flight.clamp(1, MAX_FRAMES_IN_FLIGHT);
        if clamped != frames_in_flight {
            log::warn!(
                "HeadlessDevice: {frames_in_flight} frames in flight requested, using {clamped}"
            );
        }
        log::info!("HeadlessDevice initialized with {clamped} frame(s) in flight.");
        Self {
            frames_in_flight: clamped,
            next_id: AtomicUsize::new(1),
            frame_index: AtomicU64::new(0),
            retired_below: AtomicU64::new(0),
            frame_open: AtomicBool::new(false),
            textures: Mutex::new(AHashMap::new()),
            buffers: Mutex::new(AHashMap::new()),
            surface: Mutex::new(None),
            submissions: Mutex::new(Vec::new()),
            counters: Counters::default(),
        }
    }

    /// A snapshot of the resource counters.
    pub fn stats(&self) -> DeviceStats {
        let textures = self.textures.lock();
        let buffers = self.buffers.lock();
        let allocated_bytes = textures
            .values()
            .map(TextureDescriptor::size_in_bytes)
            .sum::<u64>()
            + buffers.values().map(|b| b.descriptor.size).sum::<u64>();
        DeviceStats {
            textures_created: self.counters.textures_created.load(Ordering::Relaxed),
            textures_resized: self.counters.textures_resized.load(Ordering::Relaxed),
            textures_destroyed: self.counters.textures_destroyed.load(Ordering::Relaxed),
            buffers_created: self.counters.buffers_created.load(Ordering::Relaxed),
            buffers_destroyed: self.counters.buffers_destroyed.load(Ordering::Relaxed),
            live_textures: textures.len(),
            live_buffers: buffers.len(),
            allocated_bytes,
            submissions: self.submissions.lock().len(),
            frames: self.frame_index.load(Ordering::Acquire),
        }
    }

    /// Every command list accepted so far, in submission order.
    pub fn submissions(&self) -> Vec<CommandList> {
        self.submissions.lock().clone()
    }

    /// The most recently accepted command list.
    pub fn last_submission(&self) -> Option<CommandList> {
        self.submissions.lock().last().cloned()
    }

    /// The current contents of a buffer.
    pub fn buffer_contents(&self, id: BufferId) -> Option<Vec<u8>> {
        self.buffers.lock().get(&id).map(|b| b.data.clone())
    }

    /// The current backbuffer, if the surface has been configured.
    pub fn backbuffer(&self) -> Option<TextureId> {
        self.surface.lock().map(|s| s.backbuffer)
    }

    /// Retires every submitted frame, as waiting for the GPU to go idle would.
    pub fn wait_idle(&self) {
        let current = self.frame_index.load(Ordering::Acquire);
        self.retired_below.store(current, Ordering::Release);
    }

    fn allocate_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn validate_command(
        command: &GpuCommand,
        textures: &AHashMap<TextureId, TextureDescriptor>,
        buffers: &AHashMap<BufferId, BufferEntry>,
        backbuffer: Option<TextureId>,
    ) -> Result<(), ResourceError> {
        let target = |id: &TextureId, kind: SurfaceKind| -> Result<(), ResourceError> {
            let descriptor = textures.get(id).ok_or(ResourceError::NotFound)?;
            if !descriptor.is_render_target() {
                return Err(ResourceError::NotRenderTarget);
            }
            if descriptor.kind() != kind {
                let expected = match kind {
                    SurfaceKind::Color => TextureFormat::Rgba8Unorm,
                    SurfaceKind::Depth => TextureFormat::Depth32Float,
                };
                return Err(ResourceError::FormatMismatch {
                    expected,
                    found: descriptor.format,
                });
            }
            Ok(())
        };

        match command {
            GpuCommand::ClearColor { target: id, .. } => target(id, SurfaceKind::Color),
            GpuCommand::ClearDepth { target: id, .. } => target(id, SurfaceKind::Depth),
            GpuCommand::Resolve {
                source,
                destination,
            } => {
                target(source, SurfaceKind::Color)?;
                target(destination, SurfaceKind::Color)
            }
            GpuCommand::Present { target: id } => match backbuffer {
                Some(backbuffer) if backbuffer == *id => Ok(()),
                _ => Err(ResourceError::InvalidHandle),
            },
            GpuCommand::BindBuffer { buffer, .. } => {
                if buffers.contains_key(buffer) {
                    Ok(())
                } else {
                    Err(ResourceError::NotFound)
                }
            }
            GpuCommand::Dispatch { workgroups, .. } => {
                if workgroups.contains(&0) {
                    Err(ResourceError::InvalidExtent)
                } else {
                    Ok(())
                }
            }
            GpuCommand::Draw { .. } => Ok(()),
        }
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new(2)
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        if descriptor.extent.is_empty() {
            return Err(ResourceError::InvalidExtent);
        }
        let id = TextureId(self.allocate_id());
        self.textures.lock().insert(id, descriptor.clone());
        self.counters.textures_created.fetch_add(1, Ordering::Relaxed);
        log::trace!("HeadlessDevice: created texture {id:?} '{}'", descriptor.label);
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        if self.backbuffer() == Some(id) {
            return Err(ResourceError::InvalidHandle);
        }
        self.textures
            .lock()
            .remove(&id)
            .ok_or(ResourceError::NotFound)?;
        self.counters
            .textures_destroyed
            .fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn resize_texture(&self, id: TextureId, extent: Extent2D) -> Result<(), ResourceError> {
        if extent.is_empty() {
            return Err(ResourceError::InvalidExtent);
        }
        let mut textures = self.textures.lock();
        let descriptor = textures.get_mut(&id).ok_or(ResourceError::NotFound)?;
        descriptor.extent = extent;
        self.counters.textures_resized.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn texture_descriptor(&self, id: TextureId) -> Option<TextureDescriptor> {
        self.textures.lock().get(&id).cloned()
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        if descriptor.size == 0 {
            return Err(ResourceError::InvalidExtent);
        }
        let id = BufferId(self.allocate_id());
        self.buffers.lock().insert(
            id,
            BufferEntry {
                descriptor: descriptor.clone(),
                data: vec![0; descriptor.size as usize],
            },
        );
        self.counters.buffers_created.fetch_add(1, Ordering::Relaxed);
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        self.buffers
            .lock()
            .remove(&id)
            .ok_or(ResourceError::NotFound)?;
        self.counters.buffers_destroyed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let mut buffers = self.buffers.lock();
        let buffer = buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        let start = usize::try_from(offset).map_err(|_| ResourceError::OutOfBounds)?;
        let end = start
            .checked_add(data.len())
            .filter(|end| *end <= buffer.data.len())
            .ok_or(ResourceError::OutOfBounds)?;
        buffer.data[start..end].copy_from_slice(data);
        Ok(())
    }

    fn submit(&self, commands: CommandList) -> Result<CommandBufferId, ResourceError> {
        {
            let backbuffer = self.backbuffer();
            let textures = self.textures.lock();
            let buffers = self.buffers.lock();
            for command in &commands.commands {
                Self::validate_command(command, &textures, &buffers, backbuffer).map_err(|e| {
                    log::error!(
                        "HeadlessDevice: rejected command list '{}': {e} ({command:?})",
                        commands.label
                    );
                    e
                })?;
            }
        }
        let mut submissions = self.submissions.lock();
        log::trace!(
            "HeadlessDevice: submitted '{}' with {} command(s)",
            commands.label,
            commands.len()
        );
        submissions.push(commands);
        Ok(CommandBufferId(submissions.len() as u64))
    }

    fn configure_surface(
        &self,
        extent: Extent2D,
        format: TextureFormat,
    ) -> Result<(), RenderError> {
        if format.is_depth() {
            return Err(RenderError::ResourceError(ResourceError::FormatMismatch {
                expected: TextureFormat::Bgra8UnormSrgb,
                found: format,
            }));
        }
        let extent = extent.at_least_one();
        let mut surface = self.surface.lock();
        let mut textures = self.textures.lock();

        match *surface {
            Some(state) if state.format == format => {
                if let Some(descriptor) = textures.get_mut(&state.backbuffer) {
                    descriptor.extent = extent;
                }
            }
            previous => {
                if let Some(state) = previous {
                    textures.remove(&state.backbuffer);
                }
                let backbuffer = TextureId(self.allocate_id());
                textures.insert(
                    backbuffer,
                    TextureDescriptor {
                        label: "backbuffer".to_owned(),
                        extent,
                        format,
                        anti_alias: Default::default(),
                        usage: TextureUsage::RENDER_ATTACHMENT | TextureUsage::COPY_DST,
                    },
                );
                *surface = Some(SurfaceState { backbuffer, format });
            }
        }
        log::debug!("HeadlessDevice: surface configured at {extent} ({format:?})");
        Ok(())
    }

    fn acquire_backbuffer(&self) -> Result<TextureId, RenderError> {
        self.backbuffer().ok_or_else(|| {
            RenderError::SurfaceAcquisitionFailed("surface has not been configured".to_owned())
        })
    }

    fn begin_frame(&self) -> Result<u64, RenderError> {
        if self.frame_open.swap(true, Ordering::AcqRel) {
            return Err(RenderError::RenderingFailed(
                "begin_frame called twice without end_frame".to_owned(),
            ));
        }
        let frame = self.frame_index.load(Ordering::Acquire);
        let fif = self.frames_in_flight as u64;
        if frame >= fif && !self.is_frame_retired(frame - fif) {
            // The simulated GPU catches up instantly.
            self.retired_below.store(frame - fif + 1, Ordering::Release);
        }
        Ok(frame)
    }

    fn end_frame(&self) -> Result<(), RenderError> {
        if !self.frame_open.swap(false, Ordering::AcqRel) {
            return Err(RenderError::RenderingFailed(
                "end_frame called without begin_frame".to_owned(),
            ));
        }
        let finished = self.frame_index.fetch_add(1, Ordering::AcqRel);
        let lag = self.frames_in_flight as u64 - 1;
        let retired = (finished + 1).saturating_sub(lag);
        self.retired_below.fetch_max(retired, Ordering::AcqRel);
        Ok(())
    }

    fn current_frame_index(&self) -> u64 {
        self.frame_index.load(Ordering::Acquire)
    }

    fn is_frame_retired(&self, frame: u64) -> bool {
        frame < self.retired_below.load(Ordering::Acquire)
    }

    fn frames_in_flight(&self) -> usize {
        self.frames_in_flight
    }

    fn live_resources(&self) -> Option<LiveResources> {
        let backbuffer = usize::from(self.backbuffer().is_some());
        Some(LiveResources {
            textures: self.textures.lock().len() - backbuffer,
            buffers: self.buffers.lock().len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::math::LinearRgba;
    use cadence_core::renderer::api::AntiAliasLevel;

    fn color_target(device: &HeadlessDevice) -> TextureId {
        device
            .create_texture(&TextureDescriptor::render_target(
                "color",
                Extent2D::new(64, 32),
                TextureFormat::Rgba16Float,
                AntiAliasLevel::X1,
            ))
            .unwrap()
    }

    #[test]
    fn textures_are_tracked_until_destroyed() {
        let device = HeadlessDevice::new(2);
        let id = color_target(&device);
        assert_eq!(device.stats().live_textures, 1);
        assert_eq!(device.stats().allocated_bytes, 64 * 32 * 8);

        device.destroy_texture(id).unwrap();
        assert_eq!(device.destroy_texture(id), Err(ResourceError::NotFound));
        assert!(device.live_resources().unwrap().is_empty());
    }

    #[test]
    fn zero_sized_textures_are_rejected() {
        let device = HeadlessDevice::default();
        let result = device.create_texture(&TextureDescriptor::render_target(
            "empty",
            Extent2D::new(0, 4),
            TextureFormat::Rgba8Unorm,
            AntiAliasLevel::X1,
        ));
        assert_eq!(result, Err(ResourceError::InvalidExtent));
    }

    #[test]
    fn submit_rejects_clearing_depth_as_color() {
        let device = HeadlessDevice::default();
        let depth = device
            .create_texture(&TextureDescriptor::render_target(
                "depth",
                Extent2D::new(8, 8),
                TextureFormat::Depth32Float,
                AntiAliasLevel::X1,
            ))
            .unwrap();

        let result = device.submit(CommandList::single(
            "bad",
            GpuCommand::ClearColor {
                target: depth,
                color: LinearRgba::BLACK,
            },
        ));
        assert!(matches!(result, Err(ResourceError::FormatMismatch { .. })));
        assert_eq!(device.stats().submissions, 0);
    }

    #[test]
    fn write_buffer_checks_bounds() {
        let device = HeadlessDevice::default();
        let buffer = device
            .create_buffer(&BufferDescriptor::uniform_array::<u32>("counts", 2))
            .unwrap();
        device.write_buffer(buffer, 4, &[1, 2, 3, 4]).unwrap();
        assert_eq!(
            device.buffer_contents(buffer).unwrap(),
            vec![0, 0, 0, 0, 1, 2, 3, 4]
        );
        assert_eq!(
            device.write_buffer(buffer, 6, &[0; 4]),
            Err(ResourceError::OutOfBounds)
        );
    }

    #[test]
    fn fence_lags_by_frames_in_flight() {
        let device = HeadlessDevice::new(2);
        assert_eq!(device.begin_frame().unwrap(), 0);
        device.end_frame().unwrap();
        assert!(!device.is_frame_retired(0));

        assert_eq!(device.begin_frame().unwrap(), 1);
        device.end_frame().unwrap();
        assert!(device.is_frame_retired(0));
        assert!(!device.is_frame_retired(1));

        device.wait_idle();
        assert!(device.is_frame_retired(1));
    }

    #[test]
    fn frames_must_be_balanced() {
        let device = HeadlessDevice::default();
        assert!(device.end_frame().is_err());
        device.begin_frame().unwrap();
        assert!(device.begin_frame().is_err());
    }

    #[test]
    fn backbuffer_follows_surface_configuration() {
        let device = HeadlessDevice::default();
        assert!(device.acquire_backbuffer().is_err());

        device
            .configure_surface(Extent2D::new(800, 600), TextureFormat::Bgra8UnormSrgb)
            .unwrap();
        let backbuffer = device.acquire_backbuffer().unwrap();
        device
            .configure_surface(Extent2D::new(1024, 768), TextureFormat::Bgra8UnormSrgb)
            .unwrap();
        assert_eq!(device.acquire_backbuffer().unwrap(), backbuffer);
        assert_eq!(
            device.texture_descriptor(backbuffer).unwrap().extent,
            Extent2D::new(1024, 768)
        );
        assert_eq!(device.live_resources().unwrap().textures, 0);
        assert_eq!(
            device.destroy_texture(backbuffer),
            Err(ResourceError::InvalidHandle)
        );
    }

    #[test]
    fn present_requires_the_backbuffer() {
        let device = HeadlessDevice::default();
        device
            .configure_surface(Extent2D::new(4, 4), TextureFormat::Bgra8UnormSrgb)
            .unwrap();
        let other = color_target(&device);

        assert!(device
            .submit(CommandList::single("present", GpuCommand::Present { target: other }))
            .is_err());
        let backbuffer = device.acquire_backbuffer().unwrap();
        assert!(device
            .submit(CommandList::single(
                "present",
                GpuCommand::Present { target: backbuffer }
            ))
            .is_ok());
    }
}
