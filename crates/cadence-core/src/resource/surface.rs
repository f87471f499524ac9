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

//! Render and depth targets tracked per anti-aliasing level.

use super::FrameBufferRing;
use crate::math::Extent2D;
use crate::renderer::api::{
    AntiAliasLevel, ResizeMode, SurfaceKind, TextureDescriptor, TextureFormat, TextureId,
    TextureUsage,
};
use crate::renderer::{GraphicsDevice, ResourceError};
use std::collections::BTreeMap;

/// One physical render or depth target owned by a [`SurfaceTracker`] slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    texture: TextureId,
    descriptor: TextureDescriptor,
}

impl Surface {
    /// Creates the texture described by `descriptor` on `device`.
    pub fn create(
        device: &dyn GraphicsDevice,
        descriptor: TextureDescriptor,
    ) -> Result<Self, ResourceError> {
        let texture = device.create_texture(&descriptor)?;
        log::debug!(
            "Surface '{}' created as {:?} ({}, {:?})",
            descriptor.label,
            texture,
            descriptor.extent,
            descriptor.format
        );
        Ok(Self {
            texture,
            descriptor,
        })
    }

    /// The device handle of the underlying texture.
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// The descriptor the texture currently matches.
    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    /// Current size in pixels.
    pub fn extent(&self) -> Extent2D {
        self.descriptor.extent
    }

    /// Resizes the texture to `extent`.
    ///
    /// Returns `Ok(false)` without touching the device when the size already
    /// matches, so repeated requests for the same size are free.
    pub fn resize(
        &mut self,
        device: &dyn GraphicsDevice,
        extent: Extent2D,
    ) -> Result<bool, ResourceError> {
        if self.descriptor.extent == extent {
            return Ok(false);
        }
        device.resize_texture(self.texture, extent)?;
        log::debug!(
            "Surface '{}' resized {} -> {}",
            self.descriptor.label,
            self.descriptor.extent,
            extent
        );
        self.descriptor.extent = extent;
        Ok(true)
    }

    /// Destroys the underlying texture.
    pub fn release(self, device: &dyn GraphicsDevice) -> Result<(), ResourceError> {
        device.destroy_texture(self.texture)
    }
}

/// A named color or depth target, backed by one [`FrameBufferRing`] per
/// anti-aliasing level.
///
/// Levels are populated lazily: the ring for a level, and each of its slots,
/// only exist once [`get`](SurfaceTracker::get) has been called for that level
/// in a frame mapping to the slot. Every created ring follows the same tracked
/// size through [`refresh_size`](SurfaceTracker::refresh_size).
#[derive(Debug)]
pub struct SurfaceTracker {
    name: String,
    format: TextureFormat,
    usage: TextureUsage,
    resize_mode: ResizeMode,
    tracked: Extent2D,
    frames_in_flight: usize,
    rings: BTreeMap<AntiAliasLevel, FrameBufferRing<Surface>>,
    disposed: bool,
}

impl SurfaceTracker {
    /// Creates an empty tracker. No device resources are allocated here.
    ///
    /// ## Arguments
    ///
    /// * `name` - Base name; surfaces are named `{name}_{samples}aa`.
    /// * `format` - Pixel format shared by every level. A depth format makes
    ///   this a depth tracker.
    /// * `resize_mode` - How surface sizes derive from the tracked size.
    /// * `tracked` - Initial tracked size.
    /// * `frames_in_flight` - Capacity of each per-level ring.
    pub fn new(
        name: impl Into<String>,
        format: TextureFormat,
        resize_mode: ResizeMode,
        tracked: Extent2D,
        frames_in_flight: usize,
    ) -> Self {
        Self {
            name: name.into(),
            format,
            usage: TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
            resize_mode,
            tracked,
            frames_in_flight,
            rings: BTreeMap::new(),
            disposed: false,
        }
    }

    /// Overrides the usage flags of surfaces created from now on.
    pub fn with_usage(mut self, usage: TextureUsage) -> Self {
        self.usage = usage;
        self
    }

    /// The tracker's base name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pixel format of every surface.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Whether this tracker holds color or depth targets.
    pub fn kind(&self) -> SurfaceKind {
        self.format.into()
    }

    /// The resize policy.
    pub fn resize_mode(&self) -> ResizeMode {
        self.resize_mode
    }

    /// The logical size last passed to [`refresh_size`](Self::refresh_size).
    pub fn tracked_extent(&self) -> Extent2D {
        self.tracked
    }

    /// The physical surface size implied by the tracked size and resize mode.
    pub fn derived_extent(&self) -> Extent2D {
        self.resize_mode.apply(self.tracked)
    }

    /// The deterministic name of the surface for `level`.
    pub fn surface_name(&self, level: AntiAliasLevel) -> String {
        format!("{}_{}aa", self.name, level)
    }

    /// Levels whose ring has been created, lowest first.
    pub fn created_levels(&self) -> Vec<AntiAliasLevel> {
        self.rings.keys().copied().collect()
    }

    /// The ring backing `level`, if it was ever requested.
    pub fn ring(&self, level: AntiAliasLevel) -> Option<&FrameBufferRing<Surface>> {
        self.rings.get(&level)
    }

    /// Returns the surface for `level` in the device's current frame slot.
    ///
    /// Creates the level's ring and the slot's surface on first access. A slot
    /// that was not current during the last [`refresh_size`](Self::refresh_size)
    /// is brought to the derived size here, once the fence has handed it back.
    pub fn get(
        &mut self,
        device: &dyn GraphicsDevice,
        level: AntiAliasLevel,
    ) -> Result<&Surface, ResourceError> {
        let frame = device.current_frame_index();
        let extent = self.derived_extent();
        let descriptor = TextureDescriptor {
            label: self.surface_name(level),
            extent,
            format: self.format,
            anti_alias: level,
            usage: self.usage,
        };
        let capacity = self.frames_in_flight;
        let ring = self
            .rings
            .entry(level)
            .or_insert_with(|| FrameBufferRing::new(descriptor.label.clone(), capacity));

        let surface = ring.prepare(frame, |_| Surface::create(device, descriptor))?;
        surface.resize(device, extent)?;
        Ok(surface)
    }

    /// Updates the tracked size and resizes the current instance of every
    /// created ring to the derived size.
    ///
    /// Levels never requested stay uncreated. Returns how many surfaces were
    /// actually resized, which is zero when the size did not change.
    pub fn refresh_size(
        &mut self,
        device: &dyn GraphicsDevice,
        width: u32,
        height: u32,
    ) -> Result<usize, ResourceError> {
        self.tracked = Extent2D::new(width, height);
        let extent = self.derived_extent();
        let frame = device.current_frame_index();

        let mut resized = 0;
        for ring in self.rings.values_mut() {
            if let Some(surface) = ring.current_mut(frame) {
                if surface.resize(device, extent)? {
                    resized += 1;
                }
            }
        }
        Ok(resized)
    }

    /// Releases every created surface across every level.
    ///
    /// Returns the number of surfaces released. Release failures are logged
    /// and do not stop the remaining releases.
    pub fn dispose(&mut self, device: &dyn GraphicsDevice) -> usize {
        let mut released = 0;
        for ring in self.rings.values_mut() {
            ring.release_all(|surface| {
                let label = surface.descriptor.label.clone();
                match surface.release(device) {
                    Ok(()) => released += 1,
                    Err(e) => log::warn!("Failed to release surface '{label}': {e}"),
                }
            });
        }
        self.rings.clear();
        self.disposed = true;
        released
    }
}

impl Drop for SurfaceTracker {
    fn drop(&mut self) {
        let live: usize = self.rings.values().map(FrameBufferRing::created).sum();
        if !self.disposed && live > 0 {
            log::warn!(
                "SurfaceTracker '{}' dropped with {live} live surface(s); call dispose() first",
                self.name
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDevice;

    fn color_tracker(mode: ResizeMode, w: u32, h: u32) -> SurfaceTracker {
        SurfaceTracker::new(
            "scene_color",
            TextureFormat::Rgba16Float,
            mode,
            Extent2D::new(w, h),
            2,
        )
    }

    #[test]
    fn half_mode_pads_odd_sizes() {
        let device = MockDevice::new();
        let mut tracker = color_tracker(ResizeMode::Half, 801, 601);
        let surface = tracker.get(&device, AntiAliasLevel::X1).unwrap();
        assert_eq!(surface.extent(), Extent2D::new(401, 301));
        tracker.dispose(&device);
    }

    #[test]
    fn levels_are_created_lazily() {
        let device = MockDevice::new();
        let mut tracker = color_tracker(ResizeMode::Full, 640, 480);
        assert!(tracker.created_levels().is_empty());
        assert_eq!(device.created(), 0);

        tracker.get(&device, AntiAliasLevel::X4).unwrap();
        assert_eq!(tracker.created_levels(), vec![AntiAliasLevel::X4]);
        assert!(tracker.ring(AntiAliasLevel::X1).is_none());
        assert_eq!(device.created(), 1);
        tracker.dispose(&device);
    }

    #[test]
    fn surfaces_are_named_by_level() {
        let device = MockDevice::new();
        let mut tracker = color_tracker(ResizeMode::Full, 64, 64);
        let surface = tracker.get(&device, AntiAliasLevel::X4).unwrap();
        assert_eq!(surface.descriptor().label, "scene_color_4aa");
        assert_eq!(surface.descriptor().anti_alias, AntiAliasLevel::X4);
        assert_eq!(tracker.surface_name(AntiAliasLevel::X1), "scene_color_1aa");
        tracker.dispose(&device);
    }

    #[test]
    fn refresh_with_same_size_is_idempotent() {
        let device = MockDevice::new();
        let mut tracker = color_tracker(ResizeMode::Full, 640, 480);
        tracker.get(&device, AntiAliasLevel::X1).unwrap();
        tracker.get(&device, AntiAliasLevel::X2).unwrap();

        assert_eq!(tracker.refresh_size(&device, 1280, 720).unwrap(), 2);
        assert_eq!(device.resized(), 2);
        assert_eq!(tracker.refresh_size(&device, 1280, 720).unwrap(), 0);
        assert_eq!(device.resized(), 2);
        tracker.dispose(&device);
    }

    #[test]
    fn refresh_leaves_uncreated_levels_alone() {
        let device = MockDevice::new();
        let mut tracker = color_tracker(ResizeMode::Full, 640, 480);
        tracker.get(&device, AntiAliasLevel::X1).unwrap();
        tracker.refresh_size(&device, 800, 600).unwrap();

        assert_eq!(tracker.created_levels(), vec![AntiAliasLevel::X1]);
        assert_eq!(device.created(), 1);
        let later = tracker.get(&device, AntiAliasLevel::X8).unwrap();
        assert_eq!(later.extent(), Extent2D::new(800, 600));
        tracker.dispose(&device);
    }

    #[test]
    fn slot_identity_survives_rotation() {
        let device = MockDevice::new();
        let mut tracker = color_tracker(ResizeMode::Full, 320, 240);

        let first = tracker.get(&device, AntiAliasLevel::X1).unwrap().texture();
        device.set_frame(1);
        let second = tracker.get(&device, AntiAliasLevel::X1).unwrap().texture();
        device.set_frame(2);
        let again = tracker.get(&device, AntiAliasLevel::X1).unwrap().texture();

        assert_ne!(first, second);
        assert_eq!(first, again);
        assert_eq!(device.created(), 2);
        assert_eq!(device.resized(), 0);
        tracker.dispose(&device);
    }

    #[test]
    fn stale_slot_catches_up_when_it_becomes_current() {
        let device = MockDevice::new();
        let mut tracker = color_tracker(ResizeMode::Full, 320, 240);
        tracker.get(&device, AntiAliasLevel::X1).unwrap();
        device.set_frame(1);
        tracker.get(&device, AntiAliasLevel::X1).unwrap();

        // Only slot 1 is current during the refresh.
        tracker.refresh_size(&device, 640, 480).unwrap();
        assert_eq!(device.resized(), 1);

        device.set_frame(2);
        let slot0 = tracker.get(&device, AntiAliasLevel::X1).unwrap();
        assert_eq!(slot0.extent(), Extent2D::new(640, 480));
        assert_eq!(device.resized(), 2);
        tracker.dispose(&device);
    }

    #[test]
    fn depth_tracker_reports_depth_kind() {
        let device = MockDevice::new();
        let mut tracker = SurfaceTracker::new(
            "scene_depth",
            TextureFormat::Depth32Float,
            ResizeMode::Full,
            Extent2D::new(16, 16),
            2,
        );
        assert_eq!(tracker.kind(), SurfaceKind::Depth);
        let surface = tracker.get(&device, AntiAliasLevel::X1).unwrap();
        assert_eq!(surface.descriptor().kind(), SurfaceKind::Depth);
        tracker.dispose(&device);
    }

    #[test]
    fn dispose_releases_every_level() {
        let device = MockDevice::new();
        let mut tracker = color_tracker(ResizeMode::Half, 100, 100);
        for level in AntiAliasLevel::ALL {
            tracker.get(&device, level).unwrap();
        }
        device.set_frame(1);
        tracker.get(&device, AntiAliasLevel::X1).unwrap();

        assert_eq!(tracker.dispose(&device), 5);
        assert_eq!(device.destroyed(), 5);
        assert_eq!(device.live_textures(), 0);
        assert!(tracker.created_levels().is_empty());
    }
}
