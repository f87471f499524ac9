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

//! Packing of scene lights into a per-frame uniform buffer.

use super::{FrameContext, RenderStep, StepError};
use bytemuck::Zeroable;
use cadence_core::math::LinearRgba;
use cadence_core::renderer::api::{BufferDescriptor, BufferId, GpuCommand};
use cadence_core::renderer::GraphicsDevice;
use cadence_core::resource::FrameBufferRing;
use cadence_core::scene::{CapsuleLight, PointLight};

/// Maximum number of point lights in the lighting uniform buffer.
pub const MAX_POINT_LIGHTS: usize = 16;
/// Maximum number of capsule lights in the lighting uniform buffer.
pub const MAX_CAPSULE_LIGHTS: usize = 8;
/// Binding slot of the lighting uniform buffer.
pub const LIGHTING_SLOT: u32 = 0;

/// A point light, formatted for GPU consumption.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    /// Position (xyz) and radius (w).
    pub position: [f32; 4],
    /// Linear color.
    pub color: LinearRgba,
    /// Intensity (x), padding (yzw).
    pub params: [f32; 4],
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        let [x, y, z] = light.position;
        Self {
            position: [x, y, z, light.radius],
            color: light.color,
            params: [light.intensity, 0.0, 0.0, 0.0],
        }
    }
}

/// A capsule light, formatted for GPU consumption.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CapsuleLightUniform {
    /// Segment start (xyz) and radius (w).
    pub start: [f32; 4],
    /// Segment end (xyz), padding (w).
    pub end: [f32; 4],
    /// Linear color.
    pub color: LinearRgba,
    /// Intensity (x), padding (yzw).
    pub params: [f32; 4],
}

impl From<&CapsuleLight> for CapsuleLightUniform {
    fn from(light: &CapsuleLight) -> Self {
        let [sx, sy, sz] = light.start;
        let [ex, ey, ez] = light.end;
        Self {
            start: [sx, sy, sz, light.radius],
            end: [ex, ey, ez, 0.0],
            color: light.color,
            params: [light.intensity, 0.0, 0.0, 0.0],
        }
    }
}

/// The layout of the lighting uniform buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniforms {
    /// Point lights; only the first `num_point_lights` are valid.
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    /// Capsule lights; only the first `num_capsule_lights` are valid.
    pub capsule_lights: [CapsuleLightUniform; MAX_CAPSULE_LIGHTS],
    /// Ambient color of the first visible scene.
    pub ambient: LinearRgba,
    /// Number of valid point lights.
    pub num_point_lights: u32,
    /// Number of valid capsule lights.
    pub num_capsule_lights: u32,
    /// Padding for 16-byte alignment.
    pub _padding: [u32; 2],
}

/// Uploads the lights of every visible scene and binds them for shading.
///
/// The uniform buffer is written every frame, so it is rotated through a
/// [`FrameBufferRing`]: the copy written for frame N is never the one the GPU
/// may still be reading for frame N-1.
#[derive(Debug)]
pub struct LightingStep {
    ring: FrameBufferRing<BufferId>,
}

impl LightingStep {
    /// Creates the step with one uniform buffer per frame in flight.
    pub fn new(frames_in_flight: usize) -> Self {
        Self {
            ring: FrameBufferRing::new("lighting_uniforms", frames_in_flight),
        }
    }

    /// The rotation of uniform buffers.
    pub fn ring(&self) -> &FrameBufferRing<BufferId> {
        &self.ring
    }

    fn pack(ctx: &FrameContext<'_>) -> LightingUniforms {
        let mut uniforms = LightingUniforms::zeroed();
        let mut points = 0;
        let mut capsules = 0;
        let mut dropped = 0;
        let mut ambient = None;

        for scene in ctx.scenes.iter().filter(|s| s.is_visible()) {
            if ambient.is_none() {
                ambient = Some(scene.config().ambient);
            }
            for (_, light) in scene.point_lights().iter() {
                match uniforms.point_lights.get_mut(points) {
                    Some(slot) => {
                        *slot = light.into();
                        points += 1;
                    }
                    None => dropped += 1,
                }
            }
            for (_, light) in scene.capsule_lights().iter() {
                match uniforms.capsule_lights.get_mut(capsules) {
                    Some(slot) => {
                        *slot = light.into();
                        capsules += 1;
                    }
                    None => dropped += 1,
                }
            }
        }

        if dropped > 0 {
            log::warn!("LightingStep: {dropped} light(s) over the uniform capacity were skipped");
        }
        uniforms.ambient = ambient.unwrap_or(LinearRgba::BLACK);
        uniforms.num_point_lights = points as u32;
        uniforms.num_capsule_lights = capsules as u32;
        uniforms
    }
}

impl RenderStep for LightingStep {
    fn name(&self) -> &'static str {
        "Lighting"
    }

    fn execute(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), StepError> {
        let uniforms = Self::pack(ctx);
        let device = ctx.device;
        let buffer = *self.ring.prepare(ctx.frame_index, |slot| {
            device.create_buffer(&BufferDescriptor::uniform_array::<LightingUniforms>(
                format!("lighting_uniforms_{slot}"),
                1,
            ))
        })?;
        device.write_buffer(buffer, 0, bytemuck::bytes_of(&uniforms))?;

        ctx.record(GpuCommand::BindBuffer {
            slot: LIGHTING_SLOT,
            buffer,
        });
        ctx.stats.point_lights = uniforms.num_point_lights as usize;
        ctx.stats.capsule_lights = uniforms.num_capsule_lights as usize;
        Ok(())
    }

    fn on_shutdown(&mut self, device: &dyn GraphicsDevice) {
        self.ring.release_all(|buffer| {
            if let Err(e) = device.destroy_buffer(buffer) {
                log::warn!("LightingStep: failed to destroy {buffer:?}: {e}");
            }
        });
    }
}
