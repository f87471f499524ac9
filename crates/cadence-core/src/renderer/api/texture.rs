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

//! Defines data structures related to GPU texture resources.

use crate::math::Extent2D;
use crate::renderer::api::AntiAliasLevel;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// An opaque handle to a GPU texture owned by the graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// Pixel formats understood by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFormat {
    /// 8-bit RGBA, linear.
    Rgba8Unorm,
    /// 8-bit RGBA, sRGB encoded.
    Rgba8UnormSrgb,
    /// 8-bit BGRA, sRGB encoded. The usual swapchain format.
    Bgra8UnormSrgb,
    /// 16-bit float RGBA, for HDR targets.
    Rgba16Float,
    /// 32-bit float single channel.
    R32Float,
    /// 32-bit float depth.
    Depth32Float,
    /// 24-bit depth with 8-bit stencil.
    Depth24PlusStencil8,
}

impl TextureFormat {
    /// Returns `true` for depth or depth/stencil formats.
    pub fn is_depth(self) -> bool {
        matches!(
            self,
            TextureFormat::Depth32Float | TextureFormat::Depth24PlusStencil8
        )
    }

    /// Returns `true` if the format carries a stencil aspect.
    pub fn has_stencil(self) -> bool {
        matches!(self, TextureFormat::Depth24PlusStencil8)
    }

    /// Size of one texel in bytes.
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::Rgba8Unorm
            | TextureFormat::Rgba8UnormSrgb
            | TextureFormat::Bgra8UnormSrgb
            | TextureFormat::R32Float
            | TextureFormat::Depth32Float
            | TextureFormat::Depth24PlusStencil8 => 4,
            TextureFormat::Rgba16Float => 8,
        }
    }
}

/// Whether a surface holds color or depth data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// A color render target.
    Color,
    /// A depth (and possibly stencil) render target.
    Depth,
}

impl From<TextureFormat> for SurfaceKind {
    fn from(format: TextureFormat) -> Self {
        if format.is_depth() {
            SurfaceKind::Depth
        } else {
            SurfaceKind::Color
        }
    }
}

bitflags! {
    /// A set of flags describing the allowed usages of a texture.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        /// The texture can be used as the source of a copy operation.
        const COPY_SRC = 1 << 0;
        /// The texture can be used as the destination of a copy operation.
        const COPY_DST = 1 << 1;
        /// The texture can be bound in a shader for sampling.
        const TEXTURE_BINDING = 1 << 2;
        /// The texture can be used as a storage texture.
        const STORAGE_BINDING = 1 << 3;
        /// The texture can be used as a color or depth attachment in a render pass.
        const RENDER_ATTACHMENT = 1 << 4;
    }
}

/// Describes a texture to be created by the graphics device.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDescriptor {
    /// Debug name, also used to derive per-quality-level surface names.
    pub label: String,
    /// Size in pixels.
    pub extent: Extent2D,
    /// Pixel format.
    pub format: TextureFormat,
    /// Multisampling level.
    pub anti_alias: AntiAliasLevel,
    /// Allowed usages.
    pub usage: TextureUsage,
}

impl TextureDescriptor {
    /// A sampled render attachment, the common case for tracked surfaces.
    pub fn render_target(
        label: impl Into<String>,
        extent: Extent2D,
        format: TextureFormat,
        anti_alias: AntiAliasLevel,
    ) -> Self {
        Self {
            label: label.into(),
            extent,
            format,
            anti_alias,
            usage: TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
        }
    }

    /// Returns `true` if the texture can be cleared or drawn into.
    pub fn is_render_target(&self) -> bool {
        self.usage.contains(TextureUsage::RENDER_ATTACHMENT)
    }

    /// The surface kind implied by the format.
    pub fn kind(&self) -> SurfaceKind {
        self.format.into()
    }

    /// Approximate memory footprint in bytes, including multisample copies.
    pub fn size_in_bytes(&self) -> u64 {
        self.extent.area()
            * self.format.bytes_per_pixel() as u64
            * self.anti_alias.samples() as u64
    }
}
