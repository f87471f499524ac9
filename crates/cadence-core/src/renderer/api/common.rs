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

//! Provides common, backend-agnostic enums and constants for the rendering API.

use crate::math::Extent2D;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on the number of frames the CPU may record ahead of the GPU.
///
/// Frame buffer rings never hold more physical copies than this.
pub const MAX_FRAMES_IN_FLIGHT: usize = 3;

/// The multisampling variant of a tracked surface.
///
/// Used as the key of a surface tracker: each level owns its own ring of
/// physical surfaces, created only once that level is first requested.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum AntiAliasLevel {
    /// 1 sample per pixel (MSAA disabled).
    #[default]
    X1,
    /// 2 samples per pixel.
    X2,
    /// 4 samples per pixel.
    X4,
    /// 8 samples per pixel.
    X8,
}

impl AntiAliasLevel {
    /// All supported levels, lowest first.
    pub const ALL: [AntiAliasLevel; 4] = [Self::X1, Self::X2, Self::X4, Self::X8];

    /// The number of samples per pixel for this level.
    pub fn samples(self) -> u32 {
        match self {
            AntiAliasLevel::X1 => 1,
            AntiAliasLevel::X2 => 2,
            AntiAliasLevel::X4 => 4,
            AntiAliasLevel::X8 => 8,
        }
    }

    /// Returns the level matching a sample count, if supported.
    pub fn from_samples(samples: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.samples() == samples)
    }
}

impl fmt::Display for AntiAliasLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.samples())
    }
}

/// How a surface tracker derives physical surface sizes from its tracked size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResizeMode {
    /// Surfaces match the tracked size exactly.
    #[default]
    Full,
    /// Surfaces are half the tracked size plus one pixel of padding.
    Half,
}

impl ResizeMode {
    /// Applies the policy to a tracked size.
    pub fn apply(self, tracked: Extent2D) -> Extent2D {
        match self {
            ResizeMode::Full => tracked.at_least_one(),
            ResizeMode::Half => tracked.half_padded(),
        }
    }
}

/// Counts of live device resources, as reported by
/// [`GraphicsDevice::live_resources`](crate::renderer::GraphicsDevice::live_resources).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiveResources {
    /// Live textures.
    pub textures: usize,
    /// Live buffers.
    pub buffers: usize,
}

impl LiveResources {
    /// Returns `true` if nothing is alive.
    pub fn is_empty(&self) -> bool {
        self.textures == 0 && self.buffers == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anti_alias_display_is_sample_count() {
        assert_eq!(AntiAliasLevel::X4.to_string(), "4");
        assert_eq!(AntiAliasLevel::from_samples(8), Some(AntiAliasLevel::X8));
        assert_eq!(AntiAliasLevel::from_samples(3), None);
    }

    #[test]
    fn resize_mode_applies_policy() {
        let tracked = Extent2D::new(801, 601);
        assert_eq!(ResizeMode::Full.apply(tracked), tracked);
        assert_eq!(ResizeMode::Half.apply(tracked), Extent2D::new(401, 301));
        assert_eq!(ResizeMode::Full.apply(Extent2D::new(0, 0)), Extent2D::new(1, 1));
    }
}
