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

//! Defines the `LinearRgba` color type used for clear values, ambient terms and light colors.

use serde::{Deserialize, Serialize};

/// A color in **linear RGBA** space using `f32` components.
///
/// `#[repr(C)]` and the `Pod` derive allow the color to be copied verbatim into
/// GPU uniform buffers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Default,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct LinearRgba {
    /// The red component in linear space.
    pub r: f32,
    /// The green component in linear space.
    pub g: f32,
    /// The blue component in linear space.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl LinearRgba {
    /// Opaque white (`[1.0, 1.0, 1.0, 1.0]`).
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black (`[0.0, 0.0, 0.0, 1.0]`).
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fully transparent black (`[0.0, 0.0, 0.0, 0.0]`).
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new `LinearRgba` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `LinearRgba` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a `LinearRgba` by converting from normalized sRGB components.
    #[inline]
    pub fn from_srgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: srgb_to_linear(r),
            g: srgb_to_linear(g),
            b: srgb_to_linear(b),
            a: 1.0,
        }
    }

    /// Returns the components as an `[r, g, b, a]` array.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Scales the RGB components by `intensity`, leaving alpha untouched.
    #[inline]
    pub fn scaled(self, intensity: f32) -> Self {
        Self {
            r: self.r * intensity,
            g: self.g * intensity,
            b: self.b * intensity,
            a: self.a,
        }
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_endpoints_are_preserved() {
        let black = LinearRgba::from_srgb(0.0, 0.0, 0.0);
        let white = LinearRgba::from_srgb(1.0, 1.0, 1.0);
        assert_eq!(black, LinearRgba::BLACK);
        assert!((white.r - 1.0).abs() < 1e-6);
        assert!((white.b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn scaled_keeps_alpha() {
        let c = LinearRgba::new(0.5, 0.25, 1.0, 0.5).scaled(2.0);
        assert_eq!(c.to_array(), [1.0, 0.5, 2.0, 0.5]);
    }

    #[test]
    fn color_is_pod() {
        let c = LinearRgba::rgb(0.1, 0.2, 0.3);
        let bytes: &[u8] = bytemuck::bytes_of(&c);
        assert_eq!(bytes.len(), 16);
    }
}
