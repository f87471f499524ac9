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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::api::TextureFormat;
use std::fmt;

/// An error related to the creation or use of a GPU resource (buffers, textures, etc.).
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// A generic resource could not be found.
    NotFound,
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// A clear or draw targeted a texture that was not created as a render attachment.
    NotRenderTarget,
    /// The texture format does not match what the operation requires.
    FormatMismatch {
        /// The format the operation expected (or a representative of the expected class).
        expected: TextureFormat,
        /// The format the resource actually has.
        found: TextureFormat,
    },
    /// A zero-sized or otherwise unusable extent was requested.
    InvalidExtent,
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
    /// An attempt was made to access a resource out of its bounds (e.g., in a buffer).
    OutOfBounds,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::NotRenderTarget => {
                write!(f, "Texture is not a render target.")
            }
            ResourceError::FormatMismatch { expected, found } => {
                write!(f, "Texture format mismatch: expected {expected:?}, found {found:?}")
            }
            ResourceError::InvalidExtent => write!(f, "Invalid (zero-sized) resource extent."),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
            ResourceError::OutOfBounds => {
                write!(f, "Resource access out of bounds.")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// A high-level error that can occur within the frame loop or graphics device.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A failure occurred during the initialization of the graphics backend.
    InitializationFailed(String),
    /// Failed to acquire the next backbuffer from the presentation surface.
    SurfaceAcquisitionFailed(String),
    /// A critical, unrecoverable rendering operation failed.
    RenderingFailed(String),
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
    /// The graphics device was lost and needs to be reinitialized.
    DeviceLost,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize graphics backend: {msg}")
            }
            RenderError::SurfaceAcquisitionFailed(msg) => {
                write!(f, "Failed to acquire surface for rendering: {msg}")
            }
            RenderError::RenderingFailed(msg) => {
                write!(f, "A critical rendering operation failed: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::DeviceLost => write!(
                f,
                "The graphics device was lost and needs to be reinitialized."
            ),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn format_mismatch_display() {
        let err = ResourceError::FormatMismatch {
            expected: TextureFormat::Depth32Float,
            found: TextureFormat::Rgba8Unorm,
        };
        assert_eq!(
            format!("{err}"),
            "Texture format mismatch: expected Depth32Float, found Rgba8Unorm"
        );
    }

    #[test]
    fn render_error_display_wrapping_resource_error() {
        let render_err: RenderError = ResourceError::NotRenderTarget.into();
        assert_eq!(
            format!("{render_err}"),
            "Graphics resource operation failed: Texture is not a render target."
        );
        assert!(render_err.source().is_some());
    }

    #[test]
    fn device_lost_has_no_source() {
        assert!(RenderError::DeviceLost.source().is_none());
    }
}
