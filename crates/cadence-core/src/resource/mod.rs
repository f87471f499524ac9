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

//! Frame-in-flight resource rotation.
//!
//! GPU resources that an in-flight frame may still be reading (render targets,
//! depth surfaces, constant buffers) cannot be mutated in place. Each logical
//! resource is instead backed by a [`FrameBufferRing`] of up to
//! [`MAX_FRAMES_IN_FLIGHT`](crate::renderer::MAX_FRAMES_IN_FLIGHT) physical
//! copies, one per frame slot. A [`SurfaceTracker`] keys such rings by
//! anti-aliasing level and keeps them sized to a tracked resolution.

mod frame_ring;
mod surface;

pub use self::frame_ring::FrameBufferRing;
pub use self::surface::{Surface, SurfaceTracker};
