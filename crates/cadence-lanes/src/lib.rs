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

//! Per-frame consumers of scene render data.
//!
//! A frame is rendered by running an ordered list of [`RenderStep`]s over a
//! shared [`FrameContext`]. The steps record [`GpuCommand`]s into the frame's
//! command list; the last one submits it.
//!
//! [`GpuCommand`]: cadence_core::renderer::api::GpuCommand

#![warn(missing_docs)]

pub mod render_lane;

pub use render_lane::*;
