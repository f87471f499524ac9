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

//! The render-thread mirror of logical scenes.
//!
//! A [`SceneRenderData`] holds the layers, cameras, lights and renderable
//! batches of one scene. It is owned by the render thread and only ever mutated
//! by task processing, so none of these types carry locks.
//!
//! Handles ([`SceneId`], [`LayerId`], ...) are allocated by producers from
//! process-wide counters, which lets a producer refer to an entity in later tasks
//! before the task that creates it has been drained.

mod error;
mod ids;
mod layer;
mod light;
mod registry;
mod render_data;

pub use self::error::SceneError;
pub use self::ids::*;
pub use self::layer::{Layer, ObjectRenderData, RenderBatch, ReorderMode};
pub use self::light::{CapsuleLight, LightList, PointLight, SceneLight};
pub use self::registry::SceneRegistry;
pub use self::render_data::{Camera, SceneConfig, SceneRenderData, Viewport};
