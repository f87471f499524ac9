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

//! # Cadence Core
//!
//! Foundational crate containing the contracts that let scene mutations produced
//! on any thread be applied safely to GPU-bound state owned by the render thread.
//!
//! - [`task`]: deferred, data-described mutations and the priority-bucketed queue
//!   that drains them at frame synchronization points.
//! - [`resource`]: frame-in-flight rotation of physical GPU resources and the
//!   per-quality-level surface trackers built on top of it.
//! - [`scene`]: the render-thread mirror of a logical scene.
//! - [`renderer`]: backend-agnostic handles, the [`GraphicsDevice`] boundary,
//!   error types and settings.

#![warn(missing_docs)]

pub mod math;
pub mod renderer;
pub mod resource;
pub mod scene;
pub mod task;

#[cfg(test)]
mod testing;

pub use renderer::{GraphicsDevice, RenderSettings};
pub use task::{Priority, Task, TaskKind, TaskQueue, TaskSender};
