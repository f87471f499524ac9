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

use super::TaskError;
use crate::renderer::GraphicsDevice;
use crate::scene::{SceneId, SceneRegistry, SceneRenderData};

/// Everything a task may touch while it is processed on the render thread.
///
/// Tasks never reach for global state: the scenes and the device are handed
/// in explicitly by whoever drains the queue.
pub struct TaskContext<'a> {
    /// The render thread's live scenes.
    pub scenes: &'a mut SceneRegistry,
    /// The device used for surface and compute tasks.
    pub device: &'a dyn GraphicsDevice,
}

impl<'a> TaskContext<'a> {
    /// Bundles the render thread's state for one drain pass.
    pub fn new(scenes: &'a mut SceneRegistry, device: &'a dyn GraphicsDevice) -> Self {
        Self { scenes, device }
    }

    /// Looks up a live scene for mutation.
    pub fn scene_mut(&mut self, id: SceneId) -> Result<&mut SceneRenderData, TaskError> {
        self.scenes.get_mut(id).ok_or(TaskError::SceneNotFound(id))
    }
}
