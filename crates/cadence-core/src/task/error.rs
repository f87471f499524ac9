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

use crate::renderer::api::SurfaceKind;
use crate::renderer::ResourceError;
use crate::scene::{SceneError, SceneId};

/// Why a task's processing failed.
///
/// Task errors never reach the producer that pushed the task; they are logged
/// and turned into `false` for the completion callback.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaskError {
    /// The scene handle does not refer to a live scene.
    #[error("scene {0} does not exist")]
    SceneNotFound(SceneId),
    /// A scene with this handle is already live.
    #[error("scene {0} already exists")]
    DuplicateScene(SceneId),
    /// The scene rejected the mutation.
    #[error(transparent)]
    Scene(#[from] SceneError),
    /// The graphics device rejected the operation.
    #[error("{0}")]
    Resource(#[from] ResourceError),
    /// The target surface is of the wrong kind for the operation.
    #[error("expected a {expected:?} surface, found a {found:?} surface")]
    WrongSurfaceKind {
        /// What the task operates on.
        expected: SurfaceKind,
        /// What the target actually is.
        found: SurfaceKind,
    },
    /// A compute dispatch had a zero-sized workgroup count.
    #[error("dispatch has an empty workgroup count {0:?}")]
    InvalidDispatch([u32; 3]),
    /// Processing panicked; the payload message is kept.
    #[error("task panicked: {0}")]
    Panicked(String),
}
