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

//! Structural failures raised while mutating scene render data.

use super::{LayerId, LightId, ObjectId, RenderableId};

/// A scene mutation that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The layer is not part of the scene.
    #[error("layer {0} is not part of the scene")]
    LayerNotFound(LayerId),
    /// A layer with this handle already exists in the scene.
    #[error("layer {0} already exists in the scene")]
    DuplicateLayer(LayerId),
    /// The renderable was never added to the layer.
    #[error("renderable {renderable} is not present in layer {layer}")]
    RenderableNotInLayer {
        /// The renderable that was looked up.
        renderable: RenderableId,
        /// The layer that was searched.
        layer: LayerId,
    },
    /// The renderable's batch does not hold the instance.
    #[error("object {object} is not an instance of renderable {renderable}")]
    ObjectNotInBatch {
        /// The missing instance.
        object: ObjectId,
        /// The batch that was searched.
        renderable: RenderableId,
    },
    /// The light is not part of the scene.
    #[error("light {0} is not part of the scene")]
    LightNotFound(LightId),
}
