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

//! Layers: ordered draw buckets holding per-renderable batches of object instances.

use super::{LayerId, ObjectId, RenderableId, SceneError};
use crate::math::LinearRgba;
use ahash::AHashMap;

/// Where a layer moves to when reordered within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReorderMode {
    /// One step towards the start of the draw order, clamped at the first slot.
    PushBackward,
    /// One step towards the end of the draw order; a no-op for the last layer.
    PushForward,
    /// Moves to the end of the draw order (drawn last).
    BringToFront,
    /// Moves to the start of the draw order (drawn first).
    SendToBack,
}

/// Per-object data needed to draw one instance of a renderable.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRenderData {
    /// The instance this data belongs to.
    pub object: ObjectId,
    /// Column-major object-to-world transform.
    pub transform: [f32; 16],
    /// Per-instance color multiplier.
    pub tint: LinearRgba,
}

impl ObjectRenderData {
    /// Identity transform, white tint.
    pub const IDENTITY: [f32; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    /// Creates render data for `object` with an identity transform.
    pub fn new(object: ObjectId) -> Self {
        Self {
            object,
            transform: Self::IDENTITY,
            tint: LinearRgba::WHITE,
        }
    }

    /// Sets the transform.
    pub fn with_transform(mut self, transform: [f32; 16]) -> Self {
        self.transform = transform;
        self
    }
}

/// All instances of one renderable within one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBatch {
    renderable: RenderableId,
    objects: Vec<ObjectRenderData>,
}

impl RenderBatch {
    fn new(renderable: RenderableId) -> Self {
        Self {
            renderable,
            objects: Vec::new(),
        }
    }

    /// The renderable this batch draws.
    pub fn renderable(&self) -> RenderableId {
        self.renderable
    }

    /// Object instances in insertion order.
    pub fn objects(&self) -> &[ObjectRenderData] {
        &self.objects
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` once the last instance has been removed.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// A draw-order bucket of renderable batches.
///
/// Batches keep their first-insertion order. A batch whose last instance is
/// removed stays in place, empty, until [`Layer::prune_empty_batches`] is called.
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    name: String,
    batches: Vec<RenderBatch>,
    lookup: AHashMap<RenderableId, usize>,
}

impl Layer {
    /// Creates an empty layer.
    pub fn new(id: LayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            batches: Vec::new(),
            lookup: AHashMap::new(),
        }
    }

    /// The layer's handle.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The layer's debug name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends an instance to the renderable's batch, creating the batch on first use.
    pub fn add_object(&mut self, renderable: RenderableId, object: ObjectRenderData) {
        let index = match self.lookup.get(&renderable) {
            Some(&index) => index,
            None => {
                self.batches.push(RenderBatch::new(renderable));
                let index = self.batches.len() - 1;
                self.lookup.insert(renderable, index);
                index
            }
        };
        self.batches[index].objects.push(object);
    }

    /// Removes one instance from the renderable's batch.
    ///
    /// Removing from a renderable that was never added to this layer is an error,
    /// as is removing an instance the batch does not hold.
    pub fn remove_object(
        &mut self,
        renderable: RenderableId,
        object: ObjectId,
    ) -> Result<ObjectRenderData, SceneError> {
        let index = *self
            .lookup
            .get(&renderable)
            .ok_or(SceneError::RenderableNotInLayer {
                renderable,
                layer: self.id,
            })?;
        let batch = &mut self.batches[index];
        let position = batch
            .objects
            .iter()
            .position(|o| o.object == object)
            .ok_or(SceneError::ObjectNotInBatch { object, renderable })?;
        Ok(batch.objects.remove(position))
    }

    /// Returns the batch for a renderable, including an emptied one.
    pub fn batch(&self, renderable: RenderableId) -> Option<&RenderBatch> {
        self.lookup.get(&renderable).map(|&i| &self.batches[i])
    }

    /// Batches in first-insertion order.
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    /// Total number of object instances across all batches.
    pub fn object_count(&self) -> usize {
        self.batches.iter().map(RenderBatch::len).sum()
    }

    /// Drops batches with no instances left and returns how many were removed.
    pub fn prune_empty_batches(&mut self) -> usize {
        let before = self.batches.len();
        self.batches.retain(|b| !b.is_empty());
        let pruned = before - self.batches.len();
        if pruned > 0 {
            self.lookup = self
                .batches
                .iter()
                .enumerate()
                .map(|(i, b)| (b.renderable, i))
                .collect();
        }
        pruned
    }
}
