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

//! The render thread's table of live scenes.

use super::{SceneId, SceneRenderData};
use ahash::AHashMap;

/// Owns every live [`SceneRenderData`], keyed by handle.
///
/// Iteration follows scene creation order so frames are reproducible.
#[derive(Debug)]
pub struct SceneRegistry {
    scenes: AHashMap<SceneId, SceneRenderData>,
    order: Vec<SceneId>,
    point_light_capacity: usize,
    capsule_light_capacity: usize,
}

impl SceneRegistry {
    /// Creates an empty registry; new scenes get light lists of the given capacities.
    pub fn new(point_light_capacity: usize, capsule_light_capacity: usize) -> Self {
        Self {
            scenes: AHashMap::new(),
            order: Vec::new(),
            point_light_capacity,
            capsule_light_capacity,
        }
    }

    /// Creates a scene. Returns `false` if the handle is already live.
    pub fn create(&mut self, id: SceneId) -> bool {
        if self.scenes.contains_key(&id) {
            return false;
        }
        self.scenes.insert(
            id,
            SceneRenderData::new(id, self.point_light_capacity, self.capsule_light_capacity),
        );
        self.order.push(id);
        true
    }

    /// Removes a scene, returning its data if it was live.
    pub fn remove(&mut self, id: SceneId) -> Option<SceneRenderData> {
        let scene = self.scenes.remove(&id)?;
        self.order.retain(|s| *s != id);
        Some(scene)
    }

    /// Returns `true` if the handle refers to a live scene.
    pub fn contains(&self, id: SceneId) -> bool {
        self.scenes.contains_key(&id)
    }

    /// Returns a scene by handle.
    pub fn get(&self, id: SceneId) -> Option<&SceneRenderData> {
        self.scenes.get(&id)
    }

    /// Returns a scene by handle, mutably.
    pub fn get_mut(&mut self, id: SceneId) -> Option<&mut SceneRenderData> {
        self.scenes.get_mut(&id)
    }

    /// Live scenes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneRenderData> {
        self.order.iter().filter_map(|id| self.scenes.get(id))
    }

    /// Number of live scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Returns `true` if no scene is live.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new(16, 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenes_iterate_in_creation_order() {
        let mut registry = SceneRegistry::default();
        assert!(registry.create(SceneId(3)));
        assert!(registry.create(SceneId(1)));
        assert!(registry.create(SceneId(2)));
        assert!(!registry.create(SceneId(1)));

        registry.remove(SceneId(1));
        let ids: Vec<_> = registry.iter().map(SceneRenderData::id).collect();
        assert_eq!(ids, vec![SceneId(3), SceneId(2)]);
    }

    #[test]
    fn new_scenes_use_configured_light_capacity() {
        let mut registry = SceneRegistry::new(5, 3);
        registry.create(SceneId(1));
        let scene = registry.get(SceneId(1)).unwrap();
        assert_eq!(scene.point_lights().capacity(), 5);
        assert_eq!(scene.capsule_lights().capacity(), 3);
    }
}
