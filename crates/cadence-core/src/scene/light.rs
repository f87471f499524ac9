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

//! Scene light instances and the free-list storage that holds them.

use super::LightId;
use crate::math::LinearRgba;
use ahash::AHashMap;

/// An omnidirectional light with a finite range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position.
    pub position: [f32; 3],
    /// Distance at which the light's contribution reaches zero.
    pub radius: f32,
    /// Linear color.
    pub color: LinearRgba,
    /// Brightness multiplier.
    pub intensity: f32,
}

/// A light emitted along a line segment, with a radius around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleLight {
    /// World-space start of the segment.
    pub start: [f32; 3],
    /// World-space end of the segment.
    pub end: [f32; 3],
    /// Distance from the segment at which the contribution reaches zero.
    pub radius: f32,
    /// Linear color.
    pub color: LinearRgba,
    /// Brightness multiplier.
    pub intensity: f32,
}

/// A light to be inserted into a scene, tagged with its producer-allocated handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneLight {
    /// A point light.
    Point(LightId, PointLight),
    /// A capsule light.
    Capsule(LightId, CapsuleLight),
}

impl SceneLight {
    /// The handle of the light.
    pub fn id(&self) -> LightId {
        match self {
            SceneLight::Point(id, _) | SceneLight::Capsule(id, _) => *id,
        }
    }
}

#[derive(Debug, Clone)]
struct LightSlot<T> {
    id: LightId,
    light: T,
}

/// Fixed-capacity, growable storage with slot reuse.
///
/// Removed slots go onto a free list and are handed out again before the
/// storage grows. When no slot is free the capacity doubles.
#[derive(Debug, Clone)]
pub struct LightList<T> {
    slots: Vec<Option<LightSlot<T>>>,
    free: Vec<usize>,
    lookup: AHashMap<LightId, usize>,
}

impl<T> LightList<T> {
    /// Creates a list with `capacity` pre-allocated slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut list = Self {
            slots: Vec::new(),
            free: Vec::new(),
            lookup: AHashMap::new(),
        };
        list.grow_to(capacity);
        list
    }

    fn grow_to(&mut self, capacity: usize) {
        let old = self.slots.len();
        if capacity <= old {
            return;
        }
        self.slots.resize_with(capacity, || None);
        // Lowest index is handed out first.
        self.free.extend((old..capacity).rev());
    }

    /// Inserts a light and returns its slot index.
    ///
    /// Inserting an id that is already present replaces the light in place.
    pub fn insert(&mut self, id: LightId, light: T) -> usize {
        if let Some(&index) = self.lookup.get(&id) {
            self.slots[index] = Some(LightSlot { id, light });
            return index;
        }
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = self.slots.len();
                let capacity = (index * 2).max(1);
                log::debug!("LightList: growing from {index} to {capacity} slots");
                self.grow_to(capacity);
                // grow_to pushes the new slots highest-first, so `index` is on top.
                self.free.pop();
                index
            }
        };
        self.slots[index] = Some(LightSlot { id, light });
        self.lookup.insert(id, index);
        index
    }

    /// Removes a light, returning it if it was present.
    pub fn remove(&mut self, id: LightId) -> Option<T> {
        let index = self.lookup.remove(&id)?;
        let slot = self.slots[index].take()?;
        self.free.push(index);
        Some(slot.light)
    }

    /// Returns the light with the given handle.
    pub fn get(&self, id: LightId) -> Option<&T> {
        let index = *self.lookup.get(&id)?;
        self.slots[index].as_ref().map(|s| &s.light)
    }

    /// Returns `true` if the light is present.
    pub fn contains(&self, id: LightId) -> bool {
        self.lookup.contains_key(&id)
    }

    /// Number of live lights.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Returns `true` if no lights are live.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Number of allocated slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Live lights in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (LightId, &T)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|s| (s.id, &s.light)))
    }
}

impl<T> Default for LightList<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
