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

//! A fixed-capacity rotation of lazily created physical resource instances.
//!
//! ```text
//! Frame N:     [Slot 0: GPU reads]  <- submitted last frame
//! Frame N+1:   [Slot 1: CPU writes] <- prepare(N+1) selects this slot
//! Frame N+2:   [Slot 0: CPU writes] <- fence guarantees the GPU is done with it
//! ```
//!
//! The ring holds no timing logic: the slot is `frame_index % capacity`, and the
//! device's frame fence is responsible for having retired a slot's previous
//! frame before that slot is prepared again.

use crate::renderer::api::MAX_FRAMES_IN_FLIGHT;

/// Rotates up to [`MAX_FRAMES_IN_FLIGHT`] physical copies of one logical resource.
///
/// Slots start empty and are filled on first [`prepare`](FrameBufferRing::prepare).
/// A slot keeps its instance until the ring is released, so preparing the same
/// slot again returns the same instance.
#[derive(Debug)]
pub struct FrameBufferRing<T> {
    slots: Vec<Option<T>>,
    label: String,
}

impl<T> FrameBufferRing<T> {
    /// Creates an empty ring with one slot per frame in flight.
    ///
    /// `capacity` is clamped to `1..=MAX_FRAMES_IN_FLIGHT`.
    pub fn new(label: impl Into<String>, capacity: usize) -> Self {
        let label = label.into();
        let clamped = capacity.clamp(1, MAX_FRAMES_IN_FLIGHT);
        if clamped != capacity {
            log::warn!(
                "FrameBufferRing({label}): capacity {capacity} clamped to {clamped}"
            );
        }
        let mut slots = Vec::with_capacity(clamped);
        slots.resize_with(clamped, || None);
        Self { slots, label }
    }

    /// The ring's debug label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The slot a frame maps to.
    pub fn slot_index(&self, frame_index: u64) -> usize {
        (frame_index % self.slots.len() as u64) as usize
    }

    /// Returns the instance for the frame's slot, creating it with `create` if
    /// the slot is still empty.
    ///
    /// `create` receives the slot index. On error the slot stays empty.
    pub fn prepare<E>(
        &mut self,
        frame_index: u64,
        create: impl FnOnce(usize) -> Result<T, E>,
    ) -> Result<&mut T, E> {
        let slot = self.slot_index(frame_index);
        let entry = &mut self.slots[slot];
        let instance = match entry.take() {
            Some(instance) => instance,
            None => {
                log::debug!("FrameBufferRing({}): creating slot {slot}", self.label);
                create(slot)?
            }
        };
        Ok(entry.insert(instance))
    }

    /// The frame's instance, if its slot has been created.
    pub fn current(&self, frame_index: u64) -> Option<&T> {
        self.slots[self.slot_index(frame_index)].as_ref()
    }

    /// The frame's instance, mutably, if its slot has been created.
    pub fn current_mut(&mut self, frame_index: u64) -> Option<&mut T> {
        let slot = self.slot_index(frame_index);
        self.slots[slot].as_mut()
    }

    /// Created instances with their slot indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }

    /// Number of slots holding an instance.
    pub fn created(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Empties every slot, handing each instance to `release`.
    pub fn release_all(&mut self, mut release: impl FnMut(T)) {
        for slot in &mut self.slots {
            if let Some(instance) = slot.take() {
                release(instance);
            }
        }
    }
}
