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

//! Defines data structures related to GPU buffer resources.

use bitflags::bitflags;

/// An opaque handle to a GPU buffer owned by the graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

bitflags! {
    /// A set of flags describing the allowed usages of a buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// The buffer can be bound as a uniform (constant) buffer.
        const UNIFORM = 1 << 0;
        /// The buffer can be bound as a storage buffer.
        const STORAGE = 1 << 1;
        /// The buffer can be the destination of a write or copy.
        const COPY_DST = 1 << 2;
        /// The buffer can hold vertex data.
        const VERTEX = 1 << 3;
        /// The buffer can hold index data.
        const INDEX = 1 << 4;
    }
}

/// Describes a buffer to be created by the graphics device.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferDescriptor {
    /// Debug name.
    pub label: String,
    /// Size in bytes.
    pub size: u64,
    /// Allowed usages.
    pub usage: BufferUsage,
}

impl BufferDescriptor {
    /// A writable uniform buffer holding `count` elements of `T`.
    pub fn uniform_array<T>(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            size: (std::mem::size_of::<T>() * count.max(1)) as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_array_sizes_by_element() {
        let desc = BufferDescriptor::uniform_array::<[f32; 4]>("lights", 8);
        assert_eq!(desc.size, 128);
        assert!(desc.usage.contains(BufferUsage::UNIFORM));

        let empty = BufferDescriptor::uniform_array::<[f32; 4]>("lights", 0);
        assert_eq!(empty.size, 16);
    }
}
