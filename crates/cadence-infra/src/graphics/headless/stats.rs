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

use std::fmt;

/// A snapshot of the resource counters of a [`HeadlessDevice`](super::HeadlessDevice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceStats {
    /// Textures created since the device was built.
    pub textures_created: usize,
    /// Successful texture resizes.
    pub textures_resized: usize,
    /// Textures destroyed.
    pub textures_destroyed: usize,
    /// Buffers created since the device was built.
    pub buffers_created: usize,
    /// Buffers destroyed.
    pub buffers_destroyed: usize,
    /// Textures currently alive, the backbuffer included.
    pub live_textures: usize,
    /// Buffers currently alive.
    pub live_buffers: usize,
    /// Approximate memory held by live resources.
    pub allocated_bytes: u64,
    /// Command lists accepted by `submit`.
    pub submissions: usize,
    /// Frames completed with `end_frame`.
    pub frames: u64,
}

impl fmt::Display for DeviceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames, {} submissions, {} textures ({} created, {} resized, {} destroyed), \
             {} buffers, {:.2} MiB",
            self.frames,
            self.submissions,
            self.live_textures,
            self.textures_created,
            self.textures_resized,
            self.textures_destroyed,
            self.live_buffers,
            self.allocated_bytes as f64 / (1024.0 * 1024.0)
        )
    }
}
