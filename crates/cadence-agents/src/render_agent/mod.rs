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

//! Acts as the render thread's single consumer.
//!
//! Each call to [`RenderAgent::render_frame`] runs one frame in a fixed order:
//!
//! 1. `begin_frame` on the device, which waits on the fence for the slot.
//! 2. Drain of the `StartOfFrame` bucket.
//! 3. Surface reconfiguration and tracker refresh after a resize.
//! 4. The render step pipeline, ending with submit and present.
//! 5. Drain of the `EndOfFrame` bucket.
//! 6. `end_frame`, which advances the frame index.

mod agent;

pub use agent::*;
