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

use serde::{Deserialize, Serialize};
use std::fmt;

/// The synchronization point at which a task is applied.
///
/// Variants are declared in the order a frame observes them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Priority {
    /// Applied synchronously by the call that submits it. Only valid on the
    /// render thread.
    Immediate,
    /// Applied before any render step of the next frame.
    #[default]
    StartOfFrame,
    /// Applied after the frame has been submitted and presented.
    EndOfFrame,
}

impl Priority {
    /// Returns `true` for the two queued buckets.
    pub fn is_deferred(self) -> bool {
        !matches!(self, Priority::Immediate)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Immediate => "Immediate",
            Priority::StartOfFrame => "StartOfFrame",
            Priority::EndOfFrame => "EndOfFrame",
        };
        f.write_str(name)
    }
}
