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

//! A graphics device with no GPU behind it.
//!
//! [`HeadlessDevice`] is used by the demo and by integration tests. Every
//! submitted command list is validated against the resource table, as a real
//! backend would, and then kept in a log that can be inspected afterwards.

mod device;
mod stats;

pub use self::device::HeadlessDevice;
pub use self::stats::DeviceStats;
