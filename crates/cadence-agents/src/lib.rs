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

//! Render-thread orchestration.
//!
//! The [`RenderAgent`](render_agent::RenderAgent) owns everything that only the
//! render thread may touch: the task queue's consumer side, the scene registry,
//! the surface trackers and the step pipeline. Producers talk to it through
//! [`TaskSender`](cadence_core::TaskSender)s.

#![warn(missing_docs)]

pub mod render_agent;
