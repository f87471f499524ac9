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

//! Provides the public, backend-agnostic rendering contracts for Cadence.
//!
//! This module defines the boundary between the scheduling core and the
//! excluded native graphics backend. It contains the abstract [`GraphicsDevice`]
//! trait (resource factory, command submission and frame fence), the handle and
//! descriptor types passed across it, the error hierarchy, and [`RenderSettings`].
//!
//! The core never interprets handles beyond storing them and passing them back;
//! a concrete backend (for example the headless device in `cadence-infra`)
//! implements the trait.

pub mod api;
pub mod error;
pub mod settings;
pub mod traits;

pub use self::api::*;
pub use self::error::{RenderError, ResourceError};
pub use self::settings::{RenderSettings, SettingsError};
pub use self::traits::GraphicsDevice;
