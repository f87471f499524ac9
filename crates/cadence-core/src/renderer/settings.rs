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

//! Global settings for the render thread's scheduling and resource policies.

use crate::math::LinearRgba;
use crate::renderer::api::{AntiAliasLevel, TextureFormat, MAX_FRAMES_IN_FLIGHT};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Error raised while loading or validating [`RenderSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The settings document is not valid JSON for this schema.
    #[error("settings could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field is outside its accepted range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// A collection of settings that shape the frame loop and its resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Number of frames the CPU may record ahead of the GPU; also the capacity
    /// of every frame buffer ring.
    pub frames_in_flight: usize,
    /// The quality level the pipeline renders with unless told otherwise.
    pub default_anti_alias: AntiAliasLevel,
    /// Initial capacity of each scene's point light list.
    pub point_light_capacity: usize,
    /// Initial capacity of each scene's capsule light list.
    pub capsule_light_capacity: usize,
    /// Color the main surface is cleared to at the start of a frame.
    pub clear_color: LinearRgba,
    /// Format of the presentation backbuffer.
    pub backbuffer_format: TextureFormat,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            frames_in_flight: 2,
            default_anti_alias: AntiAliasLevel::X1,
            point_light_capacity: 16,
            capsule_light_capacity: 8,
            clear_color: LinearRgba::BLACK,
            backbuffer_format: TextureFormat::Bgra8UnormSrgb,
        }
    }
}

impl RenderSettings {
    /// Parses settings from a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Saves settings to a JSON file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Checks every field against its accepted range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.frames_in_flight == 0 || self.frames_in_flight > MAX_FRAMES_IN_FLIGHT {
            return Err(SettingsError::Invalid {
                field: "frames_in_flight",
                reason: format!(
                    "{} is outside 1..={MAX_FRAMES_IN_FLIGHT}",
                    self.frames_in_flight
                ),
            });
        }
        if self.backbuffer_format.is_depth() {
            return Err(SettingsError::Invalid {
                field: "backbuffer_format",
                reason: format!("{:?} is a depth format", self.backbuffer_format),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.frames_in_flight, 2);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings =
            RenderSettings::from_json(r#"{ "frames_in_flight": 3, "default_anti_alias": "X4" }"#)
                .unwrap();
        assert_eq!(settings.frames_in_flight, 3);
        assert_eq!(settings.default_anti_alias, AntiAliasLevel::X4);
        assert_eq!(settings.point_light_capacity, 16);
    }

    #[test]
    fn out_of_range_frames_in_flight_is_rejected() {
        let err = RenderSettings::from_json(r#"{ "frames_in_flight": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "frames_in_flight",
                ..
            }
        ));
        assert!(RenderSettings::from_json(r#"{ "frames_in_flight": 4 }"#).is_err());
    }

    #[test]
    fn depth_backbuffer_is_rejected() {
        let settings = RenderSettings {
            backbuffer_format: TextureFormat::Depth32Float,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.json");
        let settings = RenderSettings {
            frames_in_flight: 3,
            clear_color: LinearRgba::rgb(0.1, 0.2, 0.3),
            ..Default::default()
        };
        settings.to_file(&path).unwrap();
        assert_eq!(RenderSettings::from_file(&path).unwrap(), settings);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            RenderSettings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }
}
