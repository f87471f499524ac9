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

use cadence_core::renderer::ResourceError;
use thiserror::Error;

/// An error raised while recording or submitting a frame.
#[derive(Debug, Error)]
pub enum StepError {
    /// The device rejected a resource operation or the submission.
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// A step failed; carries the step name.
    #[error("Render step '{step}' failed: {source}")]
    Step {
        /// The failing step.
        step: &'static str,
        /// What went wrong.
        #[source]
        source: Box<StepError>,
    },
}

impl StepError {
    pub(crate) fn in_step(self, step: &'static str) -> Self {
        StepError::Step {
            step,
            source: Box::new(self),
        }
    }
}
