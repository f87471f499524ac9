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

use super::{FrameContext, RenderStep, StepError};
use cadence_core::renderer::api::GpuCommand;

/// Draws every non-empty batch of every visible scene, once per camera.
///
/// Scenes are visited in creation order and layers in their draw order. A
/// scene without cameras is skipped. Empty batches stay in their layer but
/// never produce a draw.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeometryStep;

impl RenderStep for GeometryStep {
    fn name(&self) -> &'static str {
        "Geometry"
    }

    fn execute(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), StepError> {
        let scenes = ctx.scenes;
        for scene in scenes.iter().filter(|s| s.is_visible()) {
            if scene.camera_count() == 0 {
                log::trace!("Scene {} has no camera, skipped", scene.id());
                continue;
            }
            ctx.stats.scenes_drawn += 1;

            for _camera in scene.cameras() {
                for layer in scene.layers() {
                    for batch in layer.batches().iter().filter(|b| !b.is_empty()) {
                        ctx.record(GpuCommand::Draw {
                            layer: layer.id(),
                            renderable: batch.renderable(),
                            instances: batch.len() as u32,
                        });
                        ctx.stats.draw_calls += 1;
                        ctx.stats.instances += batch.len();
                    }
                }
            }
        }
        Ok(())
    }
}
