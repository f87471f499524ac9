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

//! Deferred scene and GPU mutations.
//!
//! A [`Task`] is plain data describing one operation plus an optional
//! completion callback. Producers on any thread push tasks into a
//! [`TaskQueue`] through a [`TaskSender`]; the render thread drains each bucket
//! at its synchronization point and applies the tasks in push order against a
//! [`TaskContext`].
//!
//! Every task goes through the same life: `validate` then `process` then the
//! completion callback, which fires exactly once with the outcome.

mod context;
mod error;
mod priority;
mod queue;

pub use self::context::TaskContext;
pub use self::error::TaskError;
pub use self::priority::Priority;
pub use self::queue::{DrainReport, TaskQueue, TaskSender};

use crate::math::{Extent2D, LinearRgba};
use crate::renderer::api::{
    CommandList, ComputePipelineId, GpuCommand, SurfaceKind, TextureDescriptor, TextureId,
};
use crate::renderer::ResourceError;
use crate::scene::{
    Camera, CameraId, Layer, LayerId, LightId, ObjectId, ObjectRenderData, RenderableId,
    ReorderMode, SceneConfig, SceneId, SceneLight,
};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// The callback invoked once with a task's outcome.
pub type Completion = Box<dyn FnOnce(bool) + Send + 'static>;

/// The closed set of deferred operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    /// Creates an empty scene.
    AddScene {
        /// Handle of the new scene.
        scene: SceneId,
    },
    /// Removes a scene and everything in it.
    RemoveScene {
        /// The scene to remove.
        scene: SceneId,
    },
    /// Replaces a scene's ambient color, visibility and skybox.
    ConfigureScene {
        /// Target scene.
        scene: SceneId,
        /// New presentation parameters.
        config: SceneConfig,
    },
    /// Adds a camera to a scene, replacing one with the same handle.
    AddCamera {
        /// Target scene.
        scene: SceneId,
        /// The camera.
        camera: Camera,
    },
    /// Removes a camera from a scene. Absent cameras are not an error.
    RemoveCamera {
        /// Target scene.
        scene: SceneId,
        /// The camera to remove.
        camera: CameraId,
    },
    /// Appends a layer to a scene's draw order.
    AddLayer {
        /// Target scene.
        scene: SceneId,
        /// Handle of the new layer.
        layer: LayerId,
        /// Debug name of the layer.
        name: String,
    },
    /// Removes a layer and its batches.
    RemoveLayer {
        /// Target scene.
        scene: SceneId,
        /// The layer to remove.
        layer: LayerId,
    },
    /// Moves a layer within the draw order. Unknown layers are ignored.
    ReorderLayer {
        /// Target scene.
        scene: SceneId,
        /// The layer to move.
        layer: LayerId,
        /// Where to move it.
        mode: ReorderMode,
    },
    /// Adds an object instance of a renderable to a layer.
    AddRenderable {
        /// Target scene.
        scene: SceneId,
        /// Target layer.
        layer: LayerId,
        /// The renderable whose batch receives the instance.
        renderable: RenderableId,
        /// The instance data.
        object: ObjectRenderData,
    },
    /// Removes an object instance of a renderable from a layer.
    RemoveRenderable {
        /// Target scene.
        scene: SceneId,
        /// Target layer.
        layer: LayerId,
        /// The renderable whose batch holds the instance.
        renderable: RenderableId,
        /// The instance to remove.
        object: ObjectId,
    },
    /// Inserts a point or capsule light.
    AddLight {
        /// Target scene.
        scene: SceneId,
        /// The light and its handle.
        light: SceneLight,
    },
    /// Removes a light.
    RemoveLight {
        /// Target scene.
        scene: SceneId,
        /// The light to remove.
        light: LightId,
    },
    /// Clears a color render target.
    ClearSurface {
        /// The surface to clear.
        target: TextureId,
        /// The clear color.
        color: LinearRgba,
    },
    /// Clears a depth(-stencil) render target.
    ClearDepthSurface {
        /// The surface to clear.
        target: TextureId,
        /// Depth clear value.
        depth: f32,
        /// Stencil clear value, ignored for formats without stencil.
        stencil: u32,
    },
    /// Resizes a texture. Zero dimensions are clamped to one pixel.
    ResizeTexture {
        /// The texture to resize.
        texture: TextureId,
        /// The requested size.
        extent: Extent2D,
    },
    /// Submits a compute dispatch.
    Dispatch {
        /// The compute pipeline to run.
        pipeline: ComputePipelineId,
        /// Workgroup counts on x, y and z.
        workgroups: [u32; 3],
    },
}

impl TaskKind {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::AddScene { .. } => "AddScene",
            TaskKind::RemoveScene { .. } => "RemoveScene",
            TaskKind::ConfigureScene { .. } => "ConfigureScene",
            TaskKind::AddCamera { .. } => "AddCamera",
            TaskKind::RemoveCamera { .. } => "RemoveCamera",
            TaskKind::AddLayer { .. } => "AddLayer",
            TaskKind::RemoveLayer { .. } => "RemoveLayer",
            TaskKind::ReorderLayer { .. } => "ReorderLayer",
            TaskKind::AddRenderable { .. } => "AddRenderable",
            TaskKind::RemoveRenderable { .. } => "RemoveRenderable",
            TaskKind::AddLight { .. } => "AddLight",
            TaskKind::RemoveLight { .. } => "RemoveLight",
            TaskKind::ClearSurface { .. } => "ClearSurface",
            TaskKind::ClearDepthSurface { .. } => "ClearDepthSurface",
            TaskKind::ResizeTexture { .. } => "ResizeTexture",
            TaskKind::Dispatch { .. } => "Dispatch",
        }
    }

    /// The scene this task targets, if any.
    pub fn scene(&self) -> Option<SceneId> {
        match self {
            TaskKind::AddScene { scene }
            | TaskKind::RemoveScene { scene }
            | TaskKind::ConfigureScene { scene, .. }
            | TaskKind::AddCamera { scene, .. }
            | TaskKind::RemoveCamera { scene, .. }
            | TaskKind::AddLayer { scene, .. }
            | TaskKind::RemoveLayer { scene, .. }
            | TaskKind::ReorderLayer { scene, .. }
            | TaskKind::AddRenderable { scene, .. }
            | TaskKind::RemoveRenderable { scene, .. }
            | TaskKind::AddLight { scene, .. }
            | TaskKind::RemoveLight { scene, .. } => Some(*scene),
            _ => None,
        }
    }

    /// Checks the task's preconditions without mutating anything.
    ///
    /// Scene tasks require a live scene (except `AddScene`, which creates one),
    /// surface tasks require a texture known to the device, and dispatches
    /// require a non-empty workgroup count.
    pub fn validate(&self, ctx: &TaskContext<'_>) -> bool {
        match self {
            TaskKind::AddScene { .. } => true,
            TaskKind::ClearSurface { target, .. } | TaskKind::ClearDepthSurface { target, .. } => {
                ctx.device.texture_descriptor(*target).is_some()
            }
            TaskKind::ResizeTexture { texture, .. } => {
                ctx.device.texture_descriptor(*texture).is_some()
            }
            TaskKind::Dispatch { workgroups, .. } => workgroups.iter().all(|&n| n > 0),
            _ => self
                .scene()
                .is_some_and(|scene| ctx.scenes.contains(scene)),
        }
    }

    /// Applies the task.
    pub fn process(self, ctx: &mut TaskContext<'_>) -> Result<(), TaskError> {
        match self {
            TaskKind::AddScene { scene } => {
                if !ctx.scenes.create(scene) {
                    return Err(TaskError::DuplicateScene(scene));
                }
            }
            TaskKind::RemoveScene { scene } => {
                ctx.scenes
                    .remove(scene)
                    .ok_or(TaskError::SceneNotFound(scene))?;
            }
            TaskKind::ConfigureScene { scene, config } => {
                ctx.scene_mut(scene)?.configure(config);
            }
            TaskKind::AddCamera { scene, camera } => {
                ctx.scene_mut(scene)?.add_camera(camera);
            }
            TaskKind::RemoveCamera { scene, camera } => {
                if ctx.scene_mut(scene)?.remove_camera(camera).is_none() {
                    log::debug!("RemoveCamera: {camera} was not in {scene}");
                }
            }
            TaskKind::AddLayer { scene, layer, name } => {
                ctx.scene_mut(scene)?.add_layer(Layer::new(layer, name))?;
            }
            TaskKind::RemoveLayer { scene, layer } => {
                ctx.scene_mut(scene)?.remove_layer(layer)?;
            }
            TaskKind::ReorderLayer { scene, layer, mode } => {
                if !ctx.scene_mut(scene)?.reorder_layer(layer, mode) {
                    log::debug!("ReorderLayer: {layer} not found in {scene}, nothing moved");
                }
            }
            TaskKind::AddRenderable {
                scene,
                layer,
                renderable,
                object,
            } => {
                ctx.scene_mut(scene)?
                    .add_renderable(layer, renderable, object)?;
            }
            TaskKind::RemoveRenderable {
                scene,
                layer,
                renderable,
                object,
            } => {
                ctx.scene_mut(scene)?
                    .remove_renderable(layer, renderable, object)?;
            }
            TaskKind::AddLight { scene, light } => {
                ctx.scene_mut(scene)?.add_light(light);
            }
            TaskKind::RemoveLight { scene, light } => {
                ctx.scene_mut(scene)?.remove_light(light)?;
            }
            TaskKind::ClearSurface { target, color } => {
                let descriptor = render_target(ctx, target)?;
                expect_kind(&descriptor, SurfaceKind::Color)?;
                ctx.device.submit(CommandList::single(
                    "clear_surface",
                    GpuCommand::ClearColor { target, color },
                ))?;
            }
            TaskKind::ClearDepthSurface {
                target,
                depth,
                stencil,
            } => {
                let descriptor = render_target(ctx, target)?;
                expect_kind(&descriptor, SurfaceKind::Depth)?;
                ctx.device.submit(CommandList::single(
                    "clear_depth_surface",
                    GpuCommand::ClearDepth {
                        target,
                        depth,
                        stencil,
                    },
                ))?;
            }
            TaskKind::ResizeTexture { texture, extent } => {
                let extent = extent.at_least_one();
                ctx.device.resize_texture(texture, extent)?;
                log::debug!("ResizeTexture: {texture:?} -> {extent}");
            }
            TaskKind::Dispatch {
                pipeline,
                workgroups,
            } => {
                if workgroups.contains(&0) {
                    return Err(TaskError::InvalidDispatch(workgroups));
                }
                ctx.device.submit(CommandList::single(
                    "dispatch",
                    GpuCommand::Dispatch {
                        pipeline,
                        workgroups,
                    },
                ))?;
            }
        }
        Ok(())
    }
}

fn render_target(ctx: &TaskContext<'_>, target: TextureId) -> Result<TextureDescriptor, TaskError> {
    let descriptor = ctx
        .device
        .texture_descriptor(target)
        .ok_or(ResourceError::NotFound)?;
    if !descriptor.is_render_target() {
        return Err(ResourceError::NotRenderTarget.into());
    }
    Ok(descriptor)
}

fn expect_kind(descriptor: &TextureDescriptor, expected: SurfaceKind) -> Result<(), TaskError> {
    let found = descriptor.kind();
    if found != expected {
        log::warn!(
            "Surface '{}' has format {:?}, which cannot be cleared as {:?}",
            descriptor.label,
            descriptor.format,
            expected
        );
        return Err(TaskError::WrongSurfaceKind { expected, found });
    }
    Ok(())
}

/// One deferred operation and its optional completion callback.
pub struct Task {
    kind: TaskKind,
    completion: PendingCompletion,
}

impl Task {
    /// Wraps an operation with no completion callback.
    pub fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            completion: PendingCompletion(None),
        }
    }

    /// Registers the callback that receives the task's outcome.
    ///
    /// Only one callback is kept; a second call replaces the first.
    pub fn on_complete(mut self, callback: impl FnOnce(bool) + Send + 'static) -> Self {
        self.completion.0 = Some(Box::new(callback));
        self
    }

    /// The operation this task performs.
    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// Returns `true` if a completion callback is registered.
    pub fn has_completion(&self) -> bool {
        self.completion.0.is_some()
    }

    /// Validates, processes and completes the task.
    ///
    /// A panic raised while processing is caught and reported as a failure of
    /// this task only, as is a panic raised by the completion callback.
    ///
    /// ## Returns
    /// The value passed to the completion callback.
    pub fn execute(self, ctx: &mut TaskContext<'_>) -> bool {
        let Task { kind, completion } = self;
        let name = kind.name();

        let success = if !kind.validate(ctx) {
            log::warn!("Task {name} failed validation: {kind:?}");
            false
        } else {
            match panic::catch_unwind(AssertUnwindSafe(|| kind.process(ctx))) {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    log::error!("Task {name} failed: {e}");
                    false
                }
                Err(payload) => {
                    let e = TaskError::Panicked(panic_message(payload.as_ref()));
                    log::error!("Task {name} failed: {e}");
                    false
                }
            }
        };

        completion.fire(name, success);
        success
    }

    /// Completes the task with `false` without processing it.
    pub fn cancel(self) {
        let Task { kind, completion } = self;
        log::debug!("Task {} cancelled", kind.name());
        completion.fire(kind.name(), false);
    }
}

impl From<TaskKind> for Task {
    fn from(kind: TaskKind) -> Self {
        Task::new(kind)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("kind", &self.kind)
            .field("has_completion", &self.completion.0.is_some())
            .finish()
    }
}

/// Holds a task's callback until it fires.
///
/// A task discarded without being executed or cancelled, for instance one
/// left in a channel nobody drains, still completes with `false` on drop.
struct PendingCompletion(Option<Completion>);

impl PendingCompletion {
    fn fire(mut self, name: &str, success: bool) {
        if let Some(callback) = self.0.take() {
            run_callback(name, callback, success);
        }
    }
}

impl Drop for PendingCompletion {
    fn drop(&mut self) {
        if let Some(callback) = self.0.take() {
            log::warn!("A task was discarded before it ran; completing with false");
            run_callback("(discarded)", callback, false);
        }
    }
}

fn run_callback(name: &str, callback: Completion, success: bool) {
    if panic::catch_unwind(AssertUnwindSafe(|| callback(success))).is_err() {
        log::error!("Completion callback of task {name} panicked");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
