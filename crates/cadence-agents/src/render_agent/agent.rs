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

use anyhow::Context;
use cadence_core::math::Extent2D;
use cadence_core::renderer::api::{LiveResources, ResizeMode, TextureFormat};
use cadence_core::renderer::{GraphicsDevice, RenderError, RenderSettings};
use cadence_core::resource::SurfaceTracker;
use cadence_core::scene::SceneRegistry;
use cadence_core::task::{DrainReport, Priority, Task, TaskContext, TaskQueue, TaskSender};
use cadence_lanes::{FrameContext, FrameStats, FrameTargets, RenderStepPipeline};
use std::sync::Arc;

/// Format of the scene color target.
pub const SCENE_COLOR_FORMAT: TextureFormat = TextureFormat::Rgba16Float;
/// Format of the scene depth target.
pub const SCENE_DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// The owner of all render-thread state.
///
/// Only the thread holding the agent can drain the queue or mutate scenes;
/// other threads hold [`TaskSender`]s.
pub struct RenderAgent {
    device: Arc<dyn GraphicsDevice>,
    settings: RenderSettings,
    queue: TaskQueue,
    scenes: SceneRegistry,
    color: SurfaceTracker,
    depth: SurfaceTracker,
    pipeline: RenderStepPipeline,
    extent: Extent2D,
    pending_resize: Option<Extent2D>,
    frame_count: u64,
    last_stats: FrameStats,
    shut_down: bool,
}

impl RenderAgent {
    /// Creates an agent rendering at `extent` and configures the device's
    /// presentation surface.
    ///
    /// The device's frame-in-flight count wins over the settings, since frame
    /// rings smaller than the device's fence depth would reuse slots the GPU
    /// still reads.
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        settings: RenderSettings,
        extent: Extent2D,
    ) -> anyhow::Result<Self> {
        settings.validate().context("invalid render settings")?;

        let frames_in_flight = device.frames_in_flight();
        if frames_in_flight != settings.frames_in_flight {
            log::warn!(
                "RenderAgent: settings ask for {} frame(s) in flight, device uses {frames_in_flight}",
                settings.frames_in_flight
            );
        }

        let extent = extent.at_least_one();
        device
            .configure_surface(extent, settings.backbuffer_format)
            .context("failed to configure the presentation surface")?;

        let color = SurfaceTracker::new(
            "scene_color",
            SCENE_COLOR_FORMAT,
            ResizeMode::Full,
            extent,
            frames_in_flight,
        );
        let depth = SurfaceTracker::new(
            "scene_depth",
            SCENE_DEPTH_FORMAT,
            ResizeMode::Full,
            extent,
            frames_in_flight,
        );

        log::info!(
            "RenderAgent initialized at {extent} with {frames_in_flight} frame(s) in flight."
        );
        Ok(Self {
            device,
            scenes: SceneRegistry::new(
                settings.point_light_capacity,
                settings.capsule_light_capacity,
            ),
            settings,
            queue: TaskQueue::new(),
            color,
            depth,
            pipeline: RenderStepPipeline::standard(frames_in_flight),
            extent,
            pending_resize: None,
            frame_count: 0,
            last_stats: FrameStats::default(),
            shut_down: false,
        })
    }

    /// Returns a sender producer threads can own.
    pub fn sender(&self) -> TaskSender {
        self.queue.sender()
    }

    /// Submits a task from the render thread.
    ///
    /// `Immediate` tasks are applied before this returns; the others are
    /// queued for their synchronization point.
    pub fn push(&mut self, priority: Priority, task: impl Into<Task>) {
        match priority {
            Priority::Immediate => {
                self.run_immediate(task);
            }
            _ => self.queue.push(priority, task),
        }
    }

    /// Applies a task right away and returns its outcome.
    pub fn run_immediate(&mut self, task: impl Into<Task>) -> bool {
        let mut ctx = TaskContext::new(&mut self.scenes, self.device.as_ref());
        self.queue.run_immediate(task, &mut ctx)
    }

    /// Requests a new render size, applied at the start of the next frame.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pending_resize = Some(Extent2D::new(width, height));
    }

    /// Renders one frame.
    ///
    /// The `EndOfFrame` bucket is drained and the frame is ended even when
    /// recording fails, so the device's frame pairs stay balanced and queued
    /// structural changes still land.
    pub fn render_frame(&mut self) -> Result<FrameStats, RenderError> {
        if self.shut_down {
            return Err(RenderError::RenderingFailed(
                "render agent has been shut down".to_owned(),
            ));
        }
        let device = Arc::clone(&self.device);
        let frame = device.begin_frame()?;

        let start = self.drain(Priority::StartOfFrame);
        let outcome = self.record_frame(device.as_ref(), frame);
        let end = self.drain(Priority::EndOfFrame);
        device.end_frame()?;

        let stats = outcome?;
        self.frame_count += 1;
        self.last_stats = stats;
        log::trace!(
            "Frame {frame}: {} start / {} end task(s), {} draw(s)",
            start.processed,
            end.processed,
            stats.draw_calls
        );
        Ok(stats)
    }

    fn record_frame(
        &mut self,
        device: &dyn GraphicsDevice,
        frame: u64,
    ) -> Result<FrameStats, RenderError> {
        if let Some(extent) = self.pending_resize.take() {
            let extent = extent.at_least_one();
            device.configure_surface(extent, self.settings.backbuffer_format)?;
            self.extent = extent;
            log::debug!("RenderAgent: resized to {extent}");
        }
        self.color
            .refresh_size(device, self.extent.width, self.extent.height)?;
        self.depth
            .refresh_size(device, self.extent.width, self.extent.height)?;

        let level = self.settings.default_anti_alias;
        let targets = FrameTargets {
            color: self.color.get(device, level)?.texture(),
            depth: self.depth.get(device, level)?.texture(),
            backbuffer: device.acquire_backbuffer()?,
        };

        let mut ctx = FrameContext::new(
            device,
            &self.scenes,
            frame,
            targets,
            self.settings.clear_color,
        );
        self.pipeline
            .run(&mut ctx)
            .map_err(|e| RenderError::RenderingFailed(e.to_string()))?;
        Ok(ctx.stats)
    }

    fn drain(&mut self, priority: Priority) -> DrainReport {
        let mut ctx = TaskContext::new(&mut self.scenes, self.device.as_ref());
        self.queue.drain(priority, &mut ctx)
    }

    /// Drains both deferred buckets once, releases every owned surface and
    /// buffer, and reports resources the device still holds.
    ///
    /// Calling it again does nothing.
    ///
    /// ## Returns
    /// The live resources left on the device, if it tracks them.
    pub fn shutdown(&mut self) -> Option<LiveResources> {
        if self.shut_down {
            return None;
        }
        self.shut_down = true;

        let start = self.drain(Priority::StartOfFrame);
        let end = self.drain(Priority::EndOfFrame);
        if !start.is_empty() || !end.is_empty() {
            log::debug!(
                "RenderAgent: {} task(s) applied during shutdown",
                start.processed + end.processed
            );
        }

        let device = self.device.as_ref();
        self.pipeline.shutdown(device);
        let surfaces = self.color.dispose(device) + self.depth.dispose(device);
        log::debug!("RenderAgent: released {surfaces} surface(s)");

        let live = device.live_resources();
        match live {
            Some(live) if !live.is_empty() => log::warn!(
                "RenderAgent: device still holds {} texture(s) and {} buffer(s) after shutdown",
                live.textures,
                live.buffers
            ),
            _ => log::info!("RenderAgent shut down after {} frame(s).", self.frame_count),
        }
        live
    }

    /// The live scenes.
    pub fn scenes(&self) -> &SceneRegistry {
        &self.scenes
    }

    /// The settings the agent was created with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// The device the agent renders with.
    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }

    /// The scene color tracker.
    pub fn color_tracker(&self) -> &SurfaceTracker {
        &self.color
    }

    /// The scene depth tracker.
    pub fn depth_tracker(&self) -> &SurfaceTracker {
        &self.depth
    }

    /// The current render size.
    pub fn extent(&self) -> Extent2D {
        self.extent
    }

    /// Tasks waiting in a bucket.
    pub fn pending(&self, priority: Priority) -> usize {
        self.queue.pending(priority)
    }

    /// Frames rendered successfully.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Statistics of the last successful frame.
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}

impl Drop for RenderAgent {
    fn drop(&mut self) {
        if !self.shut_down {
            log::debug!("RenderAgent dropped without shutdown(), shutting down now");
            self.shutdown();
        }
    }
}
