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

// Cadence Sandbox
// Producer threads mutate scenes while the render thread runs frames on the
// headless device.

use anyhow::{Context, Result};
use cadence_agents::render_agent::RenderAgent;
use cadence_core::math::{Extent2D, LinearRgba};
use cadence_core::renderer::RenderSettings;
use cadence_core::scene::{
    Camera, CameraId, CapsuleLight, LayerId, LightId, ObjectId, ObjectRenderData, PointLight,
    RenderableId, ReorderMode, SceneConfig, SceneId, SceneLight,
};
use cadence_core::task::{Priority, Task, TaskKind, TaskSender};
use cadence_infra::HeadlessDevice;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const FRAMES: u64 = 120;
const RESIZE_AT: u64 = 40;

/// Completion tallies shared by every producer.
#[derive(Debug, Default)]
struct Outcomes {
    succeeded: AtomicUsize,
    failed: AtomicUsize,
}

impl Outcomes {
    fn track(self: &Arc<Self>, kind: TaskKind) -> Task {
        let outcomes = Arc::clone(self);
        Task::new(kind).on_complete(move |ok| {
            let counter = if ok {
                &outcomes.succeeded
            } else {
                &outcomes.failed
            };
            counter.fetch_add(1, Ordering::Relaxed);
        })
    }
}

/// Fills a scene with layers and instances, then thins it out again.
fn populate_scene(sender: TaskSender, outcomes: Arc<Outcomes>, scene: SceneId) {
    let layers: Vec<LayerId> = (0..3).map(|_| LayerId::allocate()).collect();
    for (i, layer) in layers.iter().enumerate() {
        sender.push(
            Priority::StartOfFrame,
            outcomes.track(TaskKind::AddLayer {
                scene,
                layer: *layer,
                name: format!("layer_{i}"),
            }),
        );
    }

    let mut placed = Vec::new();
    for step in 0..60u32 {
        let layer = layers[step as usize % layers.len()];
        let renderable = RenderableId::allocate();
        let object = ObjectId::allocate();
        let mut transform = ObjectRenderData::IDENTITY;
        transform[12] = step as f32;
        sender.push(
            Priority::StartOfFrame,
            outcomes.track(TaskKind::AddRenderable {
                scene,
                layer,
                renderable,
                object: ObjectRenderData::new(object).with_transform(transform),
            }),
        );
        placed.push((layer, renderable, object));

        if step % 10 == 9 {
            sender.push(
                Priority::StartOfFrame,
                outcomes.track(TaskKind::ReorderLayer {
                    scene,
                    layer: layers[0],
                    mode: ReorderMode::PushForward,
                }),
            );
        }
        thread::sleep(Duration::from_millis(1));
    }

    for (layer, renderable, object) in placed.into_iter().step_by(3) {
        sender.push(
            Priority::EndOfFrame,
            outcomes.track(TaskKind::RemoveRenderable {
                scene,
                layer,
                renderable,
                object,
            }),
        );
    }
    // Never added: reported as a failure through the callback.
    sender.push(
        Priority::StartOfFrame,
        outcomes.track(TaskKind::RemoveRenderable {
            scene,
            layer: layers[1],
            renderable: RenderableId::allocate(),
            object: ObjectId::allocate(),
        }),
    );
}

/// Adds lights and cameras and flips scene presentation over time.
fn animate_scene(sender: TaskSender, outcomes: Arc<Outcomes>, scene: SceneId) {
    let mut lights = Vec::new();
    for i in 0..24 {
        let light = LightId::allocate();
        let color = LinearRgba::rgb(1.0, 0.8, 0.6).scaled(0.5 + i as f32 / 24.0);
        let kind = if i % 3 == 0 {
            SceneLight::Capsule(
                light,
                CapsuleLight {
                    start: [i as f32, 0.0, 0.0],
                    end: [i as f32, 2.0, 0.0],
                    radius: 1.5,
                    color,
                    intensity: 1.0,
                },
            )
        } else {
            SceneLight::Point(
                light,
                PointLight {
                    position: [i as f32, 3.0, -1.0],
                    radius: 6.0,
                    color,
                    intensity: 2.0,
                },
            )
        };
        sender.push(
            Priority::StartOfFrame,
            outcomes.track(TaskKind::AddLight { scene, light: kind }),
        );
        lights.push(light);
        thread::sleep(Duration::from_millis(2));
    }

    let extra = CameraId::allocate();
    sender.push(
        Priority::StartOfFrame,
        outcomes.track(TaskKind::AddCamera {
            scene,
            camera: Camera::new(extra),
        }),
    );
    sender.push(
        Priority::StartOfFrame,
        outcomes.track(TaskKind::ConfigureScene {
            scene,
            config: SceneConfig {
                ambient: LinearRgba::rgb(0.05, 0.05, 0.08),
                ..Default::default()
            },
        }),
    );
    for light in lights.into_iter().take(8) {
        sender.push(
            Priority::EndOfFrame,
            outcomes.track(TaskKind::RemoveLight { scene, light }),
        );
    }
    sender.push(
        Priority::EndOfFrame,
        outcomes.track(TaskKind::RemoveCamera {
            scene,
            camera: extra,
        }),
    );
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => RenderSettings::from_file(&path)
            .with_context(|| format!("failed to load render settings from '{path}'"))?,
        None => RenderSettings::default(),
    };

    let device = Arc::new(HeadlessDevice::new(settings.frames_in_flight));
    let mut agent = RenderAgent::new(device.clone(), settings, Extent2D::new(800, 600))?;

    // The main scene exists before any producer refers to it.
    let scene = SceneId::allocate();
    agent.push(Priority::Immediate, TaskKind::AddScene { scene });
    agent.push(
        Priority::Immediate,
        TaskKind::AddCamera {
            scene,
            camera: Camera::new(CameraId::allocate()),
        },
    );

    let outcomes = Arc::new(Outcomes::default());
    let producers = [
        thread::spawn({
            let (sender, outcomes) = (agent.sender(), outcomes.clone());
            move || populate_scene(sender, outcomes, scene)
        }),
        thread::spawn({
            let (sender, outcomes) = (agent.sender(), outcomes.clone());
            move || animate_scene(sender, outcomes, scene)
        }),
    ];

    for frame in 0..FRAMES {
        if frame == RESIZE_AT {
            agent.resize(1280, 720);
        }
        let stats = agent.render_frame()?;
        if frame % 20 == 0 {
            log::info!(
                "Frame {frame}: {} draw(s), {} instance(s), {} point / {} capsule light(s)",
                stats.draw_calls,
                stats.instances,
                stats.point_lights,
                stats.capsule_lights
            );
        }
        thread::sleep(Duration::from_millis(1));
    }

    for producer in producers {
        if producer.join().is_err() {
            log::error!("A producer thread panicked");
        }
    }
    // Flush whatever the producers queued after the last frame.
    let last = agent.render_frame()?;
    log::info!(
        "Final frame: {} draw(s) over {} layer(s)",
        last.draw_calls,
        agent
            .scenes()
            .get(scene)
            .map_or(0, |s| s.layers().len())
    );

    agent.shutdown();
    log::info!(
        "Tasks: {} succeeded, {} failed",
        outcomes.succeeded.load(Ordering::Relaxed),
        outcomes.failed.load(Ordering::Relaxed)
    );
    log::info!("Device: {}", device.stats());
    Ok(())
}
