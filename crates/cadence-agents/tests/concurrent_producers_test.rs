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

//! Producers on other threads feeding a running frame loop.

use cadence_agents::render_agent::RenderAgent;
use cadence_core::math::Extent2D;
use cadence_core::renderer::RenderSettings;
use cadence_core::scene::{
    Camera, CameraId, LayerId, ObjectId, ObjectRenderData, RenderableId, SceneId,
};
use cadence_core::task::{Priority, Task, TaskKind};
use cadence_infra::HeadlessDevice;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

const PRODUCERS: usize = 4;
const TASKS_PER_PRODUCER: usize = 200;

#[test]
fn every_callback_fires_exactly_once_while_frames_run() {
    let device = Arc::new(HeadlessDevice::new(2));
    let mut agent =
        RenderAgent::new(device, RenderSettings::default(), Extent2D::new(128, 128)).unwrap();

    let scene = SceneId::allocate();
    let layer = LayerId::allocate();
    agent.push(Priority::Immediate, TaskKind::AddScene { scene });
    agent.push(
        Priority::Immediate,
        TaskKind::AddCamera {
            scene,
            camera: Camera::new(CameraId::allocate()),
        },
    );
    agent.push(
        Priority::Immediate,
        TaskKind::AddLayer {
            scene,
            layer,
            name: "main".into(),
        },
    );

    let calls: Arc<Vec<AtomicUsize>> = Arc::new(
        (0..PRODUCERS * TASKS_PER_PRODUCER)
            .map(|_| AtomicUsize::new(0))
            .collect(),
    );
    let succeeded = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let sender = agent.sender();
            let calls = calls.clone();
            let succeeded = succeeded.clone();
            thread::spawn(move || {
                for i in 0..TASKS_PER_PRODUCER {
                    let index = p * TASKS_PER_PRODUCER + i;
                    let calls = calls.clone();
                    let succeeded = succeeded.clone();
                    let priority = if i % 2 == 0 {
                        Priority::StartOfFrame
                    } else {
                        Priority::EndOfFrame
                    };
                    let task = Task::new(TaskKind::AddRenderable {
                        scene,
                        layer,
                        renderable: RenderableId::allocate(),
                        object: ObjectRenderData::new(ObjectId::allocate()),
                    })
                    .on_complete(move |ok| {
                        calls[index].fetch_add(1, Ordering::SeqCst);
                        if ok {
                            succeeded.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                    sender.push(priority, task);
                }
            })
        })
        .collect();

    while handles.iter().any(|h| !h.is_finished()) {
        agent.render_frame().unwrap();
    }
    for handle in handles {
        handle.join().unwrap();
    }
    agent.render_frame().unwrap();

    let total = PRODUCERS * TASKS_PER_PRODUCER;
    assert!(calls.iter().all(|c| c.load(Ordering::SeqCst) == 1));
    assert_eq!(succeeded.load(Ordering::SeqCst), total);
    assert_eq!(
        agent.scenes().get(scene).unwrap().layer(layer).unwrap().object_count(),
        total
    );

    let stats = agent.render_frame().unwrap();
    assert_eq!(stats.draw_calls, total);
    agent.shutdown();
}
