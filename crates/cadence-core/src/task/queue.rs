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

use super::{Priority, Task, TaskContext};

/// Outcome counts of one [`TaskQueue::drain`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Tasks taken from the bucket.
    pub processed: usize,
    /// Tasks that completed with `true`.
    pub succeeded: usize,
    /// Tasks that failed validation or processing.
    pub failed: usize,
}

impl DrainReport {
    /// Returns `true` if the pass found nothing to do.
    pub fn is_empty(&self) -> bool {
        self.processed == 0
    }

    fn record(&mut self, success: bool) {
        self.processed += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// A cloneable handle for pushing tasks from any thread.
///
/// A sender cannot know whether it runs on the render thread, so
/// [`Priority::Immediate`] requests are demoted to [`Priority::StartOfFrame`].
#[derive(Debug, Clone)]
pub struct TaskSender {
    start_of_frame: flume::Sender<Task>,
    end_of_frame: flume::Sender<Task>,
}

impl TaskSender {
    /// Appends a task to the bucket for `priority`.
    ///
    /// Never blocks on the render thread. If the owning queue is gone, the
    /// task is completed with `false` on the calling thread.
    pub fn push(&self, priority: Priority, task: impl Into<Task>) {
        let task = task.into();
        let sender = match priority {
            Priority::Immediate => {
                log::warn!(
                    "Task {} pushed as Immediate from a sender, deferring to StartOfFrame",
                    task.kind().name()
                );
                &self.start_of_frame
            }
            Priority::StartOfFrame => &self.start_of_frame,
            Priority::EndOfFrame => &self.end_of_frame,
        };
        if let Err(flume::SendError(task)) = sender.send(task) {
            log::error!(
                "Task {} pushed after its queue was dropped",
                task.kind().name()
            );
            task.cancel();
        }
    }
}

/// Priority-bucketed FIFO of pending tasks.
///
/// Any number of producers push through [`TaskSender`]s; exactly one consumer
/// (the render thread) calls [`drain`](TaskQueue::drain) at each
/// synchronization point. Each deferred bucket is an unbounded channel, so a
/// push never waits for the consumer.
#[derive(Debug)]
pub struct TaskQueue {
    sender: TaskSender,
    start_of_frame: flume::Receiver<Task>,
    end_of_frame: flume::Receiver<Task>,
}

impl TaskQueue {
    /// Creates a queue with two empty deferred buckets.
    pub fn new() -> Self {
        let (start_tx, start_rx) = flume::unbounded();
        let (end_tx, end_rx) = flume::unbounded();
        Self {
            sender: TaskSender {
                start_of_frame: start_tx,
                end_of_frame: end_tx,
            },
            start_of_frame: start_rx,
            end_of_frame: end_rx,
        }
    }

    /// Returns a sender that producer threads can own.
    pub fn sender(&self) -> TaskSender {
        self.sender.clone()
    }

    /// Pushes through the queue's own sender. See [`TaskSender::push`].
    pub fn push(&self, priority: Priority, task: impl Into<Task>) {
        self.sender.push(priority, task);
    }

    /// Executes a task synchronously, bypassing the buckets.
    ///
    /// This is the [`Priority::Immediate`] path; the caller must be the render
    /// thread, which is what holding the [`TaskContext`] proves.
    pub fn run_immediate(&self, task: impl Into<Task>, ctx: &mut TaskContext<'_>) -> bool {
        task.into().execute(ctx)
    }

    /// Number of tasks waiting in a bucket. Always zero for `Immediate`.
    pub fn pending(&self, priority: Priority) -> usize {
        self.receiver(priority).map_or(0, flume::Receiver::len)
    }

    /// Applies every task that was in the bucket when the drain started.
    ///
    /// Tasks run in push order. Tasks pushed while the drain runs, including
    /// by completion callbacks, wait for the bucket's next drain. A failing or
    /// panicking task does not stop the ones after it.
    pub fn drain(&self, priority: Priority, ctx: &mut TaskContext<'_>) -> DrainReport {
        let mut report = DrainReport::default();
        let Some(receiver) = self.receiver(priority) else {
            return report;
        };

        let batch: Vec<Task> = receiver.try_iter().take(receiver.len()).collect();
        for task in batch {
            report.record(task.execute(ctx));
        }

        if !report.is_empty() {
            log::trace!(
                "Drained {priority}: {} task(s), {} failed",
                report.processed,
                report.failed
            );
        }
        report
    }

    fn receiver(&self, priority: Priority) -> Option<&flume::Receiver<Task>> {
        match priority {
            Priority::Immediate => None,
            Priority::StartOfFrame => Some(&self.start_of_frame),
            Priority::EndOfFrame => Some(&self.end_of_frame),
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskQueue {
    fn drop(&mut self) {
        // Cancel callbacks may push again, so sweep until both buckets stay empty.
        let mut cancelled = 0;
        loop {
            let mut swept = 0;
            for receiver in [&self.start_of_frame, &self.end_of_frame] {
                for task in receiver.try_iter() {
                    task.cancel();
                    swept += 1;
                }
            }
            if swept == 0 {
                break;
            }
            cancelled += swept;
        }
        if cancelled > 0 {
            log::warn!("TaskQueue dropped with {cancelled} pending task(s); cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Extent2D;
    use crate::renderer::api::TextureFormat;
    use crate::scene::{Camera, CameraId, LayerId, SceneId, SceneRegistry};
    use crate::task::TaskKind;
    use crate::testing::MockDevice;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn add_layer(scene: SceneId, layer: LayerId) -> TaskKind {
        TaskKind::AddLayer {
            scene,
            layer,
            name: format!("{layer}"),
        }
    }

    fn setup() -> (MockDevice, SceneRegistry, SceneId) {
        let mut scenes = SceneRegistry::default();
        let scene = SceneId::allocate();
        scenes.create(scene);
        (MockDevice::new(), scenes, scene)
    }

    #[test]
    fn drain_applies_tasks_in_push_order() {
        let (device, mut scenes, scene) = setup();
        let queue = TaskQueue::new();
        let layers = [
            LayerId::allocate(),
            LayerId::allocate(),
            LayerId::allocate(),
        ];
        for layer in layers {
            queue.push(Priority::StartOfFrame, add_layer(scene, layer));
        }

        let report = queue.drain(
            Priority::StartOfFrame,
            &mut TaskContext::new(&mut scenes, &device),
        );
        assert_eq!(report.processed, 3);
        assert_eq!(report.succeeded, 3);
        assert_eq!(scenes.get(scene).unwrap().layer_order(), layers.to_vec());
    }

    #[test]
    fn buckets_are_independent() {
        let (device, mut scenes, scene) = setup();
        let queue = TaskQueue::new();
        queue.push(Priority::EndOfFrame, TaskKind::RemoveScene { scene });

        let start = queue.drain(
            Priority::StartOfFrame,
            &mut TaskContext::new(&mut scenes, &device),
        );
        assert!(start.is_empty());
        assert!(scenes.contains(scene));
        assert_eq!(queue.pending(Priority::EndOfFrame), 1);

        queue.drain(
            Priority::EndOfFrame,
            &mut TaskContext::new(&mut scenes, &device),
        );
        assert!(!scenes.contains(scene));
    }

    #[test]
    fn tasks_pushed_during_drain_wait_for_next_pass() {
        let (device, mut scenes, scene) = setup();
        let queue = TaskQueue::new();
        let sender = queue.sender();
        let late = LayerId::allocate();

        queue.push(
            Priority::StartOfFrame,
            Task::new(add_layer(scene, LayerId::allocate())).on_complete(move |_| {
                sender.push(Priority::StartOfFrame, add_layer(scene, late));
            }),
        );

        let first = queue.drain(
            Priority::StartOfFrame,
            &mut TaskContext::new(&mut scenes, &device),
        );
        assert_eq!(first.processed, 1);
        assert_eq!(queue.pending(Priority::StartOfFrame), 1);
        assert!(scenes.get(scene).unwrap().layer(late).is_none());

        let second = queue.drain(
            Priority::StartOfFrame,
            &mut TaskContext::new(&mut scenes, &device),
        );
        assert_eq!(second.processed, 1);
        assert!(scenes.get(scene).unwrap().layer(late).is_some());
    }

    #[test]
    fn panicking_task_does_not_abort_drain() {
        let (device, mut scenes, scene) = setup();
        let texture = device.render_target(TextureFormat::Rgba8Unorm);
        device.panic_on_resize.store(true, Ordering::SeqCst);
        let queue = TaskQueue::new();
        let (before, after) = (LayerId::allocate(), LayerId::allocate());

        queue.push(Priority::StartOfFrame, add_layer(scene, before));
        queue.push(
            Priority::StartOfFrame,
            TaskKind::ResizeTexture {
                texture,
                extent: Extent2D::new(8, 8),
            },
        );
        queue.push(Priority::StartOfFrame, add_layer(scene, after));

        let report = queue.drain(
            Priority::StartOfFrame,
            &mut TaskContext::new(&mut scenes, &device),
        );
        assert_eq!(
            report,
            DrainReport {
                processed: 3,
                succeeded: 2,
                failed: 1
            }
        );
        assert_eq!(
            scenes.get(scene).unwrap().layer_order(),
            vec![before, after]
        );
    }

    #[test]
    fn immediate_from_sender_is_deferred() {
        let (device, mut scenes, scene) = setup();
        let queue = TaskQueue::new();
        queue
            .sender()
            .push(Priority::Immediate, add_layer(scene, LayerId::allocate()));

        assert_eq!(queue.pending(Priority::StartOfFrame), 1);
        assert_eq!(queue.pending(Priority::Immediate), 0);
        let report = queue.drain(
            Priority::Immediate,
            &mut TaskContext::new(&mut scenes, &device),
        );
        assert!(report.is_empty());
    }

    #[test]
    fn run_immediate_applies_before_returning() {
        let (device, mut scenes, scene) = setup();
        let queue = TaskQueue::new();
        let layer = LayerId::allocate();

        let ok = queue.run_immediate(
            add_layer(scene, layer),
            &mut TaskContext::new(&mut scenes, &device),
        );
        assert!(ok);
        assert!(scenes.get(scene).unwrap().layer(layer).is_some());
        assert_eq!(queue.pending(Priority::StartOfFrame), 0);
    }

    #[test]
    fn concurrent_pushes_complete_exactly_once() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 250;

        let (device, mut scenes, scene) = setup();
        let queue = TaskQueue::new();
        let calls: Arc<Vec<AtomicUsize>> = Arc::new(
            (0..PRODUCERS * PER_PRODUCER)
                .map(|_| AtomicUsize::new(0))
                .collect(),
        );

        let handles: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let sender = queue.sender();
                let calls = calls.clone();
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        let index = p * PER_PRODUCER + i;
                        let calls = calls.clone();
                        let task = Task::new(TaskKind::AddCamera {
                            scene,
                            camera: Camera::new(CameraId::allocate()),
                        })
                        .on_complete(move |_| {
                            calls[index].fetch_add(1, Ordering::SeqCst);
                        });
                        sender.push(Priority::StartOfFrame, task);
                    }
                })
            })
            .collect();

        let mut processed = 0;
        while handles.iter().any(|h| !h.is_finished()) {
            processed += queue
                .drain(
                    Priority::StartOfFrame,
                    &mut TaskContext::new(&mut scenes, &device),
                )
                .processed;
        }
        for handle in handles {
            handle.join().unwrap();
        }
        processed += queue
            .drain(
                Priority::StartOfFrame,
                &mut TaskContext::new(&mut scenes, &device),
            )
            .processed;

        assert_eq!(processed, PRODUCERS * PER_PRODUCER);
        assert!(calls.iter().all(|c| c.load(Ordering::SeqCst) == 1));
        assert_eq!(
            scenes.get(scene).unwrap().camera_count(),
            PRODUCERS * PER_PRODUCER
        );
    }

    #[test]
    fn dropping_the_queue_cancels_pending_and_later_tasks() {
        let failures = Arc::new(AtomicUsize::new(0));
        let queue = TaskQueue::new();
        let sender = queue.sender();

        let counter = failures.clone();
        queue.push(
            Priority::EndOfFrame,
            Task::new(TaskKind::RemoveScene {
                scene: SceneId::allocate(),
            })
            .on_complete(move |ok| {
                if !ok {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }),
        );
        drop(queue);
        assert_eq!(failures.load(Ordering::SeqCst), 1);

        let counter = failures.clone();
        sender.push(
            Priority::StartOfFrame,
            Task::new(TaskKind::AddScene {
                scene: SceneId::allocate(),
            })
            .on_complete(move |ok| {
                if !ok {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }),
        );
        assert_eq!(failures.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn tasks_pushed_by_cancel_callbacks_are_cancelled_too() {
        let failures = Arc::new(AtomicUsize::new(0));
        let queue = TaskQueue::new();
        let sender = queue.sender();

        let counter = failures.clone();
        let follow_up = sender.clone();
        queue.push(
            Priority::EndOfFrame,
            Task::new(TaskKind::RemoveScene {
                scene: SceneId::allocate(),
            })
            .on_complete(move |ok| {
                assert!(!ok);
                counter.fetch_add(1, Ordering::SeqCst);
                let counter = counter.clone();
                follow_up.push(
                    Priority::StartOfFrame,
                    Task::new(TaskKind::AddScene {
                        scene: SceneId::allocate(),
                    })
                    .on_complete(move |ok| {
                        assert!(!ok);
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }),
        );

        drop(queue);
        assert_eq!(failures.load(Ordering::SeqCst), 2);
        drop(sender);
        assert_eq!(failures.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn tasks_stranded_in_a_channel_complete_when_it_closes() {
        let (tx, rx) = flume::unbounded::<Task>();
        let failures = Arc::new(AtomicUsize::new(0));
        let counter = failures.clone();
        tx.send(
            Task::new(TaskKind::AddScene {
                scene: SceneId::allocate(),
            })
            .on_complete(move |ok| {
                if !ok {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }),
        )
        .unwrap();

        drop(rx);
        assert_eq!(failures.load(Ordering::SeqCst), 0);
        drop(tx);
        assert_eq!(failures.load(Ordering::SeqCst), 1);
    }
}
