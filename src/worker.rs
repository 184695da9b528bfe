use crate::camera::Camera;
use crate::error::LfError;
use crate::renderer::{Frame, Renderer};
use crate::scene::SceneHandle;
use crossbeam_channel::{Sender, TrySendError};
use log::{debug, error, info};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

/// Shared virtual-camera pose, written by the front end and read by the
/// render worker.
///
/// Reads and writes cover the whole pose (position + orientation +
/// intrinsics) under one lock, so a reader can never observe a torn pose
/// with, say, a new position and an old orientation.
#[derive(Clone)]
pub struct PoseCell {
    inner: Arc<RwLock<Camera>>,
}

impl PoseCell {
    pub fn new(camera: Camera) -> Self {
        Self {
            inner: Arc::new(RwLock::new(camera)),
        }
    }

    /// Whole-pose snapshot, taken once per frame by the worker.
    pub fn snapshot(&self) -> Camera {
        self.inner.read().clone()
    }

    /// Mutate the whole pose under the lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut Camera) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn set(&self, camera: Camera) {
        *self.inner.write() = camera;
    }
}

/// Events the worker publishes to its owner. `Stopped` is always the last.
#[derive(Debug)]
pub enum WorkerEvent {
    Frame(Frame),
    Error(LfError),
    Stopped,
}

/// Dedicated render-loop worker: repeatedly snapshots the scene and pose,
/// integrates one frame, and hands it off without ever blocking on the
/// consumer. A slow consumer drops frames; a failed frame stops the loop.
pub struct RenderWorker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    pub fn spawn(
        renderer: Renderer,
        scene: SceneHandle,
        pose: PoseCell,
        events: Sender<WorkerEvent>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let handle = std::thread::spawn(move || {
            run_loop(renderer, scene, pose, events, flag);
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Ask the worker to stop at the next frame boundary.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Stop and wait for the worker to release its resources.
    pub fn stop(mut self) {
        self.request_stop();
        self.join();
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.request_stop();
        self.join();
    }
}

fn run_loop(
    renderer: Renderer,
    scene: SceneHandle,
    pose: PoseCell,
    events: Sender<WorkerEvent>,
    stop: Arc<AtomicBool>,
) {
    info!(
        "render worker up: {}x{}, {:?} blending",
        renderer.width(),
        renderer.height(),
        renderer.blend_mode()
    );

    // The stop flag is checked only at frame boundaries; a frame in progress
    // always runs to completion.
    while !stop.load(Ordering::Relaxed) {
        let scene = scene.current();
        let camera = pose.snapshot();

        match renderer.integrate(scene.shots(), &camera) {
            Ok(frame) => match events.try_send(WorkerEvent::Frame(frame)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => debug!("consumer busy, frame dropped"),
                Err(TrySendError::Disconnected(_)) => break,
            },
            Err(e) => {
                error!("integrate failed, stopping render loop: {e}");
                let _ = events.try_send(WorkerEvent::Error(e));
                break;
            }
        }
    }

    let _ = events.try_send(WorkerEvent::Stopped);
    info!("render worker down");
}
