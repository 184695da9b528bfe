use crate::shot::Shot;
use parking_lot::RwLock;
use std::sync::Arc;

/// An ordered, immutable collection of shots, built once per load and
/// replaced wholesale on the next load.
#[derive(Debug, Default)]
pub struct Scene {
    shots: Vec<Shot>,
}

impl Scene {
    pub fn new(shots: Vec<Shot>) -> Self {
        Self { shots }
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }
}

/// Shared slot holding the current scene.
///
/// The render worker snapshots the whole collection at each frame boundary
/// with [`SceneHandle::current`]; [`SceneHandle::publish`] swaps in a fully
/// built replacement. A frame in flight keeps its `Arc<Scene>` alive, so no
/// pass ever observes a half-replaced collection or a texture freed under it.
#[derive(Clone)]
pub struct SceneHandle {
    slot: Arc<RwLock<Arc<Scene>>>,
}

impl SceneHandle {
    pub fn new(scene: Scene) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Arc::new(scene))),
        }
    }

    /// Whole-collection snapshot for one frame.
    pub fn current(&self) -> Arc<Scene> {
        self.slot.read().clone()
    }

    /// Atomically replace the scene with a fully built new one.
    pub fn publish(&self, scene: Scene) {
        *self.slot.write() = Arc::new(scene);
    }
}
