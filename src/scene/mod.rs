pub mod loader;
pub mod scene;

pub use loader::load_scene;
pub use scene::{Scene, SceneHandle};
