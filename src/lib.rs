//! Light-field viewer core: synthesize novel views from a set of calibrated
//! photographs by re-projecting and blending them against a virtual camera.

pub mod camera;
pub mod error;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod shot;
pub mod worker;

pub use camera::Camera;
pub use error::LfError;
pub use renderer::{BlendMode, FocalPlane, Frame, Renderer, RendererConfig};
pub use scene::{Scene, SceneHandle, load_scene};
pub use settings::ViewerSettings;
pub use shot::{Shot, Texture};
pub use worker::{PoseCell, RenderWorker, WorkerEvent};

pub const CONFY_APP_NAME: &str = "lfvis-rs";
