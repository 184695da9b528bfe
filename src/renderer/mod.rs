pub mod blend;
pub mod frame;
pub mod integrate;
pub mod renderer;

pub use blend::BlendMode;
pub use frame::Frame;
pub use renderer::{FocalPlane, Renderer, RendererConfig};
