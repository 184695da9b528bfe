pub mod shot;
pub mod texture;

pub use shot::{Shot, ShotBinding};
pub use texture::Texture;
