use crate::camera::Camera;
use crate::error::LfError;
use crate::shot::texture::Texture;
use nalgebra_glm as glm;
use std::path::Path;

/// One perspective of the light field: a fixed camera pose composed with the
/// photograph taken from it.
///
/// The texture is uploaded (decoded and canonicalized) exactly once at
/// construction and is immutable afterwards; one Shot owns exactly one
/// texture and one pose.
#[derive(Debug, Clone)]
pub struct Shot {
    camera: Camera,
    texture: Texture,
}

/// Everything one integration pass needs from a shot: the texture plus the
/// derived matrices and the shot camera position (for nearest-camera
/// blending).
pub struct ShotBinding<'a> {
    pub texture: &'a Texture,
    pub view: glm::Mat4,
    pub projection: glm::Mat4,
    pub position: glm::Vec3,
}

impl Shot {
    /// Load a shot from an image file. `aspect` of None means the aspect
    /// ratio of the decoded image.
    pub fn from_file(
        path: &Path,
        position: glm::Vec3,
        orientation: glm::Quat,
        fovy_degrees: f32,
        aspect: Option<f32>,
    ) -> Result<Self, LfError> {
        let texture = Texture::open(path)?;
        Self::with_texture(texture, position, orientation, fovy_degrees, aspect)
    }

    /// Build a shot from an in-memory pixel buffer (rows bottom-up, 1..=4
    /// channels).
    pub fn from_pixels(
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u32,
        position: glm::Vec3,
        orientation: glm::Quat,
        fovy_degrees: f32,
        aspect: Option<f32>,
    ) -> Result<Self, LfError> {
        let texture = Texture::from_pixels(pixels, width, height, channels)?;
        Self::with_texture(texture, position, orientation, fovy_degrees, aspect)
    }

    fn with_texture(
        texture: Texture,
        position: glm::Vec3,
        orientation: glm::Quat,
        fovy_degrees: f32,
        aspect: Option<f32>,
    ) -> Result<Self, LfError> {
        let aspect = aspect.unwrap_or_else(|| texture.aspect_ratio());
        let camera = Camera::new(position, orientation, fovy_degrees, aspect)?;
        Ok(Self { camera, texture })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Release the owned texture (scene unload). The shot stays around but
    /// can no longer be bound.
    pub fn release_texture(&mut self) {
        self.texture.release();
    }

    /// Expose this perspective for one integration pass.
    ///
    /// Fails with InvalidState if the texture has been released; the pass
    /// must never read stale texels.
    pub fn bind(&self) -> Result<ShotBinding<'_>, LfError> {
        if self.texture.is_released() {
            return Err(LfError::invalid_state(
                "shot texture has been released".to_string(),
            ));
        }
        Ok(ShotBinding {
            texture: &self.texture,
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            position: self.camera.position(),
        })
    }
}
