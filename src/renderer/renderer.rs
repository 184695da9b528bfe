use crate::error::LfError;
use crate::renderer::blend::BlendMode;

/// The full-viewport draw primitive: a world-space quad spanning
/// `[-half_extent, half_extent]` in X and Y at the given Z. Every output
/// pixel ray is intersected with this quad; misses stay background.
#[derive(Debug, Clone, Copy)]
pub struct FocalPlane {
    pub z: f32,
    pub half_extent: f32,
}

impl Default for FocalPlane {
    fn default() -> Self {
        Self {
            z: 0.0,
            half_extent: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RendererConfig {
    pub blend_mode: BlendMode,
    /// Color of pixels no shot contributes to. Never left uninitialized.
    pub background: [u8; 3],
    pub focal_plane: FocalPlane,
}

/// Produces composited frames from a virtual camera and a shot collection.
///
/// A constructed Renderer is always ready: construction is the single
/// `Uninitialized -> Ready` transition and there is no way back. The output
/// resolution is fixed for the Renderer's lifetime; rendering at another
/// resolution means constructing a new Renderer.
pub struct Renderer {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) config: RendererConfig,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Result<Self, LfError> {
        Self::with_config(width, height, RendererConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: RendererConfig) -> Result<Self, LfError> {
        if width == 0 || height == 0 {
            return Err(LfError::invalid_parameter(format!(
                "output resolution must be non-zero, got {width}x{height}"
            )));
        }
        if !config.focal_plane.half_extent.is_finite() || config.focal_plane.half_extent <= 0.0 {
            return Err(LfError::invalid_parameter(format!(
                "focal plane half extent must be positive, got {}",
                config.focal_plane.half_extent
            )));
        }
        if !config.focal_plane.z.is_finite() {
            return Err(LfError::invalid_parameter(format!(
                "focal plane z must be finite, got {}",
                config.focal_plane.z
            )));
        }
        Ok(Self {
            width,
            height,
            config,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.config.blend_mode
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.config.blend_mode = mode;
    }
}
