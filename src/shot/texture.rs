use crate::error::LfError;
use std::path::Path;

/// CPU-resident texture in canonical layout: RGB, 8 bits per channel,
/// row-major with row 0 at the BOTTOM of the image.
///
/// The vertical flip on load is a hard requirement: the reprojection math
/// maps normalized image coordinates with v growing upwards, and the output
/// frame uses the same origin.
#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    // None once released; any later use is an InvalidState at the call site.
    texels: Option<Vec<u8>>,
}

impl Texture {
    /// Decode an image file into canonical RGB bottom-up layout.
    pub fn open(path: &Path) -> Result<Self, LfError> {
        let img = image::open(path).map_err(|source| LfError::ImageLoad {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_image(img))
    }

    /// Canonicalize a decoded image: convert to RGB and flip vertically so
    /// row 0 is the bottom row.
    pub fn from_image(img: image::DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let flipped = image::imageops::flip_vertical(&rgb);
        Self {
            width,
            height,
            texels: Some(flipped.into_raw()),
        }
    }

    /// Build a texture from an in-memory pixel buffer with `channels` samples
    /// per pixel, rows already bottom-up. Grayscale is replicated across RGB,
    /// an alpha channel is dropped.
    pub fn from_pixels(
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u32,
    ) -> Result<Self, LfError> {
        if width == 0 || height == 0 {
            return Err(LfError::invalid_parameter(format!(
                "texture dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if !(1..=4).contains(&channels) {
            return Err(LfError::invalid_parameter(format!(
                "texture must have 1..=4 channels, got {channels}"
            )));
        }
        // usize arithmetic: the product can exceed u32 for large dimensions.
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(LfError::invalid_parameter(format!(
                "pixel buffer length {} does not match {width}x{height}x{channels}",
                pixels.len()
            )));
        }

        let c = channels as usize;
        let mut texels = Vec::with_capacity(width as usize * height as usize * 3);
        for px in pixels.chunks_exact(c) {
            match c {
                // luma (and luma+alpha): replicate
                1 | 2 => texels.extend_from_slice(&[px[0], px[0], px[0]]),
                _ => texels.extend_from_slice(&px[..3]),
            }
        }
        Ok(Self {
            width,
            height,
            texels: Some(texels),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Free the texel storage. Models GPU texture release: the handle stays
    /// around but any later bind fails with InvalidState.
    pub fn release(&mut self) {
        self.texels = None;
    }

    pub fn is_released(&self) -> bool {
        self.texels.is_none()
    }

    /// Nearest-texel lookup at normalized coordinates, clamp-to-edge.
    /// (0,0) addresses the bottom-left texel. None once released.
    pub fn sample(&self, u: f32, v: f32) -> Option<[u8; 3]> {
        let texels = self.texels.as_ref()?;
        let x = ((u * self.width as f32) as i64).clamp(0, self.width as i64 - 1) as usize;
        let y = ((v * self.height as f32) as i64).clamp(0, self.height as i64 - 1) as usize;
        let idx = (y * self.width as usize + x) * 3;
        Some([texels[idx], texels[idx + 1], texels[idx + 2]])
    }
}
