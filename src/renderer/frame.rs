use crate::error::LfError;
use std::path::Path;

/// One composited output frame: RGB, 8 bits per channel, row-major with
/// row 0 at the bottom (same convention as shot textures).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    pub(crate) fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 3) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes, bottom row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel at (x, y) with y counted from the bottom.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * self.width + x) * 3) as usize;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Encode as PNG. Image files are top-down, so the rows are flipped back
    /// on the way out.
    pub fn save_png(&self, path: &Path) -> Result<(), LfError> {
        let img = image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .expect("frame buffer matches its dimensions");
        let img = image::imageops::flip_vertical(&img);
        img.save(path).map_err(|source| LfError::ImageWrite {
            path: path.display().to_string(),
            source,
        })
    }
}
