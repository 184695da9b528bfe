use crate::camera::Camera;
use crate::error::LfError;
use crate::renderer::blend::BlendMode;
use crate::renderer::frame::Frame;
use crate::renderer::renderer::Renderer;
use crate::shot::{Shot, Texture};
use nalgebra_glm as glm;
use rayon::prelude::*;

// One shot, prepared for a pass: its texture, the world -> shot clip
// transform, and the squared distance from the virtual camera to the shot
// camera (for nearest-camera blending).
struct ShotPass<'a> {
    texture: &'a Texture,
    view_proj: glm::Mat4,
    distance2: f32,
}

impl Renderer {
    /// Composite one frame: for every output pixel, cast the virtual-camera
    /// ray through the pixel center, intersect the focal-plane quad, and
    /// reproject the hit into every shot, blending the contributing samples.
    ///
    /// Read-only with respect to both the shots and the virtual camera, and
    /// deterministic: identical inputs produce identical output.
    pub fn integrate(&self, shots: &[Shot], virtual_camera: &Camera) -> Result<Frame, LfError> {
        // Bind everything up front so a released texture fails the frame
        // before any pixel is produced.
        let vcam_pos = virtual_camera.position();
        let passes = shots
            .iter()
            .map(|shot| {
                let binding = shot.bind()?;
                Ok(ShotPass {
                    texture: binding.texture,
                    view_proj: binding.projection * binding.view,
                    distance2: (binding.position - vcam_pos).norm_squared(),
                })
            })
            .collect::<Result<Vec<_>, LfError>>()?;

        let view_proj = virtual_camera.projection_matrix() * virtual_camera.view_matrix();
        let inv_view_proj = glm::inverse(&view_proj);

        let stride = self.width as usize * 3;
        let mut pixels = vec![0u8; stride * self.height as usize];
        let (w, h) = (self.width as f32, self.height as f32);

        // Row 0 is the bottom of the frame, matching texture layout; rows are
        // independent, so rayon partitioning cannot change the result.
        pixels
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                let ndc_y = ((y as f32 + 0.5) / h) * 2.0 - 1.0;
                for x in 0..self.width as usize {
                    let ndc_x = ((x as f32 + 0.5) / w) * 2.0 - 1.0;
                    let rgb = self
                        .shade(&passes, &inv_view_proj, ndc_x, ndc_y)
                        .unwrap_or(self.config.background);
                    row[x * 3..x * 3 + 3].copy_from_slice(&rgb);
                }
            });

        Ok(Frame::new(self.width, self.height, pixels))
    }

    // Fragment stage for one pixel. None means background.
    fn shade(
        &self,
        passes: &[ShotPass<'_>],
        inv_view_proj: &glm::Mat4,
        ndc_x: f32,
        ndc_y: f32,
    ) -> Option<[u8; 3]> {
        let world = self.focal_point(inv_view_proj, ndc_x, ndc_y)?;
        match self.config.blend_mode {
            BlendMode::Average => blend_average(passes, &world),
            BlendMode::NearestCamera => blend_nearest(passes, &world),
        }
    }

    // Intersect the pixel ray with the focal-plane quad.
    fn focal_point(&self, inv_view_proj: &glm::Mat4, ndc_x: f32, ndc_y: f32) -> Option<glm::Vec3> {
        let plane = self.config.focal_plane;
        let near = unproject(inv_view_proj, ndc_x, ndc_y, -1.0)?;
        let far = unproject(inv_view_proj, ndc_x, ndc_y, 1.0)?;
        let dir = far - near;
        if dir.z.abs() < 1e-9 {
            return None;
        }
        let t = (plane.z - near.z) / dir.z;
        if t <= 0.0 {
            return None;
        }
        let p = near + dir * t;
        if p.x.abs() > plane.half_extent || p.y.abs() > plane.half_extent {
            return None;
        }
        Some(p)
    }
}

fn unproject(inv_view_proj: &glm::Mat4, x: f32, y: f32, z: f32) -> Option<glm::Vec3> {
    let h = inv_view_proj * glm::vec4(x, y, z, 1.0);
    if h.w.abs() < 1e-9 {
        return None;
    }
    Some(glm::vec3(h.x / h.w, h.y / h.w, h.z / h.w))
}

// Reproject a world point into one shot's image. None when the point falls
// behind the shot's image plane or outside its [0,1]^2 image bounds.
fn project_and_sample(pass: &ShotPass<'_>, p: &glm::Vec3) -> Option<[u8; 3]> {
    let clip = pass.view_proj * glm::vec4(p.x, p.y, p.z, 1.0);
    if clip.w <= 1e-6 {
        return None;
    }
    let nx = clip.x / clip.w;
    let ny = clip.y / clip.w;
    if !(-1.0..=1.0).contains(&nx) || !(-1.0..=1.0).contains(&ny) {
        return None;
    }
    pass.texture.sample(nx * 0.5 + 0.5, ny * 0.5 + 0.5)
}

fn blend_average(passes: &[ShotPass<'_>], p: &glm::Vec3) -> Option<[u8; 3]> {
    let mut sum = [0.0f32; 3];
    let mut count = 0u32;
    for pass in passes {
        if let Some(rgb) = project_and_sample(pass, p) {
            for c in 0..3 {
                sum[c] += rgb[c] as f32;
            }
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    let n = count as f32;
    Some([
        (sum[0] / n).round() as u8,
        (sum[1] / n).round() as u8,
        (sum[2] / n).round() as u8,
    ])
}

// Strict `<` while scanning in collection order: equal distances resolve to
// the earliest shot.
fn blend_nearest(passes: &[ShotPass<'_>], p: &glm::Vec3) -> Option<[u8; 3]> {
    let mut best: Option<(f32, [u8; 3])> = None;
    for pass in passes {
        if best.is_some_and(|(d, _)| pass.distance2 >= d) {
            continue;
        }
        if let Some(rgb) = project_and_sample(pass, p) {
            best = Some((pass.distance2, rgb));
        }
    }
    best.map(|(_, rgb)| rgb)
}
