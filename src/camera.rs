use crate::error::LfError;
use nalgebra_glm as glm;

/// Near clip distance in world units. Fixed implementation default.
pub const NEAR_PLANE: f32 = 0.1;
/// Far clip distance in world units. Fixed implementation default.
pub const FAR_PLANE: f32 = 1000.0;

/// Pinhole perspective camera: position, orientation, vertical field of view
/// and aspect ratio, with view/projection matrices derived on demand.
///
/// The orientation is kept normalized at all times; an identity orientation
/// looks down -Z with +Y up (OpenGL convention).
#[derive(Debug, Clone)]
pub struct Camera {
    position: glm::Vec3,
    orientation: glm::Quat,
    fovy_degrees: f32,
    aspect_ratio: f32,
}

impl Camera {
    pub fn new(
        position: glm::Vec3,
        orientation: glm::Quat,
        fovy_degrees: f32,
        aspect_ratio: f32,
    ) -> Result<Self, LfError> {
        validate_intrinsics(fovy_degrees, aspect_ratio)?;
        let orientation = normalize_orientation(orientation)?;
        Ok(Self {
            position,
            orientation,
            fovy_degrees,
            aspect_ratio,
        })
    }

    pub fn position(&self) -> glm::Vec3 {
        self.position
    }

    pub fn orientation(&self) -> glm::Quat {
        self.orientation
    }

    pub fn fovy_degrees(&self) -> f32 {
        self.fovy_degrees
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Replace position and orientation in one step.
    pub fn set_pose(&mut self, position: glm::Vec3, orientation: glm::Quat) -> Result<(), LfError> {
        self.orientation = normalize_orientation(orientation)?;
        self.position = position;
        Ok(())
    }

    /// Replace field of view and aspect ratio. Out-of-range values are
    /// rejected, never clamped.
    pub fn set_intrinsics(&mut self, fovy_degrees: f32, aspect_ratio: f32) -> Result<(), LfError> {
        validate_intrinsics(fovy_degrees, aspect_ratio)?;
        self.fovy_degrees = fovy_degrees;
        self.aspect_ratio = aspect_ratio;
        Ok(())
    }

    /// Rigid transform mapping world space into camera space: the inverse of
    /// the camera's translation * rotation.
    pub fn view_matrix(&self) -> glm::Mat4 {
        let model = glm::translation(&self.position) * glm::quat_to_mat4(&self.orientation);
        glm::inverse(&model)
    }

    /// Standard perspective projection for the current intrinsics and the
    /// fixed [NEAR_PLANE]/[FAR_PLANE] pair.
    pub fn projection_matrix(&self) -> glm::Mat4 {
        glm::perspective(
            self.aspect_ratio,
            self.fovy_degrees.to_radians(),
            NEAR_PLANE,
            FAR_PLANE,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: glm::vec3(0.0, 0.0, 0.0),
            orientation: glm::quat_identity(),
            fovy_degrees: 60.0,
            aspect_ratio: 1.0,
        }
    }
}

fn validate_intrinsics(fovy_degrees: f32, aspect_ratio: f32) -> Result<(), LfError> {
    if !fovy_degrees.is_finite() || fovy_degrees <= 0.0 || fovy_degrees >= 180.0 {
        return Err(LfError::invalid_parameter(format!(
            "fovy must lie in (0, 180) degrees, got {fovy_degrees}"
        )));
    }
    if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
        return Err(LfError::invalid_parameter(format!(
            "aspect ratio must be positive, got {aspect_ratio}"
        )));
    }
    Ok(())
}

fn normalize_orientation(q: glm::Quat) -> Result<glm::Quat, LfError> {
    let finite = q.w.is_finite() && q.i.is_finite() && q.j.is_finite() && q.k.is_finite();
    if !finite || q.norm() < 1e-6 {
        return Err(LfError::invalid_parameter(format!(
            "orientation quaternion must be finite and non-zero, got [{}, {}, {}, {}]",
            q.i, q.j, q.k, q.w
        )));
    }
    Ok(glm::quat_normalize(&q))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_matrix_maps_own_position_to_origin() {
        let cam = Camera::new(
            glm::vec3(1.5, -2.0, 4.0),
            glm::quat_angle_axis(0.7, &glm::vec3(0.0, 1.0, 0.0)),
            72.0,
            1.6,
        )
        .unwrap();

        let p = cam.position();
        let origin = cam.view_matrix() * glm::vec4(p.x, p.y, p.z, 1.0);
        assert!(origin.x.abs() < 1e-4);
        assert!(origin.y.abs() < 1e-4);
        assert!(origin.z.abs() < 1e-4);
        assert!((origin.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn intrinsics_out_of_range_are_rejected() {
        let mut cam = Camera::default();
        assert!(matches!(
            cam.set_intrinsics(0.0, 1.0),
            Err(LfError::InvalidParameter(_))
        ));
        assert!(matches!(
            cam.set_intrinsics(180.0, 1.0),
            Err(LfError::InvalidParameter(_))
        ));
        assert!(matches!(
            cam.set_intrinsics(60.0, 0.0),
            Err(LfError::InvalidParameter(_))
        ));
        assert!(matches!(
            cam.set_intrinsics(60.0, -2.0),
            Err(LfError::InvalidParameter(_))
        ));
        // the failed calls must not have touched the camera
        assert_eq!(cam.fovy_degrees(), 60.0);
        assert_eq!(cam.aspect_ratio(), 1.0);
    }

    #[test]
    fn non_finite_orientation_is_rejected() {
        let mut cam = Camera::default();
        let bad = glm::quat(f32::NAN, 0.0, 0.0, 0.0);
        assert!(matches!(
            cam.set_pose(glm::vec3(0.0, 0.0, 0.0), bad),
            Err(LfError::InvalidParameter(_))
        ));
        let zero = glm::quat(0.0, 0.0, 0.0, 0.0);
        assert!(matches!(
            cam.set_pose(glm::vec3(0.0, 0.0, 0.0), zero),
            Err(LfError::InvalidParameter(_))
        ));
    }

    #[test]
    fn orientation_is_stored_normalized() {
        let q = glm::quat(2.0, 0.0, 0.0, 0.0);
        let cam = Camera::new(glm::vec3(0.0, 0.0, 0.0), q, 60.0, 1.0).unwrap();
        assert!((cam.orientation().norm() - 1.0).abs() < 1e-6);
    }
}
