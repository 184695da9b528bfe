//! Renderer properties: reprojection fidelity, culling, blend policies,
//! determinism.

use lfvis_rs::renderer::BlendMode;
use lfvis_rs::{Camera, LfError, Renderer, RendererConfig, Shot};
use nalgebra_glm as glm;

fn pattern(width: u32, height: u32) -> Vec<u8> {
    let mut px = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            px.push((x * 7 + y * 13) as u8);
            px.push((x * 31 + y * 5) as u8);
            px.push((x + y * 3) as u8);
        }
    }
    px
}

fn shot_at(pixels: &[u8], size: u32, position: glm::Vec3, fovy: f32) -> Shot {
    Shot::from_pixels(
        pixels,
        size,
        size,
        3,
        position,
        glm::quat_identity(),
        fovy,
        None,
    )
    .unwrap()
}

fn solid_shot(color: [u8; 3], position: glm::Vec3, fovy: f32) -> Shot {
    let size = 8;
    let mut px = Vec::with_capacity((size * size * 3) as usize);
    for _ in 0..size * size {
        px.extend_from_slice(&color);
    }
    shot_at(&px, size, position, fovy)
}

fn assert_uniform(frame: &lfvis_rs::Frame, expected: [u8; 3]) {
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            assert_eq!(frame.pixel(x, y), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn camera_at_shot_pose_reproduces_the_shot_image() {
    let size = 64;
    let pixels = pattern(size, size);
    // Looking down -Z from z=1 at the focal plane (z=0); a 60 degree fov
    // keeps the whole frustum inside the focal quad.
    let shot = shot_at(&pixels, size, glm::vec3(0.0, 0.0, 1.0), 60.0);
    let vcam = shot.camera().clone();

    let renderer = Renderer::new(size, size).unwrap();
    let frame = renderer.integrate(std::slice::from_ref(&shot), &vcam).unwrap();

    assert_eq!(frame.pixels(), &pixels[..]);
}

#[test]
fn camera_facing_away_sees_only_background() {
    let shot = solid_shot([255, 0, 0], glm::vec3(0.0, 0.0, 2.0), 60.0);
    // Half-turn about Y: the focal quad is entirely behind the camera.
    let vcam = Camera::new(
        glm::vec3(0.0, 0.0, 1.0),
        glm::quat_angle_axis(std::f32::consts::PI, &glm::vec3(0.0, 1.0, 0.0)),
        60.0,
        1.0,
    )
    .unwrap();

    let config = RendererConfig {
        background: [10, 20, 30],
        ..Default::default()
    };
    let renderer = Renderer::with_config(16, 16, config).unwrap();
    let frame = renderer.integrate(&[shot], &vcam).unwrap();

    assert_uniform(&frame, [10, 20, 30]);
}

#[test]
fn shot_behind_the_focal_plane_does_not_contribute() {
    // The shot looks down -Z from z=-1, so the focal plane at z=0 is behind
    // its image plane: w <= 0 for every reprojected point.
    let shot = solid_shot([255, 0, 0], glm::vec3(0.0, 0.0, -1.0), 60.0);
    let vcam = Camera::new(glm::vec3(0.0, 0.0, 1.0), glm::quat_identity(), 60.0, 1.0).unwrap();

    let renderer = Renderer::new(16, 16).unwrap();
    let frame = renderer.integrate(&[shot], &vcam).unwrap();

    assert_uniform(&frame, [0, 0, 0]);
}

#[test]
fn nearest_camera_wins_picks_the_closer_shot() {
    // Distances 1.0 and 2.0 from the virtual camera; both cover the whole
    // visible part of the focal quad.
    let near = solid_shot([255, 0, 0], glm::vec3(0.0, 0.0, 2.0), 60.0);
    let far = solid_shot([0, 255, 0], glm::vec3(0.0, 0.0, 3.0), 60.0);
    let vcam = Camera::new(glm::vec3(0.0, 0.0, 1.0), glm::quat_identity(), 60.0, 1.0).unwrap();

    let config = RendererConfig {
        blend_mode: BlendMode::NearestCamera,
        ..Default::default()
    };
    // Order must not matter for the winner, only distance does.
    for shots in [
        vec![near.clone(), far.clone()],
        vec![far.clone(), near.clone()],
    ] {
        let renderer = Renderer::with_config(16, 16, config).unwrap();
        let frame = renderer.integrate(&shots, &vcam).unwrap();
        assert_uniform(&frame, [255, 0, 0]);
    }
}

#[test]
fn equal_distances_resolve_to_the_earliest_shot() {
    let first = solid_shot([255, 0, 0], glm::vec3(0.0, 0.0, 2.0), 60.0);
    let second = solid_shot([0, 255, 0], glm::vec3(0.0, 0.0, 2.0), 60.0);
    let vcam = Camera::new(glm::vec3(0.0, 0.0, 1.0), glm::quat_identity(), 60.0, 1.0).unwrap();

    let config = RendererConfig {
        blend_mode: BlendMode::NearestCamera,
        ..Default::default()
    };
    let renderer = Renderer::with_config(16, 16, config).unwrap();
    let frame = renderer.integrate(&[first, second], &vcam).unwrap();

    assert_uniform(&frame, [255, 0, 0]);
}

#[test]
fn average_blend_is_the_componentwise_mean() {
    let a = solid_shot([100, 100, 100], glm::vec3(0.0, 0.0, 2.0), 60.0);
    let b = solid_shot([200, 200, 200], glm::vec3(0.0, 0.0, 3.0), 60.0);
    let vcam = Camera::new(glm::vec3(0.0, 0.0, 1.0), glm::quat_identity(), 60.0, 1.0).unwrap();

    let renderer = Renderer::new(16, 16).unwrap();
    let frame = renderer.integrate(&[a, b], &vcam).unwrap();

    assert_uniform(&frame, [150, 150, 150]);
}

#[test]
fn integrate_is_idempotent() {
    let size = 32;
    let shot = shot_at(&pattern(size, size), size, glm::vec3(0.2, -0.1, 1.5), 70.0);
    let vcam = Camera::new(
        glm::vec3(0.3, 0.1, 1.2),
        glm::quat_angle_axis(0.2, &glm::vec3(0.0, 1.0, 0.0)),
        55.0,
        1.0,
    )
    .unwrap();

    let renderer = Renderer::new(size, size).unwrap();
    let first = renderer.integrate(std::slice::from_ref(&shot), &vcam).unwrap();
    let second = renderer.integrate(std::slice::from_ref(&shot), &vcam).unwrap();

    assert_eq!(first, second);
}

#[test]
fn released_texture_is_an_invalid_state() {
    let mut shot = solid_shot([255, 0, 0], glm::vec3(0.0, 0.0, 2.0), 60.0);
    shot.release_texture();
    let vcam = Camera::default();

    let renderer = Renderer::new(8, 8).unwrap();
    assert!(matches!(
        renderer.integrate(&[shot], &vcam),
        Err(LfError::InvalidState(_))
    ));
}
