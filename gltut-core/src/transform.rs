//! Time-driven model transforms and the fixed cameras of both demos.
//!
//! All functions take the elapsed wall-clock time in seconds. There is no
//! smoothing and no fixed timestep: the time is plugged in directly.
//! The scene's vertical axis is +Z, which is also the rotation axis.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};

/// Rotation speed in degrees per second.
pub const DEGREES_PER_SECOND: f32 = 180.0;

/// Rotation angle in radians after `elapsed` seconds.
#[inline]
pub fn rotation_angle(elapsed: f32) -> f32 {
    elapsed * DEGREES_PER_SECOND.to_radians()
}

/// Rotation angle in degrees, wrapped into `[0, 360)`.
pub fn rotation_degrees(elapsed: f32) -> f32 {
    (elapsed * DEGREES_PER_SECOND).rem_euclid(360.0)
}

/// Uniform scale factor of the pulsing quad. Oscillates in `[0.5, 1.0]`.
#[inline]
pub fn pulse_scale(elapsed: f32) -> f32 {
    (elapsed * 5.0).sin() * 0.25 + 0.75
}

/// Model matrix of the blend-and-pulse quad: rotate, then scale.
pub fn pulse_model(elapsed: f32) -> Mat4 {
    let s = pulse_scale(elapsed);
    Mat4::from_rotation_z(rotation_angle(elapsed)) * Mat4::from_scale(Vec3::splat(s))
}

/// Model matrix of the spinning cube.
pub fn spin_model(elapsed: f32) -> Mat4 {
    Mat4::from_rotation_z(rotation_angle(elapsed))
}

/// Mirrors `model` through the floor plane: moved one unit down and inverted on Z.
pub fn reflected(model: Mat4) -> Mat4 {
    model * Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0)) * Mat4::from_scale(Vec3::new(1.0, 1.0, -1.0))
}

/// A look-at camera with +Z up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
}

impl Camera {
    /// Camera looking at the blend-and-pulse quad.
    pub const QUAD: Camera = Camera {
        eye: Vec3::new(1.2, 1.2, 1.2),
        target: Vec3::ZERO,
    };

    /// Camera looking at the cube and its reflection.
    pub const CUBE: Camera = Camera {
        eye: Vec3::new(2.5, 2.5, 2.0),
        target: Vec3::ZERO,
    };

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Z)
    }
}

/// 45 degree perspective projection with near plane 1 and far plane 10.
pub fn projection(width: u32, height: u32) -> Mat4 {
    let aspect = width as f32 / height.max(1) as f32;
    Mat4::perspective_rh_gl(PI / 4.0, aspect, 1.0, 10.0)
}
