use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

use crate::common::Ray;

/// Object-space rotation of the volume, driven by orbit input.
///
/// Yaw and pitch accumulate additively from discrete input events and are
/// unbounded; there is no wraparound. They rotate the volume around its
/// pivot while the camera stays fixed, which is what makes the interaction
/// an orbit-the-object scheme rather than a turning camera.
#[derive(Debug, Clone, Default)]
pub struct ModelTransform {
    /// Rotation around the world y axis, degrees
    yaw: f32,
    /// Rotation around the world x axis, degrees
    pitch: f32,
}

impl ModelTransform {
    pub fn new() -> ModelTransform {
        ModelTransform {
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn get_yaw(&self) -> f32 {
        self.yaw
    }

    pub fn get_pitch(&self) -> f32 {
        self.pitch
    }

    /// Accumulate orbit deltas from one input event.
    pub fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch += pitch_delta;
    }

    /// Rotation applied to the volume: pitch around x, then yaw around y.
    pub fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch.to_radians())
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw.to_radians())
    }

    /// Model matrix rotating the volume around `pivot`.
    pub fn model_matrix(&self, pivot: Point3<f32>) -> Matrix4<f32> {
        let shift = pivot - Point3::origin();
        Matrix4::new_translation(&shift)
            * self.rotation().to_homogeneous()
            * Matrix4::new_translation(&-shift)
    }

    /// Express a world-space ray in the volume's unrotated object space.
    ///
    /// Rotating every ray by the inverse is equivalent to rotating the
    /// volume itself, and keeps the scalar field sampling untouched.
    pub fn ray_to_object_space(&self, ray: &Ray, pivot: Point3<f32>) -> Ray {
        let inverse = self.rotation().inverse();
        let origin = pivot + inverse * (ray.origin - pivot);
        let direction = inverse * ray.direction;
        Ray::new(origin, direction)
    }
}
