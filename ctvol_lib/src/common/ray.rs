use nalgebra::{Point3, Vector3};

/// Ray cast from the camera through a pixel.
///
/// Used for intersecting volume bounding boxes ([`BoundBox::intersect`](super::BoundBox::intersect))
/// and then stepping along the intersected segment.
#[derive(Debug, Clone)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>, // unit length in world space
}

impl Ray {
    /// Construct new ray. `direction` must be a unit vector.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Ray {
        Ray { origin, direction }
    }

    /// Point `t` units from the origin along the direction.
    pub fn point_from_t(&self, t: f32) -> Point3<f32> {
        self.origin + t * self.direction
    }
}
