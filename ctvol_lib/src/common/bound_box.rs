use nalgebra::{Point3, Vector3};

use super::Ray;

/// Axis-aligned bounding box of a volume, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundBox {
    pub lower: Point3<f32>,
    pub upper: Point3<f32>,
}

impl BoundBox {
    pub fn new(lower: Point3<f32>, upper: Point3<f32>) -> BoundBox {
        BoundBox { lower, upper }
    }

    pub fn from_position_dims(position: Point3<f32>, dimensions: Vector3<f32>) -> BoundBox {
        BoundBox {
            lower: position,
            upper: position + dimensions,
        }
    }

    pub fn dims(&self) -> Vector3<f32> {
        self.upper - self.lower
    }

    pub fn center(&self) -> Point3<f32> {
        self.lower + 0.5 * (self.upper - self.lower)
    }

    pub fn is_in(&self, pos: &Point3<f32>) -> bool {
        self.upper.x > pos.x
            && self.upper.y > pos.y
            && self.upper.z > pos.z
            && pos.x > self.lower.x
            && pos.y > self.lower.y
            && pos.z > self.lower.z
    }

    /// Ray-box intersection.
    ///
    /// Returns `t` parameters of entry and exit, or `None` if the ray misses
    /// the box or the box is entirely behind the origin.
    ///
    /// Slab method; An Efficient and Robust Ray-Box Intersection Algorithm,
    /// Amy Williams et al. 2004.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        // t values of intersections with the six bounding planes
        let t0 = (self.lower - ray.origin).component_div(&ray.direction);
        let t1 = (self.upper - ray.origin).component_div(&ray.direction);

        // per-axis (near, far) pairs
        let t_minmax = t0.zip_map(&t1, |t0, t1| if t0 < t1 { (t0, t1) } else { (t1, t0) });

        let tmin = f32::max(f32::max(t_minmax.x.0, t_minmax.y.0), t_minmax.z.0);
        let tmax = f32::min(f32::min(t_minmax.x.1, t_minmax.y.1), t_minmax.z.1);

        // box behind the ray
        if tmax.is_sign_negative() {
            return None;
        }

        // ray misses the box
        if tmin > tmax {
            return None;
        }

        Some((tmin, tmax))
    }
}
