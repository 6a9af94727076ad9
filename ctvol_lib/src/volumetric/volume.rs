use nalgebra::{point, Point3, Vector3};

use crate::common::{BoundBox, Ray};

use super::VolumeError;

/// The scalar field of a scan, loaded once and immutable afterwards.
///
/// Samples are stored linearly, `x` fastest: `i = x + y*dim_x + z*dim_x*dim_y`.
/// Values keep their real-world units (Hounsfield-like for CT data).
///
/// The volume is axis aligned, lower corner at the origin. `scale` is the
/// shape of a single cell, so the sampleable domain spans
/// `(size - 1) * scale` world units per axis.
pub struct Volume {
    size: Vector3<usize>,
    scale: Vector3<f32>,
    bound_box: BoundBox,
    data: Vec<f32>,
}

impl std::fmt::Debug for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Volume")
            .field("size", &self.size)
            .field("scale", &self.scale)
            .field("box", &self.bound_box)
            .field("data len", &self.data.len())
            .finish()
    }
}

impl Volume {
    /// Construct a volume from already decoded samples.
    ///
    /// Fails if any dimension is zero or `data.len()` does not match
    /// `size.x * size.y * size.z`.
    pub fn from_samples(
        size: Vector3<usize>,
        scale: Vector3<f32>,
        data: Vec<f32>,
    ) -> Result<Volume, VolumeError> {
        if size.x == 0 || size.y == 0 || size.z == 0 {
            return Err(VolumeError::ZeroDimension { size });
        }

        let expected = size.x * size.y * size.z;
        if data.len() != expected {
            return Err(VolumeError::SampleCount {
                expected,
                actual: data.len(),
            });
        }

        let dims = size.map(|v| (v - 1) as f32).component_mul(&scale);
        let bound_box = BoundBox::from_position_dims(point![0.0, 0.0, 0.0], dims);

        Ok(Volume {
            size,
            scale,
            bound_box,
            data,
        })
    }

    pub fn get_size(&self) -> Vector3<usize> {
        self.size
    }

    pub fn get_scale(&self) -> Vector3<f32> {
        self.scale
    }

    pub fn get_bound_box(&self) -> BoundBox {
        self.bound_box
    }

    fn get_3d_index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.size.x + z * self.size.x * self.size.y
    }

    /// Raw sample at a grid point. For building and tests, mostly.
    pub fn get_data(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        if x >= self.size.x || y >= self.size.y || z >= self.size.z {
            return None;
        }
        self.data.get(self.get_3d_index(x, y, z)).copied()
    }

    /// Trilinear interpolation at a continuous position in voxel coordinates.
    /// Positions outside `[0, size-1]^3` sample as zero contribution.
    pub fn sample_at(&self, pos: Point3<f32>) -> f32 {
        let max = self.size.map(|v| (v - 1) as f32);
        if pos.x < 0.0 || pos.y < 0.0 || pos.z < 0.0 {
            return 0.0;
        }
        if pos.x > max.x || pos.y > max.y || pos.z > max.z {
            return 0.0;
        }

        let x0 = pos.x as usize;
        let y0 = pos.y as usize;
        let z0 = pos.z as usize;

        // clamped so lattice points on the upper faces stay exact
        let x1 = usize::min(x0 + 1, self.size.x - 1);
        let y1 = usize::min(y0 + 1, self.size.y - 1);
        let z1 = usize::min(z0 + 1, self.size.z - 1);

        let x_t = pos.x.fract();
        let y_t = pos.y.fract();
        let z_t = pos.z.fract();

        let c000 = self.data[self.get_3d_index(x0, y0, z0)];
        let c100 = self.data[self.get_3d_index(x1, y0, z0)];
        let c010 = self.data[self.get_3d_index(x0, y1, z0)];
        let c110 = self.data[self.get_3d_index(x1, y1, z0)];
        let c001 = self.data[self.get_3d_index(x0, y0, z1)];
        let c101 = self.data[self.get_3d_index(x1, y0, z1)];
        let c011 = self.data[self.get_3d_index(x0, y1, z1)];
        let c111 = self.data[self.get_3d_index(x1, y1, z1)];

        // collapse x, then y, then z
        let c00 = lerp(c000, c100, x_t);
        let c10 = lerp(c010, c110, x_t);
        let c01 = lerp(c001, c101, x_t);
        let c11 = lerp(c011, c111, x_t);

        let c0 = lerp(c00, c10, y_t);
        let c1 = lerp(c01, c11, y_t);

        lerp(c0, c1, z_t)
    }

    /// Intersection of a world-space ray with the volume's bounding box.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        self.bound_box.intersect(ray)
    }

    /// World-space point expressed in voxel coordinates.
    pub fn to_voxel(&self, pos: Point3<f32>) -> Point3<f32> {
        let offset = pos - self.bound_box.lower;
        Point3::from(offset.component_div(&self.scale))
    }

    /// World-space direction expressed in voxel coordinates.
    ///
    /// Not renormalized, so advancing the result by `t` covers the same
    /// stretch of the ray as `t` world units.
    pub fn to_voxel_dir(&self, dir: Vector3<f32>) -> Vector3<f32> {
        dir.component_div(&self.scale)
    }
}

// exact at t == 0 and for equal endpoints
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod test {

    use nalgebra::{point, vector};

    use super::*;

    fn unit_scale() -> Vector3<f32> {
        vector![1.0, 1.0, 1.0]
    }

    // 2x2x2 ramp, values 0..=7 in index order
    fn ramp_volume() -> Volume {
        let data = (0..8).map(|v| v as f32).collect();
        Volume::from_samples(vector![2, 2, 2], unit_scale(), data).unwrap()
    }

    #[test]
    fn indexing_is_x_fastest() {
        let vol = ramp_volume();

        assert_eq!(vol.get_data(0, 0, 0), Some(0.0));
        assert_eq!(vol.get_data(1, 0, 0), Some(1.0));
        assert_eq!(vol.get_data(0, 1, 0), Some(2.0));
        assert_eq!(vol.get_data(0, 0, 1), Some(4.0));
        assert_eq!(vol.get_data(1, 1, 1), Some(7.0));
        assert_eq!(vol.get_data(2, 0, 0), None);
    }

    #[test]
    fn sample_exact_at_lattice_points() {
        let vol = ramp_volume();

        for z in 0..2 {
            for y in 0..2 {
                for x in 0..2 {
                    let expected = vol.get_data(x, y, z).unwrap();
                    let pos = point![x as f32, y as f32, z as f32];
                    assert_eq!(vol.sample_at(pos), expected);
                }
            }
        }
    }

    #[test]
    fn sample_midpoint_averages() {
        let vol = ramp_volume();

        // center of the cell averages all eight corners
        let center = vol.sample_at(point![0.5, 0.5, 0.5]);
        assert!((center - 3.5).abs() < f32::EPSILON);

        // edge midpoint averages its two endpoints
        let edge = vol.sample_at(point![0.5, 0.0, 0.0]);
        assert!((edge - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn sample_outside_is_zero() {
        let vol = ramp_volume();

        assert_eq!(vol.sample_at(point![-0.1, 0.0, 0.0]), 0.0);
        assert_eq!(vol.sample_at(point![0.0, 5.0, 0.0]), 0.0);
        assert_eq!(vol.sample_at(point![0.0, 0.0, 1.1]), 0.0);
    }

    #[test]
    fn rejects_bad_dimensions() {
        let err = Volume::from_samples(vector![0, 2, 2], unit_scale(), vec![]).unwrap_err();
        assert!(matches!(err, VolumeError::ZeroDimension { .. }));

        let err = Volume::from_samples(vector![2, 2, 2], unit_scale(), vec![0.0; 7]).unwrap_err();
        assert!(matches!(
            err,
            VolumeError::SampleCount {
                expected: 8,
                actual: 7
            }
        ));
    }

    #[test]
    fn voxel_space_respects_scale() {
        let data = vec![0.0; 27];
        let vol = Volume::from_samples(vector![3, 3, 3], vector![2.0, 1.0, 0.5], data).unwrap();

        assert_eq!(vol.get_bound_box().upper, point![4.0, 2.0, 1.0]);
        assert_eq!(vol.to_voxel(point![4.0, 2.0, 1.0]), point![2.0, 2.0, 2.0]);
        assert_eq!(
            vol.to_voxel_dir(vector![1.0, 1.0, 1.0]),
            vector![0.5, 1.0, 2.0]
        );
    }
}
