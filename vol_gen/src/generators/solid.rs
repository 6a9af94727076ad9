use nalgebra::Vector3;

use crate::config::{Config, GeneratorConfig};

use super::{SampleGenerator, AIR};

/// Generate solid volume
/// One intensity inside, a few voxels of air around it
pub struct SolidGenerator {
    /// The sample value
    sample: i16,
    pad: u32,
    dims: Vector3<u32>,
}

impl SolidGenerator {
    pub fn from_config(config: &Config) -> SolidGenerator {
        let sample = match config.generator {
            GeneratorConfig::Solid { sample } => sample,
            _ => panic!("Bad generator config"),
        };

        SolidGenerator {
            sample,
            pad: 5,
            dims: config.dims,
        }
    }
}

impl SampleGenerator for SolidGenerator {
    fn sample_at(&self, coords: Vector3<u32>) -> i16 {
        let pad_end = self.dims.map(|d| d.saturating_sub(self.pad));
        if coords.x < self.pad
            || coords.y < self.pad
            || coords.z < self.pad
            || coords.x >= pad_end.x
            || coords.y >= pad_end.y
            || coords.z >= pad_end.z
        {
            AIR
        } else {
            self.sample
        }
    }
}

#[cfg(test)]
mod test {

    use nalgebra::vector;

    use super::*;

    fn generator(dims: Vector3<u32>, sample: i16) -> SolidGenerator {
        SolidGenerator {
            sample,
            pad: 5,
            dims,
        }
    }

    #[test]
    fn air_border_around_solid_core() {
        let gen = generator(vector![16, 16, 16], 300);

        assert_eq!(gen.sample_at(vector![0, 0, 0]), AIR);
        assert_eq!(gen.sample_at(vector![4, 8, 8]), AIR);
        assert_eq!(gen.sample_at(vector![8, 8, 11]), AIR);

        assert_eq!(gen.sample_at(vector![5, 5, 5]), 300);
        assert_eq!(gen.sample_at(vector![8, 8, 8]), 300);
        assert_eq!(gen.sample_at(vector![10, 10, 10]), 300);
    }

    #[test]
    fn tiny_volume_is_all_air() {
        let gen = generator(vector![4, 4, 4], 300);

        for z in 0..4 {
            for y in 0..4 {
                for x in 0..4 {
                    assert_eq!(gen.sample_at(vector![x, y, z]), AIR);
                }
            }
        }
    }
}
