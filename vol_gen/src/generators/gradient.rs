use nalgebra::Vector3;

use crate::config::{Config, GeneratorConfig};

use super::{SampleGenerator, AIR};

/// Intensity ramp along the z axis, from air at the bottom slice up to
/// the configured sample at the top one.
pub struct GradientGenerator {
    sample: i16,
    dims: Vector3<u32>,
}

impl GradientGenerator {
    pub fn from_config(config: &Config) -> GradientGenerator {
        let sample = match config.generator {
            GeneratorConfig::Gradient { sample } => sample,
            _ => panic!("Bad generator config"),
        };

        GradientGenerator {
            sample,
            dims: config.dims,
        }
    }
}

impl SampleGenerator for GradientGenerator {
    fn sample_at(&self, coords: Vector3<u32>) -> i16 {
        if self.dims.z <= 1 {
            return self.sample;
        }

        let t = coords.z as f32 / (self.dims.z - 1) as f32;
        let value = AIR as f32 + (self.sample as f32 - AIR as f32) * t;
        value.round() as i16
    }
}

#[cfg(test)]
mod test {

    use nalgebra::vector;

    use super::*;

    #[test]
    fn ramp_spans_air_to_sample() {
        let gen = GradientGenerator {
            sample: 1000,
            dims: vector![4, 4, 5],
        };

        assert_eq!(gen.sample_at(vector![0, 0, 0]), AIR);
        assert_eq!(gen.sample_at(vector![3, 3, 4]), 1000);
        assert_eq!(gen.sample_at(vector![1, 2, 2]), 0);

        // constant within a slice
        assert_eq!(gen.sample_at(vector![0, 3, 2]), gen.sample_at(vector![3, 0, 2]));
    }

    #[test]
    fn flat_volume_is_all_sample() {
        let gen = GradientGenerator {
            sample: 123,
            dims: vector![4, 4, 1],
        };

        assert_eq!(gen.sample_at(vector![2, 2, 0]), 123);
    }
}
