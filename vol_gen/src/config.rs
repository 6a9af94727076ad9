use std::{ffi::OsString, str::FromStr};

use clap::ArgMatches;
use nalgebra::{vector, Vector3};

/// Transform `Values` into `Vector`
fn values_to_vector3<T>(args: &ArgMatches, key: &str) -> Vector3<T>
where
    T: FromStr + Copy,
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    let vals: Vec<T> = args
        .values_of(key)
        .unwrap()
        .into_iter()
        .map(|v| v.parse::<T>().expect("Parse error"))
        .collect();
    vector![vals[0], vals[1], vals[2]]
}

/// App configuration
/// Config is built from args parsed by `clap`
#[derive(Debug)]
pub struct Config {
    /// Dimensions of volume
    pub dims: Vector3<u32>,
    /// Type of generator to be used
    pub generator: GeneratorConfig,
    /// Output file name
    pub file_name: OsString,
    /// Optional seed for RNG, to replicate results
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_args(args: ArgMatches) -> Result<Config, String> {
        let dims = values_to_vector3(&args, "dims");
        let generator = GeneratorConfig::from_args(&args)?;
        // Unwrap safe, has default value
        let file_name = args.value_of_os("output-file").unwrap().into();
        let seed = args.value_of("seed").map(|s| s.parse().unwrap());

        Ok(Config {
            dims,
            generator,
            file_name,
            seed,
        })
    }
}

/// Settings specific to generator variant
#[derive(Debug, Clone, Copy)]
pub enum GeneratorConfig {
    /// Solid volume of one intensity, padded with air
    Solid { sample: i16 },
    /// Intensity ramp from air up to `sample` along the z axis
    Gradient { sample: i16 },
    /// Randomly placed cuboids and spheres
    Shapes {
        n_of_shapes: usize,
        sample: i16,
        obj_size: u32,
    },
}

impl GeneratorConfig {
    pub fn from_args(args: &ArgMatches) -> Result<GeneratorConfig, String> {
        // Safe to unwrap, args checked by parser
        let s = args.value_of("generator").unwrap();

        let sample = args
            .value_of("sample")
            .map(|v| v.parse().unwrap())
            .ok_or("Missing --sample")?;

        match s {
            "solid" => Ok(GeneratorConfig::Solid { sample }),
            "gradient" => Ok(GeneratorConfig::Gradient { sample }),
            "shapes" => {
                let n_of_shapes = args
                    .value_of("n-of-shapes")
                    .map(|v| v.parse().unwrap())
                    .ok_or("Missing --n-of-shapes")?;
                let obj_size = args
                    .value_of("object-size")
                    .map(|v| v.parse().unwrap())
                    .ok_or("Missing --object-size")?;
                Ok(GeneratorConfig::Shapes {
                    n_of_shapes,
                    sample,
                    obj_size,
                })
            }
            _ => Err(format!("Unknown generator {s}")),
        }
    }
}
