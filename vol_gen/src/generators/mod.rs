use std::{error::Error, io::BufWriter};

use byteorder::{LittleEndian, WriteBytesExt};
use indicatif::ProgressBar;
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::{
    config::{Config, GeneratorConfig},
    file::open_create_file,
};

mod gradient;
mod shapes;
mod solid;

/// Intensity of empty space, Hounsfield-like
pub const AIR: i16 = -1000;

/// Generates one sample at a time, at any location
pub trait SampleGenerator: Sync {
    fn sample_at(&self, coords: Vector3<u32>) -> i16;
}

pub fn get_sample_generator(config: &Config) -> Box<dyn SampleGenerator> {
    match config.generator {
        GeneratorConfig::Solid { .. } => Box::new(solid::SolidGenerator::from_config(config)),
        GeneratorConfig::Gradient { .. } => {
            Box::new(gradient::GradientGenerator::from_config(config))
        }
        GeneratorConfig::Shapes { .. } => Box::new(shapes::ShapesGenerator::from_config(config)),
    }
}

/// One z slice of samples, `x` fastest then `y`.
///
/// Slices concatenated in ascending `z` give the renderer's linear layout
/// `i = x + y*dim_x + z*dim_x*dim_y`.
fn generate_slice(gen: &dyn SampleGenerator, dims: Vector3<u32>, z: u32) -> Vec<i16> {
    let mut slice = Vec::with_capacity((dims.x * dims.y) as usize);
    for y in 0..dims.y {
        for x in 0..dims.x {
            slice.push(gen.sample_at(Vector3::new(x, y, z)));
        }
    }
    slice
}

pub fn generate_vol(config: Config) -> Result<(), Box<dyn Error>> {
    let gen = get_sample_generator(&config);
    let dims = config.dims;

    let progress = ProgressBar::new(dims.z as u64);

    // slices are independent, samples within a slice are not reordered
    let slices: Vec<Vec<i16>> = (0..dims.z)
        .into_par_iter()
        .map(|z| {
            let slice = generate_slice(gen.as_ref(), dims, z);
            progress.inc(1);
            slice
        })
        .collect();

    progress.finish();

    let file = open_create_file(&config.file_name)?;
    let mut writer = BufWriter::new(file);

    for slice in slices {
        for sample in slice {
            writer.write_i16::<LittleEndian>(sample)?;
        }
    }

    println!("Generating finished, result in {:#?}", config.file_name);
    Ok(())
}
