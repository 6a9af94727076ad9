use std::{fs::File, mem::size_of, path::Path};

use memmap::MmapOptions;
use nalgebra::Vector3;
use thiserror::Error;

use super::Volume;

/// Errors while constructing a [`Volume`].
///
/// Load failures are fatal to callers; there is no partial-volume fallback.
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("cannot open volume file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot memory-map volume file {path}: {source}")]
    Map {
        path: String,
        source: std::io::Error,
    },
    #[error("volume file is {actual} bytes, dimensions {size:?} require {expected}")]
    FileSize {
        size: Vector3<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("sample count {actual} does not match dimensions (expected {expected})")]
    SampleCount { expected: usize, actual: usize },
    #[error("volume dimensions must be positive, got {size:?}")]
    ZeroDimension { size: Vector3<usize> },
}

/// Load a raw binary dump of little-endian signed 16-bit samples.
///
/// The file carries no header; dimensions and voxel shape come from
/// external metadata. The byte length must be exactly
/// `size.x * size.y * size.z * 2`, truncated files are rejected.
///
/// The file is memory-mapped while decoding, scans run to hundreds
/// of megabytes.
pub fn load_raw<P>(
    path: P,
    size: Vector3<usize>,
    scale: Vector3<f32>,
) -> Result<Volume, VolumeError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if size.x == 0 || size.y == 0 || size.z == 0 {
        return Err(VolumeError::ZeroDimension { size });
    }

    let file = File::open(path).map_err(|source| VolumeError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|source| VolumeError::Map {
        path: path.display().to_string(),
        source,
    })?;

    let expected = size.x * size.y * size.z * size_of::<i16>();
    if mmap.len() != expected {
        return Err(VolumeError::FileSize {
            size,
            expected,
            actual: mmap.len(),
        });
    }

    let data = mmap
        .chunks_exact(size_of::<i16>())
        .map(|b| f32::from(i16::from_le_bytes([b[0], b[1]])))
        .collect();

    Volume::from_samples(size, scale, data)
}

#[cfg(test)]
mod test {

    use std::io::Write;

    use nalgebra::vector;

    use super::*;

    fn write_temp(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn loads_exact_size_file() {
        let samples: Vec<i16> = vec![-1000, -24, 0, 700, 3071, -3024, 12, 1];
        let bytes: Vec<u8> = samples.iter().flat_map(|v| v.to_le_bytes()).collect();
        let path = write_temp("ctvol_ok.raw", &bytes);

        let vol = load_raw(&path, vector![2, 2, 2], vector![1.0, 1.0, 1.0]).unwrap();

        assert_eq!(vol.get_size(), vector![2, 2, 2]);
        assert_eq!(vol.get_data(0, 0, 0), Some(-1000.0));
        assert_eq!(vol.get_data(1, 0, 0), Some(-24.0));
        assert_eq!(vol.get_data(1, 1, 1), Some(1.0));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_truncated_file() {
        // one byte short of 2x2x2 i16 samples
        let bytes = vec![0u8; 15];
        let path = write_temp("ctvol_short.raw", &bytes);

        let err = load_raw(&path, vector![2, 2, 2], vector![1.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            VolumeError::FileSize {
                expected: 16,
                actual: 15,
                ..
            }
        ));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_missing_file() {
        let err = load_raw(
            "definitely/not/a/volume.raw",
            vector![2, 2, 2],
            vector![1.0, 1.0, 1.0],
        )
        .unwrap_err();

        assert!(matches!(err, VolumeError::Open { .. }));
    }
}
