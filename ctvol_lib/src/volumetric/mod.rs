mod raw_reader;
mod volume;

pub use raw_reader::{load_raw, VolumeError};
pub use volume::Volume;
