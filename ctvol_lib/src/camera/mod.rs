mod orbit;
mod perspective;

pub use orbit::ModelTransform;
pub use perspective::{PerspectiveCamera, ZOOM_DEFAULT, ZOOM_MAX, ZOOM_MIN};
