//! Premade volumes, transfer functions and contexts for tests and benches.

use nalgebra::{point, vector, Vector2, Vector3};

use crate::{
    context::RenderContext,
    transfer::{ColorPoint, OpacityPoint, TransferFunction},
    volumetric::Volume,
};

/// Volume of the given size with every sample set to `value`, unit scale.
pub fn uniform_volume(size: Vector3<usize>, value: f32) -> Volume {
    let data = vec![value; size.x * size.y * size.z];
    match Volume::from_samples(size, vector![1.0, 1.0, 1.0], data) {
        Ok(volume) => volume,
        Err(e) => panic!("invalid test volume: {e}"),
    }
}

/// Transfer function mapping every intensity to the same color and opacity.
///
/// Anchors sit at the CBCT preset thresholds, so any in-range intensity
/// lands on a segment with equal endpoints and maps exactly.
pub fn constant_tf(opacity: f32, color: Vector3<f32>) -> TransferFunction {
    let thresholds = [-3024, -800, 300, 3071];
    TransferFunction::new(
        thresholds.map(|t| ColorPoint {
            threshold: t,
            color,
        }),
        thresholds.map(|t| OpacityPoint {
            threshold: t,
            opacity,
        }),
    )
}

/// Fully transparent mapping, renders nothing but background.
pub fn transparent_tf() -> TransferFunction {
    constant_tf(0.0, vector![0.0, 0.0, 0.0])
}

/// Fully opaque red mapping, the first sample wins everywhere.
pub fn opaque_red_tf() -> TransferFunction {
    constant_tf(1.0, vector![1.0, 0.0, 0.0])
}

/// Context with the camera backed away from the volume along `+z`,
/// looking at the volume's center face on.
pub fn facing_context(volume: &Volume, resolution: Vector2<u16>) -> RenderContext {
    let bbox = volume.get_bound_box();
    let center = bbox.center();
    let distance = 1.5 * bbox.dims().max();

    let mut ctx = RenderContext::new(resolution);
    let camera = ctx.get_camera_mut();
    camera.set_position(point![center.x, center.y, bbox.upper.z + distance]);
    camera.set_front(vector![0.0, 0.0, -1.0]);

    ctx
}
