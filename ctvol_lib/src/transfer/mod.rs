//! Transfer function pipeline.
//!
//! A [`TransferFunction`] holds the editable control points: four color
//! anchors and four opacity anchors, each pinned to a scalar threshold.
//! Edits stage freely; nothing reaches the renderer until
//! [`commit`](TransferFunction::commit) materializes the curves into a
//! [`TfSnapshot`], the compact uniform-style form the compositor samples.
//! The renderer keeps showing the previously committed mapping until the
//! operator commits again, mirroring a "set transfer function" button.

use nalgebra::{vector, Vector2, Vector3, Vector4};

use crate::color::{self, RGBA};

/// Number of anchors per curve.
pub const ANCHOR_COUNT: usize = 4;

/// Scalar intensity range covered by the editor.
pub const THRESHOLD_MIN: i32 = -3071;
pub const THRESHOLD_MAX: i32 = 3071;

/// One anchor of the color curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPoint {
    pub threshold: i32,
    /// RGB, each channel in `[0, 1]`
    pub color: Vector3<f32>,
}

impl ColorPoint {
    pub fn new(threshold: i32, r: f32, g: f32, b: f32) -> ColorPoint {
        ColorPoint {
            threshold,
            color: vector![r, g, b],
        }
    }
}

/// One anchor of the opacity curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityPoint {
    pub threshold: i32,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
}

impl OpacityPoint {
    pub fn new(threshold: i32, opacity: f32) -> OpacityPoint {
        OpacityPoint { threshold, opacity }
    }
}

/// Editable transfer function state.
///
/// The editor may hand over anchors in any threshold order; ordering is the
/// commit's job, not the editor's.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    color_points: [ColorPoint; ANCHOR_COUNT],
    opacity_points: [OpacityPoint; ANCHOR_COUNT],
}

impl TransferFunction {
    pub fn new(
        color_points: [ColorPoint; ANCHOR_COUNT],
        opacity_points: [OpacityPoint; ANCHOR_COUNT],
    ) -> TransferFunction {
        TransferFunction {
            color_points,
            opacity_points,
        }
    }

    /// Preset for CT/CBCT scans in Hounsfield-like units:
    /// air fades out, soft tissue browns, bone whitens.
    pub fn cbct_preset() -> TransferFunction {
        TransferFunction {
            color_points: [
                ColorPoint::new(-3024, 0.0, 0.0, 0.0),
                ColorPoint::new(-800, 0.62, 0.36, 0.18),
                ColorPoint::new(0, 0.88, 0.60, 0.29),
                ColorPoint::new(3071, 1.0, 1.0, 1.0),
            ],
            opacity_points: [
                OpacityPoint::new(-3024, 0.0),
                OpacityPoint::new(-800, 0.0),
                OpacityPoint::new(300, 0.4),
                OpacityPoint::new(3071, 0.8),
            ],
        }
    }

    pub fn set_color_points(&mut self, points: [ColorPoint; ANCHOR_COUNT]) {
        self.color_points = points;
    }

    pub fn set_opacity_points(&mut self, points: [OpacityPoint; ANCHOR_COUNT]) {
        self.opacity_points = points;
    }

    pub fn color_points(&self) -> &[ColorPoint; ANCHOR_COUNT] {
        &self.color_points
    }

    pub fn opacity_points(&self) -> &[OpacityPoint; ANCHOR_COUNT] {
        &self.opacity_points
    }

    /// Materialize the curves into the renderer-facing snapshot.
    ///
    /// Anchors are sorted by threshold and values clamped to `[0, 1]`
    /// here, so evaluation can assume ordered anchors. Committing the
    /// same points twice yields an identical snapshot.
    pub fn commit(&self) -> TfSnapshot {
        let mut colors = self.color_points;
        let mut opacities = self.opacity_points;

        colors.sort_by_key(|p| p.threshold);
        opacities.sort_by_key(|p| p.threshold);

        let color = colors.map(|p| {
            let c = p.color.map(|ch| ch.clamp(0.0, 1.0));
            let t = p.threshold.clamp(THRESHOLD_MIN, THRESHOLD_MAX);
            vector![c.x, c.y, c.z, t as f32]
        });
        let opacity = opacities.map(|p| {
            let t = p.threshold.clamp(THRESHOLD_MIN, THRESHOLD_MAX);
            vector![p.opacity.clamp(0.0, 1.0), t as f32]
        });

        TfSnapshot { color, opacity }
    }
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self::cbct_preset()
    }
}

/// Committed transfer function in its compact evaluation form.
///
/// Layout matches the eight uniform vectors a fragment shader would
/// receive: four `(r, g, b, threshold)` and four `(opacity, threshold)`.
/// Anchors are ordered by threshold, values pre-clamped to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TfSnapshot {
    pub color: [Vector4<f32>; ANCHOR_COUNT],
    pub opacity: [Vector2<f32>; ANCHOR_COUNT],
}

impl TfSnapshot {
    /// Map a scalar intensity to `(r, g, b, opacity)`.
    ///
    /// Both curves evaluate independently as 1D piecewise-linear functions
    /// over their anchors, clamping outside the anchor range.
    pub fn sample(&self, intensity: f32) -> RGBA {
        let rgb = piecewise_linear(
            intensity,
            self.color.map(|anchor| (anchor.w, anchor.xyz())),
        );
        let a = piecewise_linear(intensity, self.opacity.map(|anchor| (anchor.y, anchor.x)));

        color::new(rgb.x, rgb.y, rgb.z, a)
    }
}

/// 1D piecewise-linear interpolation over threshold-ordered anchors.
///
/// Clamps to the boundary anchor value outside the range. Comparisons are
/// strict, so a zero-width segment is skipped over and resolves to the
/// later anchor's value; the segment actually entered always has positive
/// width and the division is safe.
fn piecewise_linear<T>(s: f32, anchors: [(f32, T); ANCHOR_COUNT]) -> T
where
    T: Copy
        + std::ops::Mul<f32, Output = T>
        + std::ops::Add<Output = T>
        + std::ops::Sub<Output = T>,
{
    let (first_t, first_v) = anchors[0];
    if s < first_t {
        return first_v;
    }

    for window in anchors.windows(2) {
        let (t0, v0) = window[0];
        let (t1, v1) = window[1];

        if s < t1 {
            let frac = (s - t0) / (t1 - t0);
            // this form is exact at the anchors and for equal endpoints
            return v0 + (v1 - v0) * frac;
        }
    }

    // at or past the last anchor
    anchors[ANCHOR_COUNT - 1].1
}
