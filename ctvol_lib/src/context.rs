//! Shared per-frame state, owned by the top-level loop.
//!
//! [`RenderContext`] replaces what a quick desktop viewer would keep in
//! globals: camera, orbit state and the transfer function, both its staged
//! editor form and the committed snapshot the compositor reads. The UI
//! collaborator never touches the context directly; once per frame
//! boundary it hands over a [`FrameInput`] diff and the context applies it.

use std::time::Duration;

use nalgebra::Vector2;

use crate::{
    camera::{ModelTransform, PerspectiveCamera},
    transfer::{ColorPoint, OpacityPoint, TfSnapshot, TransferFunction, ANCHOR_COUNT},
};

/// State changes requested by the control surface for one frame.
///
/// Orbit and zoom deltas apply immediately. Control-point edits only stage;
/// they reach the renderer when `commit_transfer` is set, mirroring an
/// explicit "set transfer function" action in the editor.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Accumulated yaw delta of this frame, degrees
    pub yaw_delta: f32,
    /// Accumulated pitch delta of this frame, degrees
    pub pitch_delta: f32,
    /// Scroll wheel offset, positive narrows the field of view
    pub scroll_delta: f32,
    pub color_points: Option<[ColorPoint; ANCHOR_COUNT]>,
    pub opacity_points: Option<[OpacityPoint; ANCHOR_COUNT]>,
    pub commit_transfer: bool,
}

impl FrameInput {
    /// True if applying this input would leave the context untouched.
    pub fn is_empty(&self) -> bool {
        self.yaw_delta == 0.0
            && self.pitch_delta == 0.0
            && self.scroll_delta == 0.0
            && self.color_points.is_none()
            && self.opacity_points.is_none()
            && !self.commit_transfer
    }
}

/// Explicit render state passed by reference to each subsystem.
pub struct RenderContext {
    camera: PerspectiveCamera,
    model: ModelTransform,
    transfer: TransferFunction,
    committed: TfSnapshot,
}

impl RenderContext {
    /// Context with the default camera pose and the CBCT preset committed,
    /// so the first frame already shows a usable mapping.
    pub fn new(resolution: Vector2<u16>) -> RenderContext {
        let mut camera = PerspectiveCamera::default();
        camera.change_aspect_from_resolution(resolution);

        let transfer = TransferFunction::cbct_preset();
        let committed = transfer.commit();

        RenderContext {
            camera,
            model: ModelTransform::new(),
            transfer,
            committed,
        }
    }

    pub fn get_camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn get_camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn get_model(&self) -> &ModelTransform {
        &self.model
    }

    /// Staged transfer function, as the editor sees it.
    pub fn get_transfer(&self) -> &TransferFunction {
        &self.transfer
    }

    /// Transfer function snapshot the compositor reads. Fixed for a whole
    /// frame; only [`apply`](RenderContext::apply) with a commit replaces it.
    pub fn get_committed(&self) -> &TfSnapshot {
        &self.committed
    }

    /// Apply one frame's worth of control-surface changes.
    pub fn apply(&mut self, input: &FrameInput) {
        if input.yaw_delta != 0.0 || input.pitch_delta != 0.0 {
            self.model.orbit(input.yaw_delta, input.pitch_delta);
        }
        if input.scroll_delta != 0.0 {
            self.camera.process_scroll(input.scroll_delta);
        }

        if let Some(points) = input.color_points {
            self.transfer.set_color_points(points);
        }
        if let Some(points) = input.opacity_points {
            self.transfer.set_opacity_points(points);
        }

        if input.commit_transfer {
            self.committed = self.transfer.commit();
        }
    }
}

/// Non-authoritative frames-per-second telemetry.
///
/// Accumulates frame times and reports roughly once per second, for a
/// window-title style display.
#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: Duration,
}

impl FpsCounter {
    pub fn new() -> FpsCounter {
        FpsCounter {
            frames: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Record one finished frame. Returns the frame count of the last
    /// second once a second has passed, `None` otherwise.
    pub fn add_frame(&mut self, frame_time: Duration) -> Option<u32> {
        self.frames += 1;
        self.elapsed += frame_time;

        if self.elapsed >= Duration::from_secs(1) {
            let fps = self.frames;
            self.frames = 0;
            self.elapsed = Duration::ZERO;
            return Some(fps);
        }
        None
    }
}
