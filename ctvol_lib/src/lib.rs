//! Interactive direct volume renderer for CT and CBCT scans.
//!
//! The library loads a raw scalar field ([`volumetric`]), maps intensities
//! to color and opacity through a committed transfer function
//! ([`transfer`]), and integrates rays front to back ([`render`]). The
//! camera orbits the volume and zooms by narrowing the field of view
//! ([`camera`]). All mutable per-frame state lives in a
//! [`RenderContext`](context::RenderContext) fed by
//! [`FrameInput`](context::FrameInput) diffs from the control surface.
//!
//! Rendering runs on its own thread behind a
//! [`RendererFront`](render::RendererFront), leaving the control thread
//! free to poll input and present finished frames.

pub mod camera;
pub mod color;
pub mod common;
pub mod context;
pub mod render;
pub mod test_helpers;
pub mod transfer;
pub mod volumetric;

pub use context::{FrameInput, FpsCounter, RenderContext};
pub use render::{RenderOptions, RenderQuality, Renderer, RendererFront, RendererMessage};
