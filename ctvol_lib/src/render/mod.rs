mod render_front;
mod render_thread;
mod renderer;

pub use render_front::{RenderThread, RendererFront, RendererMessage};
pub use render_thread::VolumeRenderThread;
pub use renderer::{RenderOptions, Renderer, PIXEL_SIZE, TRANSMITTANCE_CUTOFF};

/// Step-size preset for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderQuality {
    /// Fine march step, for still frames
    Quality,
    /// Coarse march step, for frames rendered while the user interacts
    Fast,
}
