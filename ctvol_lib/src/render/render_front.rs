use std::{sync::Arc, thread::JoinHandle};

use crossbeam::channel::{Receiver, Sender};
use parking_lot::{Mutex, RwLock};

use crate::context::RenderContext;

/// Messages to the renderer.
///
/// Messages queue up; one is read after each finished frame.
pub enum RendererMessage {
    /// Render a frame with the quality step size
    StartRendering,
    /// Render a frame with the fast step size
    StartRenderingFast,
    /// Shut down, thread gets ready to be joined
    ShutDown,
}

/// Interface for renderers running on their own thread.
///
/// Implementors communicate with the control thread through a
/// [`RendererFront`].
pub trait RenderThread {
    /// Handle to the shared framebuffer (RGBA8)
    fn get_shared_buffer(&self) -> Arc<Mutex<Vec<u8>>>;

    /// Handle to the shared render context
    ///
    /// A write lock allows applying control-surface input between frames.
    fn get_context(&self) -> Arc<RwLock<RenderContext>>;

    /// Spawn the render thread
    ///
    /// The renderer waits for messages, it does _not_ start rendering.
    fn start(self) -> JoinHandle<()>;

    /// Communication setter, called by the front before `start`
    fn set_communication(&mut self, communication: (Sender<()>, Receiver<RendererMessage>));
}

/// Control-thread handle to a running renderer.
///
/// Can be active or inactive. The control thread mutates the shared
/// context between frames and kicks off frames by message; the renderer
/// answers with a unit message once the shared buffer holds a new frame.
pub struct RendererFront {
    handle: Option<JoinHandle<()>>,
    buffer: Option<Arc<Mutex<Vec<u8>>>>,
    context: Option<Arc<RwLock<RenderContext>>>,
    communication_in: (Sender<RendererMessage>, Receiver<RendererMessage>),
    communication_out: (Sender<()>, Receiver<()>),
}

impl RendererFront {
    /// Create inactive front
    pub fn new() -> Self {
        let communication_in = crossbeam::channel::bounded(100); // control -> renderer
        let communication_out = crossbeam::channel::bounded(100); // renderer -> control
        Self {
            handle: None,
            buffer: None,
            context: None,
            communication_in,
            communication_out,
        }
    }

    /// Sender for commands to the renderer, cloneable for input callbacks
    pub fn get_sender(&self) -> Sender<RendererMessage> {
        self.communication_in.0.clone()
    }

    /// Send a message to the renderer
    pub fn send_message(&self, msg: RendererMessage) {
        self.communication_in.0.send(msg).unwrap()
    }

    /// Receiver of frame-done notifications
    pub fn get_receiver(&self) -> Receiver<()> {
        self.communication_out.1.clone()
    }

    /// Block until the renderer reports a finished frame
    pub fn receive_message(&self) {
        self.communication_out.1.recv().unwrap()
    }

    /// Shared framebuffer of the active renderer, `None` when inactive
    pub fn get_buffer_handle(&self) -> Option<Arc<Mutex<Vec<u8>>>> {
        self.buffer.as_ref().cloned()
    }

    /// Shared render context of the active renderer, `None` when inactive
    pub fn get_context_handle(&self) -> Option<Arc<RwLock<RenderContext>>> {
        self.context.as_ref().cloned()
    }

    /// Start `renderer` and go into the active state.
    ///
    /// If a renderer was already running it is shut down and joined first.
    pub fn start_rendering<R: RenderThread>(&mut self, mut renderer: R) {
        if let Some(handle) = self.handle.take() {
            self.communication_in
                .0
                .send(RendererMessage::ShutDown)
                .unwrap();
            handle.join().unwrap();
            self.buffer = None;
            self.context = None;
        }

        let communication = (
            self.communication_out.0.clone(),
            self.communication_in.1.clone(),
        );
        renderer.set_communication(communication);
        self.buffer = Some(renderer.get_shared_buffer());
        self.context = Some(renderer.get_context());
        self.handle = Some(renderer.start()); // waits for the first message
    }

    /// Join the render thread; a `ShutDown` message must be sent first.
    ///
    /// Blocking. The front goes back into the inactive state.
    pub fn finish(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
            self.buffer = None;
            self.context = None;
        }
    }
}

impl Default for RendererFront {
    fn default() -> Self {
        Self::new()
    }
}
