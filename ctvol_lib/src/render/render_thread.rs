use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam::channel::{Receiver, Sender};
use parking_lot::{Mutex, RwLock};

use crate::context::RenderContext;

use super::{RenderQuality, RenderThread, Renderer, RendererMessage};

/// Render thread around a [`Renderer`].
///
/// Owns the volume through the renderer and shares the framebuffer and the
/// render context with the control thread. One received message means one
/// rendered frame.
pub struct VolumeRenderThread {
    renderer: Renderer,
    shared_buffer: Arc<Mutex<Vec<u8>>>,
    context: Arc<RwLock<RenderContext>>,
    communication: (Sender<()>, Receiver<RendererMessage>),
}

impl VolumeRenderThread {
    /// Construct with a fresh context for the renderer's resolution.
    ///
    /// Communication channels are dummy values until the front rewires them
    /// in [`set_communication`](RenderThread::set_communication).
    pub fn new(renderer: Renderer) -> VolumeRenderThread {
        let buffer_size = renderer.get_options().buffer_len();
        let shared_buffer = Arc::new(Mutex::new(vec![0; buffer_size]));

        let context = RenderContext::new(renderer.get_options().resolution);
        let context = Arc::new(RwLock::new(context));

        let communication = (
            crossbeam::channel::unbounded().0,
            crossbeam::channel::never(),
        );

        VolumeRenderThread {
            renderer,
            shared_buffer,
            context,
            communication,
        }
    }

    fn main_loop(self) {
        loop {
            let quality = match self.communication.1.recv() {
                Ok(RendererMessage::StartRendering) => RenderQuality::Quality,
                Ok(RendererMessage::StartRenderingFast) => RenderQuality::Fast,
                Ok(RendererMessage::ShutDown) | Err(_) => break,
            };

            {
                // context stays locked for the whole frame
                let context = self.context.read();
                let mut buffer = self.shared_buffer.lock();
                self.renderer.render(&context, quality, &mut buffer);
            }

            self.communication.0.send(()).unwrap();
        }
    }
}

impl RenderThread for VolumeRenderThread {
    fn get_shared_buffer(&self) -> Arc<Mutex<Vec<u8>>> {
        self.shared_buffer.clone()
    }

    fn get_context(&self) -> Arc<RwLock<RenderContext>> {
        self.context.clone()
    }

    fn start(self) -> JoinHandle<()> {
        thread::spawn(move || self.main_loop())
    }

    fn set_communication(&mut self, communication: (Sender<()>, Receiver<RendererMessage>)) {
        self.communication = communication;
    }
}

#[cfg(test)]
mod test {

    use nalgebra::vector;

    use super::*;
    use crate::{
        context::FrameInput,
        render::{RenderOptions, RendererFront},
        test_helpers::uniform_volume,
    };

    fn front_with_renderer() -> RendererFront {
        let volume = uniform_volume(vector![8, 8, 8], 100.0);
        let options = RenderOptions {
            resolution: vector![16, 16],
            multi_thread: false,
            ..Default::default()
        };

        let mut front = RendererFront::new();
        front.start_rendering(VolumeRenderThread::new(Renderer::new(volume, options)));
        front
    }

    #[test]
    fn renders_a_frame_per_message() {
        let mut front = front_with_renderer();

        front.send_message(RendererMessage::StartRendering);
        front.receive_message();

        let buffer = front.get_buffer_handle().unwrap();
        {
            let frame = buffer.lock();
            assert_eq!(frame.len(), 16 * 16 * 4);
            // default preset over a mid-intensity volume is not all black
            assert!(frame.iter().any(|&b| b != 0));
        }

        front.send_message(RendererMessage::ShutDown);
        front.finish();
    }

    #[test]
    fn context_changes_between_frames_take_effect() {
        let mut front = front_with_renderer();

        front.send_message(RendererMessage::StartRendering);
        front.receive_message();
        let first = front.get_buffer_handle().unwrap().lock().clone();

        {
            let context = front.get_context_handle().unwrap();
            context.write().apply(&FrameInput {
                yaw_delta: 40.0,
                pitch_delta: 25.0,
                scroll_delta: -10.0,
                ..Default::default()
            });
        }

        front.send_message(RendererMessage::StartRendering);
        front.receive_message();
        let second = front.get_buffer_handle().unwrap().lock().clone();

        assert_ne!(first, second);

        front.send_message(RendererMessage::ShutDown);
        front.finish();
    }
}
