use nalgebra::{vector, Vector2, Vector3};
use rayon::prelude::*;

use crate::{
    color::{self, RGBA},
    common::Ray,
    context::RenderContext,
    transfer::TfSnapshot,
    volumetric::Volume,
};

use super::RenderQuality;

/// Transmittance below which the march stops early.
///
/// An optimization only; remaining samples could contribute at most this
/// fraction of a channel, under floating-point tolerance.
pub const TRANSMITTANCE_CUTOFF: f32 = 1e-3;

/// Bytes per output pixel (RGBA8).
pub const PIXEL_SIZE: usize = 4;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output resolution, pixels
    pub resolution: Vector2<u16>,
    /// Stop marching once accumulated transmittance drops below
    /// [`TRANSMITTANCE_CUTOFF`]
    pub ray_termination: bool,
    /// March step in world units for quality frames
    pub ray_step_quality: f32,
    /// March step for fast frames, typically while the user drags
    pub ray_step_fast: f32,
    /// Spread pixel rows across threads
    pub multi_thread: bool,
    /// Color composited behind the volume
    pub background: Vector3<f32>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            resolution: vector![800, 800],
            ray_termination: true,
            ray_step_quality: 0.2,
            ray_step_fast: 0.9,
            multi_thread: true,
            background: vector![0.2, 0.3, 0.4],
        }
    }
}

impl RenderOptions {
    pub fn new(resolution: Vector2<u16>) -> RenderOptions {
        RenderOptions {
            resolution,
            ..Default::default()
        }
    }

    pub fn buffer_len(&self) -> usize {
        (self.resolution.x as usize) * (self.resolution.y as usize) * PIXEL_SIZE
    }
}

/// Ray compositor. Owns the volume and integrates the volume rendering
/// equation along one ray per pixel.
pub struct Renderer {
    volume: Volume,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(volume: Volume, options: RenderOptions) -> Renderer {
        Renderer { volume, options }
    }

    pub fn get_volume(&self) -> &Volume {
        &self.volume
    }

    pub fn get_options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Render one RGBA8 frame into `buffer`, row 0 on top.
    ///
    /// The context is read-only for the whole frame; every pixel sees the
    /// same committed transfer function and camera pose.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` does not hold exactly
    /// `resolution.x * resolution.y` RGBA pixels.
    pub fn render(&self, ctx: &RenderContext, quality: RenderQuality, buffer: &mut [u8]) {
        let width = self.options.resolution.x as usize;
        let height = self.options.resolution.y as usize;
        assert_eq!(buffer.len(), width * height * PIXEL_SIZE);

        let step_size = match quality {
            RenderQuality::Quality => self.options.ray_step_quality,
            RenderQuality::Fast => self.options.ray_step_fast,
        };

        let row_bytes = width * PIXEL_SIZE;

        if self.options.multi_thread {
            buffer
                .par_chunks_mut(row_bytes)
                .enumerate()
                .for_each(|(y, row)| self.render_row(ctx, step_size, y, height, row));
        } else {
            buffer
                .chunks_mut(row_bytes)
                .enumerate()
                .for_each(|(y, row)| self.render_row(ctx, step_size, y, height, row));
        }
    }

    fn render_row(
        &self,
        ctx: &RenderContext,
        step_size: f32,
        y: usize,
        height: usize,
        row: &mut [u8],
    ) {
        let camera = ctx.get_camera();
        let model = ctx.get_model();
        let tf = ctx.get_committed();

        let pivot = self.volume.get_bound_box().center();
        let width = row.len() / PIXEL_SIZE;

        let y_norm = y as f32 / height as f32;

        for (x, pixel) in row.chunks_exact_mut(PIXEL_SIZE).enumerate() {
            let x_norm = x as f32 / width as f32;

            let ray = camera.get_ray((x_norm, y_norm));
            let obj_ray = model.ray_to_object_space(&ray, pivot);

            let light = self.collect_light(&obj_ray, tf, step_size);

            // composite the background behind the remaining transmittance
            let transmittance = 1.0 - light.w;
            let rgb = light.xyz() + transmittance * self.options.background;

            pixel[0] = channel_to_u8(rgb.x);
            pixel[1] = channel_to_u8(rgb.y);
            pixel[2] = channel_to_u8(rgb.z);
            pixel[3] = channel_to_u8(light.w);
        }
    }

    /// March `ray` through the volume and integrate front to back.
    ///
    /// Returns accumulated premultiplied color with opacity `1 - T`, where
    /// `T` is the transmittance left when the ray exits. A ray missing the
    /// bounding box contributes nothing.
    pub fn collect_light(&self, ray: &Ray, tf: &TfSnapshot, step_size: f32) -> RGBA {
        let (t0, t1) = match self.volume.intersect(ray) {
            Some(range) => range,
            None => return color::zero(),
        };
        // camera may sit inside the box
        let t0 = t0.max(0.0);

        let n_of_steps = ((t1 - t0) / step_size) as usize;

        let mut pos = self.volume.to_voxel(ray.point_from_t(t0));
        let step = self.volume.to_voxel_dir(ray.direction) * step_size;

        let mut accum = vector![0.0, 0.0, 0.0];
        let mut transmittance = 1.0;

        for _ in 0..n_of_steps {
            let sample = self.volume.sample_at(pos);
            let mapped = tf.sample(sample);

            pos += step;

            // snapshot values are pre-clamped to [0;1] at commit
            let opacity = mapped.w;
            if opacity == 0.0 {
                continue;
            }

            accum += transmittance * opacity * mapped.xyz();
            transmittance *= 1.0 - opacity;

            if self.options.ray_termination && transmittance < TRANSMITTANCE_CUTOFF {
                break;
            }
        }

        color::new(accum.x, accum.y, accum.z, 1.0 - transmittance)
    }
}

fn channel_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod test {

    use nalgebra::{point, vector};

    use super::*;
    use crate::{
        context::FrameInput,
        test_helpers::{facing_context, opaque_red_tf, transparent_tf, uniform_volume},
    };

    fn small_options() -> RenderOptions {
        RenderOptions {
            resolution: vector![16, 16],
            multi_thread: false,
            ..Default::default()
        }
    }

    fn background_pixel(options: &RenderOptions) -> [u8; 4] {
        let bg = options.background;
        [
            channel_to_u8(bg.x),
            channel_to_u8(bg.y),
            channel_to_u8(bg.z),
            0,
        ]
    }

    #[test]
    fn transparent_volume_renders_background() {
        let options = small_options();
        let volume = uniform_volume(vector![8, 8, 8], 0.0);
        let mut ctx = facing_context(&volume, options.resolution);

        ctx.apply(&FrameInput {
            color_points: Some(*transparent_tf().color_points()),
            opacity_points: Some(*transparent_tf().opacity_points()),
            commit_transfer: true,
            ..Default::default()
        });

        let expected = background_pixel(&options);
        let renderer = Renderer::new(volume, options);

        let mut buffer = vec![0; renderer.get_options().buffer_len()];
        renderer.render(&ctx, RenderQuality::Quality, &mut buffer);

        for pixel in buffer.chunks_exact(PIXEL_SIZE) {
            assert_eq!(pixel, expected);
        }

        // camera pose must not matter
        ctx.apply(&FrameInput {
            yaw_delta: 123.0,
            pitch_delta: -45.0,
            scroll_delta: 5.0,
            ..Default::default()
        });
        renderer.render(&ctx, RenderQuality::Quality, &mut buffer);
        for pixel in buffer.chunks_exact(PIXEL_SIZE) {
            assert_eq!(pixel, expected);
        }
    }

    #[test]
    fn opaque_sample_occludes_everything_behind() {
        let options = small_options();
        let volume = uniform_volume(vector![8, 8, 8], 100.0);
        let mut ctx = facing_context(&volume, options.resolution);

        let tf = opaque_red_tf();
        ctx.apply(&FrameInput {
            color_points: Some(*tf.color_points()),
            opacity_points: Some(*tf.opacity_points()),
            commit_transfer: true,
            ..Default::default()
        });

        let renderer = Renderer::new(volume, options);
        let mut buffer = vec![0; renderer.get_options().buffer_len()];
        renderer.render(&ctx, RenderQuality::Quality, &mut buffer);

        // center pixel looks straight into the volume: pure red, opaque,
        // no background bleeding through
        let center = center_pixel(&buffer, 16);
        assert_eq!(center, [255, 0, 0, 255]);
    }

    #[test]
    fn saturated_ray_keeps_first_sample_color() {
        let volume = uniform_volume(vector![8, 8, 8], 100.0);

        let tf = opaque_red_tf().commit();
        let renderer = Renderer::new(volume, small_options());

        let ray = Ray::new(point![3.5, 3.5, 20.0], vector![0.0, 0.0, -1.0]);
        let light = renderer.collect_light(&ray, &tf, 1.0);

        assert_eq!(light, crate::color::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn missing_ray_contributes_nothing() {
        let volume = uniform_volume(vector![8, 8, 8], 100.0);
        let renderer = Renderer::new(volume, small_options());
        let tf = opaque_red_tf().commit();

        let ray = Ray::new(point![100.0, 100.0, 100.0], vector![0.0, 1.0, 0.0]);
        let light = renderer.collect_light(&ray, &tf, 1.0);

        assert_eq!(light, crate::color::zero());
    }

    #[test]
    fn early_termination_within_tolerance() {
        let volume = uniform_volume(vector![16, 16, 16], 100.0);
        let ctx = facing_context(&volume, vector![16, 16]);

        // half-transparent everywhere, forces a long march
        let tf = crate::test_helpers::constant_tf(0.5, vector![0.1, 0.6, 0.9]).commit();

        let mut options = small_options();
        options.ray_termination = false;
        let exact = Renderer::new(volume, options);

        let ray = ctx
            .get_camera()
            .get_ray((0.5, 0.5));

        let full = exact.collect_light(&ray, &tf, 0.5);

        let mut options = exact.get_options().clone();
        options.ray_termination = true;
        let volume2 = uniform_volume(vector![16, 16, 16], 100.0);
        let terminated = Renderer::new(volume2, options);
        let cut = terminated.collect_light(&ray, &tf, 0.5);

        assert!((full.w - cut.w).abs() < 2.0 * TRANSMITTANCE_CUTOFF);
        assert!((full.xyz() - cut.xyz()).norm() < 2.0 * TRANSMITTANCE_CUTOFF);
    }

    #[test]
    fn serial_and_parallel_render_identically() {
        let volume = uniform_volume(vector![8, 8, 8], 100.0);
        let ctx = facing_context(&volume, vector![16, 16]);

        let mut options = small_options();
        options.multi_thread = false;
        let serial = Renderer::new(volume, options.clone());
        let mut serial_buf = vec![0; serial.get_options().buffer_len()];
        serial.render(&ctx, RenderQuality::Quality, &mut serial_buf);

        options.multi_thread = true;
        let volume = uniform_volume(vector![8, 8, 8], 100.0);
        let parallel = Renderer::new(volume, options);
        let mut parallel_buf = vec![0; parallel.get_options().buffer_len()];
        parallel.render(&ctx, RenderQuality::Quality, &mut parallel_buf);

        assert_eq!(serial_buf, parallel_buf);
    }

    #[test]
    fn recommit_renders_identical_frame() {
        let volume = uniform_volume(vector![8, 8, 8], 100.0);
        let mut ctx = facing_context(&volume, vector![16, 16]);
        let renderer = Renderer::new(volume, small_options());

        let mut first = vec![0; renderer.get_options().buffer_len()];
        renderer.render(&ctx, RenderQuality::Quality, &mut first);

        ctx.apply(&FrameInput {
            commit_transfer: true,
            ..Default::default()
        });

        let mut second = vec![0; renderer.get_options().buffer_len()];
        renderer.render(&ctx, RenderQuality::Quality, &mut second);

        assert_eq!(first, second);
    }

    fn center_pixel(buffer: &[u8], width: usize) -> [u8; 4] {
        let index = (width / 2 * width + width / 2) * PIXEL_SIZE;
        [
            buffer[index],
            buffer[index + 1],
            buffer[index + 2],
            buffer[index + 3],
        ]
    }
}
