use nalgebra::{vector, Matrix4, Perspective3, Point3, Vector2, Vector3};

use crate::common::Ray;

/// Default vertical field of view in degrees.
pub const ZOOM_DEFAULT: f32 = 45.0;
/// Narrowest allowed field of view.
pub const ZOOM_MIN: f32 = 1.0;
/// Widest allowed field of view.
pub const ZOOM_MAX: f32 = 60.0;

/// Ray-casting camera.
///
/// The camera never rotates during interaction; orbiting is expressed as an
/// object-space rotation of the volume ([`ModelTransform`](super::ModelTransform)).
/// Scroll input only narrows or widens the field of view (`zoom`).
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Position in world coordinates
    position: Point3<f32>,
    /// Looking direction, unit length
    front: Vector3<f32>,
    /// Up direction from the camera's perspective, unit length
    up: Vector3<f32>,
    /// Right direction from the camera's perspective, unit length
    right: Vector3<f32>,
    /// World up reference used to rebuild the basis
    world_up: Vector3<f32>,
    /// Aspect ratio of the image plane
    aspect: f32,
    /// Vertical field of view in degrees, clamped to `[ZOOM_MIN, ZOOM_MAX]`
    zoom: f32,
    /// Near and far clip planes of the projection
    clip_planes: (f32, f32),
    /// Size of image plane, derived from zoom and aspect
    img_plane_size: Vector2<f32>,
    /// Direction of the ray through pixel \[0,0\] (upper left corner)
    dir_00: Vector3<f32>,
    /// Offset between two horizontally neighbouring pixels
    du: Vector3<f32>,
    /// Offset between two vertically neighbouring pixels
    dv: Vector3<f32>,
}

impl PerspectiveCamera {
    /// Construct a camera at `position` looking along `front`.
    ///
    /// World up is assumed to be the positive y axis. Default field of view
    /// is [`ZOOM_DEFAULT`], aspect ratio 1; call
    /// [`change_aspect_from_resolution`](PerspectiveCamera::change_aspect_from_resolution)
    /// to match the output image.
    pub fn new(position: Point3<f32>, front: Vector3<f32>) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera {
            position,
            front: front.normalize(),
            up: vector![0.0, 1.0, 0.0],
            right: vector![1.0, 0.0, 0.0],
            world_up: vector![0.0, 1.0, 0.0],
            aspect: 1.0,
            zoom: ZOOM_DEFAULT,
            clip_planes: (0.1, 50.0),
            img_plane_size: vector![0.0, 0.0],
            dir_00: front,
            du: vector![0.0, 0.0, 0.0],
            dv: vector![0.0, 0.0, 0.0],
        };
        camera.recalc_basis();
        camera.recalc_plane();
        camera
    }

    pub fn get_position(&self) -> Point3<f32> {
        self.position
    }

    pub fn get_front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn get_zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    /// Change the looking direction. Rebuilds the right/up basis from
    /// world up.
    pub fn set_front(&mut self, front: Vector3<f32>) {
        self.front = front.normalize();
        self.recalc_basis();
        self.recalc_plane();
    }

    /// Match the aspect ratio to an output resolution.
    pub fn change_aspect_from_resolution(&mut self, resolution: Vector2<u16>) {
        self.aspect = f32::from(resolution.x) / f32::from(resolution.y);
        self.recalc_plane();
    }

    /// Set near and far clip planes of the projection.
    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.clip_planes = (near, far);
    }

    /// Apply a scroll-wheel zoom delta.
    ///
    /// Scrolling down (negative offset) widens the field of view. The
    /// result silently clamps to `[ZOOM_MIN, ZOOM_MAX]`.
    pub fn process_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(ZOOM_MIN, ZOOM_MAX);
        self.recalc_plane();
    }

    /// View matrix in the look-from/look-at/up convention.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &(self.position + self.front), &self.up)
    }

    /// Perspective projection for the configured zoom, aspect and clip planes.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let (near, far) = self.clip_planes;
        Perspective3::new(self.aspect, self.zoom.to_radians(), near, far).to_homogeneous()
    }

    /// Ray from the camera through image-plane coordinates `pixel_coord`,
    /// each in `<0;1>`, point \[0,0\] being the upper left corner.
    pub fn get_ray(&self, pixel_coord: (f32, f32)) -> Ray {
        let dir = self.dir_00 + self.du * pixel_coord.0 + self.dv * pixel_coord.1;
        Ray::new(self.position, dir.normalize())
    }

    // Call when front changed
    fn recalc_basis(&mut self) {
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }

    // Call when zoom, aspect or basis changed
    fn recalc_plane(&mut self) {
        self.img_plane_size = vector![0.0, 2.0 * f32::tan(0.5 * self.zoom.to_radians())];
        self.img_plane_size.x = self.img_plane_size.y * self.aspect;

        self.du = self.img_plane_size.x * self.right;
        self.dv = -self.img_plane_size.y * self.up; // points down, in line with buffer rows
        self.dir_00 = self.front - 0.5 * self.du - 0.5 * self.dv;
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        // matches the startup pose of the desktop viewer
        PerspectiveCamera::new(nalgebra::point![0.0, 0.0, 3.0], vector![0.0, 0.0, -1.0])
    }
}
