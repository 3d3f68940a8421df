use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::math::{clamp, vertical_fov, wrap_angle};
use crate::types::RenderCamera;

pub const DEFAULT_FOV: f32 = 45.0;

pub const PITCH_PADDING: f32 = 0.05;
pub const MIN_PITCH: f32 = -FRAC_PI_2 + PITCH_PADDING;
pub const MAX_PITCH: f32 = FRAC_PI_2 - PITCH_PADDING;
pub const MIN_RADIUS: f32 = 0.2;
pub const MAX_RADIUS: f32 = 100.0;
pub const MIN_APERTURE: f32 = 0.0;
pub const MAX_APERTURE: f32 = 25.0;
pub const MIN_FOCAL_DISTANCE: f32 = 0.2;
pub const MAX_FOCAL_DISTANCE: f32 = 100.0;

/// Orbit camera driven by user input.
///
/// The camera sits on a sphere of `radius` around `center`, placed by `heading`
/// (around the Y axis) and `pitch`, and always looks at `center`. Every mutator
/// leaves the parameters inside their allowed ranges, so holding a key down can
/// never push the camera into a degenerate pose.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractiveCamera {
    center: Vec3,
    heading: f32,
    pitch: f32,
    radius: f32,
    aperture: f32,
    focal_distance: f32,
    resolution: Vec2,
    fov: Vec2,
}

impl Default for InteractiveCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveCamera {
    pub fn new() -> Self {
        Self {
            center: Vec3::ZERO,
            heading: 0.0,
            pitch: 0.3,
            radius: 4.0,
            aperture: 0.01,
            focal_distance: 4.0,
            resolution: Vec2::new(512.0, 512.0),
            fov: Vec2::new(40.0, 40.0),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn aperture(&self) -> f32 {
        self.aperture
    }

    pub fn focal_distance(&self) -> f32 {
        self.focal_distance
    }

    pub fn resolution(&self) -> Vec2 {
        self.resolution
    }

    pub fn fov(&self) -> Vec2 {
        self.fov
    }

    /// Unit vector from the pivot towards the eye
    pub fn direction_to_camera(&self) -> Vec3 {
        Vec3::new(
            self.heading.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.heading.cos() * self.pitch.cos(),
        )
    }

    /// Direction the camera looks along (towards the pivot)
    pub fn view(&self) -> Vec3 {
        -self.direction_to_camera()
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = Vec2::new(width, height);
        self.set_fov(self.fov.x);
    }

    /// Sets the horizontal FOV in degrees; the vertical one follows the aspect ratio.
    pub fn set_fov(&mut self, horizontal_degrees: f32) {
        self.fov = Vec2::new(
            horizontal_degrees,
            vertical_fov(horizontal_degrees, self.resolution.x, self.resolution.y),
        );
    }

    pub fn change_heading(&mut self, delta: f32) {
        self.heading += delta;
        self.fix_heading();
    }

    pub fn change_pitch(&mut self, delta: f32) {
        self.pitch += delta;
        self.fix_pitch();
    }

    /// Multiplicative zoom: `factor` is a fraction of the current radius.
    pub fn change_radius(&mut self, factor: f32) {
        self.radius += self.radius * factor;
        self.fix_radius();
    }

    pub fn change_aperture(&mut self, delta: f32) {
        self.aperture += delta;
        self.fix_aperture();
    }

    pub fn change_focal_distance(&mut self, delta: f32) {
        self.focal_distance += delta;
        self.fix_focal_distance();
    }

    pub fn change_altitude(&mut self, delta: f32) {
        self.center.y += delta;
    }

    /// Slides the pivot sideways. The axis is built against world up, not the
    /// camera's own up, so it stays horizontal at any pitch.
    pub fn strafe(&mut self, distance: f32) {
        let strafe_axis = self.view().cross(Vec3::Y).normalize();
        self.center += strafe_axis * distance;
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.center += self.view() * distance;
    }

    /// Projects the orbit parameters into a renderable pose.
    ///
    /// Call once per frame, after all input for the frame has been applied.
    pub fn build_render_camera(&self, out: &mut RenderCamera) {
        let direction_to_camera = self.direction_to_camera();

        out.position = (self.center + direction_to_camera * self.radius).to_array();
        out.view = (-direction_to_camera).to_array();
        out.up = Vec3::Y.to_array();
        out.resolution = self.resolution.to_array();
        out.fov = self.fov.to_array();
        out.aperture_radius = self.aperture;
        out.focal_distance = self.focal_distance;
    }

    pub fn to_render_camera(&self) -> RenderCamera {
        let mut camera = RenderCamera::default();
        self.build_render_camera(&mut camera);
        camera
    }

    fn fix_heading(&mut self) {
        self.heading = wrap_angle(self.heading, TAU);
    }

    fn fix_pitch(&mut self) {
        self.pitch = clamp(self.pitch, MIN_PITCH, MAX_PITCH);
    }

    fn fix_radius(&mut self) {
        self.radius = clamp(self.radius, MIN_RADIUS, MAX_RADIUS);
    }

    fn fix_aperture(&mut self) {
        self.aperture = clamp(self.aperture, MIN_APERTURE, MAX_APERTURE);
    }

    fn fix_focal_distance(&mut self) {
        self.focal_distance = clamp(self.focal_distance, MIN_FOCAL_DISTANCE, MAX_FOCAL_DISTANCE);
    }
}
