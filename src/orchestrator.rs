use log::{debug, trace};

use crate::camera::{InteractiveCamera, DEFAULT_FOV};
use crate::error::{Result, TracerError};
use crate::frame::{FrameController, FrameSeeds};
use crate::math::DispatchSize;
use crate::scene::Scene;
use crate::types::{FrameUniform, RenderCamera, SphereData};

/// Compute side of a frame: buffers and the path tracing kernel
pub trait ComputeBackend {
    /// Invocations per work group, the granularity the dispatch is rounded to
    fn work_group_size(&self) -> u32;

    fn max_groups_per_dimension(&self) -> u32;

    fn upload_scene(&mut self, spheres: &[SphereData]) -> Result<()>;

    fn clear_accumulation(&mut self);

    fn upload_camera(&mut self, camera: &RenderCamera);

    /// Runs the kernel and blocks until the device has finished it.
    fn dispatch(&mut self, args: &FrameUniform, size: DispatchSize) -> Result<()>;
}

/// Receives the finished framebuffer
pub trait Display {
    fn present(&mut self, stats: &FrameStats) -> Result<()>;
}

/// Everything that went into one dispatched frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame_number: u32,
    pub cleared: bool,
    pub seeds: FrameSeeds,
    pub dispatch: DispatchSize,
    pub camera: RenderCamera,
}

/// User level camera mutations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAction {
    MoveForward(f32),
    Strafe(f32),
    ChangeHeading(f32),
    ChangePitch(f32),
    ChangeAltitude(f32),
    ChangeRadius(f32),
    ChangeAperture(f32),
    ChangeFocalDistance(f32),
}

impl CameraAction {
    pub fn apply(self, camera: &mut InteractiveCamera) {
        match self {
            CameraAction::MoveForward(distance) => camera.move_forward(distance),
            CameraAction::Strafe(distance) => camera.strafe(distance),
            CameraAction::ChangeHeading(delta) => camera.change_heading(delta),
            CameraAction::ChangePitch(delta) => camera.change_pitch(delta),
            CameraAction::ChangeAltitude(delta) => camera.change_altitude(delta),
            CameraAction::ChangeRadius(factor) => camera.change_radius(factor),
            CameraAction::ChangeAperture(delta) => camera.change_aperture(delta),
            CameraAction::ChangeFocalDistance(delta) => camera.change_focal_distance(delta),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Horizontal field of view in degrees, also restored on camera reset
    pub fov: f32,
    pub seed: u64,
}

impl RenderSettings {
    /// Pixels per frame, one kernel work item each.
    pub fn pixel_count(&self) -> Result<u32> {
        if self.width == 0 || self.height == 0 {
            return Err(self.unsupported("width and height must be at least 1"));
        }
        self.width
            .checked_mul(self.height)
            .ok_or_else(|| self.unsupported("pixel count does not fit in 32 bits"))
    }

    pub(crate) fn unsupported(&self, reason: &str) -> TracerError {
        TracerError::Resolution {
            width: self.width,
            height: self.height,
            reason: reason.to_string(),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fov: DEFAULT_FOV,
            seed: 0,
        }
    }
}

/// Owns all per-frame state and drives the compute dispatch.
///
/// Construct it after the device and its buffers exist; input handling receives a
/// mutable reference to it and never reaches the camera or frame state any other way.
pub struct Renderer<B: ComputeBackend, D: Display> {
    backend: B,
    display: D,
    scene: Scene,
    camera: InteractiveCamera,
    frames: FrameController,
    host_camera: RenderCamera,
    settings: RenderSettings,
}

impl<B: ComputeBackend, D: Display> Renderer<B, D> {
    pub fn new(backend: B, display: D, scene: Scene, settings: RenderSettings) -> Self {
        let camera = Self::initial_camera(&settings);
        let host_camera = camera.to_render_camera();

        Self {
            backend,
            display,
            scene,
            camera,
            frames: FrameController::new(settings.seed),
            host_camera,
            settings,
        }
    }

    fn initial_camera(settings: &RenderSettings) -> InteractiveCamera {
        let mut camera = InteractiveCamera::new();
        camera.set_resolution(settings.width as f32, settings.height as f32);
        camera.set_fov(settings.fov);
        camera
    }

    pub fn camera(&self) -> &InteractiveCamera {
        &self.camera
    }

    pub fn frames(&self) -> &FrameController {
        &self.frames
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Host copy of the camera record last uploaded to the kernel
    pub fn host_camera(&self) -> &RenderCamera {
        &self.host_camera
    }

    pub fn apply(&mut self, action: CameraAction) {
        action.apply(&mut self.camera);
        self.frames.request_reset();
    }

    /// Replaces the camera with a fresh one at the configured resolution and fov.
    pub fn reset_camera(&mut self) {
        self.camera = Self::initial_camera(&self.settings);
        self.frames.request_reset();
    }

    /// Scene edits invalidate everything accumulated so far.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.frames.request_reset();
        &mut self.scene
    }

    /// Renders one progressive frame.
    ///
    /// Blocks on the device until the kernel has finished so the display never sees a
    /// half written framebuffer. A stalled device stalls the caller.
    pub fn render_frame(&mut self) -> Result<FrameStats> {
        // Size the dispatch before touching any frame state
        let dispatch = DispatchSize::cover(
            self.settings.pixel_count()?,
            self.backend.work_group_size(),
            self.backend.max_groups_per_dimension(),
        )
        .ok_or_else(|| self.settings.unsupported("too many work groups for one dispatch"))?;

        self.backend.upload_scene(&self.scene.to_gpu())?;

        let tick = self.frames.advance();
        if tick.clear_accumulation {
            debug!("Accumulation reset");
            self.backend.clear_accumulation();
        }

        self.camera.build_render_camera(&mut self.host_camera);
        self.backend.upload_camera(&self.host_camera);

        let seeds = self.frames.next_seeds();
        let args = FrameUniform {
            width: self.settings.width,
            height: self.settings.height,
            primitive_count: self.scene.len() as u32,
            frame_number: tick.number,
            seed_a: seeds.seed_a,
            seed_b: seeds.seed_b,
            frame_hash: seeds.frame_hash,
            _pad: 0,
        };

        self.backend.dispatch(&args, dispatch)?;

        trace!(
            "Frame {} (seeds {:#010x} {:#010x}, hash {:#010x})",
            tick.number,
            seeds.seed_a,
            seeds.seed_b,
            seeds.frame_hash
        );

        let stats = FrameStats {
            frame_number: tick.number,
            cleared: tick.clear_accumulation,
            seeds,
            dispatch,
            camera: self.host_camera,
        };
        self.display.present(&stats)?;

        Ok(stats)
    }
}
