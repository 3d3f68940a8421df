use glam::{Vec2, Vec3};

/// Bind group slots shared with `path_tracer.wgsl`.
///
/// Buffer arguments keep the kernel's positional argument numbers; the scalar
/// arguments (width, height, primitive count, frame number, both seeds and the frame
/// hash) travel together in [`FrameUniform`] at slot 1.
pub mod binding {
    pub const SCENE: u32 = 0;
    pub const FRAME: u32 = 1;
    pub const OUTPUT: u32 = 4;
    pub const CAMERA: u32 = 6;
    pub const ACCUMULATION: u32 = 9;
}

/// Camera record uploaded verbatim to the kernel every frame
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderCamera {
    pub position: [f32; 3],
    pub _pad1: f32,
    pub view: [f32; 3],
    pub _pad2: f32,
    pub up: [f32; 3],
    pub _pad3: f32,
    pub resolution: [f32; 2],
    pub fov: [f32; 2], // degrees, x and y
    pub aperture_radius: f32,
    pub focal_distance: f32,
    pub _pad4: [f32; 2],
}

impl RenderCamera {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn view(&self) -> Vec3 {
        Vec3::from_array(self.view)
    }

    pub fn up(&self) -> Vec3 {
        Vec3::from_array(self.up)
    }

    pub fn resolution(&self) -> Vec2 {
        Vec2::from_array(self.resolution)
    }

    pub fn fov(&self) -> Vec2 {
        Vec2::from_array(self.fov)
    }
}

/// Sphere primitive data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereData {
    pub radius: f32,
    pub material: i32,
    pub param1: f32,
    pub param2: f32,
    pub position: [f32; 3],
    pub _pad1: f32,
    pub color: [f32; 3],
    pub _pad2: f32,
    pub emission: [f32; 3],
    pub _pad3: f32,
}

/// Scalar kernel arguments, refreshed before every dispatch
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub width: u32,
    pub height: u32,
    pub primitive_count: u32,
    pub frame_number: u32,
    pub seed_a: u32,
    pub seed_b: u32,
    pub frame_hash: u32,
    pub _pad: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_render_camera_layout() {
        assert_eq!(size_of::<RenderCamera>(), 80);
        assert_eq!(offset_of!(RenderCamera, view), 16);
        assert_eq!(offset_of!(RenderCamera, up), 32);
        assert_eq!(offset_of!(RenderCamera, resolution), 48);
        assert_eq!(offset_of!(RenderCamera, fov), 56);
        assert_eq!(offset_of!(RenderCamera, aperture_radius), 64);
        assert_eq!(offset_of!(RenderCamera, focal_distance), 68);
    }

    #[test]
    fn test_sphere_data_layout() {
        assert_eq!(size_of::<SphereData>(), 64);
        assert_eq!(offset_of!(SphereData, material), 4);
        assert_eq!(offset_of!(SphereData, position), 16);
        assert_eq!(offset_of!(SphereData, color), 32);
        assert_eq!(offset_of!(SphereData, emission), 48);
    }

    #[test]
    fn test_frame_uniform_layout() {
        assert_eq!(size_of::<FrameUniform>(), 32);
        assert_eq!(offset_of!(FrameUniform, frame_number), 12);
        assert_eq!(offset_of!(FrameUniform, frame_hash), 24);
    }

    #[test]
    fn test_render_camera_accessors() {
        let camera = RenderCamera {
            position: [1.0, 2.0, 3.0],
            up: [0.0, 1.0, 0.0],
            fov: [45.0, 30.0],
            ..Default::default()
        };
        assert_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.up(), Vec3::Y);
        assert_eq!(camera.fov(), Vec2::new(45.0, 30.0));
    }
}
