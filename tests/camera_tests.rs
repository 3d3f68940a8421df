use glam::Vec3;
use orbit_tracer::camera::{
    InteractiveCamera, MAX_APERTURE, MAX_FOCAL_DISTANCE, MAX_PITCH, MAX_RADIUS, MIN_APERTURE,
    MIN_FOCAL_DISTANCE, MIN_PITCH, MIN_RADIUS,
};
use orbit_tracer::types::RenderCamera;
use std::f32::consts::{PI, TAU};

#[cfg(test)]
mod camera_tests {
    use super::*;

    fn level_camera() -> InteractiveCamera {
        let mut camera = InteractiveCamera::new();
        camera.change_pitch(-camera.pitch());
        camera
    }

    #[test]
    fn test_radius_stays_in_range() {
        let mut camera = InteractiveCamera::new();
        for _ in 0..200 {
            camera.change_radius(0.5);
            assert!(camera.radius() <= MAX_RADIUS);
        }
        assert_eq!(camera.radius(), MAX_RADIUS);

        for _ in 0..200 {
            camera.change_radius(-0.9);
            assert!(camera.radius() >= MIN_RADIUS);
        }
        assert_eq!(camera.radius(), MIN_RADIUS);
    }

    #[test]
    fn test_pitch_stays_in_range() {
        let mut camera = InteractiveCamera::new();
        for _ in 0..500 {
            camera.change_pitch(0.017);
            assert!(camera.pitch() <= MAX_PITCH);
        }
        assert_eq!(camera.pitch(), MAX_PITCH);

        for _ in 0..500 {
            camera.change_pitch(-0.05);
            assert!(camera.pitch() >= MIN_PITCH);
        }
        assert_eq!(camera.pitch(), MIN_PITCH);
    }

    #[test]
    fn test_aperture_and_focal_distance_clamped() {
        let mut camera = InteractiveCamera::new();
        camera.change_aperture(-1.0);
        assert_eq!(camera.aperture(), MIN_APERTURE);
        camera.change_aperture(1000.0);
        assert_eq!(camera.aperture(), MAX_APERTURE);

        camera.change_focal_distance(-50.0);
        assert_eq!(camera.focal_distance(), MIN_FOCAL_DISTANCE);
        camera.change_focal_distance(500.0);
        assert_eq!(camera.focal_distance(), MAX_FOCAL_DISTANCE);
    }

    #[test]
    fn test_heading_is_periodic() {
        let mut camera = InteractiveCamera::new();
        camera.change_heading(1.0);
        camera.change_heading(PI);
        camera.change_heading(PI);
        assert!((camera.heading() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_heading_stays_in_range() {
        let mut camera = InteractiveCamera::new();
        for _ in 0..1000 {
            camera.change_heading(-0.017);
            assert!(camera.heading() >= 0.0 && camera.heading() < TAU);
        }
        for _ in 0..1000 {
            camera.change_heading(0.37);
            assert!(camera.heading() >= 0.0 && camera.heading() < TAU);
        }
    }

    #[test]
    fn test_fov_square_and_widescreen() {
        let mut camera = InteractiveCamera::new();
        camera.set_resolution(512.0, 512.0);
        camera.set_fov(90.0);
        assert!((camera.fov().y - camera.fov().x).abs() < 0.01);

        camera.set_resolution(1280.0, 720.0);
        assert_eq!(camera.fov().x, 90.0);
        assert!(camera.fov().y < camera.fov().x);
    }

    #[test]
    fn test_level_camera_pose() {
        let camera = level_camera();
        let render = camera.to_render_camera();

        assert_eq!(render.position(), Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(render.view(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(render.up(), Vec3::Y);
    }

    #[test]
    fn test_render_camera_copies_lens_and_resolution() {
        let mut camera = InteractiveCamera::new();
        camera.set_resolution(1280.0, 720.0);
        camera.set_fov(45.0);
        camera.change_aperture(0.09);
        camera.change_focal_distance(1.0);

        let render = camera.to_render_camera();
        assert_eq!(render.resolution, [1280.0, 720.0]);
        assert_eq!(render.fov, camera.fov().to_array());
        assert!((render.aperture_radius - 0.1).abs() < 1e-6);
        assert_eq!(render.focal_distance, 5.0);
    }

    #[test]
    fn test_build_is_deterministic() {
        let mut camera = InteractiveCamera::new();
        camera.change_heading(0.7);
        camera.strafe(0.3);
        camera.move_forward(-0.2);

        let mut first = RenderCamera::default();
        let mut second = RenderCamera::default();
        camera.build_render_camera(&mut first);
        camera.build_render_camera(&mut second);

        assert_eq!(bytemuck::bytes_of(&first), bytemuck::bytes_of(&second));
    }

    #[test]
    fn test_move_forward_follows_view() {
        let mut camera = level_camera();
        camera.move_forward(0.5);
        assert!((camera.center() - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-6);
    }

    #[test]
    fn test_strafe_is_horizontal() {
        let mut camera = InteractiveCamera::new();
        camera.change_pitch(0.8);
        camera.strafe(1.0);

        let center = camera.center();
        assert_eq!(center.y, 0.0);
        assert!((center.length() - 1.0).abs() < 1e-5);
        assert!(center.dot(camera.view()).abs() < 1e-5);
    }

    #[test]
    fn test_strafe_right_of_view() {
        let mut camera = level_camera();
        camera.strafe(0.025);
        // looking down -Z, view x up points to +X
        assert!((camera.center() - Vec3::new(0.025, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_moves_keep_orbit_parameters() {
        let mut camera = InteractiveCamera::new();
        camera.change_heading(0.4);
        let (heading, pitch, radius) = (camera.heading(), camera.pitch(), camera.radius());

        camera.move_forward(0.3);
        camera.strafe(-0.2);
        camera.change_altitude(0.1);

        assert_eq!(camera.heading(), heading);
        assert_eq!(camera.pitch(), pitch);
        assert_eq!(camera.radius(), radius);
    }

    #[test]
    fn test_position_is_radius_from_center() {
        let mut camera = InteractiveCamera::new();
        camera.change_heading(2.1);
        camera.change_altitude(1.5);
        camera.change_radius(0.25);

        let render = camera.to_render_camera();
        let distance = (render.position() - camera.center()).length();
        assert!((distance - camera.radius()).abs() < 1e-4);
        assert!((render.view().length() - 1.0).abs() < 1e-5);
    }
}
