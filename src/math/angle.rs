/// Floored modulo, always in `[0, y)` for positive `y`.
pub fn wrap_angle(x: f32, y: f32) -> f32 {
    let wrapped = x - y * (x / y).floor();
    // tiny negative inputs round up to exactly `y`
    if wrapped >= y {
        0.0
    } else {
        wrapped
    }
}

pub fn clamp(n: f32, low: f32, high: f32) -> f32 {
    n.min(high).max(low)
}

/// Vertical field of view (degrees) matching a horizontal one for the given aspect.
pub fn vertical_fov(horizontal_degrees: f32, width: f32, height: f32) -> f32 {
    let half = horizontal_degrees.to_radians() * 0.5;
    ((half.tan() * (height / width)).atan() * 2.0).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_wrap_angle_in_range() {
        assert!((wrap_angle(1.0, TAU) - 1.0).abs() < 1e-6);
        assert!((wrap_angle(TAU + 1.0, TAU) - 1.0).abs() < 1e-5);
        assert!((wrap_angle(-1.0, TAU) - (TAU - 1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_wrap_angle_never_reaches_upper_bound() {
        let wrapped = wrap_angle(-1e-9, TAU);
        assert!(wrapped >= 0.0 && wrapped < TAU);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn test_vertical_fov_square() {
        assert!((vertical_fov(90.0, 512.0, 512.0) - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_vertical_fov_widescreen() {
        let fov_y = vertical_fov(45.0, 1280.0, 720.0);
        assert!((fov_y - 26.231).abs() < 0.01);
    }
}
