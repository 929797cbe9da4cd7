//! Angle helpers in degrees
//!
//! Rotation accumulators are unbounded floats. They get one wrap-around
//! correction per frame and are otherwise left alone, so very long sessions can
//! drift; nothing here tries to guard against that.

/// Loop `t` into `[0, length)`.
pub fn repeat(t: f32, length: f32) -> f32 {
    (t - (t / length).floor() * length).clamp(0.0, length)
}

/// Shortest signed difference from `current` to `target`, in `(-180, 180]`.
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let delta = repeat(target - current, 360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Interpolate along the shortest arc. `t` is clamped to `[0, 1]`.
pub fn lerp_angle(current: f32, target: f32, t: f32) -> f32 {
    current + delta_angle(current, target) * t.clamp(0.0, 1.0)
}

/// Plain clamped lerp.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Apply a single ±360 correction, then clamp into `[min, max]`.
///
/// Values just outside ±360 get exactly one wrap before the clamp; a value of
/// 800 therefore becomes 440 before clamping. A reversed range never panics, the
/// upper bound wins.
pub fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    let mut angle = angle;
    if angle < -360.0 {
        angle += 360.0;
    }
    if angle > 360.0 {
        angle -= 360.0;
    }
    angle.max(min).min(max)
}

/// Wrap an accumulator back into `[-360, 360]`.
pub fn wrap_angle(angle: f32) -> f32 {
    clamp_angle(angle, -360.0, 360.0)
}

/// Map an engine euler component (`[0, 360)`) to `(-180, 180]`.
pub fn signed_angle(angle: f32) -> f32 {
    let angle = repeat(angle, 360.0);
    if angle > 180.0 {
        angle - 360.0
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_angle_wraps_once_then_clamps() {
        assert_eq!(clamp_angle(400.0, -70.0, 30.0), 30.0);
        assert_eq!(clamp_angle(-400.0, -70.0, 30.0), -40.0);
        assert_eq!(clamp_angle(370.0, -360.0, 360.0), 10.0);
        assert_eq!(clamp_angle(800.0, -360.0, 360.0), 360.0);
        assert_eq!(clamp_angle(-20.0, -70.0, 30.0), -20.0);
    }

    #[test]
    fn test_clamp_angle_result_in_range() {
        for i in -2000..2000 {
            let a = i as f32 * 0.7;
            let r = clamp_angle(a, -70.0, 30.0);
            assert!((-70.0..=30.0).contains(&r), "{a} -> {r}");
        }
    }

    #[test]
    fn test_lerp_angle_takes_shortest_arc() {
        let r = lerp_angle(350.0, 10.0, 0.5);
        assert!((r - 360.0).abs() < 1e-4);

        let r = lerp_angle(10.0, 350.0, 1.0);
        assert!((r + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_lerp_angle_clamps_t() {
        assert!((lerp_angle(0.0, 90.0, 5.0) - 90.0).abs() < 1e-4);
        assert_eq!(lerp_angle(0.0, 90.0, -1.0), 0.0);
    }

    #[test]
    fn test_signed_angle() {
        assert_eq!(signed_angle(350.0), -10.0);
        assert_eq!(signed_angle(20.0), 20.0);
        assert_eq!(signed_angle(180.0), 180.0);
    }
}
