//! Pose solver
//!
//! Pure per-frame math: given last frame's pose, this frame's input and the
//! target, produce the next rotation, follow distance and camera placement.
//! The only side channel is the collision probe.

use bikecam_core::{clamp_angle, lerp, lerp_angle, quat_from_euler, wrap_angle, Quat, Vec2, Vec3};
use bikecam_physics::{CollisionProbe, LayerMask};

use super::config::ManualInputStyle;
use super::pose::CameraPose;
use crate::input::InputConfig;

/// Distance reported when the probe hits nothing
pub const NO_COLLISION_DISTANCE: f32 = 900.0;

/// Extra ray length past the wanted follow distance
pub const PROBE_MARGIN: f32 = 0.2;

/// Degrees per unit of input, per device and axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookSensitivity {
    pub mouse_h: f32,
    pub mouse_v: f32,
    pub stick_h: f32,
    pub stick_v: f32,
}

impl From<&InputConfig> for LookSensitivity {
    fn from(config: &InputConfig) -> Self {
        Self {
            mouse_h: config.mouse_sensitivity_h,
            mouse_v: config.mouse_sensitivity_v,
            stick_h: config.stick_sensitivity_h,
            stick_v: config.stick_sensitivity_v,
        }
    }
}

/// Add this frame's look input and clamp the vertical angle.
///
/// Stick vertical is inverted relative to the mouse.
pub fn accumulate_look(
    pose: &mut CameraPose,
    mouse: Vec2,
    stick: Vec2,
    sensitivity: &LookSensitivity,
    vertical_range: (f32, f32),
) {
    pose.rotation_horizontal += mouse.x * sensitivity.mouse_h + stick.x * sensitivity.stick_h;
    pose.rotation_vertical += mouse.y * sensitivity.mouse_v - stick.y * sensitivity.stick_v;
    pose.rotation_vertical = clamp_angle(pose.rotation_vertical, vertical_range.0, vertical_range.1);
}

/// Horizontal alignment inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignParams {
    pub auto_align: bool,
    pub invert_hold: bool,
    pub style: ManualInputStyle,
    pub invert_horizontal: bool,
    /// Rate per second
    pub speed: f32,
}

impl AlignParams {
    /// Auto-align XOR the invert key
    pub fn aligning(&self) -> bool {
        self.auto_align ^ self.invert_hold
    }
}

/// Next horizontal accumulator: eased toward the target heading while aligning,
/// otherwise left as the user set it. Wrapped to ±360 either way.
pub fn resolve_horizontal(current: f32, target_yaw: f32, params: &AlignParams, dt: f32) -> f32 {
    if !params.aligning() {
        return wrap_angle(current);
    }
    let goal = align_goal(target_yaw, params.style, params.invert_horizontal);
    wrap_angle(lerp_angle(current, goal, params.speed * dt))
}

/// Accumulator value that puts the camera straight behind the target
pub fn align_goal(target_yaw: f32, style: ManualInputStyle, invert_horizontal: bool) -> f32 {
    match style {
        ManualInputStyle::Free if invert_horizontal => -target_yaw,
        ManualInputStyle::Free => target_yaw,
        ManualInputStyle::Follow => 0.0,
    }
}

/// Heading that goes into the rotation for a given accumulator
pub fn heading(horizontal: f32, target_yaw: f32, params: &AlignParams) -> f32 {
    let signed = if params.invert_horizontal {
        -horizontal
    } else {
        horizontal
    };
    match params.style {
        ManualInputStyle::Free => signed,
        ManualInputStyle::Follow => target_yaw + signed,
    }
}

/// Rotation from pitch/heading/roll in degrees. Positive vertical looks up.
pub fn rotation_from(vertical: f32, heading: f32, roll: f32) -> Quat {
    quat_from_euler(Vec3::new(-vertical, heading, roll))
}

/// Direction of a zoom gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// What a zoom gesture adjusts this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRoute {
    None,
    Zoom(ZoomDirection),
    FocalLength(ZoomDirection),
    FocusDistance(ZoomDirection),
}

/// Route a zoom edge. Focal-length hold beats focus-distance hold beats plain zoom.
pub fn route_scroll(zoom_in: bool, zoom_out: bool, focal_hold: bool, focus_hold: bool) -> ScrollRoute {
    let direction = match (zoom_in, zoom_out) {
        (true, false) => ZoomDirection::In,
        (false, true) => ZoomDirection::Out,
        _ => return ScrollRoute::None,
    };
    if focal_hold {
        ScrollRoute::FocalLength(direction)
    } else if focus_hold {
        ScrollRoute::FocusDistance(direction)
    } else {
        ScrollRoute::Zoom(direction)
    }
}

/// Apply one zoom step, never going below zero
pub fn step_zoom(zoom_wanted: f32, direction: ZoomDirection, step: f32) -> f32 {
    let next = match direction {
        ZoomDirection::In => zoom_wanted - step,
        ZoomDirection::Out => zoom_wanted + step,
    };
    next.max(0.0)
}

/// Distance from `target` to the nearest obstruction along `back`, or
/// [`NO_COLLISION_DISTANCE`].
pub fn probe_distance(
    probe: &dyn CollisionProbe,
    target: Vec3,
    back: Vec3,
    zoom_wanted: f32,
    mask: LayerMask,
) -> f32 {
    match probe.cast(target, back, zoom_wanted + PROBE_MARGIN, mask) {
        Some(hit) => hit.point.distance(target),
        None => NO_COLLISION_DISTANCE,
    }
}

/// Collision smoothing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionParams {
    pub padding: f32,
    /// Fraction per frame, not time-scaled
    pub lerp_in: f32,
    /// Rate per second
    pub lerp_out: f32,
    pub mask: LayerMask,
}

/// Next applied distance. Obstructions win over the wanted distance and are
/// approached with the fast, frame-based rate.
pub fn settle_zoom(
    zoom_applied: f32,
    zoom_wanted: f32,
    projected: f32,
    params: &CollisionParams,
    dt: f32,
) -> f32 {
    let next = if projected < zoom_wanted {
        lerp(zoom_applied, projected - params.padding, params.lerp_in)
    } else {
        lerp(zoom_applied, zoom_wanted, params.lerp_out * dt)
    };
    next.max(0.0)
}

/// Camera placement for a rotation and distance around `target`
pub fn camera_position(rotation: Quat, zoom_applied: f32, target: Vec3) -> Vec3 {
    rotation * Vec3::new(0.0, 0.0, -zoom_applied) + target
}

/// Everything the bike-mode solve needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct BikeFrame {
    pub mouse: Vec2,
    pub stick: Vec2,
    pub sensitivity: LookSensitivity,
    pub vertical_range: (f32, f32),
    /// Point the camera orbits, offset already applied
    pub target_point: Vec3,
    /// Target heading in degrees
    pub target_yaw: f32,
    pub align: AlignParams,
    pub zoom: Option<ZoomDirection>,
    pub zoom_step: f32,
    /// Camera rotation written last frame
    pub previous_rotation: Quat,
    pub collision: CollisionParams,
    pub dt: f32,
}

/// Result of a bike-mode solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BikeSolution {
    pub pose: CameraPose,
    pub rotation: Quat,
    pub position: Vec3,
    pub projected_distance: f32,
}

/// One frame of the chase/first-person camera
pub fn solve_bike(pose: CameraPose, frame: &BikeFrame, probe: &dyn CollisionProbe) -> BikeSolution {
    let mut pose = pose;

    accumulate_look(&mut pose, frame.mouse, frame.stick, &frame.sensitivity, frame.vertical_range);
    pose.rotation_horizontal =
        resolve_horizontal(pose.rotation_horizontal, frame.target_yaw, &frame.align, frame.dt);

    let rotation = rotation_from(
        pose.rotation_vertical,
        heading(pose.rotation_horizontal, frame.target_yaw, &frame.align),
        0.0,
    );

    if let Some(direction) = frame.zoom {
        pose.zoom_wanted = step_zoom(pose.zoom_wanted, direction, frame.zoom_step);
    }
    pose.zoom_wanted = pose.zoom_wanted.max(0.0);

    let back = frame.previous_rotation * Vec3::NEG_Z;
    let projected = probe_distance(probe, frame.target_point, back, pose.zoom_wanted, frame.collision.mask);
    pose.zoom_applied = settle_zoom(pose.zoom_applied, pose.zoom_wanted, projected, &frame.collision, frame.dt);

    BikeSolution {
        pose,
        rotation,
        position: camera_position(rotation, pose.zoom_applied, frame.target_point),
        projected_distance: projected,
    }
}

/// Everything the photo-mode solve needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct PhotoFrame {
    pub mouse: Vec2,
    pub stick: Vec2,
    pub sensitivity: LookSensitivity,
    pub vertical_range: (f32, f32),
    /// Camera-local fly input: x right, y world up, z forward
    pub fly: Vec3,
    pub sprint: bool,
    pub speed: f32,
    pub sprint_multiplier: f32,
    /// -1..1 from the roll keys
    pub roll_axis: f32,
    pub roll_speed: f32,
    /// D-pad horizontal deflection
    pub dpad_x: f32,
    pub dpad_roll_rate: f32,
    /// Unscaled frame time; game time is frozen in photo mode
    pub dt: f32,
}

/// Result of a photo-mode solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoSolution {
    pub pose: CameraPose,
    pub rotation: Quat,
    pub position: Vec3,
}

/// One frame of the free-fly photo camera
pub fn solve_photo(pose: CameraPose, position: Vec3, frame: &PhotoFrame) -> PhotoSolution {
    let mut pose = pose;

    accumulate_look(&mut pose, frame.mouse, frame.stick, &frame.sensitivity, frame.vertical_range);
    pose.rotation_horizontal = wrap_angle(pose.rotation_horizontal);
    pose.rotation_roll += (frame.roll_axis * frame.roll_speed + frame.dpad_x * frame.dpad_roll_rate) * frame.dt;
    pose.rotation_roll = wrap_angle(pose.rotation_roll);

    let rotation = rotation_from(pose.rotation_vertical, pose.rotation_horizontal, pose.rotation_roll);

    let direction = rotation * Vec3::X * frame.fly.x + Vec3::Y * frame.fly.y + rotation * Vec3::Z * frame.fly.z;
    let speed = if frame.sprint {
        frame.speed * frame.sprint_multiplier
    } else {
        frame.speed
    };

    PhotoSolution {
        pose,
        rotation,
        position: position + direction * speed * frame.dt,
    }
}
