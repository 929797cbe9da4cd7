//! Headless sandbox
//!
//! A tiny scene standing in for the game: a bike riding in circles on a
//! ground plane with a few walls, a camera object and scripted input.

use std::collections::HashMap;

use bikecam_capture::FrameImage;
use bikecam_core::{quat_from_euler, Vec2, Vec3};
use bikecam_physics::{LayerMask, PhysicsWorld};
use bikecam_rig::{DepthOfField, GamepadState, ObjectHandle, RawInput, SceneHost};
use tracing::trace;
use winit::keyboard::KeyCode;

/// Depth-of-field overrides as last set by the rig
#[derive(Debug, Default)]
pub struct SandboxDof {
    pub focus_distance: Option<f32>,
    pub focal_length: Option<f32>,
}

impl DepthOfField for SandboxDof {
    fn set_focus_distance_override(&mut self, distance: Option<f32>) {
        trace!("DoF focus distance override: {:?}", distance);
        self.focus_distance = distance;
    }

    fn set_focal_length_override(&mut self, focal_length: Option<f32>) {
        trace!("DoF focal length override: {:?}", focal_length);
        self.focal_length = focal_length;
    }
}

#[derive(Debug, Clone)]
struct SandboxObject {
    name: String,
    position: Vec3,
    euler: Vec3,
}

/// In-memory scene graph the rig talks to
#[derive(Debug)]
pub struct SandboxHost {
    objects: HashMap<ObjectHandle, SandboxObject>,
    next_handle: u64,
    fov: HashMap<ObjectHandle, f32>,
    near: HashMap<ObjectHandle, f32>,
    pub default_camera_enabled: bool,
    pub time_scale: f32,
    pub hud_visible: bool,
    pub dof: SandboxDof,
}

impl SandboxHost {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            next_handle: 1,
            fov: HashMap::new(),
            near: HashMap::new(),
            default_camera_enabled: true,
            time_scale: 1.0,
            hud_visible: true,
            dof: SandboxDof::default(),
        }
    }

    pub fn spawn(&mut self, name: &str, position: Vec3, euler: Vec3) -> ObjectHandle {
        let handle = ObjectHandle(self.next_handle);
        self.next_handle += 1;
        self.objects.insert(
            handle,
            SandboxObject {
                name: name.to_string(),
                position,
                euler,
            },
        );
        handle
    }

    /// Drop every object, as a level load would
    pub fn clear(&mut self) {
        self.objects.clear();
        self.fov.clear();
        self.near.clear();
    }

    fn set_pose(&mut self, name: &str, position: Vec3, euler: Vec3) {
        if let Some(object) = self.objects.values_mut().find(|o| o.name == name) {
            object.position = position;
            object.euler = euler;
        }
    }
}

impl Default for SandboxHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHost for SandboxHost {
    fn find_object(&self, name: &str) -> Option<ObjectHandle> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(handle, _)| *handle)
    }

    fn position(&self, object: ObjectHandle) -> Option<Vec3> {
        self.objects.get(&object).map(|o| o.position)
    }

    fn set_position(&mut self, object: ObjectHandle, position: Vec3) {
        if let Some(o) = self.objects.get_mut(&object) {
            o.position = position;
        }
    }

    fn euler_angles(&self, object: ObjectHandle) -> Option<Vec3> {
        self.objects.get(&object).map(|o| o.euler)
    }

    fn set_euler_angles(&mut self, object: ObjectHandle, euler: Vec3) {
        if let Some(o) = self.objects.get_mut(&object) {
            o.euler = euler;
        }
    }

    // Nothing is parented in the sandbox
    fn local_euler_angles(&self, object: ObjectHandle) -> Option<Vec3> {
        self.euler_angles(object)
    }

    fn set_local_euler_angles(&mut self, object: ObjectHandle, euler: Vec3) {
        self.set_euler_angles(object, euler);
    }

    fn field_of_view(&self, camera: ObjectHandle) -> Option<f32> {
        self.fov.get(&camera).copied()
    }

    fn set_field_of_view(&mut self, camera: ObjectHandle, fov: f32) {
        self.fov.insert(camera, fov);
    }

    fn set_near_clip_plane(&mut self, camera: ObjectHandle, near: f32) {
        self.near.insert(camera, near);
    }

    fn set_default_camera_enabled(&mut self, enabled: bool) {
        self.default_camera_enabled = enabled;
    }

    fn time_scale(&self) -> f32 {
        self.time_scale
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    fn set_hud_visible(&mut self, visible: bool) {
        self.hud_visible = visible;
    }

    fn depth_of_field(&mut self) -> Option<&mut dyn DepthOfField> {
        Some(&mut self.dof)
    }

    // No renderer; hand out a sky-colored frame
    fn grab_frame(&mut self) -> Option<FrameImage> {
        Some(FrameImage::solid(320, 180, [135, 180, 235, 255]))
    }
}

/// Radius of the bike's circuit in meters
const TRACK_RADIUS: f32 = 20.0;
/// Bike speed in meters per second
const BIKE_SPEED: f32 = 8.0;

/// Sandbox scene: host objects plus matching collision geometry
pub struct Sandbox {
    pub host: SandboxHost,
    pub physics: PhysicsWorld,
    /// Distance travelled along the circuit
    travelled: f32,
}

impl Sandbox {
    /// Build the scene with the object names the default settings expect
    pub fn new() -> Self {
        let mut host = SandboxHost::new();
        let camera = host.spawn("MainCamera", Vec3::new(0.0, 3.0, -5.0), Vec3::new(15.0, 0.0, 0.0));
        host.set_field_of_view(camera, 50.0);
        host.spawn("Player", Vec3::ZERO, Vec3::ZERO);
        host.spawn("Bike", Vec3::ZERO, Vec3::ZERO);
        host.spawn("Head", Vec3::ZERO, Vec3::ZERO);

        let mut physics = PhysicsWorld::new();
        physics.create_ground(0.0);
        for i in 0..8 {
            let angle = i as f32 * std::f32::consts::TAU / 8.0;
            let center = Vec3::new(angle.sin(), 0.0, angle.cos()) * (TRACK_RADIUS + 3.0) + Vec3::Y * 2.0;
            physics.create_static_box(Vec3::new(1.5, 2.0, 1.5), center, LayerMask::PROPS);
        }
        physics.refresh_queries();

        let mut sandbox = Self {
            host,
            physics,
            travelled: 0.0,
        };
        sandbox.advance(0.0);
        sandbox
    }

    /// Move the bike along the circuit by `dt` seconds of game time
    pub fn advance(&mut self, dt: f32) {
        self.travelled += BIKE_SPEED * dt * self.host.time_scale;
        let angle = self.travelled / TRACK_RADIUS;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * TRACK_RADIUS;
        // tangent of a counter-clockwise circle, as an engine heading
        let heading = (-angle.to_degrees()).rem_euclid(360.0);
        let euler = Vec3::new(0.0, heading, 0.0);
        let rotation = quat_from_euler(euler);

        self.host.set_pose("Player", position, euler);
        self.host.set_pose("Bike", position + Vec3::Y * 0.5, euler);
        self.host
            .set_pose("Head", position + rotation * Vec3::new(0.0, 1.6, 0.2), euler);
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Scripted raw input for frame `frame` of the demo run
pub fn scripted_input(frame: u32) -> RawInput {
    let mut raw = RawInput::default();
    match frame {
        // look around with the mouse, then let auto-align settle
        30..=60 => raw.mouse_delta = Vec2::new(6.0, -1.0),
        90 => raw.scroll = -1.0,
        120 => {
            raw.keys.insert(KeyCode::F7);
        }
        180 => {
            raw.keys.insert(KeyCode::KeyC);
        }
        240 => {
            raw.keys.insert(KeyCode::KeyC);
        }
        300 => {
            raw.keys.insert(KeyCode::KeyP);
        }
        // fly forward and up with a controller, rolling with the d-pad
        301..=360 => {
            raw.keys.insert(KeyCode::KeyW);
            raw.gamepads[0] = GamepadState {
                right_trigger: 0.6,
                dpad: Vec2::new(1.0, 0.0),
                ..Default::default()
            };
        }
        420 => {
            raw.keys.insert(KeyCode::KeyP);
        }
        _ => {}
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bike_follows_circuit() {
        let mut sandbox = Sandbox::new();
        let bike = sandbox.host.find_object("Bike").unwrap();
        let start = sandbox.host.position(bike).unwrap();
        assert!((start - Vec3::new(TRACK_RADIUS, 0.5, 0.0)).length() < 1e-4);

        sandbox.advance(1.0);
        let moved = sandbox.host.position(bike).unwrap();
        assert!((moved.length() - Vec3::new(TRACK_RADIUS, 0.5, 0.0).length()).abs() < 1e-3);
        assert!(moved.z > 0.0);
    }

    #[test]
    fn test_frozen_time_stops_bike() {
        let mut sandbox = Sandbox::new();
        sandbox.host.set_time_scale(0.0);
        let bike = sandbox.host.find_object("Bike").unwrap();
        let before = sandbox.host.position(bike);
        sandbox.advance(1.0);
        assert_eq!(sandbox.host.position(bike), before);
    }

    #[test]
    fn test_cleared_scene_has_no_objects() {
        let mut sandbox = Sandbox::new();
        sandbox.host.clear();
        assert!(sandbox.host.find_object("MainCamera").is_none());
    }
}
