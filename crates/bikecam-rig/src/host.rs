//! Interfaces the host engine provides to the rig
//!
//! Every getter returns `Option`: handles go stale whenever the host reloads a
//! scene, and the rig treats a missing value as "not ready yet".

use bikecam_capture::FrameImage;
use bikecam_core::{euler_from_quat, quat_from_euler, Quat, Transform, Vec3};

/// Opaque handle to a scene object resolved by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub u64);

/// Depth-of-field post effect overrides. `None` hands control back to the game.
pub trait DepthOfField {
    fn set_focus_distance_override(&mut self, distance: Option<f32>);
    fn set_focal_length_override(&mut self, focal_length: Option<f32>);
}

/// Scene graph, camera and time controls of the host engine
pub trait SceneHost {
    /// Look up a scene object by name
    fn find_object(&self, name: &str) -> Option<ObjectHandle>;

    fn position(&self, object: ObjectHandle) -> Option<Vec3>;
    fn set_position(&mut self, object: ObjectHandle, position: Vec3);

    /// World euler angles in degrees
    fn euler_angles(&self, object: ObjectHandle) -> Option<Vec3>;
    fn set_euler_angles(&mut self, object: ObjectHandle, euler: Vec3);

    /// Euler angles relative to the parent, in degrees
    fn local_euler_angles(&self, object: ObjectHandle) -> Option<Vec3>;
    fn set_local_euler_angles(&mut self, object: ObjectHandle, euler: Vec3);

    /// World transform
    fn transform(&self, object: ObjectHandle) -> Option<Transform> {
        let position = self.position(object)?;
        let euler = self.euler_angles(object)?;
        Some(Transform::from_position_rotation(position, quat_from_euler(euler)))
    }

    /// Set the world rotation
    fn set_rotation(&mut self, object: ObjectHandle, rotation: Quat) {
        self.set_euler_angles(object, euler_from_quat(rotation));
    }

    fn field_of_view(&self, camera: ObjectHandle) -> Option<f32>;
    fn set_field_of_view(&mut self, camera: ObjectHandle, fov: f32);
    fn set_near_clip_plane(&mut self, camera: ObjectHandle, near: f32);

    /// Hand camera control to the game (`true`) or take it away (`false`)
    fn set_default_camera_enabled(&mut self, enabled: bool);

    fn time_scale(&self) -> f32;
    fn set_time_scale(&mut self, scale: f32);

    /// Show or hide the game's own HUD
    fn set_hud_visible(&mut self, visible: bool);

    /// Depth-of-field effect, when the current scene has one
    fn depth_of_field(&mut self) -> Option<&mut dyn DepthOfField>;

    /// Read back the last rendered frame for a screenshot
    fn grab_frame(&mut self) -> Option<FrameImage> {
        None
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashMap;

    use super::*;

    #[derive(Debug, Clone)]
    pub struct MockObject {
        pub name: String,
        pub position: Vec3,
        pub euler: Vec3,
        pub local_euler: Vec3,
    }

    #[derive(Debug, Default)]
    pub struct MockDof {
        pub focus_distance: Option<f32>,
        pub focal_length: Option<f32>,
    }

    impl DepthOfField for MockDof {
        fn set_focus_distance_override(&mut self, distance: Option<f32>) {
            self.focus_distance = distance;
        }

        fn set_focal_length_override(&mut self, focal_length: Option<f32>) {
            self.focal_length = focal_length;
        }
    }

    /// In-memory scene. Objects are unparented, so local and world eulers match.
    #[derive(Debug)]
    pub struct MockHost {
        pub objects: Vec<Option<MockObject>>,
        pub fov: HashMap<ObjectHandle, f32>,
        pub near: HashMap<ObjectHandle, f32>,
        pub default_camera_enabled: bool,
        pub time_scale: f32,
        pub hud_visible: bool,
        pub dof: MockDof,
        pub frame: Option<FrameImage>,
    }

    impl MockHost {
        pub fn empty() -> Self {
            Self {
                objects: Vec::new(),
                fov: HashMap::new(),
                near: HashMap::new(),
                default_camera_enabled: true,
                time_scale: 1.0,
                hud_visible: true,
                dof: MockDof::default(),
                frame: None,
            }
        }

        /// Camera behind a bike standing at the origin facing +Z
        pub fn with_standard_scene() -> Self {
            let mut host = Self::empty();
            let camera = host.add("MainCamera", Vec3::new(0.0, 3.0, -5.0), Vec3::new(20.0, 0.0, 0.0));
            host.fov.insert(camera, 45.0);
            host.add("Player", Vec3::ZERO, Vec3::ZERO);
            host.add("Bike", Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO);
            host.add("Head", Vec3::new(0.0, 1.6, 0.2), Vec3::ZERO);
            host
        }

        pub fn add(&mut self, name: &str, position: Vec3, euler: Vec3) -> ObjectHandle {
            self.objects.push(Some(MockObject {
                name: name.to_string(),
                position,
                euler,
                local_euler: euler,
            }));
            ObjectHandle(self.objects.len() as u64 - 1)
        }

        /// Drop every object, as a scene reload would
        pub fn unload(&mut self) {
            for object in &mut self.objects {
                *object = None;
            }
        }

        pub fn handle(&self, name: &str) -> ObjectHandle {
            self.find_object(name).unwrap()
        }

        pub fn object(&self, name: &str) -> &MockObject {
            let handle = self.handle(name);
            self.objects[handle.0 as usize].as_ref().unwrap()
        }

        pub fn object_mut(&mut self, name: &str) -> &mut MockObject {
            let handle = self.handle(name);
            self.objects[handle.0 as usize].as_mut().unwrap()
        }

        pub fn camera_fov(&self) -> f32 {
            self.fov[&self.handle("MainCamera")]
        }

        fn get(&self, object: ObjectHandle) -> Option<&MockObject> {
            self.objects.get(object.0 as usize)?.as_ref()
        }

        fn get_mut(&mut self, object: ObjectHandle) -> Option<&mut MockObject> {
            self.objects.get_mut(object.0 as usize)?.as_mut()
        }
    }

    impl SceneHost for MockHost {
        fn find_object(&self, name: &str) -> Option<ObjectHandle> {
            self.objects
                .iter()
                .position(|o| o.as_ref().is_some_and(|o| o.name == name))
                .map(|i| ObjectHandle(i as u64))
        }

        fn position(&self, object: ObjectHandle) -> Option<Vec3> {
            self.get(object).map(|o| o.position)
        }

        fn set_position(&mut self, object: ObjectHandle, position: Vec3) {
            if let Some(o) = self.get_mut(object) {
                o.position = position;
            }
        }

        fn euler_angles(&self, object: ObjectHandle) -> Option<Vec3> {
            self.get(object).map(|o| o.euler)
        }

        fn set_euler_angles(&mut self, object: ObjectHandle, euler: Vec3) {
            if let Some(o) = self.get_mut(object) {
                o.euler = euler;
                o.local_euler = euler;
            }
        }

        fn local_euler_angles(&self, object: ObjectHandle) -> Option<Vec3> {
            self.get(object).map(|o| o.local_euler)
        }

        fn set_local_euler_angles(&mut self, object: ObjectHandle, euler: Vec3) {
            if let Some(o) = self.get_mut(object) {
                o.euler = euler;
                o.local_euler = euler;
            }
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

        fn grab_frame(&mut self) -> Option<FrameImage> {
            self.frame.clone()
        }
    }
}
