//! Camera rig
//!
//! Owns every piece of mutable camera state and is driven by exactly one
//! [`CameraRig::update`] call per rendered frame. Scene handles are re-resolved
//! whenever they go stale; until they resolve, every operation is a no-op.

use bikecam_capture::{CaptureConfig, ScreenshotResult, Screenshotter};
use bikecam_core::{clamp_angle, signed_angle, FrameTime, Quat, Vec3};
use bikecam_physics::CollisionProbe;
use chrono::Local;
use tracing::{debug, info, warn};

use super::campos::CamPos;
use super::config::{AlignmentMode, CameraConfig, PhotoModeConfig, ViewTable};
use super::focus::{FocusAdjustMode, FocusState, FovState};
use super::mode::{CameraModeState, ModeStateMachine, ModeTransition, OperatingMode, ViewKind};
use super::pose::CameraPose;
use super::solver::{
    self, AlignParams, BikeFrame, CollisionParams, LookSensitivity, PhotoFrame, ScrollRoute, ZoomDirection,
};
use crate::error::RigError;
use crate::host::{ObjectHandle, SceneHost};
use crate::hud::HudSnapshot;
use crate::input::{InputAction, InputConfig, InputFrame};

/// Everything the rig is configured with
#[derive(Debug, Clone, Default)]
pub struct RigConfig {
    pub camera: CameraConfig,
    pub photo: PhotoModeConfig,
    pub input: InputConfig,
    pub capture: CaptureConfig,
}

/// Scene objects the rig works with, resolved by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandles {
    pub camera: ObjectHandle,
    /// Vehicle root; its heading drives alignment
    pub player: ObjectHandle,
    /// Follow target of the current view
    pub target: ObjectHandle,
}

/// Ignores repeated triggers for a while, counted in unscaled time
#[derive(Debug, Clone, Copy, Default)]
struct ToggleGuard {
    remaining: f32,
}

impl ToggleGuard {
    fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    fn try_fire(&mut self, cooldown: f32) -> bool {
        if self.remaining > 0.0 {
            return false;
        }
        self.remaining = cooldown;
        true
    }
}

/// Result of processing mode-related input
#[derive(Debug, Clone, Copy, Default)]
struct FrameIntent {
    /// Photo mode was entered or left; skip the solve this frame
    photo_transition: bool,
    /// Zoom gesture left for the bike solver
    zoom: Option<ZoomDirection>,
}

/// Camera orchestrator: mode machine, solvers, snapshots and shutter
pub struct CameraRig {
    config: RigConfig,
    views: ViewTable,
    look: LookSensitivity,
    modes: ModeStateMachine,
    pose: CameraPose,
    fov: FovState,
    focus: FocusState,
    auto_align: bool,
    handles: Option<SceneHandles>,
    /// Inside a streak of failed acquisitions
    waiting_for_scene: bool,
    initialized: bool,
    /// Camera state before photo mode
    bike_cam_pos: Option<CamPos>,
    /// Camera state at the last shutter press
    shutter_cam_pos: Option<CamPos>,
    screenshot: Option<ScreenshotResult>,
    screenshotter: Screenshotter,
    photo_guard: ToggleGuard,
    saved_time_scale: Option<f32>,
    game_hud_hidden: bool,
    overlay_hidden: bool,
    dof_distance: Option<f32>,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(RigConfig::default())
    }
}

impl CameraRig {
    pub fn new(config: RigConfig) -> Self {
        let views = ViewTable::from_config(&config.camera);
        Self {
            look: LookSensitivity::from(&config.input),
            modes: ModeStateMachine::new(config.camera.start_view),
            pose: CameraPose::default(),
            fov: FovState::new(&views),
            focus: FocusState::new(config.photo.base_focal_length),
            auto_align: config.camera.alignment == AlignmentMode::Auto,
            handles: None,
            waiting_for_scene: false,
            initialized: false,
            bike_cam_pos: None,
            shutter_cam_pos: None,
            screenshot: None,
            screenshotter: Screenshotter::new(config.capture.clone()),
            photo_guard: ToggleGuard::default(),
            saved_time_scale: None,
            game_hud_hidden: false,
            overlay_hidden: false,
            dof_distance: None,
            views,
            config,
        }
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn state(&self) -> CameraModeState {
        self.modes.state()
    }

    pub fn view(&self) -> ViewKind {
        self.modes.view()
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn auto_align(&self) -> bool {
        self.auto_align
    }

    pub fn field_of_view(&self, view: ViewKind) -> f32 {
        self.fov.get(view)
    }

    pub fn last_screenshot(&self) -> Option<&ScreenshotResult> {
        self.screenshot.as_ref()
    }

    /// Scene objects resolved and the first view applied
    pub fn is_ready(&self) -> bool {
        self.initialized && self.handles.is_some()
    }

    /// Run one frame
    pub fn update(
        &mut self,
        host: &mut dyn SceneHost,
        probe: &dyn CollisionProbe,
        input: &InputFrame,
        time: &FrameTime,
    ) {
        self.photo_guard.tick(time.unscaled_delta_time);

        let Some(handles) = self.try_acquire_handles(host) else {
            return;
        };
        if !self.initialized {
            self.initialize(host, handles);
        }

        let intent = self.handle_mode_input(host, handles, input);

        // view selection may have retargeted
        let Some(handles) = self.handles else {
            return;
        };

        if !intent.photo_transition {
            match self.modes.operating() {
                OperatingMode::PhotoCam => self.update_photo(host, handles, input, time),
                OperatingMode::BikeCam if self.modes.view().is_alternative() => {
                    self.update_bike(host, probe, handles, intent.zoom, input, time)
                }
                OperatingMode::BikeCam => {}
            }
        }

        if self.modes.in_photo_mode() {
            self.update_shutter(host, handles, input);
        }
    }

    /// Switch views. No-op in photo mode or while the view's objects are missing.
    pub fn select_view(&mut self, host: &mut dyn SceneHost, view: ViewKind) {
        if self.modes.in_photo_mode() {
            return;
        }
        let handles = match self.resolve_handles(host, view) {
            Ok(handles) => handles,
            Err(e) => {
                debug!("Cannot select {} view yet: {}", view.name(), e);
                return;
            }
        };
        let transition = self.modes.select_view(view);
        self.apply_transition(host, handles, transition);
    }

    /// Original view <-> last alternative view
    pub fn toggle_cam_state(&mut self, host: &mut dyn SceneHost) {
        if self.modes.in_photo_mode() {
            return;
        }
        let next = if self.modes.view().is_alternative() {
            ViewKind::Original
        } else {
            self.modes.last_alternative()
        };
        let Ok(handles) = self.resolve_handles(host, next) else {
            return;
        };
        let transition = self.modes.toggle_cam_state();
        self.apply_transition(host, handles, transition);
    }

    /// The game opened a menu
    pub fn on_menu_open(&mut self, host: &mut dyn SceneHost) {
        let Ok(handles) = self.resolve_handles(host, ViewKind::Original) else {
            return;
        };
        let transition = self.modes.on_menu_open(self.config.camera.force_original_on_menu);
        self.apply_transition(host, handles, transition);
    }

    /// The game closed its menu
    pub fn on_menu_close(&mut self, host: &mut dyn SceneHost) {
        let Some(view) = self.modes.view_before_menu() else {
            return;
        };
        let Ok(handles) = self.resolve_handles(host, view) else {
            return;
        };
        let transition = self.modes.on_menu_close();
        self.apply_transition(host, handles, transition);
    }

    /// The host is loading another scene. Leaves photo mode without restoring
    /// the old scene's camera and drops all handles.
    pub fn on_scene_reloaded(&mut self, host: &mut dyn SceneHost) {
        if self.modes.exit_photo() == ModeTransition::ExitPhoto {
            self.bike_cam_pos = None;
            self.release_photo_effects(host);
            info!("Photo mode closed by scene reload");
        }
        self.handles = None;
    }

    pub fn hud_snapshot(&self) -> HudSnapshot {
        let photo = self.modes.in_photo_mode();
        HudSnapshot {
            ready: self.is_ready(),
            view: self.modes.view(),
            operating: self.modes.operating(),
            auto_align: self.auto_align,
            field_of_view: self.fov.get(self.modes.view()),
            depth_of_field_distance: self.dof_distance,
            focal_length: photo.then_some(self.focus.focal_length),
            focus_adjust_mode: self.focus.mode,
            screenshot: self.screenshot.clone(),
            overlay_visible: !self.overlay_hidden,
        }
    }

    fn resolve_handles(&self, host: &dyn SceneHost, view: ViewKind) -> Result<SceneHandles, RigError> {
        let find = |name: &str| {
            host.find_object(name)
                .ok_or_else(|| RigError::MissingObject(name.to_string()))
        };
        Ok(SceneHandles {
            camera: find(&self.config.camera.camera_object)?,
            player: find(&self.config.camera.player_object)?,
            target: find(&self.views.get(view).follow_target)?,
        })
    }

    fn check_handles(&self, host: &dyn SceneHost, handles: SceneHandles) -> Result<(), RigError> {
        let names = [
            (handles.camera, &self.config.camera.camera_object),
            (handles.player, &self.config.camera.player_object),
            (handles.target, &self.views.get(self.modes.view()).follow_target),
        ];
        for (handle, name) in names {
            if host.position(handle).is_none() {
                return Err(RigError::StaleHandle(name.clone()));
            }
        }
        Ok(())
    }

    /// Keep the current handles if they still work, otherwise resolve them again.
    fn try_acquire_handles(&mut self, host: &mut dyn SceneHost) -> Option<SceneHandles> {
        if let Some(handles) = self.handles {
            match self.check_handles(host, handles) {
                Ok(()) => return Some(handles),
                Err(e) => {
                    debug!("{}", e);
                    self.handles = None;
                }
            }
        }

        match self.resolve_handles(host, self.modes.view()) {
            Ok(handles) => {
                self.handles = Some(handles);
                if self.waiting_for_scene {
                    info!("Scene objects found, camera rig active");
                    self.waiting_for_scene = false;
                }
                if self.initialized && !self.modes.in_photo_mode() {
                    let view = self.modes.view();
                    self.apply_view(host, handles, view, view);
                }
                Some(handles)
            }
            Err(e) => {
                if !self.waiting_for_scene {
                    debug!("Camera rig waiting for scene: {}", e);
                    self.waiting_for_scene = true;
                }
                None
            }
        }
    }

    fn initialize(&mut self, host: &mut dyn SceneHost, handles: SceneHandles) {
        let euler = host.euler_angles(handles.camera).unwrap_or(Vec3::ZERO);
        let initial = self.config.camera.initial_vertical_rotation;
        // zero means "keep whatever pitch the game camera has"
        self.pose.rotation_vertical = if initial != 0.0 {
            initial
        } else {
            -signed_angle(euler.x)
        };
        self.pose.rotation_horizontal = euler.y;
        self.initialized = true;

        let start = self.config.camera.start_view;
        info!("Camera rig ready, starting in {} view", start.name());
        self.select_view(host, start);
    }

    fn apply_transition(&mut self, host: &mut dyn SceneHost, handles: SceneHandles, transition: ModeTransition) {
        match transition {
            ModeTransition::View { from, to } => {
                self.handles = Some(handles);
                self.apply_view(host, handles, from, to);
            }
            ModeTransition::EnterPhoto => self.enter_photo(host, handles),
            ModeTransition::ExitPhoto => self.exit_photo(host, handles),
            ModeTransition::None => {}
        }
    }

    /// Apply `to`'s preset to the camera
    fn apply_view(&mut self, host: &mut dyn SceneHost, handles: SceneHandles, from: ViewKind, to: ViewKind) {
        let preset = self.views.get(to);
        let follow_distance = preset.follow_distance;
        let near_clip = preset.near_clip;
        let (vertical_min, vertical_max) = self.views.vertical_range(to);

        host.set_field_of_view(handles.camera, self.fov.get(to));
        host.set_near_clip_plane(handles.camera, near_clip);

        if to.is_alternative() {
            host.set_default_camera_enabled(false);
            self.pose.snap_zoom(follow_distance);
            let camera = &self.config.camera;
            self.pose.rotation_horizontal = solver::align_goal(
                self.target_yaw(host, handles),
                camera.manual_style,
                camera.invert_horizontal,
            );
            self.pose.rotation_vertical = clamp_angle(self.pose.rotation_vertical, vertical_min, vertical_max);
        } else {
            host.set_default_camera_enabled(true);
            self.pose.snap_zoom(0.0);
        }

        if from == to {
            debug!("Re-applied {} view", to.name());
        } else {
            info!("Camera view: {} -> {}", from.name(), to.name());
        }
    }

    fn target_yaw(&self, host: &dyn SceneHost, handles: SceneHandles) -> f32 {
        host.local_euler_angles(handles.player).map_or(0.0, |euler| euler.y)
    }

    fn handle_mode_input(&mut self, host: &mut dyn SceneHost, handles: SceneHandles, input: &InputFrame) -> FrameIntent {
        let mut intent = FrameIntent::default();

        if input.is_just_pressed(InputAction::TogglePhotoMode) {
            if self.photo_guard.try_fire(self.config.camera.mode_toggle_cooldown) {
                let transition = self.modes.toggle_photo();
                self.apply_transition(host, handles, transition);
                intent.photo_transition = true;
                return intent;
            }
            debug!("Photo mode toggle ignored while cooling down");
        }

        let photo = self.modes.in_photo_mode();
        if photo {
            if input.is_just_pressed(InputAction::ToggleHud) {
                self.overlay_hidden = !self.overlay_hidden;
            }
            if input.is_just_pressed(InputAction::ToggleFocusMode) {
                let mode = self.focus.toggle_mode();
                info!("Focus keys adjust: {}", mode.name());
            }
            if input.is_just_pressed(InputAction::ResetRoll) {
                self.pose.rotation_roll = 0.0;
            }
        } else {
            if input.is_just_pressed(InputAction::ToggleCamState) {
                self.toggle_cam_state(host);
            }
            if input.is_just_pressed(InputAction::SelectThirdPerson) {
                self.select_view(host, ViewKind::ThirdPerson);
            }
            if input.is_just_pressed(InputAction::SelectFirstPerson) {
                self.select_view(host, ViewKind::FirstPerson);
            }
            if input.is_just_pressed(InputAction::ToggleAutoAlign) {
                self.auto_align = !self.auto_align;
                info!("Auto-align {}", if self.auto_align { "on" } else { "off" });
            }
        }

        let Some(handles) = self.handles else {
            return intent;
        };

        let mut fov_steps = 0.0;
        if input.is_just_pressed(InputAction::FovIncrease) {
            fov_steps += 1.0;
        }
        if input.is_just_pressed(InputAction::FovDecrease) {
            fov_steps -= 1.0;
        }
        if fov_steps != 0.0 {
            if photo && self.focus.mode == FocusAdjustMode::DepthOfField {
                self.focus.adjust_focus_distance(fov_steps * self.config.photo.focus_distance_step);
            } else {
                let fov_step = if photo {
                    self.config.photo.fov_step
                } else {
                    self.config.camera.fov_step
                };
                self.adjust_fov(host, handles, fov_steps * fov_step);
            }
        }

        let route = solver::route_scroll(
            input.is_just_pressed(InputAction::ZoomIn),
            input.is_just_pressed(InputAction::ZoomOut),
            input.is_held(InputAction::FocalLengthHold),
            input.is_held(InputAction::FocusDistanceHold),
        );
        let photo_config = &self.config.photo;
        match route {
            ScrollRoute::None => {}
            ScrollRoute::FocalLength(direction) => {
                let step = match direction {
                    ZoomDirection::In => photo_config.focal_length_step,
                    ZoomDirection::Out => -photo_config.focal_length_step,
                };
                let (min, max) = (photo_config.focal_length_min, photo_config.focal_length_max);
                self.focus.adjust_focal_length(step, min, max);
            }
            ScrollRoute::FocusDistance(direction) => {
                let step = match direction {
                    ZoomDirection::In => -photo_config.focus_distance_step,
                    ZoomDirection::Out => photo_config.focus_distance_step,
                };
                self.focus.adjust_focus_distance(step);
            }
            ScrollRoute::Zoom(direction) if photo => {
                let step = match direction {
                    ZoomDirection::In => -photo_config.fov_step,
                    ZoomDirection::Out => photo_config.fov_step,
                };
                self.adjust_fov(host, handles, step);
            }
            ScrollRoute::Zoom(direction) => intent.zoom = Some(direction),
        }

        intent
    }

    fn adjust_fov(&mut self, host: &mut dyn SceneHost, handles: SceneHandles, delta: f32) {
        let fov = self.fov.adjust(self.modes.view(), delta);
        host.set_field_of_view(handles.camera, fov);
    }

    fn align_params(&self, input: &InputFrame) -> AlignParams {
        let camera = &self.config.camera;
        AlignParams {
            auto_align: self.auto_align,
            invert_hold: input.is_held(InputAction::AlignInvertHold),
            style: camera.manual_style,
            invert_horizontal: camera.invert_horizontal,
            speed: camera.align_speed,
        }
    }

    fn update_bike(
        &mut self,
        host: &mut dyn SceneHost,
        probe: &dyn CollisionProbe,
        handles: SceneHandles,
        zoom: Option<ZoomDirection>,
        input: &InputFrame,
        time: &FrameTime,
    ) {
        let view = self.modes.view();
        let Some(target_position) = host.position(handles.target) else {
            return;
        };
        let target_yaw = self.target_yaw(host, handles);
        let offset = Quat::from_rotation_y(target_yaw.to_radians()) * self.views.get(view).offset;
        let previous_rotation = host
            .transform(handles.camera)
            .map_or(Quat::IDENTITY, |transform| transform.rotation);

        let camera = &self.config.camera;
        let frame = BikeFrame {
            mouse: input.mouse_delta,
            stick: input.look_stick,
            sensitivity: self.look,
            vertical_range: self.views.vertical_range(view),
            target_point: target_position + offset,
            target_yaw,
            align: self.align_params(input),
            zoom,
            zoom_step: camera.zoom_step,
            previous_rotation,
            collision: CollisionParams {
                padding: camera.collision_padding,
                lerp_in: camera.zoom_lerp_in,
                lerp_out: camera.zoom_lerp_out,
                mask: camera.collision_layers,
            },
            dt: time.delta_time,
        };

        let solution = solver::solve_bike(self.pose, &frame, probe);
        self.pose = solution.pose;
        host.set_position(handles.camera, solution.position);
        host.set_rotation(handles.camera, solution.rotation);
    }

    fn update_photo(&mut self, host: &mut dyn SceneHost, handles: SceneHandles, input: &InputFrame, time: &FrameTime) {
        let Some(position) = host.position(handles.camera) else {
            return;
        };
        let fly = Vec3::new(
            input.axis(InputAction::MoveLeft, InputAction::MoveRight) + input.move_stick.x,
            input.axis(InputAction::MoveDown, InputAction::MoveUp) + input.right_trigger - input.left_trigger,
            input.axis(InputAction::MoveBackward, InputAction::MoveForward) + input.move_stick.y,
        );

        let photo = &self.config.photo;
        let frame = PhotoFrame {
            mouse: input.mouse_delta,
            stick: input.look_stick,
            sensitivity: self.look,
            vertical_range: (photo.vertical_min, photo.vertical_max),
            fly,
            sprint: input.is_held(InputAction::Sprint),
            speed: photo.fly_speed,
            sprint_multiplier: photo.sprint_multiplier,
            roll_axis: input.axis(InputAction::RollRight, InputAction::RollLeft),
            roll_speed: photo.roll_speed,
            dpad_x: input.dpad.x,
            dpad_roll_rate: photo.dpad_roll_rate,
            dt: time.unscaled_delta_time,
        };

        let solution = solver::solve_photo(self.pose, position, &frame);
        self.pose = solution.pose;
        host.set_position(handles.camera, solution.position);
        host.set_rotation(handles.camera, solution.rotation);
        self.push_depth_of_field(host, handles, solution.position);
    }

    fn push_depth_of_field(&mut self, host: &mut dyn SceneHost, handles: SceneHandles, camera: Vec3) {
        let Some(target) = host.position(handles.target) else {
            return;
        };
        let distance = self.focus.focus_distance(camera, target);
        self.dof_distance = Some(distance);
        if let Some(dof) = host.depth_of_field() {
            dof.set_focal_length_override(Some(self.focus.focal_length));
            dof.set_focus_distance_override(Some(distance));
        }
    }

    fn enter_photo(&mut self, host: &mut dyn SceneHost, handles: SceneHandles) {
        self.bike_cam_pos = CamPos::capture(host, handles.camera, &self.pose);
        host.set_default_camera_enabled(false);

        let photo = &self.config.photo;
        if photo.freeze_time {
            self.saved_time_scale = Some(host.time_scale());
            host.set_time_scale(0.0);
        }
        if photo.hide_hud {
            host.set_hud_visible(false);
            self.game_hud_hidden = true;
        }

        if let Some(euler) = host.euler_angles(handles.camera) {
            self.pose.rotation_horizontal = euler.y;
            self.pose.rotation_vertical = clamp_angle(-signed_angle(euler.x), photo.vertical_min, photo.vertical_max);
            self.pose.rotation_roll = signed_angle(euler.z);
        }
        info!("Photo mode on");
    }

    fn exit_photo(&mut self, host: &mut dyn SceneHost, handles: SceneHandles) {
        match self.bike_cam_pos.take() {
            Some(saved) => saved.restore(host, handles.camera, &mut self.pose),
            None => warn!("No camera snapshot to restore after photo mode"),
        }
        self.release_photo_effects(host);
        host.set_default_camera_enabled(!self.modes.view().is_alternative());
        info!("Photo mode off");
    }

    /// Undo everything photo mode changed outside the camera transform
    fn release_photo_effects(&mut self, host: &mut dyn SceneHost) {
        if let Some(scale) = self.saved_time_scale.take() {
            host.set_time_scale(scale);
        }
        if self.game_hud_hidden {
            host.set_hud_visible(true);
            self.game_hud_hidden = false;
        }
        if let Some(dof) = host.depth_of_field() {
            dof.set_focal_length_override(None);
            dof.set_focus_distance_override(None);
        }
        self.dof_distance = None;
        self.focus.reset(self.config.photo.base_focal_length);
        self.overlay_hidden = false;
        self.shutter_cam_pos = None;
        self.screenshot = None;
        self.pose.rotation_roll = 0.0;
    }

    fn update_shutter(&mut self, host: &mut dyn SceneHost, handles: SceneHandles, input: &InputFrame) {
        if let Some(shot) = self.shutter_cam_pos {
            let unchanged = CamPos::capture(host, handles.camera, &self.pose)
                .is_some_and(|current| current.matches(&shot));
            if !unchanged {
                self.shutter_cam_pos = None;
                self.screenshot = None;
            }
        }

        if input.is_just_pressed(InputAction::Shutter) {
            self.take_screenshot(host, handles);
        }
    }

    fn take_screenshot(&mut self, host: &mut dyn SceneHost, handles: SceneHandles) {
        let now = Local::now();
        let result = match host.grab_frame() {
            Some(frame) => self.screenshotter.capture(&frame, now),
            None => {
                warn!("Screenshot skipped: no frame available");
                ScreenshotResult {
                    path: None,
                    error: Some("no frame available".to_string()),
                    timestamp: now,
                }
            }
        };
        self.shutter_cam_pos = CamPos::capture(host, handles.camera, &self.pose);
        self.screenshot = Some(result);
    }
}
