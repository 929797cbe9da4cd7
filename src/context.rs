//! Process-wide mod state
//!
//! Created once at startup and torn down on shutdown. The host calls
//! [`ModContext::frame`] once per rendered frame and [`ModContext::render_hud`]
//! when it draws overlays.

use bikecam_core::FrameTime;
use bikecam_physics::CollisionProbe;
use bikecam_rig::{CameraRig, InputFrame, InputSampler, RawInput, SceneHost};
use tracing::{info, warn};

use crate::hud;
use crate::settings::ModSettings;

pub struct ModContext {
    settings: ModSettings,
    /// Settings problems found at startup, shown on the overlay
    validation: Vec<String>,
    sampler: InputSampler,
    rig: CameraRig,
    time: FrameTime,
}

impl ModContext {
    pub fn startup(settings: ModSettings) -> Self {
        let validation = settings.validate();
        for problem in &validation {
            warn!("Settings: {}", problem);
        }
        info!("bikecam started");

        Self {
            sampler: InputSampler::new(&settings.input),
            rig: CameraRig::new(settings.rig_config()),
            time: FrameTime::default(),
            validation,
            settings,
        }
    }

    pub fn settings(&self) -> &ModSettings {
        &self.settings
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn time(&self) -> &FrameTime {
        &self.time
    }

    /// Advance one frame. `raw_delta` is the wall-clock frame time in seconds.
    pub fn frame(
        &mut self,
        host: &mut dyn SceneHost,
        probe: &dyn CollisionProbe,
        raw: &RawInput,
        raw_delta: f32,
    ) -> InputFrame {
        self.time.set_time_scale(host.time_scale());
        self.time.update(raw_delta);

        let input = self.sampler.sample(raw);
        self.rig.update(host, probe, &input, &self.time);
        input
    }

    pub fn render_hud(&self) -> Vec<String> {
        hud::render_frame(&self.rig.hud_snapshot(), &self.validation)
    }

    pub fn on_menu_open(&mut self, host: &mut dyn SceneHost) {
        self.rig.on_menu_open(host);
    }

    pub fn on_menu_close(&mut self, host: &mut dyn SceneHost) {
        self.rig.on_menu_close(host);
    }

    /// The host is about to load another scene
    pub fn on_scene_reloaded(&mut self, host: &mut dyn SceneHost) {
        self.sampler.reset();
        self.rig.on_scene_reloaded(host);
    }

    /// Tear down, handing the settings back for saving
    pub fn shutdown(self) -> ModSettings {
        info!(
            "bikecam shutting down after {} frames",
            self.time.frame_count
        );
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{scripted_input, Sandbox};
    use bikecam_rig::{OperatingMode, ViewKind};

    #[test]
    fn test_scripted_session() {
        let mut sandbox = Sandbox::new();
        let mut context = ModContext::startup(ModSettings::default());

        let mut saw_photo = false;
        for frame in 0..480 {
            let raw = scripted_input(frame);
            sandbox.advance(1.0 / 60.0);
            context.frame(&mut sandbox.host, &sandbox.physics, &raw, 1.0 / 60.0);

            if context.rig().state().operating == OperatingMode::PhotoCam {
                saw_photo = true;
                assert_eq!(sandbox.host.time_scale, 0.0);
                assert!(!context.render_hud().is_empty());
            }
        }

        assert!(saw_photo);
        assert_eq!(context.rig().state().operating, OperatingMode::BikeCam);
        assert_eq!(context.rig().view(), ViewKind::FirstPerson);
        assert_eq!(sandbox.host.time_scale, 1.0);
        assert!(context.render_hud()[0].starts_with("First person"));
    }

    #[test]
    fn test_frozen_host_freezes_frame_time() {
        let mut sandbox = Sandbox::new();
        let mut context = ModContext::startup(ModSettings::default());
        sandbox.host.set_time_scale(0.0);
        context.frame(&mut sandbox.host, &sandbox.physics, &RawInput::default(), 0.1);

        assert_eq!(context.time().delta_time, 0.0);
        assert!((context.time().unscaled_delta_time - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_scene_reload_waits_then_recovers() {
        let mut sandbox = Sandbox::new();
        let mut context = ModContext::startup(ModSettings::default());
        context.frame(&mut sandbox.host, &sandbox.physics, &RawInput::default(), 1.0 / 60.0);
        assert!(context.rig().is_ready());

        context.on_scene_reloaded(&mut sandbox.host);
        sandbox.host.clear();
        context.frame(&mut sandbox.host, &sandbox.physics, &RawInput::default(), 1.0 / 60.0);
        assert!(!context.rig().is_ready());
        assert_eq!(context.render_hud(), vec!["bikecam: waiting for scene".to_string()]);

        sandbox = Sandbox::new();
        context.frame(&mut sandbox.host, &sandbox.physics, &RawInput::default(), 1.0 / 60.0);
        assert!(context.rig().is_ready());
    }
}
