//! bikecam - Chase, first-person and photo cameras for a bike game
//!
//! Runs the camera rig headless against a sandbox scene with scripted input and
//! logs what the camera does.

mod context;
mod hud;
mod sandbox;
mod settings;

use anyhow::{Context, Result};
use bikecam_rig::SceneHost;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use context::ModContext;
use sandbox::{scripted_input, Sandbox};
use settings::ModSettings;

/// Frames the scripted demo runs for
const DEMO_FRAMES: u32 = 480;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting bikecam sandbox...");

    let settings = ModSettings::load();
    let first_run = ModSettings::settings_path().is_some_and(|path| !path.exists());
    let mut context = ModContext::startup(settings);
    let mut sandbox = Sandbox::new();
    let dt = context.time().fixed_delta_time();

    for frame in 0..DEMO_FRAMES {
        let raw = scripted_input(frame);
        sandbox.advance(dt);
        context.frame(&mut sandbox.host, &sandbox.physics, &raw, dt);

        if frame % 60 == 0 {
            log_frame(&context, &sandbox, frame);
        }
    }

    context.on_menu_open(&mut sandbox.host);
    info!("Menu open: {} view", context.rig().view().name());
    context.on_menu_close(&mut sandbox.host);
    info!("Menu closed: {} view", context.rig().view().name());

    // level change: one frame with nothing loaded, then a fresh scene
    context.on_scene_reloaded(&mut sandbox.host);
    sandbox.host.clear();
    context.frame(&mut sandbox.host, &sandbox.physics, &Default::default(), dt);
    sandbox = Sandbox::new();
    context.frame(&mut sandbox.host, &sandbox.physics, &Default::default(), dt);
    log_frame(&context, &sandbox, DEMO_FRAMES + 1);

    let settings = context.shutdown();
    if first_run {
        settings.save().context("Failed to write default settings")?;
    }

    Ok(())
}

fn log_frame(context: &ModContext, sandbox: &Sandbox, frame: u32) {
    let camera = sandbox
        .host
        .find_object(&context.settings().camera.camera_object)
        .and_then(|handle| sandbox.host.transform(handle));
    if let Some(camera) = camera {
        let pose = context.rig().pose();
        info!(
            "Frame {}: camera at ({:.2}, {:.2}, {:.2}), yaw {:.1}, pitch {:.1}, zoom {:.2}/{:.2}",
            frame,
            camera.position.x,
            camera.position.y,
            camera.position.z,
            pose.rotation_horizontal,
            pose.rotation_vertical,
            pose.zoom_applied,
            pose.zoom_wanted
        );
    }
    let host = &sandbox.host;
    debug!(
        "  default camera {}, game HUD {}, time scale {:.1}",
        if host.default_camera_enabled { "on" } else { "off" },
        if host.hud_visible { "shown" } else { "hidden" },
        host.time_scale
    );
    if let (Some(focal_length), Some(distance)) = (host.dof.focal_length, host.dof.focus_distance) {
        info!("  DoF override: {:.0} mm at {:.2} m", focal_length, distance);
    }
    for line in context.render_hud() {
        info!("  {}", line);
    }
}
