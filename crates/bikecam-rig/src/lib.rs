//! bikecam rig - Camera logic for the bike camera mod
//!
//! Input sampling, the pose solver, the view/photo mode machine, camera
//! snapshots and the [`CameraRig`] that ties them to a host engine.

pub mod camera;
mod error;
pub mod host;
pub mod hud;
pub mod input;

pub use camera::{
    CamPos, CameraConfig, CameraModeState, CameraPose, CameraRig, FocusAdjustMode, ModeStateMachine,
    OperatingMode, PhotoModeConfig, RigConfig, ViewKind,
};
pub use error::RigError;
pub use host::{DepthOfField, ObjectHandle, SceneHost};
pub use hud::HudSnapshot;
pub use input::{
    GamepadButton, GamepadState, InputAction, InputBinding, InputBindings, InputConfig, InputFrame,
    InputSampler, RawInput,
};
