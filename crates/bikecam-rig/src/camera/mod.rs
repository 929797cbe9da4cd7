//! Camera system module
//!
//! Chase, first-person and free-fly photo cameras driven by a single
//! [`CameraRig`].

mod campos;
mod config;
mod focus;
mod mode;
mod pose;
mod rig;
pub mod solver;

pub use campos::CamPos;
pub use config::{AlignmentMode, CameraConfig, ManualInputStyle, PhotoModeConfig, ViewPreset, ViewTable};
pub use focus::{FocusAdjustMode, FocusState, FovState};
pub use mode::{CameraModeState, ModeStateMachine, ModeTransition, OperatingMode, ViewKind};
pub use pose::CameraPose;
pub use rig::{CameraRig, RigConfig, SceneHandles};
