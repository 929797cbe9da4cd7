//! Camera mode state machine
//!
//! States are a [`ViewKind`] crossed with an [`OperatingMode`]. The machine only
//! decides which transition happens; [`crate::CameraRig`] applies presets and
//! talks to the host.

use serde::{Deserialize, Serialize};

/// Lens preset family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    /// The game's own camera
    Original,
    /// Chase camera behind the target
    ThirdPerson,
    /// Camera at the rider's head
    FirstPerson,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Original, ViewKind::ThirdPerson, ViewKind::FirstPerson];

    /// Index into per-view lookup tables
    pub const fn index(self) -> usize {
        match self {
            ViewKind::Original => 0,
            ViewKind::ThirdPerson => 1,
            ViewKind::FirstPerson => 2,
        }
    }

    /// Whether the rig drives the camera in this view
    pub const fn is_alternative(self) -> bool {
        !matches!(self, ViewKind::Original)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ViewKind::Original => "Original",
            ViewKind::ThirdPerson => "Third person",
            ViewKind::FirstPerson => "First person",
        }
    }
}

/// Normal gameplay or frozen-time free camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingMode {
    BikeCam,
    PhotoCam,
}

/// Current mode pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraModeState {
    pub view: ViewKind,
    pub operating: OperatingMode,
}

/// What the rig has to do after a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
    /// Request had no effect
    None,
    /// Apply the preset of `to`
    View { from: ViewKind, to: ViewKind },
    EnterPhoto,
    ExitPhoto,
}

/// Finite-state machine over view and operating mode
#[derive(Debug, Clone)]
pub struct ModeStateMachine {
    state: CameraModeState,
    /// Alternative view that `toggle_cam_state` returns to
    last_alternative: ViewKind,
    /// View to return to once a menu closes
    view_before_menu: Option<ViewKind>,
}

impl Default for ModeStateMachine {
    fn default() -> Self {
        Self::new(ViewKind::ThirdPerson)
    }
}

impl ModeStateMachine {
    /// Start on the original camera, remembering `alternative` for the first toggle
    pub fn new(alternative: ViewKind) -> Self {
        let last_alternative = if alternative.is_alternative() {
            alternative
        } else {
            ViewKind::ThirdPerson
        };
        Self {
            state: CameraModeState {
                view: ViewKind::Original,
                operating: OperatingMode::BikeCam,
            },
            last_alternative,
            view_before_menu: None,
        }
    }

    pub fn state(&self) -> CameraModeState {
        self.state
    }

    pub fn view(&self) -> ViewKind {
        self.state.view
    }

    pub fn operating(&self) -> OperatingMode {
        self.state.operating
    }

    pub fn last_alternative(&self) -> ViewKind {
        self.last_alternative
    }

    /// View a forced menu switch will return to
    pub fn view_before_menu(&self) -> Option<ViewKind> {
        self.view_before_menu
    }

    pub fn in_photo_mode(&self) -> bool {
        self.state.operating == OperatingMode::PhotoCam
    }

    /// Switch to `view`. Re-selecting the current view re-applies its preset.
    pub fn select_view(&mut self, view: ViewKind) -> ModeTransition {
        if self.in_photo_mode() {
            return ModeTransition::None;
        }
        let from = self.state.view;
        self.state.view = view;
        if view.is_alternative() {
            self.last_alternative = view;
        }
        self.view_before_menu = None;
        ModeTransition::View { from, to: view }
    }

    /// Original <-> last alternative view
    pub fn toggle_cam_state(&mut self) -> ModeTransition {
        let target = if self.state.view.is_alternative() {
            ViewKind::Original
        } else {
            self.last_alternative
        };
        self.select_view(target)
    }

    pub fn enter_photo(&mut self) -> ModeTransition {
        if self.in_photo_mode() {
            return ModeTransition::None;
        }
        self.state.operating = OperatingMode::PhotoCam;
        ModeTransition::EnterPhoto
    }

    pub fn exit_photo(&mut self) -> ModeTransition {
        if !self.in_photo_mode() {
            return ModeTransition::None;
        }
        self.state.operating = OperatingMode::BikeCam;
        ModeTransition::ExitPhoto
    }

    pub fn toggle_photo(&mut self) -> ModeTransition {
        if self.in_photo_mode() {
            self.exit_photo()
        } else {
            self.enter_photo()
        }
    }

    /// A game menu opened. With `force`, fall back to the original camera while
    /// leaving `last_alternative` untouched.
    pub fn on_menu_open(&mut self, force: bool) -> ModeTransition {
        if !force || self.in_photo_mode() || !self.state.view.is_alternative() {
            return ModeTransition::None;
        }
        let from = self.state.view;
        self.state.view = ViewKind::Original;
        self.view_before_menu = Some(from);
        ModeTransition::View {
            from,
            to: ViewKind::Original,
        }
    }

    /// A game menu closed; return to the view a forced switch left.
    pub fn on_menu_close(&mut self) -> ModeTransition {
        match self.view_before_menu.take() {
            Some(view) if !self.in_photo_mode() && self.state.view == ViewKind::Original => {
                self.select_view(view)
            }
            _ => ModeTransition::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_original() {
        let machine = ModeStateMachine::default();
        assert_eq!(machine.view(), ViewKind::Original);
        assert_eq!(machine.operating(), OperatingMode::BikeCam);
    }

    #[test]
    fn test_toggle_returns_to_last_alternative() {
        let mut machine = ModeStateMachine::default();
        machine.select_view(ViewKind::FirstPerson);
        assert_eq!(
            machine.toggle_cam_state(),
            ModeTransition::View {
                from: ViewKind::FirstPerson,
                to: ViewKind::Original
            }
        );
        machine.toggle_cam_state();
        assert_eq!(machine.view(), ViewKind::FirstPerson);
    }

    #[test]
    fn test_menu_keeps_last_alternative() {
        let mut machine = ModeStateMachine::default();
        machine.select_view(ViewKind::FirstPerson);

        assert_ne!(machine.on_menu_open(true), ModeTransition::None);
        assert_eq!(machine.view(), ViewKind::Original);
        assert_eq!(machine.last_alternative(), ViewKind::FirstPerson);

        machine.on_menu_close();
        assert_eq!(machine.view(), ViewKind::FirstPerson);
    }

    #[test]
    fn test_menu_without_force_is_ignored() {
        let mut machine = ModeStateMachine::default();
        machine.select_view(ViewKind::ThirdPerson);
        assert_eq!(machine.on_menu_open(false), ModeTransition::None);
        assert_eq!(machine.on_menu_close(), ModeTransition::None);
        assert_eq!(machine.view(), ViewKind::ThirdPerson);
    }

    #[test]
    fn test_view_changes_blocked_in_photo_mode() {
        let mut machine = ModeStateMachine::default();
        assert_eq!(machine.toggle_photo(), ModeTransition::EnterPhoto);
        assert_eq!(machine.select_view(ViewKind::FirstPerson), ModeTransition::None);
        assert_eq!(machine.enter_photo(), ModeTransition::None);
        assert_eq!(machine.toggle_photo(), ModeTransition::ExitPhoto);
        assert_eq!(machine.exit_photo(), ModeTransition::None);
    }
}
