//! Input sampling with action-based mapping
//!
//! Raw device state comes from the host once per frame as a [`RawInput`]. The
//! [`InputSampler`] turns it into a frozen [`InputFrame`] of semantic actions and
//! axes. Edge detection happens exactly once, inside [`InputSampler::sample`].

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

/// Number of controller slots the host reports
pub const GAMEPAD_SLOTS: usize = 4;

/// Camera actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InputAction {
    /// Move the camera closer (scroll up)
    ZoomIn,
    /// Move the camera away (scroll down)
    ZoomOut,
    /// Switch between the original camera and the last alternative view
    ToggleCamState,
    /// Select the third-person view
    SelectThirdPerson,
    /// Select the first-person view
    SelectFirstPerson,
    /// Turn auto-align on or off
    ToggleAutoAlign,
    /// While held, inverts the auto-align setting
    AlignInvertHold,
    /// Enter or leave photo mode
    TogglePhotoMode,
    /// Take a screenshot (photo mode)
    Shutter,
    /// Show or hide the HUD (photo mode)
    ToggleHud,
    /// While held, scrolling changes focal length
    FocalLengthHold,
    /// While held, scrolling changes focus distance
    FocusDistanceHold,
    /// Switch what the FoV keys adjust in photo mode
    ToggleFocusMode,
    /// Widen the field of view
    FovIncrease,
    /// Narrow the field of view
    FovDecrease,
    /// Fly forward (photo mode)
    MoveForward,
    /// Fly backward (photo mode)
    MoveBackward,
    /// Fly left (photo mode)
    MoveLeft,
    /// Fly right (photo mode)
    MoveRight,
    /// Fly up (photo mode)
    MoveUp,
    /// Fly down (photo mode)
    MoveDown,
    /// Fly faster (photo mode)
    Sprint,
    /// Roll counter-clockwise (photo mode)
    RollLeft,
    /// Roll clockwise (photo mode)
    RollRight,
    /// Level the horizon (photo mode)
    ResetRoll,
}

/// Gamepad buttons, including the d-pad directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadButton {
    South,
    East,
    West,
    North,
    LeftBumper,
    RightBumper,
    Select,
    Start,
    LeftStick,
    RightStick,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

/// Binding of a physical input to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputBinding {
    /// Explicitly unbound, never fires
    None,
    /// Keyboard key
    Key(KeyCode),
    /// Mouse button
    Mouse(u32), // 0 = left, 1 = right, 2 = middle
    /// Button on any controller slot
    Gamepad(GamepadButton),
}

impl From<KeyCode> for InputBinding {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

impl From<GamepadButton> for InputBinding {
    fn from(button: GamepadButton) -> Self {
        Self::Gamepad(button)
    }
}

impl std::fmt::Display for InputBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputBinding::None => write!(f, "None"),
            InputBinding::Key(key) => write!(f, "{key:?}"),
            InputBinding::Mouse(button) => write!(f, "Mouse{button}"),
            InputBinding::Gamepad(button) => write!(f, "Pad{button:?}"),
        }
    }
}

/// One configured binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingEntry {
    pub action: InputAction,
    pub binding: InputBinding,
}

impl BindingEntry {
    pub fn new(action: InputAction, binding: impl Into<InputBinding>) -> Self {
        Self {
            action,
            binding: binding.into(),
        }
    }
}

/// Default binding table
pub fn default_bindings() -> Vec<BindingEntry> {
    use GamepadButton as Pad;
    use InputAction as A;

    vec![
        BindingEntry::new(A::ZoomIn, KeyCode::PageUp),
        BindingEntry::new(A::ZoomOut, KeyCode::PageDown),
        BindingEntry::new(A::ToggleCamState, KeyCode::KeyC),
        BindingEntry::new(A::ToggleCamState, Pad::RightStick),
        BindingEntry::new(A::SelectThirdPerson, KeyCode::F6),
        BindingEntry::new(A::SelectFirstPerson, KeyCode::F7),
        BindingEntry::new(A::ToggleAutoAlign, KeyCode::KeyV),
        BindingEntry::new(A::AlignInvertHold, InputBinding::Mouse(1)),
        BindingEntry::new(A::AlignInvertHold, Pad::LeftBumper),
        BindingEntry::new(A::TogglePhotoMode, KeyCode::KeyP),
        BindingEntry::new(A::TogglePhotoMode, Pad::Select),
        BindingEntry::new(A::Shutter, KeyCode::Enter),
        BindingEntry::new(A::Shutter, Pad::South),
        BindingEntry::new(A::ToggleHud, KeyCode::KeyH),
        BindingEntry::new(A::ToggleHud, Pad::North),
        BindingEntry::new(A::FocalLengthHold, KeyCode::ControlLeft),
        BindingEntry::new(A::FocusDistanceHold, KeyCode::AltLeft),
        BindingEntry::new(A::ToggleFocusMode, KeyCode::KeyF),
        BindingEntry::new(A::ToggleFocusMode, Pad::West),
        BindingEntry::new(A::FovIncrease, KeyCode::Equal),
        BindingEntry::new(A::FovIncrease, Pad::DPadUp),
        BindingEntry::new(A::FovDecrease, KeyCode::Minus),
        BindingEntry::new(A::FovDecrease, Pad::DPadDown),
        BindingEntry::new(A::MoveForward, KeyCode::KeyW),
        BindingEntry::new(A::MoveBackward, KeyCode::KeyS),
        BindingEntry::new(A::MoveLeft, KeyCode::KeyA),
        BindingEntry::new(A::MoveRight, KeyCode::KeyD),
        BindingEntry::new(A::MoveUp, KeyCode::KeyE),
        BindingEntry::new(A::MoveDown, KeyCode::KeyQ),
        BindingEntry::new(A::Sprint, KeyCode::ShiftLeft),
        BindingEntry::new(A::Sprint, Pad::RightBumper),
        BindingEntry::new(A::RollLeft, KeyCode::KeyZ),
        BindingEntry::new(A::RollRight, KeyCode::KeyX),
        BindingEntry::new(A::ResetRoll, KeyCode::KeyR),
        BindingEntry::new(A::ResetRoll, Pad::East),
    ]
}

/// Maps physical inputs to camera actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Bindings in configuration order, duplicates included
    entries: Vec<BindingEntry>,
    /// Action to all of its bindings
    reverse: HashMap<InputAction, Vec<InputBinding>>,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::from_entries(default_bindings())
    }
}

impl InputBindings {
    /// Build a table from configured entries
    pub fn from_entries(entries: Vec<BindingEntry>) -> Self {
        let mut bindings = Self {
            entries: Vec::new(),
            reverse: HashMap::new(),
        };
        for entry in entries {
            bindings.bind(entry.binding, entry.action);
        }
        bindings
    }

    /// Bind an input to an action. `None` bindings are dropped.
    pub fn bind(&mut self, binding: impl Into<InputBinding>, action: InputAction) {
        let binding = binding.into();
        if binding == InputBinding::None {
            return;
        }
        self.entries.push(BindingEntry { action, binding });
        self.reverse.entry(action).or_default().push(binding);
    }

    /// All bindings of an action
    pub fn bindings_for(&self, action: InputAction) -> &[InputBinding] {
        self.reverse.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every action the binding triggers
    pub fn actions_for(&self, binding: InputBinding) -> Vec<InputAction> {
        self.entries
            .iter()
            .filter(|e| e.binding == binding)
            .map(|e| e.action)
            .collect()
    }

    /// Inputs bound to more than one action, as human-readable messages
    pub fn conflicts(&self) -> Vec<String> {
        let mut by_binding: Vec<(InputBinding, Vec<InputAction>)> = Vec::new();
        for entry in &self.entries {
            match by_binding.iter_mut().find(|(b, _)| *b == entry.binding) {
                Some((_, actions)) => {
                    if !actions.contains(&entry.action) {
                        actions.push(entry.action);
                    }
                }
                None => by_binding.push((entry.binding, vec![entry.action])),
            }
        }

        by_binding
            .into_iter()
            .filter(|(_, actions)| actions.len() > 1)
            .map(|(binding, actions)| {
                let names: Vec<String> = actions.iter().map(|a| format!("{a:?}")).collect();
                format!("{binding} is bound to both {}", names.join(" and "))
            })
            .collect()
    }
}

/// One controller slot as polled by the host
#[derive(Debug, Clone, Default)]
pub struct GamepadState {
    /// Face, shoulder, menu and stick buttons currently down
    pub buttons: HashSet<GamepadButton>,
    pub left_stick: Vec2,
    pub right_stick: Vec2,
    pub left_trigger: f32,
    pub right_trigger: f32,
    /// D-pad as an axis pair (x right, y up)
    pub dpad: Vec2,
}

impl GamepadState {
    /// Whether a button is down. D-pad directions read from the axis pair.
    pub fn is_down(&self, button: GamepadButton) -> bool {
        match button {
            GamepadButton::DPadUp => self.dpad.y > 0.5,
            GamepadButton::DPadDown => self.dpad.y < -0.5,
            GamepadButton::DPadLeft => self.dpad.x < -0.5,
            GamepadButton::DPadRight => self.dpad.x > 0.5,
            other => self.buttons.contains(&other),
        }
    }
}

/// Raw device state for one frame, as polled by the host
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    pub keys: HashSet<KeyCode>,
    pub mouse_buttons: HashSet<u32>,
    /// Mouse movement since last frame, y positive upward
    pub mouse_delta: Vec2,
    /// Scroll wheel lines, positive away from the user
    pub scroll: f32,
    pub gamepads: [GamepadState; GAMEPAD_SLOTS],
}

impl RawInput {
    fn is_down(&self, binding: InputBinding) -> bool {
        match binding {
            InputBinding::None => false,
            InputBinding::Key(key) => self.keys.contains(&key),
            InputBinding::Mouse(button) => self.mouse_buttons.contains(&button),
            InputBinding::Gamepad(button) => self.gamepads.iter().any(|pad| pad.is_down(button)),
        }
    }
}

/// Sensitivity and deadzone settings per device
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Degrees per mouse count, horizontal
    pub mouse_sensitivity_h: f32,
    /// Degrees per mouse count, vertical
    pub mouse_sensitivity_v: f32,
    /// Degrees per frame at full stick deflection, horizontal
    pub stick_sensitivity_h: f32,
    /// Degrees per frame at full stick deflection, vertical
    pub stick_sensitivity_v: f32,
    /// Stick values at or below this magnitude read as zero
    pub stick_deadzone: f32,
    /// Trigger values at or below this read as zero
    pub trigger_deadzone: f32,
    /// Binding table
    pub bindings: Vec<BindingEntry>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity_h: 0.15,
            mouse_sensitivity_v: 0.15,
            stick_sensitivity_h: 2.5,
            stick_sensitivity_v: 1.5,
            stick_deadzone: 0.15,
            trigger_deadzone: 0.1,
            bindings: default_bindings(),
        }
    }
}

impl InputConfig {
    /// Human-readable problems with this configuration
    pub fn validate(&self) -> Vec<String> {
        let mut problems = InputBindings::from_entries(self.bindings.clone()).conflicts();
        for (name, value) in [
            ("Stick deadzone", self.stick_deadzone),
            ("Trigger deadzone", self.trigger_deadzone),
        ] {
            if !(0.0..1.0).contains(&value) {
                problems.push(format!("{name} {value} should be in [0, 1)"));
            }
        }
        problems
    }
}

/// Zero out values whose magnitude does not exceed `deadzone`.
pub fn apply_deadzone(axis: f32, deadzone: f32) -> f32 {
    if axis.abs() > deadzone {
        axis
    } else {
        0.0
    }
}

fn deadzone2(axis: Vec2, deadzone: f32) -> Vec2 {
    Vec2::new(apply_deadzone(axis.x, deadzone), apply_deadzone(axis.y, deadzone))
}

/// Semantic input for exactly one frame
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were released this frame
    pub just_released: HashSet<InputAction>,
    /// Mouse movement delta for this frame
    pub mouse_delta: Vec2,
    /// Right stick, summed over all slots
    pub look_stick: Vec2,
    /// Left stick, summed over all slots
    pub move_stick: Vec2,
    /// Left trigger, summed over all slots
    pub left_trigger: f32,
    /// Right trigger, summed over all slots
    pub right_trigger: f32,
    /// D-pad axes, summed over all slots
    pub dpad: Vec2,
    /// Scroll wheel delta for this frame
    pub scroll: f32,
}

impl InputFrame {
    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was released this frame
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// `1.0` when only `positive` is held, `-1.0` when only `negative` is, else `0.0`
    pub fn axis(&self, negative: InputAction, positive: InputAction) -> f32 {
        let mut value = 0.0;
        if self.is_held(positive) {
            value += 1.0;
        }
        if self.is_held(negative) {
            value -= 1.0;
        }
        value
    }

    /// Frame with only the given actions pressed and held, for tests and scripted hosts
    pub fn pressed(actions: &[InputAction]) -> Self {
        let set: HashSet<InputAction> = actions.iter().copied().collect();
        Self {
            held: set.clone(),
            just_pressed: set,
            ..Default::default()
        }
    }
}

/// Turns raw device state into [`InputFrame`]s
#[derive(Debug, Clone)]
pub struct InputSampler {
    bindings: InputBindings,
    stick_deadzone: f32,
    trigger_deadzone: f32,
    previous_held: HashSet<InputAction>,
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}

impl InputSampler {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            bindings: InputBindings::from_entries(config.bindings.clone()),
            stick_deadzone: config.stick_deadzone,
            trigger_deadzone: config.trigger_deadzone,
            previous_held: HashSet::new(),
        }
    }

    pub fn bindings(&self) -> &InputBindings {
        &self.bindings
    }

    /// Produce this frame's semantic input. Call once per frame.
    ///
    /// Controller slots are summed, not maxed: two pads pushed the same way give
    /// twice the signal.
    pub fn sample(&mut self, raw: &RawInput) -> InputFrame {
        let mut held = HashSet::new();
        for (action, bindings) in &self.bindings.reverse {
            if bindings.iter().any(|b| raw.is_down(*b)) {
                held.insert(*action);
            }
        }

        let mut just_pressed: HashSet<InputAction> =
            held.difference(&self.previous_held).copied().collect();
        let just_released: HashSet<InputAction> =
            self.previous_held.difference(&held).copied().collect();

        if raw.scroll > 0.0 {
            just_pressed.insert(InputAction::ZoomIn);
        } else if raw.scroll < 0.0 {
            just_pressed.insert(InputAction::ZoomOut);
        }

        let mut frame = InputFrame {
            held: held.clone(),
            just_pressed,
            just_released,
            mouse_delta: raw.mouse_delta,
            scroll: raw.scroll,
            ..Default::default()
        };

        for pad in &raw.gamepads {
            frame.look_stick += deadzone2(pad.right_stick, self.stick_deadzone);
            frame.move_stick += deadzone2(pad.left_stick, self.stick_deadzone);
            frame.left_trigger += apply_deadzone(pad.left_trigger, self.trigger_deadzone);
            frame.right_trigger += apply_deadzone(pad.right_trigger, self.trigger_deadzone);
            frame.dpad += pad.dpad;
        }

        self.previous_held = held;
        frame
    }

    /// Forget held state, e.g. after the host lost focus
    pub fn reset(&mut self) {
        self.previous_held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = InputBindings::default();
        assert!(bindings
            .bindings_for(InputAction::MoveForward)
            .contains(&InputBinding::Key(KeyCode::KeyW)));
        assert_eq!(
            bindings.actions_for(InputBinding::Key(KeyCode::KeyP)),
            vec![InputAction::TogglePhotoMode]
        );
        assert!(bindings.conflicts().is_empty());
    }

    #[test]
    fn test_none_binding_is_a_no_op() {
        let mut bindings = InputBindings::from_entries(vec![]);
        bindings.bind(InputBinding::None, InputAction::Shutter);
        assert!(bindings.bindings_for(InputAction::Shutter).is_empty());
        assert!(bindings.conflicts().is_empty());
    }

    #[test]
    fn test_conflicts_are_reported() {
        let mut config = InputConfig::default();
        config
            .bindings
            .push(BindingEntry::new(InputAction::Shutter, KeyCode::KeyP));
        let problems = config.validate();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("KeyP"));
        assert!(problems[0].contains("TogglePhotoMode"));
        assert!(problems[0].contains("Shutter"));
    }

    #[test]
    fn test_deadzone_boundaries() {
        let dz = 0.2;
        assert_eq!(apply_deadzone(dz, dz), 0.0);
        assert_eq!(apply_deadzone(-dz, dz), 0.0);
        let just_over = dz + f32::EPSILON;
        assert_eq!(apply_deadzone(just_over, dz), just_over);
        assert_eq!(apply_deadzone(-0.9, dz), -0.9);
    }

    #[test]
    fn test_edges_are_computed_once_per_frame() {
        let mut sampler = InputSampler::default();
        let mut raw = RawInput::default();
        raw.keys.insert(KeyCode::KeyP);

        let first = sampler.sample(&raw);
        assert!(first.is_just_pressed(InputAction::TogglePhotoMode));
        assert!(first.is_held(InputAction::TogglePhotoMode));

        let second = sampler.sample(&raw);
        assert!(!second.is_just_pressed(InputAction::TogglePhotoMode));
        assert!(second.is_held(InputAction::TogglePhotoMode));

        raw.keys.clear();
        let third = sampler.sample(&raw);
        assert!(third.is_just_released(InputAction::TogglePhotoMode));
        assert!(!third.is_held(InputAction::TogglePhotoMode));
    }

    #[test]
    fn test_scroll_produces_zoom_edges() {
        let mut sampler = InputSampler::default();
        let raw = RawInput {
            scroll: 1.0,
            ..Default::default()
        };
        let frame = sampler.sample(&raw);
        assert!(frame.is_just_pressed(InputAction::ZoomIn));
        assert!(!frame.is_just_pressed(InputAction::ZoomOut));
    }

    #[test]
    fn test_controller_slots_are_summed() {
        let mut sampler = InputSampler::default();
        let mut raw = RawInput::default();
        raw.gamepads[0].right_stick = Vec2::new(0.5, 0.0);
        raw.gamepads[2].right_stick = Vec2::new(0.5, 0.1);
        raw.gamepads[1].right_trigger = 0.05;

        let frame = sampler.sample(&raw);
        assert_eq!(frame.look_stick, Vec2::new(1.0, 0.0));
        assert_eq!(frame.right_trigger, 0.0);
    }

    #[test]
    fn test_summed_slots_are_not_clamped() {
        let mut sampler = InputSampler::default();
        let mut raw = RawInput::default();
        raw.gamepads[0].left_stick = Vec2::new(1.0, -1.0);
        raw.gamepads[1].left_stick = Vec2::new(1.0, -1.0);
        raw.gamepads[0].dpad = Vec2::new(-1.0, 0.0);
        raw.gamepads[3].dpad = Vec2::new(-1.0, 0.0);

        let frame = sampler.sample(&raw);
        assert_eq!(frame.move_stick, Vec2::new(2.0, -2.0));
        assert_eq!(frame.dpad, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_gamepad_dpad_buttons_read_axis() {
        let mut sampler = InputSampler::default();
        let mut raw = RawInput::default();
        raw.gamepads[3].dpad = Vec2::new(0.0, 1.0);
        let frame = sampler.sample(&raw);
        assert!(frame.is_just_pressed(InputAction::FovIncrease));
    }

    #[test]
    fn test_axis_helper() {
        let frame = InputFrame::pressed(&[InputAction::MoveForward]);
        assert_eq!(frame.axis(InputAction::MoveBackward, InputAction::MoveForward), 1.0);
        let frame = InputFrame::pressed(&[InputAction::MoveForward, InputAction::MoveBackward]);
        assert_eq!(frame.axis(InputAction::MoveBackward, InputAction::MoveForward), 0.0);
    }
}
