//! Physical bindings and per-user bind tables
//!
//! A [`Binding`] records which physical key, joystick button or joystick
//! axis drives one logical [`Action`]. Bindings are plain data; evaluating
//! them against hardware is the backend's job.
//!
//! The analog-to-dpad adapter also lives here: a bind set can temporarily
//! inherit its D-pad axis bindings from one analog stick, scoped to a batch
//! of state queries within a single frame.

use thiserror::Error;

use crate::actions::{Action, BIND_COUNT};

/// Keyboard key identifier, independent of any windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Escape,
    Return,
    Backspace,
    Space,
    Slash,
    LShift,
    RShift,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Wire code used when querying a backend's keyboard device.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Direction reported by a joystick hat switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HatDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Digital joystick binding: a plain button or a hat direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoyButton {
    Button(u16),
    Hat { hat: u8, direction: HatDirection },
}

/// Signed joystick axis binding; the direction is part of the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoyAxis {
    Pos(u16),
    Neg(u16),
}

/// One logical action's physical assignment. Any of the three slots may be
/// unbound; a fully unbound binding simply never fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Binding {
    pub key: Option<Key>,
    pub joy_button: Option<JoyButton>,
    pub joy_axis: Option<JoyAxis>,
}

impl Binding {
    /// A binding with no physical assignment.
    pub const UNBOUND: Binding = Binding {
        key: None,
        joy_button: None,
        joy_axis: None,
    };

    /// Keyboard-only binding.
    pub fn from_key(key: Key) -> Binding {
        Binding {
            key: Some(key),
            ..Binding::UNBOUND
        }
    }

    /// True if any physical slot is assigned.
    pub fn is_bound(&self) -> bool {
        self.key.is_some() || self.joy_button.is_some() || self.joy_axis.is_some()
    }
}

/// Which analog stick substitutes for the D-pad, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalogDpadMode {
    #[default]
    None,
    #[serde(rename = "left_stick")]
    LeftStick,
    #[serde(rename = "right_stick")]
    RightStick,
}

/// Errors from the bind-table layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// A second analog-dpad push was attempted before the first was popped.
    #[error("analog dpad override already active; pop it before pushing again")]
    AnalogDpadAlreadyPushed,
}

/// Snapshot of the four D-pad axis bindings taken by
/// [`BindSet::push_analog_dpad`]. Consumed by the matching pop, so a
/// snapshot can neither be reused nor dropped into a double restore.
#[derive(Debug, PartialEq)]
#[must_use = "the override must be handed back to pop_analog_dpad"]
pub struct AnalogOverride {
    saved: [Option<JoyAxis>; 4],
}

/// One user's bindings, indexed by [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindSet {
    slots: [Binding; BIND_COUNT],
    analog_pushed: bool,
}

impl Default for BindSet {
    fn default() -> Self {
        Self::unbound()
    }
}

impl BindSet {
    /// A bind set with every action unbound.
    pub fn unbound() -> BindSet {
        BindSet {
            slots: [Binding::UNBOUND; BIND_COUNT],
            analog_pushed: false,
        }
    }

    /// Default keyboard layout for the first user.
    pub fn default_keyboard() -> BindSet {
        let mut set = BindSet::unbound();
        set.bind(Action::B, Binding::from_key(Key::Z));
        set.bind(Action::Y, Binding::from_key(Key::A));
        set.bind(Action::Select, Binding::from_key(Key::RShift));
        set.bind(Action::Start, Binding::from_key(Key::Return));
        set.bind(Action::Up, Binding::from_key(Key::Up));
        set.bind(Action::Down, Binding::from_key(Key::Down));
        set.bind(Action::Left, Binding::from_key(Key::Left));
        set.bind(Action::Right, Binding::from_key(Key::Right));
        set.bind(Action::A, Binding::from_key(Key::X));
        set.bind(Action::X, Binding::from_key(Key::S));
        set.bind(Action::L, Binding::from_key(Key::Q));
        set.bind(Action::R, Binding::from_key(Key::W));
        set.bind(Action::LoadState, Binding::from_key(Key::F4));
        set.bind(Action::SaveState, Binding::from_key(Key::F2));
        set.bind(Action::FullscreenToggle, Binding::from_key(Key::F));
        set.bind(Action::Quit, Binding::from_key(Key::Escape));
        set.bind(Action::Rewind, Binding::from_key(Key::R));
        set.bind(Action::PauseToggle, Binding::from_key(Key::P));
        set.bind(Action::FrameAdvance, Binding::from_key(Key::K));
        set.bind(Action::Reset, Binding::from_key(Key::H));
        set.bind(Action::Screenshot, Binding::from_key(Key::F8));
        set.bind(Action::Mute, Binding::from_key(Key::F9));
        set
    }

    /// Binding for one action.
    pub fn get(&self, action: Action) -> &Binding {
        &self.slots[action.index()]
    }

    /// Replace the binding for one action.
    pub fn bind(&mut self, action: Action, binding: Binding) {
        self.slots[action.index()] = binding;
    }

    /// Install the analog-to-dpad substitution for `mode`.
    ///
    /// The four D-pad axis bindings are snapshotted first. If the selected
    /// stick has genuinely distinct plus/minus bindings on both dimensions,
    /// the D-pad inherits the stick's axes (Up from Y-, Down from Y+, Left
    /// from X-, Right from X+); otherwise the table is left untouched. A
    /// no-op push still returns the snapshot and still requires the pop.
    pub fn push_analog_dpad(
        &mut self,
        mode: AnalogDpadMode,
    ) -> Result<AnalogOverride, BindError> {
        if self.analog_pushed {
            return Err(BindError::AnalogDpadAlreadyPushed);
        }

        let saved = [
            self.get(Action::Up).joy_axis,
            self.get(Action::Down).joy_axis,
            self.get(Action::Left).joy_axis,
            self.get(Action::Right).joy_axis,
        ];

        let stick = match mode {
            AnalogDpadMode::None => None,
            AnalogDpadMode::LeftStick => Some((
                Action::AnalogLeftXPlus,
                Action::AnalogLeftXMinus,
                Action::AnalogLeftYPlus,
                Action::AnalogLeftYMinus,
            )),
            AnalogDpadMode::RightStick => Some((
                Action::AnalogRightXPlus,
                Action::AnalogRightXMinus,
                Action::AnalogRightYPlus,
                Action::AnalogRightYMinus,
            )),
        };

        if let Some((x_plus, x_minus, y_plus, y_minus)) = stick {
            // A stick whose plus and minus codes collapse on either
            // dimension is undefined; leave the D-pad alone then.
            let x_defined = self.get(x_plus).joy_axis != self.get(x_minus).joy_axis;
            let y_defined = self.get(y_plus).joy_axis != self.get(y_minus).joy_axis;

            if x_defined && y_defined {
                self.slots[Action::Up.index()].joy_axis = self.get(y_minus).joy_axis;
                self.slots[Action::Down.index()].joy_axis = self.get(y_plus).joy_axis;
                self.slots[Action::Left.index()].joy_axis = self.get(x_minus).joy_axis;
                self.slots[Action::Right.index()].joy_axis = self.get(x_plus).joy_axis;
            }
        }

        self.analog_pushed = true;
        Ok(AnalogOverride { saved })
    }

    /// Restore the D-pad axis bindings captured by the matching push.
    pub fn pop_analog_dpad(&mut self, over: AnalogOverride) {
        let [up, down, left, right] = over.saved;
        self.slots[Action::Up.index()].joy_axis = up;
        self.slots[Action::Down.index()].joy_axis = down;
        self.slots[Action::Left.index()].joy_axis = left;
        self.slots[Action::Right.index()].joy_axis = right;
        self.analog_pushed = false;
    }

    /// Run `f` with the analog-dpad substitution installed, restoring the
    /// table on the way out.
    pub fn with_analog_dpad<R>(
        &mut self,
        mode: AnalogDpadMode,
        f: impl FnOnce(&BindSet) -> R,
    ) -> Result<R, BindError> {
        let over = self.push_analog_dpad(mode)?;
        let out = f(self);
        self.pop_analog_dpad(over);
        Ok(out)
    }
}
