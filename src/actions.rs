//! Logical action space shared by the pipeline, bind tables and key masks
//!
//! Actions are an enumerated ID space split in three bands: the 16 digital
//! pad buttons, the analog half-axis bind slots, and the frontend meta
//! actions. Meta actions always compare `>= FIRST_META`; everything below
//! that boundary belongs to the emulated device.

use serde::{Deserialize, Serialize};

/// First bind slot past the digital pad buttons (analog half-axes start here).
pub const FIRST_CUSTOM_BIND: usize = 16;

/// First frontend meta action. Device-bound actions are strictly below this.
pub const FIRST_META: usize = 25;

/// One logical action the frontend knows how to bind.
///
/// Discriminants are stable: they index bind tables, remap tables and the
/// 64-bit key mask, and the digital pad band matches the classic pad wire
/// order (B=0 .. R3=15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Action {
    // Digital pad buttons
    B = 0,
    Y = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
    A = 8,
    X = 9,
    L = 10,
    R = 11,
    L2 = 12,
    R2 = 13,
    L3 = 14,
    R3 = 15,

    // Analog half-axis bind slots (FIRST_CUSTOM_BIND band)
    AnalogLeftXPlus = 16,
    AnalogLeftXMinus = 17,
    AnalogLeftYPlus = 18,
    AnalogLeftYMinus = 19,
    AnalogRightXPlus = 20,
    AnalogRightXMinus = 21,
    AnalogRightYPlus = 22,
    AnalogRightYMinus = 23,

    TurboEnable = 24,

    // Frontend meta actions (FIRST_META band)
    FastForwardToggle = 25,
    FastForwardHold = 26,
    LoadState = 27,
    SaveState = 28,
    FullscreenToggle = 29,
    Quit = 30,
    StateSlotPlus = 31,
    StateSlotMinus = 32,
    Rewind = 33,
    PauseToggle = 34,
    FrameAdvance = 35,
    Reset = 36,
    Screenshot = 37,
    Mute = 38,
    SlowMotion = 39,
    VolumeUp = 40,
    VolumeDown = 41,
    DiskEjectToggle = 42,
    DiskNext = 43,
    DiskPrev = 44,
    GrabMouseToggle = 45,
    MenuToggle = 46,
    EnableHotkey = 47,
}

/// Number of bindable actions; also the key-mask list-end sentinel.
pub const BIND_COUNT: usize = 48;

impl Action {
    /// Every action in discriminant order. Iterating this is the canonical
    /// way to walk the bind list.
    pub const ALL: [Action; BIND_COUNT] = [
        Action::B,
        Action::Y,
        Action::Select,
        Action::Start,
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::A,
        Action::X,
        Action::L,
        Action::R,
        Action::L2,
        Action::R2,
        Action::L3,
        Action::R3,
        Action::AnalogLeftXPlus,
        Action::AnalogLeftXMinus,
        Action::AnalogLeftYPlus,
        Action::AnalogLeftYMinus,
        Action::AnalogRightXPlus,
        Action::AnalogRightXMinus,
        Action::AnalogRightYPlus,
        Action::AnalogRightYMinus,
        Action::TurboEnable,
        Action::FastForwardToggle,
        Action::FastForwardHold,
        Action::LoadState,
        Action::SaveState,
        Action::FullscreenToggle,
        Action::Quit,
        Action::StateSlotPlus,
        Action::StateSlotMinus,
        Action::Rewind,
        Action::PauseToggle,
        Action::FrameAdvance,
        Action::Reset,
        Action::Screenshot,
        Action::Mute,
        Action::SlowMotion,
        Action::VolumeUp,
        Action::VolumeDown,
        Action::DiskEjectToggle,
        Action::DiskNext,
        Action::DiskPrev,
        Action::GrabMouseToggle,
        Action::MenuToggle,
        Action::EnableHotkey,
    ];

    /// Bind-table index of this action.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look an action up by bind-table index.
    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// True for the four D-pad directions (exempt from turbo).
    pub fn is_dpad(self) -> bool {
        matches!(self, Action::Up | Action::Down | Action::Left | Action::Right)
    }

    /// True for frontend meta actions (`>= FIRST_META`).
    pub fn is_meta(self) -> bool {
        self.index() >= FIRST_META
    }

    /// True for digital device buttons (below the analog bind band).
    pub fn is_device_button(self) -> bool {
        self.index() < FIRST_CUSTOM_BIND
    }
}

/// Fixed 64-bit set of pressed actions, one bit per [`Action`].
///
/// Callers query through [`ActionMask::pressed`] rather than the raw
/// integer; the backing word stays an implementation detail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionMask(u64);

impl ActionMask {
    /// Empty mask (nothing pressed).
    pub const EMPTY: ActionMask = ActionMask(0);

    /// Mark an action as pressed.
    pub fn set(&mut self, action: Action) {
        self.0 |= 1u64 << action.index();
    }

    /// Mark an action as released.
    pub fn clear(&mut self, action: Action) {
        self.0 &= !(1u64 << action.index());
    }

    /// Whether an action is pressed in this sample.
    pub fn pressed(&self, action: Action) -> bool {
        self.0 & (1u64 << action.index()) != 0
    }

    /// True if no action is pressed.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate the pressed actions in discriminant order.
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.iter().copied().filter(|a| self.pressed(*a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_match_all_order() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i), Some(*action));
        }
        assert_eq!(Action::from_index(BIND_COUNT), None);
    }

    #[test]
    fn meta_boundary_splits_bands() {
        assert!(Action::R3.index() < FIRST_CUSTOM_BIND);
        assert_eq!(Action::AnalogLeftXPlus.index(), FIRST_CUSTOM_BIND);
        assert!(!Action::TurboEnable.is_meta());
        assert!(Action::FastForwardToggle.is_meta());
        assert!(Action::EnableHotkey.is_meta());
        assert!(BIND_COUNT <= 64);
    }

    #[test]
    fn dpad_detection() {
        for action in [Action::Up, Action::Down, Action::Left, Action::Right] {
            assert!(action.is_dpad());
        }
        assert!(!Action::B.is_dpad());
        assert!(!Action::Start.is_dpad());
    }

    #[test]
    fn mask_set_clear_roundtrip() {
        let mut mask = ActionMask::EMPTY;
        assert!(mask.is_empty());

        mask.set(Action::A);
        mask.set(Action::MenuToggle);
        assert!(mask.pressed(Action::A));
        assert!(mask.pressed(Action::MenuToggle));
        assert!(!mask.pressed(Action::B));

        mask.clear(Action::A);
        assert!(!mask.pressed(Action::A));
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![Action::MenuToggle]);
    }
}
