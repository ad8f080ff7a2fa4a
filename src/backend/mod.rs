//! Backend capability interface and the compiled-in backend registry
//!
//! A backend is the one polymorphic source of raw digital/analog/key state.
//! The pipeline polls it once per frame and treats the result as a value
//! snapshot until the next poll. Everything beyond `poll`/`input_state` is
//! optional and defaults to an inert implementation.

pub mod null;

use bitflags::bitflags;
use tracing::{error, warn};

use crate::actions::Action;
use crate::binds::BindSet;

pub use null::NullBackend;

/// Low-order bits of a raw device identifier; upper bits carry capability
/// flags the pipeline must ignore.
pub const DEVICE_TYPE_MASK: u32 = 0xff;

/// Emulated device class addressed by a state query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Device {
    None = 0,
    Joypad = 1,
    Mouse = 2,
    Keyboard = 3,
    Lightgun = 4,
    Analog = 5,
    Pointer = 6,
}

impl Device {
    /// Decode a raw device identifier, masking off capability flag bits.
    pub fn from_raw(raw: u32) -> Device {
        match raw & DEVICE_TYPE_MASK {
            1 => Device::Joypad,
            2 => Device::Mouse,
            3 => Device::Keyboard,
            4 => Device::Lightgun,
            5 => Device::Analog,
            6 => Device::Pointer,
            _ => Device::None,
        }
    }

    pub fn raw(self) -> u32 {
        self as u32
    }
}

bitflags! {
    /// Device classes a backend can actually service.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BackendCaps: u32 {
        const JOYPAD = 1 << Device::Joypad as u32;
        const MOUSE = 1 << Device::Mouse as u32;
        const KEYBOARD = 1 << Device::Keyboard as u32;
        const LIGHTGUN = 1 << Device::Lightgun as u32;
        const ANALOG = 1 << Device::Analog as u32;
        const POINTER = 1 << Device::Pointer as u32;
    }
}

/// Rumble motor addressed by [`InputBackend::set_rumble`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RumbleEffect {
    Strong,
    Weak,
}

/// Sensor control actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorAction {
    AccelerometerEnable,
    AccelerometerDisable,
}

/// Polymorphic source of raw input state.
///
/// `poll` is called exactly once per emulated frame; `input_state` answers
/// from the snapshot taken by the most recent poll. Bind tables are passed
/// in so joypad backends can resolve logical IDs to physical codes.
pub trait InputBackend {
    /// Stable name used for registry lookup.
    fn ident(&self) -> &'static str;

    /// Take a fresh snapshot of the hardware state.
    fn poll(&mut self);

    /// Raw state for one (port, device, index, id) tuple.
    fn input_state(
        &self,
        binds: &[BindSet],
        port: usize,
        device: Device,
        index: u32,
        id: u32,
    ) -> i16;

    /// Whether a frontend meta action fired through a backend-private path
    /// (platform hotkeys, lid switches and the like).
    fn meta_key_pressed(&self, _action: Action) -> bool {
        false
    }

    fn capabilities(&self) -> BackendCaps {
        BackendCaps::empty()
    }

    fn set_rumble(&mut self, _port: usize, _effect: RumbleEffect, _strength: u16) -> bool {
        false
    }

    fn set_sensor_state(&mut self, _port: usize, _action: SensorAction, _rate: u32) -> bool {
        false
    }

    fn sensor_input(&self, _port: usize, _id: u32) -> f32 {
        0.0
    }

    /// Grab or release the mouse. Returns false if unsupported.
    fn grab_mouse(&mut self, _grab: bool) -> bool {
        false
    }

    /// True while the backend is capturing keys for mapping; the pipeline
    /// then treats all physical input as frontend-bound.
    fn keyboard_mapping_is_blocked(&self) -> bool {
        false
    }

    fn keyboard_mapping_set_block(&mut self, _block: bool) {}
}

type BackendFactory = fn() -> Box<dyn InputBackend>;

fn make_null() -> Box<dyn InputBackend> {
    Box::new(NullBackend::new())
}

/// Compiled-in backends, in preference order. The null backend is always
/// registered last so the fallback path can never come up empty.
static BACKENDS: &[(&str, BackendFactory)] = &[("null", make_null)];

/// Names of all compiled-in backends.
pub fn backend_idents() -> impl Iterator<Item = &'static str> {
    BACKENDS.iter().map(|(ident, _)| *ident)
}

/// Instantiate the backend registered under `name`.
///
/// An unknown name logs the candidates and falls back to the first
/// registered backend rather than failing the session.
pub fn find_backend(name: &str) -> Box<dyn InputBackend> {
    if let Some((_, factory)) = BACKENDS.iter().find(|(ident, _)| *ident == name) {
        return factory();
    }

    error!("no input backend named {name:?}");
    for ident in backend_idents() {
        error!("  available: {ident}");
    }
    let (fallback, factory) = BACKENDS[0];
    warn!("falling back to input backend {fallback:?}");
    factory()
}
