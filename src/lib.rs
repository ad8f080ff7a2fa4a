//! padmux - frame-stepped input multiplexing for emulation frontends
//!
//! Unifies heterogeneous input backends (gamepad, keyboard, touch overlay,
//! network remote pad) into one polled, per-frame view: per-key state
//! queries for the emulated core and 64-bit action masks for the frontend
//! menu. The [`pipeline::InputPipeline`] is the entry point; everything
//! else feeds it.

pub mod actions;
pub mod backend;
pub mod binds;
pub mod config;
pub mod movie;
pub mod pipeline;
pub mod remap;
pub mod sources;
pub mod turbo;
pub mod viewport;

pub use actions::{Action, ActionMask, BIND_COUNT, FIRST_CUSTOM_BIND, FIRST_META};
pub use backend::{find_backend, BackendCaps, Device, InputBackend};
pub use binds::{AnalogDpadMode, BindSet, Binding, JoyAxis, JoyButton, Key};
pub use config::InputSettings;
pub use movie::{MemoryDeck, RecordingDeck};
pub use pipeline::InputPipeline;
pub use remap::RemapTable;
pub use viewport::{translate_coords, TranslatedPointer, Viewport};
