//! Fallback backend that reports nothing pressed
//!
//! Always registered last: a session with no usable platform backend still
//! polls cleanly and every query degrades to the neutral zero sample.

use crate::backend::{BackendCaps, Device, InputBackend};
use crate::binds::BindSet;

/// Backend with no hardware behind it.
#[derive(Debug, Default)]
pub struct NullBackend;

impl NullBackend {
    pub fn new() -> NullBackend {
        NullBackend
    }
}

impl InputBackend for NullBackend {
    fn ident(&self) -> &'static str {
        "null"
    }

    fn poll(&mut self) {}

    fn input_state(
        &self,
        _binds: &[BindSet],
        _port: usize,
        _device: Device,
        _index: u32,
        _id: u32,
    ) -> i16 {
        0
    }

    fn capabilities(&self) -> BackendCaps {
        BackendCaps::empty()
    }
}
