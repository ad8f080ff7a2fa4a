//! Per-user logical remapping applied before bind lookup
//!
//! A remap table substitutes one logical ID for another. It covers the 16
//! digital pad buttons plus the four analog (index, id) pairs; meta actions
//! are never remappable.

use thiserror::Error;

use crate::actions::{Action, FIRST_CUSTOM_BIND};

/// Digital slots plus the four combined analog pair slots.
const REMAP_SLOTS: usize = FIRST_CUSTOM_BIND + 4;

/// Errors from remap-table edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemapError {
    #[error("{0:?} is not a remappable device button")]
    NotADeviceButton(Action),
    #[error("analog remap pair out of range: index {index}, id {id}")]
    AnalogPairOutOfRange { index: u32, id: u32 },
}

/// One user's remap table. Defaults to the identity mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapTable {
    ids: [u8; REMAP_SLOTS],
}

impl Default for RemapTable {
    fn default() -> Self {
        Self::identity()
    }
}

impl RemapTable {
    /// The identity table: every ID maps to itself.
    pub fn identity() -> RemapTable {
        let mut ids = [0u8; REMAP_SLOTS];
        for (i, slot) in ids.iter_mut().enumerate() {
            *slot = i as u8;
        }
        RemapTable { ids }
    }

    /// Redirect one digital button to another.
    pub fn set_digital(&mut self, from: Action, to: Action) -> Result<(), RemapError> {
        if !from.is_device_button() {
            return Err(RemapError::NotADeviceButton(from));
        }
        if !to.is_device_button() {
            return Err(RemapError::NotADeviceButton(to));
        }
        self.ids[from.index()] = to.index() as u8;
        Ok(())
    }

    /// Redirect one analog (index, id) pair to another.
    pub fn set_analog(
        &mut self,
        from: (u32, u32),
        to: (u32, u32),
    ) -> Result<(), RemapError> {
        for (index, id) in [from, to] {
            if index >= 2 || id >= 2 {
                return Err(RemapError::AnalogPairOutOfRange { index, id });
            }
        }
        let slot = FIRST_CUSTOM_BIND + (from.0 * 2 + from.1) as usize;
        self.ids[slot] = (to.0 * 2 + to.1) as u8;
        Ok(())
    }

    /// Substitute a digital pad ID. IDs at or past the custom-bind boundary
    /// pass through untouched.
    pub fn digital(&self, id: u32) -> u32 {
        if (id as usize) < FIRST_CUSTOM_BIND {
            u32::from(self.ids[id as usize])
        } else {
            id
        }
    }

    /// Substitute an analog (index, id) pair. Pairs outside {0,1}x{0,1}
    /// pass through untouched.
    pub fn analog(&self, index: u32, id: u32) -> (u32, u32) {
        if index < 2 && id < 2 {
            let slot = FIRST_CUSTOM_BIND + (index * 2 + id) as usize;
            let mapped = u32::from(self.ids[slot]);
            ((mapped >> 1) & 1, mapped & 1)
        } else {
            (index, id)
        }
    }
}
