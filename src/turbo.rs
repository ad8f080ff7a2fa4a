//! Turbo (auto-fire) modulation
//!
//! While the turbo-enable input is engaged, pressing a digital button arms
//! it: its observed state becomes a square wave driven by the shared frame
//! counter until the button is physically released. D-pad directions are
//! exempt.

use crate::actions::{Action, FIRST_CUSTOM_BIND};

/// Per-user turbo bookkeeping plus the shared frame counter.
#[derive(Debug, Clone)]
pub struct TurboButtons {
    /// Whether the turbo-enable input is engaged this frame, per user.
    frame_enable: Vec<bool>,
    /// One bit per digital button that is currently in turbo mode.
    enable: Vec<u16>,
    /// Frames polled so far. Advanced once per poll; pre-wound one below
    /// zero so the first polled frame observes phase 0.
    count: u32,
}

impl TurboButtons {
    pub fn new(max_users: usize) -> TurboButtons {
        TurboButtons {
            frame_enable: vec![false; max_users],
            enable: vec![0; max_users],
            count: u32::MAX,
        }
    }

    /// Advance the shared frame counter. Called once per poll.
    pub fn tick(&mut self) {
        self.count = self.count.wrapping_add(1);
    }

    /// Current frame count.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Latch whether turbo is engaged for `port` this frame.
    pub fn set_frame_enable(&mut self, port: usize, engaged: bool) {
        if let Some(slot) = self.frame_enable.get_mut(port) {
            *slot = engaged;
        }
    }

    pub fn frame_enable(&self, port: usize) -> bool {
        self.frame_enable.get(port).copied().unwrap_or(false)
    }

    /// Modulate one digital sample.
    ///
    /// Arms the button when turbo is engaged and the raw sample is pressed;
    /// disarms on physical release regardless of engagement. An armed button
    /// reads pressed only inside the duty window of the period. D-pad
    /// directions and non-digital IDs pass through untouched.
    pub fn apply(
        &mut self,
        port: usize,
        action: Action,
        raw: i16,
        period: u32,
        duty_cycle: u32,
    ) -> i16 {
        if action.is_dpad() || action.index() >= FIRST_CUSTOM_BIND || period == 0 {
            return raw;
        }
        let Some(mask) = self.enable.get_mut(port) else {
            return raw;
        };

        let bit = 1u16 << action.index();
        if raw != 0 && self.frame_enable[port] {
            *mask |= bit;
        } else if raw == 0 {
            *mask &= !bit;
        }

        if *mask & bit != 0 {
            i16::from(raw != 0 && (self.count % period) < duty_cycle)
        } else {
            raw
        }
    }

    /// Drop all armed buttons and rewind the counter.
    pub fn reset(&mut self) {
        self.frame_enable.fill(false);
        self.enable.fill(0);
        self.count = u32::MAX;
    }
}
