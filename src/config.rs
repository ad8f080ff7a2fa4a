//! Input settings
//!
//! Serde-backed YAML settings for the input layer. Every field has a
//! default so an empty file (or no file at all) yields a working profile.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::binds::AnalogDpadMode;

/// Hard cap on simultaneously bound users.
pub const MAX_USERS: usize = 16;

/// Input layer settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputSettings {
    /// Backend to select at startup, by registry name.
    pub backend: String,
    /// Number of active users (ports), capped at [`MAX_USERS`].
    pub max_users: usize,
    /// Turbo square-wave period, in frames.
    pub turbo_period: u32,
    /// Frames per period during which a turbo button reads pressed.
    pub turbo_duty_cycle: u32,
    /// Whether per-user remap tables are applied.
    pub remap_binds_enable: bool,
    /// Per-user analog-to-dpad mode; users past the end of the list get
    /// [`AnalogDpadMode::None`].
    pub analog_dpad_mode: Vec<AnalogDpadMode>,
    /// Whether every port may drive the menu, or only port 0.
    pub all_users_control_menu: bool,
    /// Swap which keyboard key produces menu ok vs. cancel.
    pub menu_swap_ok_cancel_buttons: bool,
    /// Opacity handed to the touch overlay each poll.
    pub overlay_opacity: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        InputSettings {
            backend: "null".to_string(),
            max_users: 2,
            turbo_period: 6,
            turbo_duty_cycle: 3,
            remap_binds_enable: false,
            analog_dpad_mode: Vec::new(),
            all_users_control_menu: false,
            menu_swap_ok_cancel_buttons: false,
            overlay_opacity: 0.7,
        }
    }
}

impl InputSettings {
    /// Load settings from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<InputSettings> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading input settings from {}", path.display()))?;
        let mut settings: InputSettings = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing input settings from {}", path.display()))?;
        settings.sanitize();
        Ok(settings)
    }

    /// Clamp out-of-range values rather than failing the session.
    pub fn sanitize(&mut self) {
        if self.max_users == 0 {
            warn!("max_users of 0 makes no sense; using 1");
            self.max_users = 1;
        }
        if self.max_users > MAX_USERS {
            warn!(
                "max_users {} exceeds the {} cap; clamping",
                self.max_users, MAX_USERS
            );
            self.max_users = MAX_USERS;
        }
        if self.turbo_period == 0 {
            warn!("turbo_period of 0 makes no sense; using 1");
            self.turbo_period = 1;
        }
        if self.turbo_duty_cycle > self.turbo_period {
            self.turbo_duty_cycle = self.turbo_period;
        }
    }

    /// Analog-to-dpad mode for one port.
    pub fn analog_dpad_mode(&self, port: usize) -> AnalogDpadMode {
        self.analog_dpad_mode
            .get(port)
            .copied()
            .unwrap_or(AnalogDpadMode::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_parses_to_defaults() {
        let settings: InputSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings.backend, "null");
        assert_eq!(settings.turbo_period, 6);
        assert_eq!(settings.turbo_duty_cycle, 3);
        assert!(!settings.remap_binds_enable);
    }

    #[test]
    fn load_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "max_users: 4\nturbo_period: 5\nturbo_duty_cycle: 2\nanalog_dpad_mode: [left_stick, none]"
        )
        .unwrap();

        let settings = InputSettings::load(file.path()).unwrap();
        assert_eq!(settings.max_users, 4);
        assert_eq!(settings.turbo_period, 5);
        assert_eq!(settings.analog_dpad_mode(0), AnalogDpadMode::LeftStick);
        assert_eq!(settings.analog_dpad_mode(1), AnalogDpadMode::None);
        // Past the end of the list: default mode.
        assert_eq!(settings.analog_dpad_mode(3), AnalogDpadMode::None);
    }

    #[test]
    fn sanitize_clamps_nonsense() {
        let mut settings = InputSettings {
            max_users: 99,
            turbo_period: 0,
            turbo_duty_cycle: 10,
            ..InputSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.max_users, MAX_USERS);
        assert_eq!(settings.turbo_period, 1);
        assert_eq!(settings.turbo_duty_cycle, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(InputSettings::load("/definitely/not/here.yaml").is_err());
    }
}
