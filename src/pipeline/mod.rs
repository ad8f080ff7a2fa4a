//! The per-frame poll pipeline
//!
//! [`InputPipeline`] orchestrates the backend, bind tables, remap, turbo,
//! recording deck and the overlay/remote/command collaborators into the two
//! views the rest of the frontend consumes: per-key state queries for the
//! emulated core and 64-bit key masks for the frontend itself.
//!
//! Everything here runs on the frame-stepping thread between frame
//! boundaries; there is no internal locking and no operation blocks.


use tracing::{debug, warn};

use crate::actions::{Action, ActionMask, FIRST_META};
use crate::backend::{Device, InputBackend, RumbleEffect, SensorAction};
use crate::binds::{AnalogDpadMode, AnalogOverride, BindSet, Key};
use crate::config::InputSettings;
use crate::movie::RecordingDeck;
use crate::remap::RemapTable;
use crate::sources::{CommandSource, OverlaySource, RemotePad};
use crate::turbo::TurboButtons;

/// Owner of all per-session input state, polled once per emulated frame.
pub struct InputPipeline {
    backend: Box<dyn InputBackend>,
    settings: InputSettings,
    binds: Vec<BindSet>,
    autoconf_binds: Vec<BindSet>,
    remap: Vec<RemapTable>,
    turbo: TurboButtons,
    deck: Option<Box<dyn RecordingDeck>>,
    overlay: Option<Box<dyn OverlaySource>>,
    remote: Option<Box<dyn RemotePad>>,
    command: Option<Box<dyn CommandSource>>,
    /// Physical keys are currently frontend-bound; hotkey interpretation of
    /// them is suppressed.
    block_hotkey: bool,
    /// Emulated-core input is suppressed (hotkey-enable held, or the
    /// frontend decided to flush).
    block_core_input: bool,
    flushing_input: bool,
    nonblock_state: bool,
    /// On-screen keyboard dialog owns keyboard input; menu synthesis from
    /// navigation keys is suspended.
    osk_active: bool,
}

impl InputPipeline {
    /// Build a pipeline from settings and a backend instance.
    pub fn new(mut settings: InputSettings, backend: Box<dyn InputBackend>) -> InputPipeline {
        settings.sanitize();
        let users = settings.max_users;
        let mut binds = vec![BindSet::unbound(); users];
        if let Some(first) = binds.first_mut() {
            *first = BindSet::default_keyboard();
        }

        debug!(backend = backend.ident(), users, "input pipeline up");
        InputPipeline {
            backend,
            turbo: TurboButtons::new(users),
            binds,
            autoconf_binds: vec![BindSet::unbound(); users],
            remap: vec![RemapTable::identity(); users],
            settings,
            deck: None,
            overlay: None,
            remote: None,
            command: None,
            block_hotkey: false,
            block_core_input: false,
            flushing_input: false,
            nonblock_state: false,
            osk_active: false,
        }
    }

    // --- attachments -----------------------------------------------------

    pub fn attach_deck(&mut self, deck: Box<dyn RecordingDeck>) {
        self.deck = Some(deck);
    }

    pub fn detach_deck(&mut self) -> Option<Box<dyn RecordingDeck>> {
        self.deck.take()
    }

    pub fn attach_overlay(&mut self, overlay: Box<dyn OverlaySource>) {
        self.overlay = Some(overlay);
    }

    pub fn attach_remote(&mut self, remote: Box<dyn RemotePad>) {
        self.remote = Some(remote);
    }

    pub fn attach_command(&mut self, command: Box<dyn CommandSource>) {
        self.command = Some(command);
    }

    // --- accessors -------------------------------------------------------

    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut InputSettings {
        &mut self.settings
    }

    pub fn binds(&self, port: usize) -> Option<&BindSet> {
        self.binds.get(port)
    }

    pub fn binds_mut(&mut self, port: usize) -> Option<&mut BindSet> {
        self.binds.get_mut(port)
    }

    pub fn autoconf_binds_mut(&mut self, port: usize) -> Option<&mut BindSet> {
        self.autoconf_binds.get_mut(port)
    }

    pub fn remap_mut(&mut self, port: usize) -> Option<&mut RemapTable> {
        self.remap.get_mut(port)
    }

    pub fn backend_ident(&self) -> &'static str {
        self.backend.ident()
    }

    pub fn frame_count(&self) -> u32 {
        self.turbo.count()
    }

    // --- per-frame poll --------------------------------------------------

    /// Advance one frame: snapshot the backend, recompute turbo engagement
    /// per user, and run the collaborator sub-polls. Call exactly once per
    /// emulated frame, before any state queries for that frame.
    pub fn poll(&mut self) {
        self.backend.poll();
        self.turbo.tick();

        for port in 0..self.binds.len() {
            // Raw query on purpose: turbo engagement bypasses remap, the
            // recording gate and the hotkey gate.
            let engaged = !self.block_core_input
                && self.backend.input_state(
                    &self.binds,
                    port,
                    Device::Joypad,
                    0,
                    Action::TurboEnable.index() as u32,
                ) != 0;
            self.turbo.set_frame_enable(port, engaged);
        }

        if let Some(overlay) = self.overlay.as_mut() {
            overlay.poll(self.settings.overlay_opacity);
        }
        if let Some(command) = self.command.as_mut() {
            command.poll();
        }
        if let Some(remote) = self.remote.as_mut() {
            remote.poll();
        }
    }

    // --- core-facing state query -----------------------------------------

    /// Canonical per-key query for the emulated core.
    ///
    /// The step ordering is a contract: playback override first, then
    /// remap, then the blocked check around the raw backend query and the
    /// overlay/remote merge, then turbo, then the record append. Recording
    /// must see post-turbo values so playback is bit-exact, and a blocked
    /// sample must never arm a turbo bit.
    pub fn input_state(&mut self, port: usize, device: u32, index: u32, id: u32) -> i16 {
        let mut res: i16 = 0;

        if let Some(deck) = self.deck.as_mut() {
            if deck.is_playing() {
                match deck.next_input() {
                    Some(sample) => return sample,
                    None => deck.finish_playback(),
                }
            }
        }

        if port >= self.binds.len() {
            return 0;
        }

        let device = Device::from_raw(device);
        let (index, id) = self.apply_remap(port, device, index, id);

        if !self.flushing_input && !self.block_core_input {
            if (id as usize) < FIRST_META || device == Device::Keyboard {
                res = self
                    .backend
                    .input_state(&self.binds, port, device, index, id);
            }
            if let Some(overlay) = self.overlay.as_ref() {
                overlay.contribute(&mut res, port, device, index, id);
            }
            if let Some(remote) = self.remote.as_ref() {
                remote.contribute(&mut res, port, device, index, id);
            }
        }

        if device == Device::Joypad {
            if let Some(action) = Action::from_index(id as usize) {
                if !action.is_dpad() {
                    res = self.turbo.apply(
                        port,
                        action,
                        res,
                        self.settings.turbo_period,
                        self.settings.turbo_duty_cycle,
                    );
                }
            }
        }

        if let Some(deck) = self.deck.as_mut() {
            if deck.is_recording() {
                deck.append_input(res);
            }
        }

        res
    }

    fn apply_remap(&self, port: usize, device: Device, index: u32, id: u32) -> (u32, u32) {
        if !self.settings.remap_binds_enable {
            return (index, id);
        }
        match device {
            Device::Joypad => (index, self.remap[port].digital(id)),
            Device::Analog => self.remap[port].analog(index, id),
            _ => (index, id),
        }
    }

    // --- hotkey gate -----------------------------------------------------

    /// Latch the hotkey/core blocking flags for this frame.
    ///
    /// Returns true when emulated input must be suppressed so hotkeys can
    /// share physical keys with the pad.
    fn check_block_hotkey(&mut self, enable_hotkey_pressed: bool) -> bool {
        let kb_mapping_blocked = self.backend.keyboard_mapping_is_blocked();

        // A hotkey-enable bind on either table of the first user arms the
        // gate; with nothing bound, hotkeys are always allowed.
        let use_hotkey_enable = self.binds[0].get(Action::EnableHotkey).is_bound()
            || self.autoconf_binds[0].get(Action::EnableHotkey).is_bound();

        self.block_hotkey =
            kb_mapping_blocked || (use_hotkey_enable && !enable_hotkey_pressed);

        use_hotkey_enable && enable_hotkey_pressed
    }

    fn enable_hotkey_pressed(&self) -> bool {
        self.backend.input_state(
            &self.binds,
            0,
            Device::Joypad,
            0,
            Action::EnableHotkey.index() as u32,
        ) != 0
    }

    // --- frontend key masks ----------------------------------------------

    /// Input sample for this frame: one bit per pressed action.
    pub fn keys_pressed(&mut self) -> ActionMask {
        let enable_hotkey = self.enable_hotkey_pressed();
        self.block_core_input = self.check_block_hotkey(enable_hotkey);

        let mut mask = ActionMask::EMPTY;
        for action in Action::ALL {
            if self.key_pressed_internal(action) {
                mask.set(action);
            }
        }
        mask
    }

    fn key_pressed_internal(&mut self, action: Action) -> bool {
        if (!self.block_core_input && !action.is_meta()) || !self.block_hotkey {
            if self
                .backend
                .input_state(&self.binds, 0, Device::Joypad, 0, action.index() as u32)
                != 0
            {
                return true;
            }
        }

        if action.is_meta() && self.backend.meta_key_pressed(action) {
            return true;
        }

        if let Some(overlay) = self.overlay.as_ref() {
            if overlay.key_pressed(action) {
                return true;
            }
        }
        if let Some(command) = self.command.as_mut() {
            if command.take_pending(action) {
                return true;
            }
        }
        if let Some(remote) = self.remote.as_ref() {
            if remote.key_pressed(action, 0) {
                return true;
            }
        }

        false
    }

    /// Menu variant of [`keys_pressed`]: restricts pad polling to the
    /// controlling ports, installs the left-stick D-pad substitution over
    /// the autoconfigured binds, and synthesizes pad actions from keyboard
    /// navigation keys.
    pub fn menu_keys_pressed(&mut self) -> ActionMask {
        let mut overrides: Vec<Option<AnalogOverride>> =
            Vec::with_capacity(self.autoconf_binds.len());
        for set in self.autoconf_binds.iter_mut() {
            match set.push_analog_dpad(AnalogDpadMode::LeftStick) {
                Ok(over) => overrides.push(Some(over)),
                Err(err) => {
                    warn!("menu analog dpad push skipped: {err}");
                    overrides.push(None);
                }
            }
        }

        let enable_hotkey = self.enable_hotkey_pressed();
        self.block_core_input = self.check_block_hotkey(enable_hotkey);

        let mut mask = ActionMask::EMPTY;
        for action in Action::ALL {
            if self.menu_key_pressed_internal(action) {
                mask.set(action);
            }
        }

        for (set, over) in self.autoconf_binds.iter_mut().zip(overrides) {
            if let Some(over) = over {
                set.pop_analog_dpad(over);
            }
        }

        if self.osk_active {
            return mask;
        }
        self.synthesize_menu_keys(&mut mask);
        mask
    }

    fn menu_key_pressed_internal(&mut self, action: Action) -> bool {
        let gate_open = (!self.block_core_input && !action.is_meta()) || !self.block_hotkey;
        if gate_open && self.binds[0].get(action).is_bound() {
            let port_max = if self.settings.all_users_control_menu {
                self.binds.len()
            } else {
                1
            };
            for port in 0..port_max {
                if self
                    .backend
                    .input_state(&self.binds, port, Device::Joypad, 0, action.index() as u32)
                    != 0
                {
                    return true;
                }
            }
        }

        if action.is_meta() && self.backend.meta_key_pressed(action) {
            return true;
        }

        if let Some(overlay) = self.overlay.as_ref() {
            if overlay.key_pressed(action) {
                return true;
            }
        }
        if let Some(command) = self.command.as_mut() {
            if command.take_pending(action) {
                return true;
            }
        }
        if let Some(remote) = self.remote.as_ref() {
            if remote.key_pressed(action, 0) {
                return true;
            }
        }

        false
    }

    fn keyboard_pressed(&self, key: Key) -> bool {
        self.backend
            .input_state(&self.binds, 0, Device::Keyboard, 0, key.code())
            != 0
    }

    /// Map keyboard navigation keys onto pad/menu actions.
    fn synthesize_menu_keys(&self, mask: &mut ActionMask) {
        let swap = self.settings.menu_swap_ok_cancel_buttons;

        if self.keyboard_pressed(Key::Return) {
            mask.set(if swap { Action::B } else { Action::A });
        }
        if self.keyboard_pressed(Key::Backspace) {
            mask.set(if swap { Action::A } else { Action::B });
        }
        if self.keyboard_pressed(Key::Space) {
            mask.set(Action::Start);
        }
        if self.keyboard_pressed(Key::Slash) {
            mask.set(Action::X);
        }
        if self.keyboard_pressed(Key::RShift) {
            mask.set(Action::Select);
        }
        if self.keyboard_pressed(Key::Right) {
            mask.set(Action::Right);
        }
        if self.keyboard_pressed(Key::Left) {
            mask.set(Action::Left);
        }
        if self.keyboard_pressed(Key::Down) {
            mask.set(Action::Down);
        }
        if self.keyboard_pressed(Key::Up) {
            mask.set(Action::Up);
        }
        if self.keyboard_pressed(Key::PageUp) {
            mask.set(Action::L);
        }
        if self.keyboard_pressed(Key::PageDown) {
            mask.set(Action::R);
        }

        // Quit and fullscreen follow whatever key the user bound them to.
        if let Some(key) = self.binds[0].get(Action::Quit).key {
            if self.keyboard_pressed(key) {
                mask.set(Action::Quit);
            }
        }
        if let Some(key) = self.binds[0].get(Action::FullscreenToggle).key {
            if self.keyboard_pressed(key) {
                mask.set(Action::FullscreenToggle);
            }
        }
    }

    // --- analog-dpad install for a batch of core queries ------------------

    /// Run `f` with each user's configured analog-to-dpad substitution
    /// installed over the primary binds, restoring them on the way out.
    pub fn with_analog_dpad_installed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut overrides: Vec<Option<AnalogOverride>> = Vec::with_capacity(self.binds.len());
        for (port, set) in self.binds.iter_mut().enumerate() {
            let mode = self.settings.analog_dpad_mode(port);
            match set.push_analog_dpad(mode) {
                Ok(over) => overrides.push(Some(over)),
                Err(err) => {
                    warn!("analog dpad push skipped for port {port}: {err}");
                    overrides.push(None);
                }
            }
        }

        let out = f(self);

        for (set, over) in self.binds.iter_mut().zip(overrides) {
            if let Some(over) = over {
                set.pop_analog_dpad(over);
            }
        }
        out
    }

    // --- flags ------------------------------------------------------------

    pub fn set_flushing_input(&mut self, flushing: bool) {
        self.flushing_input = flushing;
    }

    pub fn is_flushing_input(&self) -> bool {
        self.flushing_input
    }

    pub fn set_core_input_blocked(&mut self, blocked: bool) {
        self.block_core_input = blocked;
    }

    pub fn is_core_input_blocked(&self) -> bool {
        self.block_core_input
    }

    pub fn set_hotkey_blocked(&mut self, blocked: bool) {
        self.block_hotkey = blocked;
    }

    pub fn is_hotkey_blocked(&self) -> bool {
        self.block_hotkey
    }

    pub fn set_nonblock_state(&mut self, nonblock: bool) {
        self.nonblock_state = nonblock;
    }

    pub fn is_nonblock_state(&self) -> bool {
        self.nonblock_state
    }

    pub fn set_osk_active(&mut self, active: bool) {
        self.osk_active = active;
    }

    /// Clear all latched flags and turbo state; attachments stay.
    pub fn reset(&mut self) {
        self.block_hotkey = false;
        self.block_core_input = false;
        self.flushing_input = false;
        self.nonblock_state = false;
        self.osk_active = false;
        self.turbo.reset();
    }

    // --- backend pass-throughs -------------------------------------------

    pub fn set_rumble(&mut self, port: usize, effect: RumbleEffect, strength: u16) -> bool {
        self.backend.set_rumble(port, effect, strength)
    }

    pub fn set_sensor_state(&mut self, port: usize, action: SensorAction, rate: u32) -> bool {
        self.backend.set_sensor_state(port, action, rate)
    }

    pub fn sensor_input(&self, port: usize, id: u32) -> f32 {
        self.backend.sensor_input(port, id)
    }

    pub fn grab_mouse(&mut self, grab: bool) -> bool {
        self.backend.grab_mouse(grab)
    }

    pub fn keyboard_mapping_set_block(&mut self, block: bool) {
        self.backend.keyboard_mapping_set_block(block);
    }
}
