//! Auxiliary input collaborators merged into the pipeline
//!
//! Touch overlay, network remote pad and the command interface each
//! contribute on top of the backend: key-mask bits are OR-ed in, and
//! digital/analog samples are merged into the result of a state query.
//! All three are optional attachments; their internals (hit testing, wire
//! protocol, transport) live outside this crate.

use crate::actions::Action;
use crate::backend::Device;

/// Touch overlay contribution.
pub trait OverlaySource {
    /// Advance overlay state for this frame.
    fn poll(&mut self, opacity: f32);

    /// Whether the overlay considers `action` pressed.
    fn key_pressed(&self, action: Action) -> bool;

    /// Merge the overlay's sample for one query tuple into `sample`.
    fn contribute(&self, sample: &mut i16, port: usize, device: Device, index: u32, id: u32);
}

/// Network remote pad contribution.
pub trait RemotePad {
    /// Drain pending datagrams into this frame's snapshot.
    fn poll(&mut self);

    fn key_pressed(&self, action: Action, port: usize) -> bool;

    fn contribute(&self, sample: &mut i16, port: usize, device: Device, index: u32, id: u32);
}

/// Command interface (console/network command channel).
pub trait CommandSource {
    fn poll(&mut self);

    /// Consume a pending command matching `action`, if any.
    fn take_pending(&mut self, action: Action) -> bool;
}
