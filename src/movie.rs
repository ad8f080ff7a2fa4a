//! Recorded-input (movie) capture and playback
//!
//! The deck is the one authority that may replace live input wholesale:
//! while playing, every state query is answered from the recorded stream;
//! while recording, every computed result is appended to it. A single state
//! enum makes recording-while-playing unrepresentable.

use tracing::debug;

/// Interface the pipeline needs from a recording collaborator.
pub trait RecordingDeck {
    fn is_playing(&self) -> bool;
    fn is_recording(&self) -> bool;

    /// Next recorded sample, or `None` when the stream is exhausted.
    fn next_input(&mut self) -> Option<i16>;

    /// End playback after stream exhaustion; subsequent queries fall
    /// through to live input.
    fn finish_playback(&mut self);

    /// Append one fully modulated sample while recording.
    fn append_input(&mut self, sample: i16);
}

/// What the deck is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeckState {
    #[default]
    Idle,
    Recording,
    Playing,
}

/// In-process deck backed by a flat sample vector.
///
/// Samples are stored in query order; playback replays them in the same
/// order, so the pipeline's fixed step ordering makes round trips bit-exact.
#[derive(Debug, Default)]
pub struct MemoryDeck {
    state: DeckState,
    samples: Vec<i16>,
    cursor: usize,
}

impl MemoryDeck {
    pub fn new() -> MemoryDeck {
        MemoryDeck::default()
    }

    pub fn state(&self) -> DeckState {
        self.state
    }

    /// Start capturing. Discards any previously recorded stream.
    pub fn start_recording(&mut self) {
        self.samples.clear();
        self.cursor = 0;
        self.state = DeckState::Recording;
        debug!("deck: recording started");
    }

    /// Replay the recorded stream from the beginning.
    pub fn start_playback(&mut self) {
        self.cursor = 0;
        self.state = DeckState::Playing;
        debug!(samples = self.samples.len(), "deck: playback started");
    }

    /// Stop whatever the deck is doing, keeping the recorded stream.
    pub fn stop(&mut self) {
        self.state = DeckState::Idle;
    }

    /// Recorded stream, in query order.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }
}

impl RecordingDeck for MemoryDeck {
    fn is_playing(&self) -> bool {
        self.state == DeckState::Playing
    }

    fn is_recording(&self) -> bool {
        self.state == DeckState::Recording
    }

    fn next_input(&mut self) -> Option<i16> {
        if self.state != DeckState::Playing {
            return None;
        }
        let sample = self.samples.get(self.cursor).copied();
        if sample.is_some() {
            self.cursor += 1;
        }
        sample
    }

    fn finish_playback(&mut self) {
        debug!("deck: playback exhausted");
        self.state = DeckState::Idle;
    }

    fn append_input(&mut self, sample: i16) {
        if self.state == DeckState::Recording {
            self.samples.push(sample);
        }
    }
}
