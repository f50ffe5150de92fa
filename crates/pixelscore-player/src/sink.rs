//! Output sink capabilities.
//!
//! The scheduler never talks to hardware directly. Tone emission goes
//! through [`ToneOutput`], supplied by the host; a registered
//! [`StepHandler`] overrides it and receives each step's whole batch
//! instead.

/// Tone emission capability.
///
/// `play_tone` is fire-and-forget: the scheduler never waits for a
/// tone to finish. It keeps its own time and calls `stop_all_tones`
/// at every synchronization boundary, which may cut tones short when
/// their requested duration exceeds the step's quantum.
pub trait ToneOutput: Send + Sync {
    /// Start a tone at `frequency_hz` for `duration_ms`.
    fn play_tone(&self, frequency_hz: u32, duration_ms: u64);

    /// Silence everything immediately.
    fn stop_all_tones(&self);
}

/// Per-step batch callback, replacing the default tone sink.
///
/// The four slices are aligned by position and equally long: entry `i`
/// is the note at `notes[i]`, sounding at `frequencies_hz[i]` for
/// `durations_ms[i]`, introduced by channel `channels[i]`.
pub trait StepHandler: Send + Sync {
    /// Receive one scheduling step's emission batch.
    fn on_step(&self, channels: &[usize], notes: &[u8], frequencies_hz: &[u32], durations_ms: &[u64]);
}

/// Tone sink that discards everything. For headless hosts and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTone;

impl ToneOutput for NullTone {
    fn play_tone(&self, _frequency_hz: u32, _duration_ms: u64) {}

    fn stop_all_tones(&self) {}
}
