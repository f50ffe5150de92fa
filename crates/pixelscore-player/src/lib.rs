//! Synchronized Playback of Bitmap Scores
//!
//! This crate drives playback of scores decoded by `pixelscore-core`.
//! Channels advance in lock-step: every scheduling step merges one
//! column pair across all channels, emits the de-duplicated batch
//! through the output sink, waits for the shortest channel duration
//! and silences everything before moving on.
//!
//! Tone emission is a host capability ([`ToneOutput`]); registering a
//! [`StepHandler`] overrides it with a whole-batch callback. Playback
//! runs on its own thread and is controlled cooperatively through the
//! player or a cloned [`PlaybackHandle`].
//!
//! # Example
//! ```
//! use pixelscore_player::{NullTone, ScorePlayer};
//! use pixelscore_core::{PixelGrid, ScoreQueue, PIANO_ROWS};
//! use std::sync::Arc;
//!
//! let mut chunk = PixelGrid::new(2, PIANO_ROWS);
//! chunk.set_pixel(0, 36, 1); // A4
//! chunk.set_pixel(1, 1, 1); // 2ms
//!
//! let player = ScorePlayer::new(Arc::new(NullTone));
//! player.set_image_queue(ScoreQueue::from_channels(vec![vec![chunk]]));
//! player.play().unwrap();
//! while player.is_playing() {
//!     std::thread::yield_now();
//! }
//! ```

#![warn(missing_docs)]

mod control;
mod dispatch;
mod player;
mod sink;

pub use control::{PlaybackHandle, PlaybackState};
pub use dispatch::MAX_PENDING_STEPS;
pub use player::{MAX_STEP_MS, ScorePlayer};
pub use sink::{NullTone, StepHandler, ToneOutput};

// Re-export the decode domain so hosts only need one dependency.
pub use pixelscore_core::{
    PIANO_ROWS, PixelGrid, PixelImage, ScoreError, ScoreQueue, StepBatch, StepEntry,
};

/// Errors raised by playback operations.
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    /// The score queue violates the layout contract.
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// Result alias for playback operations.
pub type Result<T> = std::result::Result<T, PlayerError>;
