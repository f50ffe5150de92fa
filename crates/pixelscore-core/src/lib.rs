//! Bitmap Score Decoding
//!
//! This crate decodes music authored as bitmap images into discrete
//! note events. A score is a queue of channels; each channel is a
//! sequence of chunk images 88 pixels tall. Images are consumed in
//! column pairs: the first column holds the notes to sound (one piano
//! row per pixel), the second column is a binary duration mask where
//! row `r` contributes `2^r` milliseconds.
//!
//! Decoding is pure and single-threaded. Playback scheduling lives in
//! the `pixelscore-player` crate.
//!
//! # Quick start
//! ```
//! use pixelscore_core::{PixelGrid, ScoreQueue, merge_step, PIANO_ROWS};
//!
//! // One channel, one 2x88 chunk: note row 36 (A4), duration 4ms.
//! let mut chunk = PixelGrid::new(2, PIANO_ROWS);
//! chunk.set_pixel(0, 36, 1);
//! chunk.set_pixel(1, 2, 1);
//!
//! let queue = ScoreQueue::from_channels(vec![vec![chunk]]);
//! queue.validate().unwrap();
//!
//! let batch = merge_step(&queue, 0, 0);
//! assert_eq!(batch.entries[0].frequency_hz, 440);
//! assert_eq!(batch.wait_ms(), 4);
//! ```

#![warn(missing_docs)]

pub mod decode;
pub mod image;
pub mod merge;
pub mod pitch;
pub mod score;

pub use decode::{Frame, decode_frame};
pub use image::{PIANO_ROWS, PixelGrid, PixelImage};
pub use merge::{StepBatch, StepEntry, merge_step};
pub use pitch::{NoteName, note_frequency, note_name};
pub use score::ScoreQueue;

/// Errors raised when a score queue violates the layout contract.
///
/// These are configuration errors: they are detected by
/// [`ScoreQueue::validate`] before playback starts, never deep inside
/// the decode loop.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// A chunk image has zero width.
    #[error("channel {channel} chunk {chunk} has zero width")]
    ZeroWidth {
        /// Offending channel index.
        channel: usize,
        /// Offending chunk index within the channel.
        chunk: usize,
    },

    /// A chunk image has an odd width; columns come in note/duration pairs.
    #[error("channel {channel} chunk {chunk} has odd width {width} (columns must pair up)")]
    OddWidth {
        /// Offending channel index.
        channel: usize,
        /// Offending chunk index within the channel.
        chunk: usize,
        /// The odd width found.
        width: u32,
    },

    /// A chunk image's width differs from the queue width.
    #[error("channel {channel} chunk {chunk} is {width} px wide, expected {expected}")]
    WidthMismatch {
        /// Offending channel index.
        channel: usize,
        /// Offending chunk index within the channel.
        chunk: usize,
        /// The width found.
        width: u32,
        /// The width established by the first chunk.
        expected: u32,
    },

    /// A chunk image is not exactly [`PIANO_ROWS`] pixels tall.
    #[error("channel {channel} chunk {chunk} is {height} px tall, expected {expected}")]
    BadHeight {
        /// Offending channel index.
        channel: usize,
        /// Offending chunk index within the channel.
        chunk: usize,
        /// The height found.
        height: u32,
        /// Required height (always 88).
        expected: u32,
    },

    /// Channels disagree on chunk count; lock-step playback needs equal lengths.
    #[error("channel {channel} has {chunks} chunks, expected {expected}")]
    RaggedChannels {
        /// Offending channel index.
        channel: usize,
        /// The chunk count found.
        chunks: usize,
        /// The chunk count established by the first channel.
        expected: usize,
    },
}

/// Result alias for score decoding operations.
pub type Result<T> = std::result::Result<T, ScoreError>;
