//! Score queue container.
//!
//! A score is an ordered set of channels (insertion order is the
//! channel id), each channel an ordered sequence of chunk images.
//! Lock-step playback requires every channel to carry the same number
//! of chunks and every chunk to share one even width; [`validate`]
//! checks that contract up front so the decode loop can index freely.
//!
//! [`validate`]: ScoreQueue::validate

use crate::image::{PIANO_ROWS, PixelImage};
use crate::{Result, ScoreError};

/// Ordered channels of chunk images making up one score.
#[derive(Debug, Clone)]
pub struct ScoreQueue<I> {
    channels: Vec<Vec<I>>,
}

impl<I> Default for ScoreQueue<I> {
    fn default() -> Self {
        ScoreQueue { channels: Vec::new() }
    }
}

impl<I: PixelImage> ScoreQueue<I> {
    /// Create an empty queue.
    pub fn new() -> Self {
        ScoreQueue { channels: Vec::new() }
    }

    /// Build a queue from pre-assembled channels.
    pub fn from_channels(channels: Vec<Vec<I>>) -> Self {
        ScoreQueue { channels }
    }

    /// Append one channel (a sequence of chunk images).
    pub fn push_channel(&mut self, chunks: Vec<I>) {
        self.channels.push(chunks);
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of chunks per channel, taken from the first channel.
    pub fn chunk_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Chunk width in pixels, taken from the first chunk of the first
    /// channel. Zero for an empty queue.
    pub fn width(&self) -> u32 {
        self.channels
            .first()
            .and_then(|chunks| chunks.first())
            .map_or(0, PixelImage::width)
    }

    /// True when there is nothing to play (no channels or no chunks).
    pub fn is_empty(&self) -> bool {
        self.chunk_count() == 0
    }

    /// Chunk `chunk` of channel `channel`, if present.
    pub fn chunk(&self, channel: usize, chunk: usize) -> Option<&I> {
        self.channels.get(channel).and_then(|chunks| chunks.get(chunk))
    }

    /// Iterate over channels in queue order.
    pub fn channels(&self) -> impl Iterator<Item = &[I]> {
        self.channels.iter().map(Vec::as_slice)
    }

    /// Mutable access to the channel storage.
    ///
    /// The queue is live: hosts may rewrite chunks between scheduling
    /// steps and the player picks the change up on the next step. The
    /// layout contract is re-checked only at `play()`, so edits that
    /// break it mid-run are the host's responsibility.
    pub fn channels_mut(&mut self) -> &mut Vec<Vec<I>> {
        &mut self.channels
    }

    /// Check the layout contract.
    ///
    /// An empty queue (no channels, or channels with no chunks at all)
    /// is valid and plays as a no-op. Otherwise every chunk must be
    /// [`PIANO_ROWS`] tall and share one even, non-zero width, and
    /// every channel must hold the same number of chunks.
    pub fn validate(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Ok(());
        }

        let expected_chunks = self.channels[0].len();
        let expected_width = self.width();

        for (channel, chunks) in self.channels.iter().enumerate() {
            if chunks.len() != expected_chunks {
                return Err(ScoreError::RaggedChannels {
                    channel,
                    chunks: chunks.len(),
                    expected: expected_chunks,
                });
            }
            for (chunk, image) in chunks.iter().enumerate() {
                let width = image.width();
                if width == 0 {
                    return Err(ScoreError::ZeroWidth { channel, chunk });
                }
                if width % 2 != 0 {
                    return Err(ScoreError::OddWidth { channel, chunk, width });
                }
                if width != expected_width {
                    return Err(ScoreError::WidthMismatch {
                        channel,
                        chunk,
                        width,
                        expected: expected_width,
                    });
                }
                let height = image.height();
                if height != PIANO_ROWS {
                    return Err(ScoreError::BadHeight {
                        channel,
                        chunk,
                        height,
                        expected: PIANO_ROWS,
                    });
                }
            }
        }
        Ok(())
    }
}
