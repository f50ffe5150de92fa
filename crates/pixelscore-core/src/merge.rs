//! Cross-channel merge.
//!
//! One scheduling step decodes the same column pair from every
//! channel's current chunk and merges the results into a single
//! emission batch. Frequencies are de-duplicated across channels: the
//! first channel (in queue order) to introduce a frequency owns its
//! emission for that step, later duplicates are dropped entirely.
//! Every channel still reports its decoded duration so the scheduler
//! can derive the synchronization quantum.

use crate::decode::decode_frame;
use crate::image::PixelImage;
use crate::pitch::note_frequency;
use crate::score::ScoreQueue;

/// One emitted note within a scheduling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEntry {
    /// Channel that introduced the frequency.
    pub channel: usize,
    /// Note index, 0..=87.
    pub note: u8,
    /// Frequency rounded to the nearest integer Hz.
    pub frequency_hz: u32,
    /// The owning channel's decoded duration for this step.
    pub duration_ms: u64,
}

/// Merged output of one scheduling step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepBatch {
    /// Distinct frequencies introduced this step, in channel/row order.
    pub entries: Vec<StepEntry>,
    /// Decoded duration of every channel, indexed by channel id. A
    /// channel contributes here even when all its notes were dropped
    /// as duplicates.
    pub channel_durations: Vec<u64>,
}

impl StepBatch {
    /// Synchronization quantum for this step: the shortest channel
    /// duration, or 0 when there are no channels.
    pub fn wait_ms(&self) -> u64 {
        self.channel_durations.iter().copied().min().unwrap_or(0)
    }
}

/// Merge the column pair at `col` of chunk `chunk` across all channels.
///
/// The queue must satisfy the layout contract
/// ([`ScoreQueue::validate`]); `chunk` and `col` must be in range.
/// Missing chunks decode as silence rather than panicking.
pub fn merge_step<I: PixelImage>(queue: &ScoreQueue<I>, chunk: usize, col: u32) -> StepBatch {
    let mut batch = StepBatch::default();
    let mut seen_hz: Vec<u32> = Vec::new();

    for (channel, chunks) in queue.channels().enumerate() {
        let frame = match chunks.get(chunk) {
            Some(image) => decode_frame(image, col),
            None => Default::default(),
        };
        for &note in &frame.notes {
            let frequency_hz = note_frequency(note).round() as u32;
            if !seen_hz.contains(&frequency_hz) {
                seen_hz.push(frequency_hz);
                batch.entries.push(StepEntry {
                    channel,
                    note,
                    frequency_hz,
                    duration_ms: frame.duration_ms,
                });
            }
        }
        batch.channel_durations.push(frame.duration_ms);
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{PIANO_ROWS, PixelGrid};

    fn chunk_with(notes: &[u32], duration_bits: &[u32]) -> PixelGrid {
        let mut grid = PixelGrid::new(2, PIANO_ROWS);
        for &row in notes {
            grid.set_pixel(0, row, 1);
        }
        for &row in duration_bits {
            grid.set_pixel(1, row, 1);
        }
        grid
    }

    #[test]
    fn test_single_channel_batch() {
        // Notes at rows 0 and 12, duration bit at row 1 (2ms).
        let queue = ScoreQueue::from_channels(vec![vec![chunk_with(&[0, 12], &[1])]]);
        let batch = merge_step(&queue, 0, 0);

        assert_eq!(batch.entries.len(), 2);
        assert_eq!(batch.entries[0].note, 0);
        assert_eq!(batch.entries[0].frequency_hz, 55);
        assert_eq!(batch.entries[0].duration_ms, 2);
        assert_eq!(batch.entries[1].note, 12);
        assert_eq!(batch.entries[1].frequency_hz, 110);
        assert_eq!(batch.entries[1].duration_ms, 2);
        assert_eq!(batch.channel_durations, vec![2]);
        assert_eq!(batch.wait_ms(), 2);
    }

    #[test]
    fn test_duplicate_frequency_first_channel_wins() {
        // Both channels sound note 36; only channel 0 emits it, but
        // channel 1's duration still reaches the quantum computation.
        let queue = ScoreQueue::from_channels(vec![
            vec![chunk_with(&[36], &[3])], // 8ms
            vec![chunk_with(&[36], &[1])], // 2ms
        ]);
        let batch = merge_step(&queue, 0, 0);

        assert_eq!(batch.entries.len(), 1);
        assert_eq!(batch.entries[0].channel, 0);
        assert_eq!(batch.entries[0].frequency_hz, 440);
        assert_eq!(batch.entries[0].duration_ms, 8);
        assert_eq!(batch.channel_durations, vec![8, 2]);
        assert_eq!(batch.wait_ms(), 2);
    }

    #[test]
    fn test_distinct_notes_keep_own_channel_duration() {
        let queue = ScoreQueue::from_channels(vec![
            vec![chunk_with(&[36], &[2])], // 4ms
            vec![chunk_with(&[40], &[0])], // 1ms
        ]);
        let batch = merge_step(&queue, 0, 0);

        assert_eq!(batch.entries.len(), 2);
        assert_eq!(batch.entries[0].channel, 0);
        assert_eq!(batch.entries[0].duration_ms, 4);
        assert_eq!(batch.entries[1].channel, 1);
        assert_eq!(batch.entries[1].duration_ms, 1);
        assert_eq!(batch.wait_ms(), 1);
    }

    #[test]
    fn test_silent_channel_contributes_zero_duration() {
        let queue = ScoreQueue::from_channels(vec![
            vec![chunk_with(&[36], &[4])],
            vec![chunk_with(&[], &[])],
        ]);
        let batch = merge_step(&queue, 0, 0);
        assert_eq!(batch.channel_durations, vec![16, 0]);
        assert_eq!(batch.wait_ms(), 0);
    }

    #[test]
    fn test_empty_queue_batch() {
        let queue: ScoreQueue<PixelGrid> = ScoreQueue::new();
        let batch = merge_step(&queue, 0, 0);
        assert!(batch.entries.is_empty());
        assert!(batch.channel_durations.is_empty());
        assert_eq!(batch.wait_ms(), 0);
    }
}
