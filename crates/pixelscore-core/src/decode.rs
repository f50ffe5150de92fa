//! Frame decoding.
//!
//! One frame is one column pair of one chunk image: column `col`
//! carries the notes to sound (row = note index, row 0 = highest
//! authored pitch), column `col + 1` carries the duration as a binary
//! mask where row `r` contributes `2^r` milliseconds.

use crate::image::{PIANO_ROWS, PixelImage};

/// Decoded contents of one column pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// Active note indices in fixed row order (0 first).
    pub notes: Vec<u8>,
    /// Decoded duration in milliseconds; 0 when no mask bit is set.
    pub duration_ms: u64,
}

/// Decode the column pair starting at `col` (even).
///
/// Rows are scanned 0 through 87 in order, so note emission order is
/// deterministic. Duration bits at row 64 and above exceed `u64`; the
/// accumulator saturates to `u64::MAX` rather than wrapping (the
/// scheduler clamps waits to a sane ceiling anyway).
pub fn decode_frame<I: PixelImage>(image: &I, col: u32) -> Frame {
    let mut frame = Frame::default();
    for row in 0..PIANO_ROWS {
        if image.pixel(col, row) != 0 {
            frame.notes.push(row as u8);
        }
        if image.pixel(col + 1, row) != 0 {
            let bit = 1u64.checked_shl(row).unwrap_or(u64::MAX);
            frame.duration_ms = frame.duration_ms.saturating_add(bit);
        }
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelGrid;

    #[test]
    fn test_notes_in_row_order() {
        let mut chunk = PixelGrid::new(2, PIANO_ROWS);
        chunk.set_pixel(0, 40, 1);
        chunk.set_pixel(0, 3, 1);
        chunk.set_pixel(0, 87, 1);
        let frame = decode_frame(&chunk, 0);
        assert_eq!(frame.notes, vec![3, 40, 87]);
        assert_eq!(frame.duration_ms, 0);
    }

    #[test]
    fn test_duration_bitmask() {
        let mut chunk = PixelGrid::new(2, PIANO_ROWS);
        chunk.set_pixel(1, 0, 1); // +1
        chunk.set_pixel(1, 3, 1); // +8
        chunk.set_pixel(1, 9, 1); // +512
        let frame = decode_frame(&chunk, 0);
        assert!(frame.notes.is_empty());
        assert_eq!(frame.duration_ms, 521);
    }

    #[test]
    fn test_later_column_pair() {
        let mut chunk = PixelGrid::new(6, PIANO_ROWS);
        chunk.set_pixel(4, 12, 1);
        chunk.set_pixel(5, 1, 1);
        // Noise in earlier pairs must not leak into pair 4.
        chunk.set_pixel(0, 5, 1);
        chunk.set_pixel(3, 7, 1);
        let frame = decode_frame(&chunk, 4);
        assert_eq!(frame.notes, vec![12]);
        assert_eq!(frame.duration_ms, 2);
    }

    #[test]
    fn test_high_duration_bit_saturates() {
        let mut chunk = PixelGrid::new(2, PIANO_ROWS);
        chunk.set_pixel(1, 70, 1);
        assert_eq!(decode_frame(&chunk, 0).duration_ms, u64::MAX);

        // Further bits on top of a saturated accumulator stay saturated.
        let mut chunk = PixelGrid::new(2, PIANO_ROWS);
        chunk.set_pixel(1, 70, 1);
        chunk.set_pixel(1, 0, 1);
        assert_eq!(decode_frame(&chunk, 0).duration_ms, u64::MAX);
    }

    #[test]
    fn test_intensity_is_binary() {
        // Any non-zero intensity counts as set.
        let mut chunk = PixelGrid::new(2, PIANO_ROWS);
        chunk.set_pixel(0, 10, 255);
        chunk.set_pixel(1, 2, 9);
        let frame = decode_frame(&chunk, 0);
        assert_eq!(frame.notes, vec![10]);
        assert_eq!(frame.duration_ms, 4);
    }
}
