//! Pixel image capability.
//!
//! Score images are supplied by the host; this crate only ever reads
//! them. [`PixelImage`] is the narrow seam the decoder works against,
//! and [`PixelGrid`] is a minimal owned implementation for hosts (and
//! tests) without an image type of their own.

/// Number of pixel rows in a score image, one per piano key.
pub const PIANO_ROWS: u32 = 88;

/// Read-only access to a rectangular grid of pixel intensities.
///
/// Row 0 is the top of the image and maps to the highest authored
/// pitch row. A pixel value of 0 means unset; any non-zero intensity
/// counts as set.
///
/// `pixel` must be O(1); the decoder calls it twice per row per step.
/// Out-of-range coordinates must return 0 rather than panic.
pub trait PixelImage {
    /// Image width in pixels.
    fn width(&self) -> u32;

    /// Image height in pixels. Scores require exactly [`PIANO_ROWS`].
    fn height(&self) -> u32;

    /// Intensity at (`col`, `row`); 0 when unset or out of range.
    fn pixel(&self, col: u32, row: u32) -> u8;
}

impl<T: PixelImage + ?Sized> PixelImage for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn pixel(&self, col: u32, row: u32) -> u8 {
        (**self).pixel(col, row)
    }
}

/// Owned row-major pixel grid.
///
/// Reference implementation of [`PixelImage`] for building scores in
/// memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelGrid {
    /// Create a cleared grid of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        PixelGrid {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Set the intensity at (`col`, `row`). Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, col: u32, row: u32, value: u8) {
        if col < self.width && row < self.height {
            self.pixels[(row * self.width + col) as usize] = value;
        }
    }
}

impl PixelImage for PixelGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, col: u32, row: u32) -> u8 {
        if col < self.width && row < self.height {
            self.pixels[(row * self.width + col) as usize]
        } else {
            0
        }
    }
}
