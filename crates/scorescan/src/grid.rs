//! Decoded intensity grids.
//!
//! A [`RawGrid`] is the validated output of the raster decoder: a rectangular
//! array of 16-bit intensities together with the maximum intensity declared
//! by the source file. Every pixel is guaranteed to lie in `0..=max_value`
//! and `max_value` is guaranteed to be non-zero, so downstream stages never
//! have to re-check either.

use image::{GrayImage, ImageBuffer, Luma};

/// Row-major 16-bit grayscale buffer.
pub type Gray16Image = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Errors raised when a grid violates its construction invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// The declared maximum intensity is zero.
    ZeroMaxValue,
    /// The grid has no pixels.
    EmptyGrid {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
    },
    /// The pixel buffer length does not match `width * height`.
    DataLength {
        /// Expected number of pixels.
        expected: usize,
        /// Number of pixels provided.
        got: usize,
    },
    /// A pixel exceeds the declared maximum intensity.
    ValueOutOfRange {
        /// Column of the offending pixel.
        x: u32,
        /// Row of the offending pixel.
        y: u32,
        /// Offending value.
        value: u16,
        /// Declared maximum intensity.
        max_value: u16,
    },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroMaxValue => write!(f, "maximum intensity must be non-zero"),
            Self::EmptyGrid { width, height } => {
                write!(f, "grid has no pixels ({}x{})", width, height)
            }
            Self::DataLength { expected, got } => {
                write!(f, "pixel count mismatch: expected {}, got {}", expected, got)
            }
            Self::ValueOutOfRange {
                x,
                y,
                value,
                max_value,
            } => write!(
                f,
                "pixel ({}, {}) has value {} above maximum {}",
                x, y, value, max_value
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Validated intensity grid plus its declared maximum intensity.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGrid {
    pixels: Gray16Image,
    max_value: u16,
}

impl RawGrid {
    /// Build a grid from row-major pixel data.
    pub fn new(width: u32, height: u32, max_value: u16, data: Vec<u16>) -> Result<Self, GridError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(GridError::DataLength {
                expected,
                got: data.len(),
            });
        }
        let pixels = ImageBuffer::from_raw(width, height, data).ok_or(GridError::DataLength {
            expected,
            got: 0,
        })?;
        Self::from_image(pixels, max_value)
    }

    /// Wrap an existing 16-bit buffer, validating it against `max_value`.
    pub fn from_image(pixels: Gray16Image, max_value: u16) -> Result<Self, GridError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        if max_value == 0 {
            return Err(GridError::ZeroMaxValue);
        }
        if let Some((x, y, p)) = pixels.enumerate_pixels().find(|(_, _, p)| p[0] > max_value) {
            return Err(GridError::ValueOutOfRange {
                x,
                y,
                value: p[0],
                max_value,
            });
        }
        Ok(Self { pixels, max_value })
    }

    /// Wrap an 8-bit image; the maximum intensity is 255.
    pub fn from_gray(gray: &GrayImage) -> Result<Self, GridError> {
        let (width, height) = gray.dimensions();
        let pixels = Gray16Image::from_fn(width, height, |x, y| {
            Luma([u16::from(gray.get_pixel(x, y)[0])])
        });
        Self::from_image(pixels, 255)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    pub fn pixels(&self) -> &Gray16Image {
        &self.pixels
    }
}
