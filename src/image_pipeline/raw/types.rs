//! Scan header and decoded image types

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Number of interleaved channels in a scan's pixel data (R, G, B).
pub const RGB_CHANNELS: usize = 3;

/// Fixed-size header at the start of every raw scan file.
///
/// The header is 16 little-endian `u16` fields. Only field 4 (height) and
/// field 5 (width) are interpreted; the rest hold device metadata whose
/// layout is not decoded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanHeader {
    fields: [u16; ScanHeader::FIELD_COUNT],
}

impl ScanHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 32;
    /// Number of `u16` fields in the header.
    pub const FIELD_COUNT: usize = Self::SIZE / 2;
    /// Index of the image height field.
    pub const HEIGHT_FIELD: usize = 4;
    /// Index of the image width field.
    pub const WIDTH_FIELD: usize = 5;

    pub(crate) fn from_fields(fields: [u16; Self::FIELD_COUNT]) -> Self {
        Self { fields }
    }

    pub fn height(&self) -> usize {
        self.fields[Self::HEIGHT_FIELD] as usize
    }

    pub fn width(&self) -> usize {
        self.fields[Self::WIDTH_FIELD] as usize
    }

    /// Raw access to every header field, including the undecoded ones.
    pub fn fields(&self) -> &[u16; Self::FIELD_COUNT] {
        &self.fields
    }
}

/// Decoded 8-bit RGB image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...], row-major
    pub data: Vec<u8>,
}

impl RgbImageData {
    /// Builds an image from tightly packed, row-major RGB8 bytes.
    ///
    /// The buffer must hold exactly `height * width * 3` bytes; a short or
    /// long buffer is rejected rather than truncated or padded.
    pub fn from_interleaved(height: usize, width: usize, pixels: &[u8]) -> Result<Self> {
        let expected = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(RGB_CHANNELS))
            .ok_or(ConversionError::InvalidDimensions(width, height))?;

        if pixels.len() != expected {
            return Err(ConversionError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data: pixels.to_vec(),
        })
    }

    /// Returns the `(R, G, B)` triple at `row`, `col`, or `None` when out of bounds.
    pub fn pixel(&self, row: usize, col: usize) -> Option<[u8; 3]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let offset = (row * self.width + col) * RGB_CHANNELS;
        let px = &self.data[offset..offset + RGB_CHANNELS];
        Some([px[0], px[1], px[2]])
    }
}
