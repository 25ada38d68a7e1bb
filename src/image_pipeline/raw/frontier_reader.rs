//! Reader for the raw scan files written by Frontier photo-lab scanners.
//!
//! A scan file is a 32-byte header of 16 little-endian `u16` fields followed
//! by uncompressed, row-major, interleaved RGB8 pixel data with no padding.
//! Field 4 of the header is the image height and field 5 the width.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::types::{RgbImageData, ScanHeader};

/// Decodes a scan header from exactly [`ScanHeader::SIZE`] bytes.
///
/// Any other length is a [`ConversionError::MalformedHeader`]; nothing past
/// the end of `bytes` is ever read.
pub fn decode_header(bytes: &[u8]) -> Result<ScanHeader> {
    if bytes.len() != ScanHeader::SIZE {
        return Err(ConversionError::MalformedHeader {
            expected: ScanHeader::SIZE,
            actual: bytes.len(),
        });
    }

    let mut fields = [0u16; ScanHeader::FIELD_COUNT];
    for (field, chunk) in fields.iter_mut().zip(bytes.chunks_exact(2)) {
        *field = u16::from_le_bytes([chunk[0], chunk[1]]);
    }

    Ok(ScanHeader::from_fields(fields))
}

/// RAW reader for Frontier scan files.
pub struct FrontierRawReader;

impl RawImageReader for FrontierRawReader {
    /// Decodes the header at the start of `data`.
    ///
    /// Only the first [`ScanHeader::SIZE`] bytes are looked at. A file shorter
    /// than that is reported as a malformed header.
    fn read_header(&self, data: &[u8]) -> Result<ScanHeader> {
        let header_bytes = data.get(..ScanHeader::SIZE).unwrap_or(data);
        decode_header(header_bytes)
    }

    /// Decodes a complete scan file into an RGB image.
    ///
    /// # Arguments
    ///
    /// * `data` - Full contents of the scan file, header included
    ///
    /// # Returns
    ///
    /// * `Ok(RgbImageData)` - Image with the header's dimensions
    /// * `Err(ConversionError::MalformedHeader)` - Fewer than 32 bytes
    /// * `Err(ConversionError::BufferSizeMismatch)` - Pixel data is not
    ///   exactly `height * width * 3` bytes
    fn read_raw(&self, data: &[u8]) -> Result<RgbImageData> {
        debug!("Decoding scan file, {} bytes", data.len());

        let header = {
            let _span = tracing::info_span!("decode_header").entered();
            self.read_header(data)?
        };
        debug!("Scan header: {}x{}", header.width(), header.height());

        let _span = tracing::info_span!("build_image",
            width = header.width(),
            height = header.height()
        ).entered();
        let pixels = &data[ScanHeader::SIZE..];
        RgbImageData::from_interleaved(header.height(), header.width(), pixels)
    }
}
