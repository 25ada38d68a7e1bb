//! Pipeline conversions module
//!
//! This module contains orchestration logic for turning scans into previews.

mod raw_to_tiff;


use std::io::Write;

use crate::image_pipeline::{common::error::Result, raw::RgbImageData};

pub use raw_to_tiff::RawToTiffPipeline;

/// Re-encodes a decoded image into a viewable container format.
pub trait ImageEncoder {
    fn encode(&self, image: &RgbImageData, output: &mut dyn Write) -> Result<()>;
}
