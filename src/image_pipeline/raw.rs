//! RAW scan reading module
//!
//! This module decodes the fixed scan header and turns the pixel payload
//! into an in-memory RGB image.

mod reader;
mod frontier_reader;
pub mod types;

pub use reader::RawImageReader;
pub use frontier_reader::{FrontierRawReader, decode_header};
pub use types::{RgbImageData, ScanHeader, RGB_CHANNELS};
