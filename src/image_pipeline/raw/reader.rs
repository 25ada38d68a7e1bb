use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::{RgbImageData, ScanHeader};

pub trait RawImageReader {
    fn read_header(&self, data: &[u8]) -> Result<ScanHeader>;
    fn read_raw(&self, data: &[u8]) -> Result<RgbImageData>;
}
