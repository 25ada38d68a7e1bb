//! Image processing pipeline module
//!
//! This module turns raw scan files into previews: scan header decoding,
//! RGB image construction, and TIFF re-encoding.

pub mod raw;
pub mod tiff;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    Result,
};

pub use raw::{
    FrontierRawReader,
    RawImageReader,
    RgbImageData,
    ScanHeader,
    decode_header,
};

pub use self::tiff::{
    TiffCompression,
    ConversionConfig,
    ConversionConfigBuilder,
    TiffWriter,
    StandardTiffWriter,
};

pub use conversions::{
    ImageEncoder,
    RawToTiffPipeline,
};
