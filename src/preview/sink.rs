use clap::ValueEnum;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::{ImageEncoder, RgbImageData};

/// Final stage of the pipeline: makes a decoded scan visible.
pub trait PreviewSink {
    /// Shows `image`, replacing whatever preview was shown before.
    ///
    /// `encoder` is available to sinks that persist the preview to a file.
    fn present(&self, image: &RgbImageData, encoder: &dyn ImageEncoder) -> Result<()>;
}

/// How previews reach the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SinkKind {
    /// Write a TIFF to the temp dir and open it with the system viewer
    #[default]
    File,
    /// Show the image in a built-in window (needs the `display` feature)
    Display,
}
