use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Malformed scan header: expected {expected} bytes, got {actual}")]
    MalformedHeader { expected: usize, actual: usize },

    #[error("Pixel buffer size mismatch for {width}x{height}: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("No known viewer command for operating system '{0}'")]
    UnsupportedPlatform(&'static str),

    #[error("Viewer '{command}' exited with {status}")]
    ViewerProcessFailure {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("Cannot watch {}: {reason}", path.display())]
    WatchSetupFailure { path: PathBuf, reason: String },

    #[error("Preview display is closed")]
    DisplayClosed,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConversionError {
    /// True when the error can be caused by reading a scan the device is
    /// still writing: a short header or a short pixel buffer.
    pub fn is_incomplete(&self) -> bool {
        match self {
            ConversionError::MalformedHeader { expected, actual } => actual < expected,
            ConversionError::BufferSizeMismatch {
                expected, actual, ..
            } => actual < expected,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
