//! Common utilities module
//!
//! This module holds the error type shared by the pipeline, the preview
//! sinks and the directory watcher.

pub mod error;

pub use error::{ConversionError, Result};
