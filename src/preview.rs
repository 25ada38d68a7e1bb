//! Preview sinks
//!
//! A sink receives each decoded scan and shows it to the operator, either
//! through a TIFF file opened in the system viewer or, with the `display`
//! feature, in a built-in window.

mod sink;
mod file_sink;
mod viewer;
pub mod platform;
#[cfg(feature = "display")]
pub mod display;

pub use sink::{PreviewSink, SinkKind};
pub use file_sink::{FilePreviewSink, PREVIEW_FILE_NAME};
pub use viewer::{SystemViewer, ViewerLauncher};
pub use platform::{OpenCommand, Platform};
