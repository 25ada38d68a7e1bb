//! Live preview of raw scans written by Frontier photo-lab scanners.
//!
//! New `*.RAW` files under a watched directory are decoded, re-encoded as
//! TIFF and shown to the operator as they arrive.

pub mod image_pipeline;
pub mod logger;
pub mod preview;
pub mod watcher;
