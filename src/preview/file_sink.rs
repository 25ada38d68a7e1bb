use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::{ImageEncoder, RgbImageData};
use crate::preview::sink::PreviewSink;
use crate::preview::viewer::{SystemViewer, ViewerLauncher};

/// File name of the single preview artifact.
pub const PREVIEW_FILE_NAME: &str = "hot-preview.tif";

/// Writes each preview to one well-known path, then opens it in a viewer.
///
/// Every call overwrites the previous preview.
pub struct FilePreviewSink<L: ViewerLauncher = SystemViewer> {
    path: PathBuf,
    launcher: L,
}

impl<L: ViewerLauncher> FilePreviewSink<L> {
    pub fn new(dir: &Path, launcher: L) -> Self {
        Self {
            path: dir.join(PREVIEW_FILE_NAME),
            launcher,
        }
    }

    pub fn preview_path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("tif.partial")
    }

    fn write_preview(&self, image: &RgbImageData, encoder: &dyn ImageEncoder) -> Result<()> {
        let staging = self.staging_path();
        {
            let file = File::create(&staging).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", staging.display(), e))
            })?;
            let mut out = BufWriter::new(file);
            encoder.encode(image, &mut out)?;
            out.flush()?;
        }

        // Windows refuses the rename while a viewer holds the old preview open.
        if let Err(e) = fs::rename(&staging, &self.path) {
            warn!("Could not replace preview atomically ({e}), overwriting in place");
            fs::copy(&staging, &self.path).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", self.path.display(), e))
            })?;
            fs::remove_file(&staging)?;
        }

        debug!(path = %self.path.display(), "Preview written");
        Ok(())
    }
}

impl<L: ViewerLauncher> PreviewSink for FilePreviewSink<L> {
    fn present(&self, image: &RgbImageData, encoder: &dyn ImageEncoder) -> Result<()> {
        {
            let _span = tracing::info_span!("write_preview").entered();
            self.write_preview(image, encoder)?;
        }

        let _span = tracing::info_span!("open_viewer").entered();
        self.launcher.open(&self.path)?;
        info!(path = %self.path.display(), "Preview opened");
        Ok(())
    }
}
