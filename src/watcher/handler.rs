use std::path::Path;
use std::thread;
use std::time::Instant;

use tracing::{debug, error, info, instrument, warn};

use crate::image_pipeline::{
    ConversionError, FrontierRawReader, RawImageReader, RawToTiffPipeline, Result, RgbImageData,
    StandardTiffWriter, TiffWriter,
};
use crate::preview::PreviewSink;
use crate::watcher::settle::{SettlePolicy, Settled, wait_until_stable};

/// Receives one filesystem creation event at a time.
pub trait CreateEventHandler {
    fn on_created(&self, path: &Path);
}

/// Runs decode, convert and preview for every new scan file.
///
/// Errors never escape `on_created`: each one is logged and the file is
/// skipped.
pub struct ScanFileHandler<S, R = FrontierRawReader, W = StandardTiffWriter>
where
    S: PreviewSink,
    R: RawImageReader,
    W: TiffWriter,
{
    pipeline: RawToTiffPipeline<R, W>,
    sink: S,
    settle: SettlePolicy,
}

impl<S, R, W> ScanFileHandler<S, R, W>
where
    S: PreviewSink,
    R: RawImageReader,
    W: TiffWriter,
{
    pub fn new(pipeline: RawToTiffPipeline<R, W>, sink: S, settle: SettlePolicy) -> Self {
        Self {
            pipeline,
            sink,
            settle,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Reads and decodes `path`, re-reading while the scan looks partially
    /// written and the settle deadline has not passed.
    fn read_settled(&self, path: &Path) -> Result<RgbImageData> {
        let deadline = Instant::now() + self.settle.timeout;

        match wait_until_stable(path, &self.settle, deadline)? {
            Settled::Stable(len) => debug!(len, "Scan stable"),
            Settled::TimedOut(len) => warn!(len, "Scan still changing, reading anyway"),
            Settled::Unchecked(len) => debug!(len, "Reading scan without settle wait"),
        }

        loop {
            let data = {
                let _span = tracing::info_span!("read_scan").entered();
                std::fs::read(path).map_err(|e| {
                    ConversionError::InputReadError(format!("{}: {}", path.display(), e))
                })?
            };

            match self.pipeline.decode(&data) {
                Err(e) if e.is_incomplete() && Instant::now() < deadline => {
                    debug!("Scan incomplete ({e}), retrying");
                    thread::sleep(self.settle.poll_interval);
                }
                result => return result,
            }
        }
    }

    /// Full pipeline for one scan file.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn process(&self, path: &Path) -> Result<()> {
        let image = self.read_settled(path)?;
        info!("height: {} width: {}", image.height, image.width);

        let _span = tracing::info_span!("present").entered();
        self.sink.present(&image, &self.pipeline)
    }
}

impl<S, R, W> CreateEventHandler for ScanFileHandler<S, R, W>
where
    S: PreviewSink,
    R: RawImageReader,
    W: TiffWriter,
{
    fn on_created(&self, path: &Path) {
        match self.process(path) {
            Ok(()) => {}
            Err(ConversionError::ViewerProcessFailure { command, status, stdout, stderr }) => {
                error!(
                    path = %path.display(),
                    "Error while viewing image: {command} exited with {status}\n  stdout: {}\n  stderr: {}",
                    stdout.trim(),
                    stderr.trim()
                );
            }
            Err(e @ ConversionError::UnsupportedPlatform(_)) => {
                error!(path = %path.display(), "Cannot show preview: {e}");
            }
            Err(e) => {
                warn!(path = %path.display(), "Error reading this scan, skipping: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::{ConversionConfig, ImageEncoder, ScanHeader};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSink {
        presented: Mutex<Vec<RgbImageData>>,
    }

    impl PreviewSink for RecordingSink {
        fn present(&self, image: &RgbImageData, _encoder: &dyn ImageEncoder) -> Result<()> {
            self.presented.lock().unwrap().push(image.clone());
            Ok(())
        }
    }

    fn scan_bytes(height: u16, width: u16, pixels: &[u8]) -> Vec<u8> {
        let mut fields = [0u16; ScanHeader::FIELD_COUNT];
        fields[ScanHeader::HEIGHT_FIELD] = height;
        fields[ScanHeader::WIDTH_FIELD] = width;
        let mut bytes: Vec<u8> = fields.iter().flat_map(|f| f.to_le_bytes()).collect();
        bytes.extend_from_slice(pixels);
        bytes
    }

    fn handler(settle: SettlePolicy) -> ScanFileHandler<RecordingSink> {
        ScanFileHandler::new(
            RawToTiffPipeline::new(ConversionConfig::default()),
            RecordingSink::default(),
            settle,
        )
    }

    #[test]
    fn test_valid_scan_is_presented() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan001.RAW");
        std::fs::write(&path, scan_bytes(1, 1, &[10, 20, 30])).unwrap();

        let handler = handler(SettlePolicy::immediate());
        handler.on_created(&path);

        let presented = handler.sink().presented.lock().unwrap();
        assert_eq!(presented.len(), 1);
        assert_eq!(presented[0].pixel(0, 0), Some([10, 20, 30]));
    }

    #[test]
    fn test_short_header_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan002.RAW");
        std::fs::write(&path, [0u8; 10]).unwrap();

        let handler = handler(SettlePolicy::immediate());

        assert!(matches!(
            handler.process(&path),
            Err(ConversionError::MalformedHeader { actual: 10, .. })
        ));
        handler.on_created(&path);
        assert!(handler.sink().presented.lock().unwrap().is_empty());
    }

    #[test]
    fn test_buffer_mismatch_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan003.RAW");
        std::fs::write(&path, scan_bytes(2, 2, &[0u8; 11])).unwrap();

        let handler = handler(SettlePolicy::immediate());

        assert!(matches!(
            handler.process(&path),
            Err(ConversionError::BufferSizeMismatch { .. })
        ));
        assert!(handler.sink().presented.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let handler = handler(SettlePolicy::immediate());

        handler.on_created(&dir.path().join("vanished.RAW"));

        assert!(handler.sink().presented.lock().unwrap().is_empty());
    }

    #[test]
    fn test_partial_write_completed_within_window_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan004.RAW");
        let full = scan_bytes(1, 2, &[1, 2, 3, 4, 5, 6]);
        std::fs::write(&path, &full[..20]).unwrap();

        let writer_path = path.clone();
        let writer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            std::fs::write(&writer_path, &full).unwrap();
        });

        let settle = SettlePolicy::builder()
            .poll_interval(Duration::from_millis(50))
            .timeout(Duration::from_secs(5))
            .build();
        let handler = handler(settle);
        let result = handler.process(&path);
        writer.join().unwrap();

        assert!(result.is_ok(), "{result:?}");
        let presented = handler.sink().presented.lock().unwrap();
        assert_eq!(presented.len(), 1);
        assert_eq!(presented[0].pixel(0, 1), Some([4, 5, 6]));
    }
}
