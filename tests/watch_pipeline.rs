use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use frontier_hot_preview::image_pipeline::{
    ConversionConfig, ImageEncoder, RawToTiffPipeline, Result, RgbImageData, ScanHeader,
};
use frontier_hot_preview::preview::PreviewSink;
use frontier_hot_preview::watcher::{
    ScanFileHandler, ScanWatcher, SettlePolicy, WatchConfig, WatcherState,
};

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

fn start_watcher(root: &Path) -> ScanWatcher<ScanFileHandler<RecordingSink>> {
    let settle = SettlePolicy::builder()
        .poll_interval(Duration::from_millis(50))
        .timeout(Duration::from_secs(2))
        .build();
    let handler = ScanFileHandler::new(
        RawToTiffPipeline::new(ConversionConfig::default()),
        RecordingSink::default(),
        settle,
    );
    let mut watcher = ScanWatcher::new(WatchConfig::builder(root).build(), handler);
    watcher.start().unwrap();
    watcher
}

/// Polls until `expected` scans were handled or `limit` passes, then keeps
/// polling for `quiet` to catch any extra dispatches.
fn pump(
    watcher: &mut ScanWatcher<ScanFileHandler<RecordingSink>>,
    expected: usize,
    limit: Duration,
    quiet: Duration,
) -> usize {
    let mut handled = 0;
    let deadline = Instant::now() + limit;
    while handled < expected && Instant::now() < deadline {
        handled += watcher.poll(Duration::from_millis(100)).unwrap();
    }
    let deadline = Instant::now() + quiet;
    while Instant::now() < deadline {
        handled += watcher.poll(Duration::from_millis(50)).unwrap();
    }
    handled
}

#[test]
fn test_new_scan_produces_one_preview() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = start_watcher(dir.path());
    assert_eq!(watcher.state(), WatcherState::Watching);

    std::fs::write(dir.path().join("scan001.RAW"), scan_bytes(1, 1, &[10, 20, 30])).unwrap();

    let handled = pump(&mut watcher, 1, Duration::from_secs(5), Duration::from_millis(500));

    assert_eq!(handled, 1);
    let presented = watcher.handler().sink().presented.lock().unwrap();
    assert_eq!(presented.len(), 1);
    assert_eq!((presented[0].height, presented[0].width), (1, 1));
    assert_eq!(presented[0].pixel(0, 0), Some([10, 20, 30]));
}

#[test]
fn test_other_files_and_directories_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = start_watcher(dir.path());

    std::fs::write(dir.path().join("note.txt"), b"not a scan").unwrap();
    std::fs::create_dir(dir.path().join("roll42")).unwrap();

    let handled = pump(&mut watcher, 0, Duration::ZERO, Duration::from_millis(800));

    assert_eq!(handled, 0);
    assert!(watcher.handler().sink().presented.lock().unwrap().is_empty());
}

#[test]
fn test_lowercase_extension_is_a_scan() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = start_watcher(dir.path());

    std::fs::write(dir.path().join("scan002.raw"), scan_bytes(1, 2, &[1, 2, 3, 4, 5, 6])).unwrap();

    let handled = pump(&mut watcher, 1, Duration::from_secs(5), Duration::from_millis(300));

    assert_eq!(handled, 1);
    let presented = watcher.handler().sink().presented.lock().unwrap();
    assert_eq!(presented[0].pixel(0, 1), Some([4, 5, 6]));
}

#[test]
fn test_bad_scan_does_not_stop_watching() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = start_watcher(dir.path());

    std::fs::write(dir.path().join("broken.RAW"), scan_bytes(2, 2, &[0u8; 5])).unwrap();
    let handled = pump(&mut watcher, 1, Duration::from_secs(10), Duration::ZERO);
    assert_eq!(handled, 1);
    assert!(watcher.handler().sink().presented.lock().unwrap().is_empty());
    assert_eq!(watcher.state(), WatcherState::Watching);

    std::fs::write(dir.path().join("good.RAW"), scan_bytes(1, 1, &[7, 8, 9])).unwrap();
    let handled = pump(&mut watcher, 1, Duration::from_secs(5), Duration::ZERO);
    assert_eq!(handled, 1);

    let presented = watcher.handler().sink().presented.lock().unwrap();
    assert_eq!(presented.len(), 1);
    assert_eq!(presented[0].pixel(0, 0), Some([7, 8, 9]));
}
