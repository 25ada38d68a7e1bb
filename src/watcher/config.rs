use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extension of the scanner's raw files, matched case-insensitively.
pub const RAW_SCAN_EXTENSION: &str = "RAW";

/// Configuration for the directory watcher
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Directory to watch
    pub root: PathBuf,
    /// Watch subdirectories too
    pub recursive: bool,
    /// File extension (without the dot) that selects scan files
    pub extension: String,
    /// How long the event loop blocks before re-checking for a stop request
    pub stop_check_interval: Duration,
}

impl WatchConfig {
    pub fn builder(root: impl Into<PathBuf>) -> WatchConfigBuilder {
        WatchConfigBuilder {
            root: root.into(),
            recursive: None,
            extension: None,
            stop_check_interval: None,
        }
    }

    /// True when `path` carries the configured extension, ignoring case.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

/// Builder for WatchConfig
pub struct WatchConfigBuilder {
    root: PathBuf,
    recursive: Option<bool>,
    extension: Option<String>,
    stop_check_interval: Option<Duration>,
}

impl WatchConfigBuilder {
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn stop_check_interval(mut self, interval: Duration) -> Self {
        self.stop_check_interval = Some(interval);
        self
    }

    pub fn build(self) -> WatchConfig {
        WatchConfig {
            root: self.root,
            recursive: self.recursive.unwrap_or(true),
            extension: self
                .extension
                .unwrap_or_else(|| RAW_SCAN_EXTENSION.to_string()),
            stop_check_interval: self
                .stop_check_interval
                .unwrap_or(Duration::from_millis(200)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WatchConfig::builder("/scans").build();
        assert!(config.recursive);
        assert_eq!(config.extension, "RAW");
    }

    #[test]
    fn test_extension_match_ignores_case() {
        let config = WatchConfig::builder("/scans").build();

        assert!(config.matches(Path::new("/scans/scan001.RAW")));
        assert!(config.matches(Path::new("/scans/roll/scan001.raw")));
        assert!(config.matches(Path::new("scan001.Raw")));
        assert!(!config.matches(Path::new("/scans/note.txt")));
        assert!(!config.matches(Path::new("/scans/RAW")));
        assert!(!config.matches(Path::new("/scans/scan001.RAW.tmp")));
    }
}
