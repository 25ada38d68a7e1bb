//! Directory watcher
//!
//! Subscribes to file creation events under a root directory and runs the
//! preview pipeline once for every new raw scan.

mod config;
mod handler;
mod scan_watcher;
pub mod settle;

pub use config::{RAW_SCAN_EXTENSION, WatchConfig, WatchConfigBuilder};
pub use handler::{CreateEventHandler, ScanFileHandler};
pub use scan_watcher::{ScanWatcher, WatcherState};
pub use settle::{SettlePolicy, SettlePolicyBuilder};
