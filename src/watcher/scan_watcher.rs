use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use notify::event::CreateKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, instrument, warn};

use crate::image_pipeline::{ConversionError, Result};
use crate::watcher::config::WatchConfig;
use crate::watcher::handler::CreateEventHandler;

/// Lifecycle of a [`ScanWatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Watching,
    Stopped,
}

struct Subscription {
    // Dropping the watcher ends the notify subscription.
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
}

/// Watches a directory tree and hands each new scan file to a handler.
///
/// Events are processed one at a time on the thread that drives the watcher,
/// in the order the notification backend delivers them.
pub struct ScanWatcher<H: CreateEventHandler> {
    config: WatchConfig,
    handler: H,
    state: WatcherState,
    subscription: Option<Subscription>,
}

impl<H: CreateEventHandler> ScanWatcher<H> {
    pub fn new(config: WatchConfig, handler: H) -> Self {
        Self {
            config,
            handler,
            state: WatcherState::Idle,
            subscription: None,
        }
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    fn setup_failure(&self, reason: impl ToString) -> ConversionError {
        ConversionError::WatchSetupFailure {
            path: self.config.root.clone(),
            reason: reason.to_string(),
        }
    }

    /// Subscribes to creation events under the configured root.
    #[instrument(skip(self), fields(root = %self.config.root.display()))]
    pub fn start(&mut self) -> Result<()> {
        if self.state != WatcherState::Idle {
            return Err(self.setup_failure(format!("watcher is {:?}", self.state)));
        }

        let metadata = std::fs::metadata(&self.config.root).map_err(|e| self.setup_failure(e))?;
        if !metadata.is_dir() {
            return Err(self.setup_failure("not a directory"));
        }

        let (tx, events) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx).map_err(|e| self.setup_failure(e))?;

        let mode = if self.config.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&self.config.root, mode)
            .map_err(|e| self.setup_failure(e))?;

        self.subscription = Some(Subscription {
            _watcher: watcher,
            events,
        });
        self.state = WatcherState::Watching;
        info!(recursive = self.config.recursive, "Watching for *.{} files", self.config.extension);
        Ok(())
    }

    /// Dispatches one notify event. Returns how many handler calls it made.
    fn dispatch(&self, event: Event) -> usize {
        for path in &event.paths {
            debug!("file {:?}: {}", event.kind, path.display());
        }

        let kind = match event.kind {
            EventKind::Create(kind) => kind,
            _ => return 0,
        };
        if kind == CreateKind::Folder {
            return 0;
        }

        let mut handled = 0;
        for path in &event.paths {
            // Backends that report CreateKind::Any need the directory check here.
            if path.is_dir() || !self.config.matches(path) {
                continue;
            }
            self.handler.on_created(path);
            handled += 1;
        }
        handled
    }

    /// Waits up to `timeout` for the next event and handles it. Returns the
    /// number of scan files handed to the handler.
    pub fn poll(&mut self, timeout: Duration) -> Result<usize> {
        let Some(subscription) = &self.subscription else {
            return Err(self.setup_failure(format!("watcher is {:?}", self.state)));
        };

        match subscription.events.recv_timeout(timeout) {
            Ok(Ok(event)) => Ok(self.dispatch(event)),
            Ok(Err(e)) => {
                warn!("Watch error: {e}");
                Ok(0)
            }
            Err(RecvTimeoutError::Timeout) => Ok(0),
            Err(RecvTimeoutError::Disconnected) => {
                Err(self.setup_failure("notification channel closed"))
            }
        }
    }

    /// Processes events until `stop` is set, then tears the subscription down.
    ///
    /// The flag is checked between events: a scan already being handled runs
    /// to completion, queued ones are dropped.
    pub fn run_until(&mut self, stop: &AtomicBool) -> Result<()> {
        let interval = self.config.stop_check_interval;
        let result = loop {
            if stop.load(Ordering::SeqCst) {
                break Ok(());
            }
            if let Err(e) = self.poll(interval) {
                break Err(e);
            }
        };
        self.stop();
        result
    }

    /// Ends the subscription. A stopped watcher cannot be restarted.
    pub fn stop(&mut self) {
        if self.subscription.take().is_some() {
            info!("Stopped watching {}", self.config.root.display());
        }
        self.state = WatcherState::Stopped;
    }
}

impl<H: CreateEventHandler> Drop for ScanWatcher<H> {
    fn drop(&mut self) {
        self.stop();
    }
}
