//! File watching for the watch command.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::commands::check::is_document;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A document was created or modified
    DocumentChanged(PathBuf),

    /// A document was deleted
    DocumentRemoved(PathBuf),
}

/// Errors that can occur while setting up a watch.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Failed to create file watcher: {0}")]
    Init(#[source] notify::Error),

    #[error("Failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// File watcher for `.xtform` documents.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given paths.
    ///
    /// Returns the watcher and a channel to receive events. Events stop when
    /// the watcher is dropped.
    pub fn new(paths: &[PathBuf]) -> Result<(Self, mpsc::Receiver<WatchEvent>), WatchError> {
        let (tx, rx) = mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                for path in &event.paths {
                    if let Some(e) = classify_event(path, &event.kind) {
                        let _ = tx.blocking_send(e);
                    }
                }
            }
        })
        .map_err(WatchError::Init)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(|source| WatchError::Watch {
                        path: path.clone(),
                        source,
                    })?;
            }
        }

        Ok((Self { _watcher: watcher }, rx))
    }
}

/// Classify a notify event. Non-documents are ignored.
fn classify_event(path: &Path, kind: &EventKind) -> Option<WatchEvent> {
    if !is_document(path) {
        return None;
    }

    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => {
            Some(WatchEvent::DocumentChanged(path.to_path_buf()))
        }
        EventKind::Remove(_) => Some(WatchEvent::DocumentRemoved(path.to_path_buf())),
        _ => None,
    }
}

/// Coalesces bursts of changes per path.
///
/// A path becomes ready once it has been quiet for the configured delay, so
/// an editor saving several times in a row triggers a single re-check.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    /// Record a change, restarting the quiet period for this path.
    pub fn touch(&mut self, path: PathBuf, now: Instant) {
        self.pending.insert(path, now);
    }

    /// Drop a pending path.
    pub fn forget(&mut self, path: &Path) {
        self.pending.remove(path);
    }

    /// Remove and return every path that has been quiet long enough.
    pub fn ready(&mut self, now: Instant) -> Vec<PathBuf> {
        let delay = self.delay;
        let mut ready: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, last)| now.duration_since(**last) >= delay)
            .map(|(path, _)| path.clone())
            .collect();

        for path in &ready {
            self.pending.remove(path);
        }

        ready.sort();
        ready
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
