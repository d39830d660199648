//! Watch command.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;

use super::check::check_file;
use super::report;
use crate::watcher::{Debouncer, FileWatcher, WatchEvent};

/// Run the watch command until interrupted.
pub async fn run(dir: PathBuf, debounce_ms: u64) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!("Directory not found: {}", dir.display());
    }

    let delay = Duration::from_millis(debounce_ms);
    let (watcher, mut rx) = FileWatcher::new(&[dir.clone()])?;
    let mut debouncer = Debouncer::new(delay);
    let mut tick = tokio::time::interval((delay / 2).max(Duration::from_millis(10)));

    tracing::info!("Watching {} for changes (Ctrl+C to stop)", dir.display());

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(WatchEvent::DocumentChanged(path)) => {
                    tracing::debug!("Changed: {}", path.display());
                    debouncer.touch(path, Instant::now());
                }
                Some(WatchEvent::DocumentRemoved(path)) => {
                    tracing::info!("Removed: {}", path.display());
                    debouncer.forget(&path);
                }
                None => break,
            },
            _ = tick.tick() => {
                for path in debouncer.ready(Instant::now()) {
                    recheck(path).await;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    drop(watcher);
    Ok(())
}

async fn recheck(path: PathBuf) {
    let result = tokio::task::spawn_blocking(move || check_file(&path)).await;

    match result {
        Ok(Ok(file_report)) => {
            if file_report.diagnostics.is_empty() {
                tracing::info!("{}: ok", file_report.path.display());
            } else {
                report(&file_report.path, &file_report.diagnostics);
            }
        }
        Ok(Err(e)) => tracing::warn!("{:#}", e),
        Err(e) => tracing::warn!("Check task failed: {}", e),
    }
}
