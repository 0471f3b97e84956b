//! Storage file watcher
//!
//! The recorder runs in another process and only shares the storage file.
//! `StoreWatcher` reloads the store whenever that file changes, which fires
//! the store's change subscriptions for every externally appended record.

use super::store::LocalStore;
use crate::error::{PathError, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

/// Keeps a persisted [`LocalStore`] in sync with its file; stops on drop
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
}

impl StoreWatcher {
    /// Watch the file backing `store`.
    ///
    /// The parent directory is watched rather than the file itself, so the
    /// file may not exist yet and may be replaced by rename.
    pub fn spawn(store: Arc<LocalStore>) -> Result<Self> {
        let path = store
            .path()
            .ok_or_else(|| PathError::Config("in-memory store has no file to watch".into()))?
            .to_path_buf();
        let file_name = path
            .file_name()
            .ok_or_else(|| PathError::Config(format!("not a file path: {}", path.display())))?
            .to_os_string();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        std::fs::create_dir_all(&dir)?;

        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| match result {
                Ok(event) if is_store_event(&event, &file_name) => {
                    if let Err(e) = store.reload() {
                        // Usually a partial write; the next event retries
                        log::debug!("Record store reload skipped: {}", e);
                    }
                }
                Ok(_) => {}
                Err(e) => log::warn!("Record store watch error: {}", e),
            },
            Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        log::info!("Watching {} for recorder updates", path.display());

        Ok(Self { _watcher: watcher })
    }
}

/// Content changes to the store file; access and metadata events are ignored
fn is_store_event(event: &Event, file_name: &OsString) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant_kind
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
