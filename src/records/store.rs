//! Record relay
//!
//! The recorder and the viewer never talk to each other directly; they share
//! a relay holding the record list and the capture-mode flag. `LocalStore` is
//! the in-process relay, optionally persisted to a JSON key-value file using
//! the same keys as the extension's local storage.

use super::model::ActionRecord;
use crate::error::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Callback invoked with the full record list after every change
pub type RecordsCallback = Box<dyn Fn(&[ActionRecord]) + Send + Sync>;

/// Handle returned by [`RecordRelay::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Shared record list + capture flag
pub trait RecordRelay: Send + Sync {
    /// Snapshot of the current records, in capture order
    fn records(&self) -> Vec<ActionRecord>;

    /// Replace the whole record list
    fn set_records(&self, records: Vec<ActionRecord>);

    /// Append one record; returns false when capture is off and the record
    /// was dropped
    fn append(&self, record: ActionRecord) -> bool;

    fn clear(&self) {
        self.set_records(Vec::new());
    }

    fn capture_mode(&self) -> bool;

    fn set_capture_mode(&self, enabled: bool);

    fn subscribe(&self, callback: RecordsCallback) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// On-disk shape of the store
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredState {
    #[serde(default)]
    is_learning_mode: bool,
    #[serde(default)]
    learning_data: Vec<ActionRecord>,
}

struct Inner {
    state: StoredState,
    next_subscription: u64,
    subscribers: Vec<(SubscriptionId, Arc<RecordsCallback>)>,
}

/// In-process relay with optional file persistence
pub struct LocalStore {
    inner: RwLock<Inner>,
    path: Option<PathBuf>,
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl LocalStore {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            inner: RwLock::new(Inner {
                state: StoredState::default(),
                next_subscription: 0,
                subscribers: Vec::new(),
            }),
            path: None,
        }
    }

    /// Open (or create) a store persisted at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let state: StoredState = serde_json::from_str(&content)?;
            log::info!(
                "Loaded {} records from {}",
                state.learning_data.len(),
                path.display()
            );
            state
        } else {
            log::debug!("No record store at {}, starting empty", path.display());
            StoredState::default()
        };

        Ok(Self {
            inner: RwLock::new(Inner {
                state,
                next_subscription: 0,
                subscribers: Vec::new(),
            }),
            path: Some(path),
        })
    }

    /// Default location under the user data directory
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("action-path")
            .join("storage.json")
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Turn capture on and start a fresh session
    pub fn start_capture(&self) {
        {
            let mut inner = self.inner.write();
            inner.state.is_learning_mode = true;
            inner.state.learning_data.clear();
        }
        self.persist();
        self.notify();
    }

    /// Re-read the backing file after another process wrote to it.
    ///
    /// Subscribers are notified only when the stored state differs from the
    /// in-memory one, so the store's own writes do not echo back. Returns
    /// whether anything changed; in-memory stores never change.
    pub fn reload(&self) -> Result<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };
        let state = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            StoredState::default()
        };

        {
            let mut inner = self.inner.write();
            if inner.state == state {
                return Ok(false);
            }
            log::debug!(
                "Record store changed on disk: {} -> {} records",
                inner.state.learning_data.len(),
                state.learning_data.len()
            );
            inner.state = state;
        }
        self.notify();
        Ok(true)
    }

    /// Turn capture off, keeping the recorded session
    pub fn stop_capture(&self) {
        self.inner.write().state.is_learning_mode = false;
        self.persist();
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let result = (|| -> Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(&self.inner.read().state)?;
            std::fs::write(path, content)?;
            Ok(())
        })();

        if let Err(e) = result {
            log::warn!("Failed to persist record store to {}: {}", path.display(), e);
        }
    }

    fn notify(&self) {
        // Snapshot first so callbacks may call back into the store
        let (records, subscribers) = {
            let inner = self.inner.read();
            let subscribers: Vec<_> = inner.subscribers.iter().map(|(_, cb)| cb.clone()).collect();
            (inner.state.learning_data.clone(), subscribers)
        };
        for callback in subscribers {
            callback(&records);
        }
    }
}

impl RecordRelay for LocalStore {
    fn records(&self) -> Vec<ActionRecord> {
        self.inner.read().state.learning_data.clone()
    }

    fn set_records(&self, records: Vec<ActionRecord>) {
        self.inner.write().state.learning_data = records;
        self.persist();
        self.notify();
    }

    fn append(&self, record: ActionRecord) -> bool {
        {
            let mut inner = self.inner.write();
            if !inner.state.is_learning_mode {
                log::debug!("Dropping {} record: capture is off", record.action);
                return false;
            }
            inner.state.learning_data.push(record);
        }
        self.persist();
        self.notify();
        true
    }

    fn capture_mode(&self) -> bool {
        self.inner.read().state.is_learning_mode
    }

    fn set_capture_mode(&self, enabled: bool) {
        if enabled {
            self.start_capture();
        } else {
            self.stop_capture();
        }
    }

    fn subscribe(&self, callback: RecordsCallback) -> SubscriptionId {
        let mut inner = self.inner.write();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.subscribers.push((id, Arc::new(callback)));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.write().subscribers.retain(|(sub, _)| *sub != id);
    }

    fn len(&self) -> usize {
        self.inner.read().state.learning_data.len()
    }
}
