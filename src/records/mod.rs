//! Action record log
//!
//! - Record schema shared with the recorder
//! - Relay store (record list + capture flag + change subscriptions)
//! - Watcher that reloads the store when a recorder writes its file
//! - Export/import, validation and summary helpers

pub mod io;
pub mod model;
pub mod store;
pub mod watch;

pub use io::{
    export_file_name, export_records, filter_by_type, filter_by_url, load_records_from_file,
    parse_records, summarize_records, validate_records, write_export, RecordsSummary,
    ValidationReport,
};
pub use model::{ActionRecord, ActionType, CellPosition, ElementInfo, PointerPosition, TableInfo};
pub use store::{LocalStore, RecordRelay, RecordsCallback, SubscriptionId};
pub use watch::StoreWatcher;
