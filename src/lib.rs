//! Action Path - visualize recorded browser interaction logs
//!
//! Aggregates a recorded action log into a node path, lays it out and draws
//! it on an interactive egui canvas.

pub mod config;
pub mod error;
pub mod notifications;
pub mod path;
pub mod records;
pub mod theme;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use error::{PathError, Result};
pub use notifications::{NotificationKind, Notifications};
pub use path::{
    aggregate, AggregatedNode, PathEvent, PathSettings, PathTheme, PathView, PathViewer,
    VisualizationState,
};
pub use records::{ActionRecord, ActionType, LocalStore, RecordRelay, TableInfo};
pub use theme::Theme;
