//! Error types for action-path

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("No recorded actions to visualize")]
    EmptyRecordLog,

    #[error("Node index {index} out of range ({count} nodes)")]
    UnknownNode { index: usize, count: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, PathError>;
