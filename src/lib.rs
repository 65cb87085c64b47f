#![allow(missing_docs)]

pub mod app_config;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod install;
pub mod merge;
pub mod paths;
pub mod prerequisites;
pub mod secrets;
pub mod target;

pub use catalog::ServerCatalog;
pub use config::{ConfigDocument, ServerEntry};
pub use merge::{merge_config, MergeOptions};
pub use target::{OperatingSystem, Target};

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required dependencies: {}", .0.join(", "))]
    MissingPrerequisites(Vec<String>),
}
