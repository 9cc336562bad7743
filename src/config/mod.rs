//! Configuration loading and types for quire.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for settings structures (`types`)
//! - Layered loading from files, environment and overrides (`load`)

mod load;
mod types;

use std::path::PathBuf;

pub use load::{CONFIG_FILE, SettingsSources};
pub use types::{MarkdownConfig, OrderBy, Settings, SortOrder};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("required setting '{0}' is missing")]
    Missing(&'static str),

    #[error("{0}")]
    Validation(String),
}
