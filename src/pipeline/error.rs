//! Pipeline error types.

use crate::config::ConfigError;
use crate::content::MarkupError;
use crate::hooks::HookError;
use crate::render::RenderError;

/// Errors that can occur while opening a site or serving a request.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("markdown error: {0}")]
    Markup(#[from] MarkupError),

    #[error("template rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("failed to serialize template variables: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

impl PipelineError {
    /// Create a stage-specific error.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
