//! Section-specific not-found pages.

use serde::Deserialize;
use tracing::{debug, warn};

use super::{Plugin, PluginError, PluginOptions};
use crate::hooks::{HookContext, HookPayload, names};

#[derive(Debug, Default, Deserialize)]
struct Custom404Options {
    /// File name to look for; defaults to `404<content_ext>`
    file: Option<String>,
}

/// Replaces the not-found document with the nearest `404` page found by
/// climbing from the requested route towards the site root.
///
/// Enabled by a `custom404.yaml` unit in a plugin directory:
///
/// ```yaml
/// file: missing.md
/// ```
#[derive(Debug, Default)]
pub struct Custom404 {
    file: Option<String>,
}

impl Custom404 {
    pub const NAME: &'static str = "custom404";

    pub fn from_options(options: &PluginOptions) -> Result<Self, PluginError> {
        let options = if options.is_null() {
            Custom404Options::default()
        } else {
            serde_yaml::from_value::<Custom404Options>(options.clone())
                .map_err(|e| PluginError::failed(Self::NAME, e.to_string()))?
        };
        Ok(Self { file: options.file })
    }
}

impl Plugin for Custom404 {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn hooks(&self) -> &[&'static str] {
        &[names::AFTER_404_LOAD_CONTENT]
    }

    fn call(
        &self,
        _hook: &str,
        ctx: &HookContext<'_>,
        payload: &mut HookPayload<'_>,
    ) -> Result<(), PluginError> {
        let HookPayload::After404LoadContent { file, content } = payload else {
            return Ok(());
        };

        let file_name = self
            .file
            .clone()
            .unwrap_or_else(|| format!("404{}", ctx.settings.content_ext));

        if let Some(custom) = ctx.resolver.resolve(&file_name)
            && custom.is_file()
        {
            match std::fs::read_to_string(&custom) {
                Ok(raw) => {
                    debug!(path = %custom.display(), "using custom not-found page");
                    **content = raw;
                    **file = custom;
                }
                Err(e) => {
                    warn!(
                        path = %custom.display(),
                        error = %e,
                        "unreadable not-found page, skipping"
                    );
                }
            }
        }
        Ok(())
    }
}
