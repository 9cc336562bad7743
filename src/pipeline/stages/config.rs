//! Request settings resolution stage.

use tracing::debug;

use crate::config::{CONFIG_FILE, Settings};
use crate::hooks::{HookContext, HookPayload, names};
use crate::pipeline::{PipelineContext, PipelineError, RequestState, Stage};

/// Stage that resolves the settings in effect for the request.
///
/// A `quire.yaml` inside the content tree applies to the section it sits in
/// and everything below it; the nearest one wins. Subscribers of
/// `config_loaded` see the site settings in their context and may edit the
/// request settings in the payload.
pub struct ConfigStage;

impl Stage for ConfigStage {
    fn name(&self) -> &'static str {
        "load-config"
    }

    fn process(
        &self,
        ctx: &PipelineContext,
        state: &mut RequestState,
    ) -> Result<(), PipelineError> {
        if let Some(section) = state.resolver.resolve(CONFIG_FILE)
            && section.starts_with(ctx.content_root)
            && !ctx.sources.files.contains(&section)
        {
            debug!(path = %section.display(), "applying section settings");
            state.settings = Settings::load(&ctx.sources.with_file(&section))?;
        }

        let hook_ctx = HookContext {
            settings: ctx.settings,
            resolver: &state.resolver,
        };
        ctx.registry.fire(
            names::CONFIG_LOADED,
            &hook_ctx,
            &mut HookPayload::ConfigLoaded {
                settings: &mut state.settings,
            },
        )?;
        Ok(())
    }
}
