//! Content rendering stage.

use crate::content::parse_content;
use crate::hooks::{HookPayload, names};
use crate::pipeline::{PipelineContext, PipelineError, RequestState, Stage};

/// Stage that renders the content body to HTML.
///
/// `parse_content` subscribers may supply the HTML themselves, in which
/// case the markdown renderer is skipped.
pub struct ParseContentStage;

impl Stage for ParseContentStage {
    fn name(&self) -> &'static str {
        "parse-content"
    }

    fn process(
        &self,
        ctx: &PipelineContext,
        state: &mut RequestState,
    ) -> Result<(), PipelineError> {
        ctx.fire(
            names::BEFORE_PARSE_CONTENT,
            &state.settings,
            &state.resolver,
            &mut HookPayload::BeforeParseContent {
                content: &mut state.raw,
            },
        )?;

        let mut html = None;
        ctx.fire(
            names::PARSE_CONTENT,
            &state.settings,
            &state.resolver,
            &mut HookPayload::ParseContent {
                content: &state.raw,
                html: &mut html,
            },
        )?;
        state.html = html
            .unwrap_or_else(|| parse_content(&state.raw, &state.settings.base_url, ctx.markup));

        ctx.fire(
            names::AFTER_PARSE_CONTENT,
            &state.settings,
            &state.resolver,
            &mut HookPayload::AfterParseContent {
                html: &mut state.html,
            },
        )?;
        Ok(())
    }
}
