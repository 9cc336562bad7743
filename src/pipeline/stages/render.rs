//! Page template stage.

use serde_json::{Map, Value};

use crate::hooks::{HookPayload, names};
use crate::pipeline::{PipelineContext, PipelineError, RequestState, Stage};
use crate::util::path_str;

/// Template used when the page does not name one.
pub const DEFAULT_TEMPLATE: &str = "index";

/// Stage that renders the page template.
///
/// Templates see:
/// `config`, `base_dir`, `base_url`, `theme_dir`, `theme_url`, `site_title`,
/// `meta`, `content`, `pages`, `prev_page`, `current_page`, `next_page` and
/// `is_front_page`.
pub struct RenderStage;

impl RenderStage {
    fn template_vars(
        ctx: &PipelineContext,
        state: &RequestState,
    ) -> Result<Map<String, Value>, PipelineError> {
        let settings = &state.settings;
        let base_dir = path_str(ctx.site_root);
        let theme = path_str(&settings.theme);

        let mut vars = Map::new();
        vars.insert("config".into(), serde_json::to_value(settings)?);
        vars.insert("base_dir".into(), base_dir.trim_end_matches('/').into());
        vars.insert("base_url".into(), settings.base_url.clone().into());
        vars.insert("theme_dir".into(), path_str(ctx.theme_dir).into());
        vars.insert(
            "theme_url".into(),
            format!("{}/{}", settings.base_url, theme.trim_matches('/')).into(),
        );
        vars.insert("site_title".into(), settings.site_title.clone().into());
        vars.insert("meta".into(), serde_json::to_value(&state.meta)?);
        vars.insert("content".into(), state.html.clone().into());
        vars.insert("pages".into(), serde_json::to_value(&state.index)?);
        vars.insert(
            "prev_page".into(),
            serde_json::to_value(&state.neighbors.previous)?,
        );
        vars.insert(
            "current_page".into(),
            serde_json::to_value(&state.neighbors.current)?,
        );
        vars.insert("next_page".into(), serde_json::to_value(&state.neighbors.next)?);
        vars.insert("is_front_page".into(), (state.route == "/").into());
        Ok(vars)
    }
}

impl Stage for RenderStage {
    fn name(&self) -> &'static str {
        "render"
    }

    fn process(
        &self,
        ctx: &PipelineContext,
        state: &mut RequestState,
    ) -> Result<(), PipelineError> {
        state.vars = Self::template_vars(ctx, state)?;
        state.template = if state.meta.template.is_empty() {
            DEFAULT_TEMPLATE.to_string()
        } else {
            state.meta.template.clone()
        };

        ctx.fire(
            names::BEFORE_RENDER,
            &state.settings,
            &state.resolver,
            &mut HookPayload::BeforeRender {
                vars: &mut state.vars,
                template: &mut state.template,
            },
        )?;

        state.output = ctx.templates.render(&state.template, &state.vars)?;

        ctx.fire(
            names::AFTER_RENDER,
            &state.settings,
            &state.resolver,
            &mut HookPayload::AfterRender {
                output: &mut state.output,
            },
        )?;
        Ok(())
    }
}
