//! Request route stage.

use crate::content::normalize_route;
use crate::hooks::{HookPayload, names};
use crate::pipeline::{PipelineContext, PipelineError, RequestState, Stage};

/// Stage that derives the route from the request path.
///
/// `request_url` subscribers may rewrite the route; the result is
/// normalized again afterwards.
pub struct RouteStage;

impl Stage for RouteStage {
    fn name(&self) -> &'static str {
        "route"
    }

    fn process(
        &self,
        ctx: &PipelineContext,
        state: &mut RequestState,
    ) -> Result<(), PipelineError> {
        state.route = normalize_route(state.resolver.current_uri());
        ctx.fire(
            names::REQUEST_URL,
            &state.settings,
            &state.resolver,
            &mut HookPayload::RequestUrl {
                url: &mut state.route,
            },
        )?;
        state.route = normalize_route(&state.route);
        Ok(())
    }
}
