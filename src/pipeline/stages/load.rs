//! Content loading stage.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::hooks::{HookPayload, names};
use crate::pipeline::{PageStatus, PipelineContext, PipelineError, RequestState, Stage};

/// Served when a route has no content file and the site has no `404` page.
pub const NOT_FOUND_PAGE: &str = "/*
Title: Error 404
Robots: noindex,nofollow
*/

Error 404
=========

Woops. Looks like this page doesn't exist.
";

/// Stage that reads the content file for the route.
///
/// A missing file is not an error: the request continues with the site
/// `404` page (or [`NOT_FOUND_PAGE`]) and is marked as not found. A file
/// that cannot be read as text is treated as missing, the same way the
/// indexer skips it.
pub struct LoadContentStage;

impl Stage for LoadContentStage {
    fn name(&self) -> &'static str {
        "load-content"
    }

    fn process(
        &self,
        ctx: &PipelineContext,
        state: &mut RequestState,
    ) -> Result<(), PipelineError> {
        let ext = state.settings.content_ext.clone();
        state.file = state.resolver.resolve_page(&state.route, &ext);

        ctx.fire(
            names::BEFORE_LOAD_CONTENT,
            &state.settings,
            &state.resolver,
            &mut HookPayload::BeforeLoadContent {
                file: &mut state.file,
            },
        )?;

        if let Some(raw) = read_content(&state.file) {
            state.raw = raw;
        } else {
            info!(route = %state.route, path = %state.file.display(), "content not found");
            state.status = PageStatus::NotFound;

            ctx.fire(
                names::BEFORE_404_LOAD_CONTENT,
                &state.settings,
                &state.resolver,
                &mut HookPayload::Before404LoadContent {
                    file: &mut state.file,
                },
            )?;

            let site_404 = ctx.content_root.join(format!("404{ext}"));
            if let Some(raw) = read_content(&site_404) {
                state.raw = raw;
                state.file = site_404;
            } else {
                state.raw = NOT_FOUND_PAGE.to_string();
            }

            ctx.fire(
                names::AFTER_404_LOAD_CONTENT,
                &state.settings,
                &state.resolver,
                &mut HookPayload::After404LoadContent {
                    file: &mut state.file,
                    content: &mut state.raw,
                },
            )?;
        }

        ctx.fire(
            names::AFTER_LOAD_CONTENT,
            &state.settings,
            &state.resolver,
            &mut HookPayload::AfterLoadContent {
                file: &mut state.file,
                content: &mut state.raw,
            },
        )?;
        Ok(())
    }
}

/// Read a content file, or `None` if it is absent or not valid text.
fn read_content(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    debug!(path = %path.display(), "loading content");
    match std::fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "unreadable content file, treating as missing"
            );
            None
        }
    }
}
