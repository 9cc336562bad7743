//! Shared and per-request state for pipeline stages.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::PipelineError;
use crate::config::{Settings, SettingsSources};
use crate::content::{
    ContentResolver, HeaderSpec, MarkupRenderer, Neighbors, PageIndex, PageMetadata, RequestPaths,
};
use crate::hooks::{HookContext, HookPayload, HookRegistry};
use crate::render::TemplateRenderer;

/// Site-wide resources shared by every request.
///
/// Borrowed from a [`Site`](crate::site::Site); nothing in here changes while
/// requests are served.
pub struct PipelineContext<'a> {
    /// Directory containing the site `quire.yaml`
    pub site_root: &'a Path,
    /// Directory request routes map onto
    pub content_root: &'a Path,
    /// Theme directory templates were loaded from
    pub theme_dir: &'a Path,
    /// Site settings before any section override
    pub settings: &'a Settings,
    /// Layers `settings` was built from
    pub sources: &'a SettingsSources,
    pub registry: &'a HookRegistry,
    pub markup: &'a dyn MarkupRenderer,
    pub templates: &'a dyn TemplateRenderer,
}

impl PipelineContext<'_> {
    /// Fire `hook` with the given request settings and resolver in view.
    pub fn fire(
        &self,
        hook: &str,
        settings: &Settings,
        resolver: &ContentResolver,
        payload: &mut HookPayload<'_>,
    ) -> Result<(), PipelineError> {
        let ctx = HookContext { settings, resolver };
        self.registry.fire(hook, &ctx, payload)?;
        Ok(())
    }
}

/// Whether the requested content was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageStatus {
    #[default]
    Ok,
    NotFound,
}

/// Result of running the pipeline for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub status: PageStatus,
    pub body: String,
    /// Name of the template the body was rendered with
    pub template: String,
}

/// Everything a single request accumulates on its way through the stages.
///
/// Allocated fresh for every run and never shared.
#[derive(Debug)]
pub struct RequestState {
    /// Settings in effect for this request
    pub settings: Settings,
    pub resolver: ContentResolver,
    /// Normalized route, e.g. `/posts/hello`
    pub route: String,
    pub status: PageStatus,
    /// Content file being served
    pub file: PathBuf,
    /// Raw content of `file`
    pub raw: String,
    pub headers: HeaderSpec,
    pub meta: PageMetadata,
    /// Rendered content
    pub html: String,
    pub index: PageIndex,
    pub neighbors: Neighbors,
    pub vars: Map<String, Value>,
    pub template: String,
    pub output: String,
}

impl RequestState {
    pub fn new(ctx: &PipelineContext<'_>, request_uri: &str) -> Self {
        let paths = RequestPaths::new(ctx.content_root, ctx.site_root, request_uri);
        Self {
            settings: ctx.settings.clone(),
            resolver: ContentResolver::new(paths),
            route: String::from("/"),
            status: PageStatus::Ok,
            file: PathBuf::new(),
            raw: String::new(),
            headers: HeaderSpec::default(),
            meta: PageMetadata::default(),
            html: String::new(),
            index: PageIndex::default(),
            neighbors: Neighbors::default(),
            vars: Map::new(),
            template: String::new(),
            output: String::new(),
        }
    }

    pub fn into_outcome(self) -> RenderOutcome {
        RenderOutcome {
            status: self.status,
            body: self.output,
            template: self.template,
        }
    }
}
