//! A site opened for serving.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{Settings, SettingsSources};
use crate::content::{ContentResolver, Markdown, MarkupRenderer, RequestPaths};
use crate::hooks::{HookContext, HookPayload, HookRegistry, names};
use crate::pipeline::{Pipeline, PipelineContext, PipelineError, RenderOutcome};
use crate::plugins::{PluginCatalog, PluginLoader};
use crate::render::{TemplateRenderer, TeraRenderer};

/// Everything built once at startup and shared by all requests.
///
/// After [`Site::open`] returns nothing in here changes, so a site can sit
/// behind an `Arc` and serve requests from several threads.
pub struct Site {
    root: PathBuf,
    content_root: PathBuf,
    theme_dir: PathBuf,
    settings: Settings,
    sources: SettingsSources,
    registry: HookRegistry,
    markup: Box<dyn MarkupRenderer>,
    templates: Box<dyn TemplateRenderer>,
    pipeline: Pipeline,
}

impl Site {
    /// Open the site rooted at `root` with the built-in plugins.
    pub fn open(root: &Path, overrides: Vec<(String, String)>) -> Result<Self, PipelineError> {
        Self::open_with_catalog(root, overrides, &PluginCatalog::with_builtins())
    }

    /// Open the site rooted at `root`, instantiating plugins from `catalog`.
    ///
    /// Loads the settings, declares the pipeline hooks, loads the plugin
    /// directories and then the theme.
    pub fn open_with_catalog(
        root: &Path,
        overrides: Vec<(String, String)>,
        catalog: &PluginCatalog,
    ) -> Result<Self, PipelineError> {
        let root = root.canonicalize()?;
        let (settings, sources) = Settings::load_site(&root, overrides)?;
        let content_root = root.join(&settings.content_dir);

        let mut registry = HookRegistry::with_hooks(names::PIPELINE_HOOKS);
        let resolver = ContentResolver::new(RequestPaths::new(&content_root, &root, "/"));
        let report =
            PluginLoader::new(catalog).load_all(&mut registry, &resolver, &settings.plugins_dir);

        let hook_ctx = HookContext {
            settings: &settings,
            resolver: &resolver,
        };
        registry.fire(
            names::PLUGINS_LOADED,
            &hook_ctx,
            &mut HookPayload::PluginsLoaded {
                plugins: &report.loaded,
            },
        )?;

        let mut theme_dir = root.join(&settings.theme);
        registry.fire(
            names::BEFORE_TEMPLATE_REGISTER,
            &hook_ctx,
            &mut HookPayload::BeforeTemplateRegister {
                theme_dir: &mut theme_dir,
            },
        )?;

        let markup = Markdown::new(&settings.markdown)?;
        let templates = TeraRenderer::new(&theme_dir)?;

        info!(
            root = %root.display(),
            theme = %theme_dir.display(),
            plugins = ?registry.plugin_names(),
            "site opened"
        );

        Ok(Self {
            root,
            content_root,
            theme_dir,
            settings,
            sources,
            registry,
            markup: Box::new(markup),
            templates: Box::new(templates),
            pipeline: Pipeline::default_pipeline(),
        })
    }

    /// Render the page for `request_uri`.
    pub fn render(&self, request_uri: &str) -> Result<RenderOutcome, PipelineError> {
        self.pipeline.run(&self.context(), request_uri)
    }

    fn context(&self) -> PipelineContext<'_> {
        PipelineContext {
            site_root: &self.root,
            content_root: &self.content_root,
            theme_dir: &self.theme_dir,
            settings: &self.settings,
            sources: &self.sources,
            registry: &self.registry,
            markup: self.markup.as_ref(),
            templates: self.templates.as_ref(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn theme_dir(&self) -> &Path {
        &self.theme_dir
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("root", &self.root)
            .field("theme_dir", &self.theme_dir)
            .field("registry", &self.registry)
            .field("stages", &self.pipeline.stage_names())
            .finish()
    }
}
