//! Plugin contract, catalog and directory loader.
//!
//! A plugin declares the hooks it implements by name. The loader turns plugin
//! unit files (`<plugins dir>/<name>.yaml`) into plugin instances by looking
//! the file stem up in a [`PluginCatalog`]; the YAML body becomes the
//! plugin's options.
//!
//! # Writing a Plugin
//!
//! ```ignore
//! struct Shout;
//!
//! impl Plugin for Shout {
//!     fn name(&self) -> &str { "shout" }
//!     fn hooks(&self) -> &[&'static str] { &[names::AFTER_RENDER] }
//!     fn call(&self, _hook: &str, _ctx: &HookContext, payload: &mut HookPayload) -> Result<(), PluginError> {
//!         if let HookPayload::AfterRender { output } = payload {
//!             **output = output.to_uppercase();
//!         }
//!         Ok(())
//!     }
//! }
//!
//! catalog.register("shout", |_options| Ok(Arc::new(Shout)));
//! ```

mod custom404;
mod loader;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::hooks::{HookContext, HookPayload};

pub use custom404::Custom404;
pub use loader::{LoadReport, PLUGIN_UNIT_EXT, PluginLoader};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum PluginError {
    #[error("no plugin named '{0}' is available")]
    Unknown(String),

    #[error("failed to read plugin unit {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid options in plugin unit {path}: {source}")]
    Options {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("plugin '{plugin}' failed: {message}")]
    Failed { plugin: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    /// Create a plugin-specific failure.
    pub fn failed(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Plugin trait
// =============================================================================

/// An extension loaded into the hook registry.
///
/// Plugins are shared across concurrent requests and must not keep
/// per-request state.
pub trait Plugin: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Hooks this plugin implements.
    fn hooks(&self) -> &[&'static str];

    /// Whether this plugin implements `hook`.
    fn implements(&self, hook: &str) -> bool {
        self.hooks().iter().any(|h| *h == hook)
    }

    /// Run the handler for `hook`.
    fn call(
        &self,
        hook: &str,
        ctx: &HookContext<'_>,
        payload: &mut HookPayload<'_>,
    ) -> Result<(), PluginError>;
}

// =============================================================================
// Catalog
// =============================================================================

/// Options parsed from a plugin unit file. `Null` for an empty file.
pub type PluginOptions = serde_yaml::Value;

/// Builds a plugin instance from its options.
pub type PluginFactory =
    Box<dyn Fn(&PluginOptions) -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync>;

/// Plugins that can be instantiated by name.
///
/// Names are matched case-insensitively against plugin unit file stems.
pub struct PluginCatalog {
    factories: HashMap<String, PluginFactory>,
}

impl PluginCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a catalog with the built-in plugins.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register(Custom404::NAME, |options| {
            Ok(Arc::new(Custom404::from_options(options)?) as Arc<dyn Plugin>)
        });
        catalog
    }

    /// Register a factory. A later registration replaces an earlier one.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&PluginOptions) -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync + 'static,
    {
        self.factories
            .insert(name.to_lowercase(), Box::new(factory));
    }

    /// Instantiate the plugin called `name`.
    pub fn instantiate(
        &self,
        name: &str,
        options: &PluginOptions,
    ) -> Result<Arc<dyn Plugin>, PluginError> {
        let factory = self
            .factories
            .get(&name.to_lowercase())
            .ok_or_else(|| PluginError::Unknown(name.to_string()))?;
        factory(options)
    }

    /// Whether a plugin called `name` can be instantiated.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_lowercase())
    }
}

impl Default for PluginCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("PluginCatalog").field("plugins", &names).finish()
    }
}
