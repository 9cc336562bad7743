//! Named extension points and their subscribers.
//!
//! Hooks are declared up front by the pipeline. Plugins registered afterwards
//! are attached to every declared hook they implement, and `fire` calls them
//! in subscription order with a shared, mutable payload.

pub mod names;
mod payload;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::plugins::{Plugin, PluginError};

pub use payload::{HookContext, HookPayload};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum HookError {
    #[error("unknown hook: {0}")]
    UnknownHook(String),

    #[error("plugin '{plugin}' failed in hook '{hook}': {source}")]
    Plugin {
        hook: String,
        plugin: String,
        #[source]
        source: PluginError,
    },
}

// =============================================================================
// Hook points
// =============================================================================

/// A single named extension point.
pub struct HookPoint {
    name: String,
    subscribers: Vec<Arc<dyn Plugin>>,
}

impl HookPoint {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subscribers in invocation order.
    pub fn subscribers(&self) -> &[Arc<dyn Plugin>] {
        &self.subscribers
    }

    /// Attach `plugin` if it implements this hook and is not attached yet.
    fn connect(&mut self, plugin: &Arc<dyn Plugin>) -> bool {
        if !plugin.implements(&self.name) {
            return false;
        }
        if self.subscribers.iter().any(|p| Arc::ptr_eq(p, plugin)) {
            return false;
        }
        self.subscribers.push(Arc::clone(plugin));
        true
    }
}

impl fmt::Debug for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookPoint")
            .field("name", &self.name)
            .field(
                "subscribers",
                &self.subscribers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Every declared hook and every registered plugin.
///
/// Built once at startup and only read while requests are served.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, HookPoint>,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the given hooks declared.
    pub fn with_hooks(names: &[&str]) -> Self {
        let mut registry = Self::new();
        for name in names {
            registry.declare(name);
        }
        registry
    }

    /// Declare an empty hook. Returns `false` if the name is already taken.
    pub fn declare(&mut self, name: &str) -> bool {
        if self.hooks.contains_key(name) {
            return false;
        }
        self.hooks.insert(name.to_string(), HookPoint::new(name));
        true
    }

    /// Declare a hook and connect the plugins registered so far.
    pub fn add_hook(&mut self, name: &str) -> bool {
        if !self.declare(name) {
            return false;
        }
        if let Some(hook) = self.hooks.get_mut(name) {
            for plugin in &self.plugins {
                hook.connect(plugin);
            }
        }
        true
    }

    /// Attach `plugin` to `hook` if it implements it.
    pub fn subscribe(&mut self, hook: &str, plugin: &Arc<dyn Plugin>) -> Result<bool, HookError> {
        let point = self
            .hooks
            .get_mut(hook)
            .ok_or_else(|| HookError::UnknownHook(hook.to_string()))?;
        Ok(point.connect(plugin))
    }

    /// Register a plugin and subscribe it to every declared hook it implements.
    ///
    /// Returns the names of the hooks it was attached to.
    pub fn register_plugin(&mut self, plugin: Arc<dyn Plugin>) -> Vec<String> {
        let mut attached = Vec::new();
        for hook in self.hooks.values_mut() {
            if hook.connect(&plugin) {
                attached.push(hook.name.clone());
            }
        }
        attached.sort();
        debug!(plugin = plugin.name(), hooks = ?attached, "plugin registered");
        self.plugins.push(plugin);
        attached
    }

    /// Invoke every subscriber of `hook` in order.
    ///
    /// Subscriber errors are returned as-is; later subscribers do not run.
    pub fn fire(
        &self,
        hook: &str,
        ctx: &HookContext<'_>,
        payload: &mut HookPayload<'_>,
    ) -> Result<(), HookError> {
        let point = self
            .hooks
            .get(hook)
            .ok_or_else(|| HookError::UnknownHook(hook.to_string()))?;

        for plugin in &point.subscribers {
            trace!(hook, plugin = plugin.name(), "running hook");
            plugin
                .call(hook, ctx, payload)
                .map_err(|source| HookError::Plugin {
                    hook: hook.to_string(),
                    plugin: plugin.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Look up a declared hook.
    pub fn hook(&self, name: &str) -> Option<&HookPoint> {
        self.hooks.get(name)
    }

    /// Whether `name` has been declared.
    pub fn is_declared(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Registered plugins in registration order.
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// Names of the registered plugins, in registration order.
    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name().to_string()).collect()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.values().collect::<Vec<_>>())
            .field("plugins", &self.plugin_names())
            .finish()
    }
}
