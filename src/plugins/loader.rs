//! Plugin discovery from plugin directories.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{PluginCatalog, PluginError, PluginOptions};
use crate::content::{ContentResolver, find_files};
use crate::hooks::HookRegistry;

/// Extension of plugin unit files.
pub const PLUGIN_UNIT_EXT: &str = ".yaml";

/// Outcome of loading one or more plugin directories.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Names of the plugins that were registered, in load order
    pub loaded: Vec<String>,
    /// Units that were skipped and why
    pub failed: Vec<(PathBuf, PluginError)>,
}

impl LoadReport {
    fn merge(&mut self, other: LoadReport) {
        self.loaded.extend(other.loaded);
        self.failed.extend(other.failed);
    }
}

/// Instantiates plugin units and registers them with a hook registry.
#[derive(Debug)]
pub struct PluginLoader<'a> {
    catalog: &'a PluginCatalog,
}

impl<'a> PluginLoader<'a> {
    pub fn new(catalog: &'a PluginCatalog) -> Self {
        Self { catalog }
    }

    /// Load every directory called `dir_name` found through the cascade,
    /// nearest first.
    pub fn load_all(
        &self,
        registry: &mut HookRegistry,
        resolver: &ContentResolver,
        dir_name: &str,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        for dir in resolver.resolve_all(dir_name) {
            if dir.is_dir() {
                report.merge(self.load_directory(registry, &dir));
            }
        }
        info!(
            loaded = report.loaded.len(),
            skipped = report.failed.len(),
            "plugins loaded"
        );
        report
    }

    /// Load the plugin units directly inside `dir`.
    ///
    /// A unit that cannot be loaded is reported and skipped; it never stops
    /// the remaining units from loading.
    pub fn load_directory(&self, registry: &mut HookRegistry, dir: &Path) -> LoadReport {
        let mut report = LoadReport::default();
        let mut units = find_files(dir, PLUGIN_UNIT_EXT, false);
        units.sort();

        for unit in units {
            match self.load_unit(registry, &unit) {
                Ok(name) => report.loaded.push(name),
                Err(e) => {
                    warn!(path = %unit.display(), error = %e, "skipping plugin");
                    report.failed.push((unit, e));
                }
            }
        }
        report
    }

    /// Load a single unit and register it. Returns the plugin name.
    fn load_unit(&self, registry: &mut HookRegistry, unit: &Path) -> Result<String, PluginError> {
        let name = unit
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| PluginError::Unknown(unit.display().to_string()))?;

        if !self.catalog.contains(name) {
            return Err(PluginError::Unknown(name.to_string()));
        }

        let raw = std::fs::read_to_string(unit).map_err(|e| PluginError::Read {
            path: unit.to_path_buf(),
            source: e,
        })?;
        let options: PluginOptions = if raw.trim().is_empty() {
            PluginOptions::Null
        } else {
            serde_yaml::from_str(&raw).map_err(|e| PluginError::Options {
                path: unit.to_path_buf(),
                source: e,
            })?
        };

        let plugin = self.catalog.instantiate(name, &options)?;
        let plugin_name = plugin.name().to_string();
        let hooks = registry.register_plugin(plugin);
        debug!(plugin = %plugin_name, path = %unit.display(), hooks = ?hooks, "loaded plugin unit");
        Ok(plugin_name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::content::RequestPaths;
    use crate::hooks::{HookContext, HookPayload, names};
    use crate::plugins::Plugin;

    struct Tagger {
        tag: String,
    }

    impl Plugin for Tagger {
        fn name(&self) -> &str {
            "tagger"
        }

        fn hooks(&self) -> &[&'static str] {
            &[names::AFTER_RENDER]
        }

        fn call(
            &self,
            _hook: &str,
            _ctx: &HookContext<'_>,
            payload: &mut HookPayload<'_>,
        ) -> Result<(), PluginError> {
            if let HookPayload::AfterRender { output } = payload {
                output.push_str(&self.tag);
            }
            Ok(())
        }
    }

    fn catalog() -> PluginCatalog {
        let mut catalog = PluginCatalog::with_builtins();
        catalog.register("tagger", |options| {
            let tag = options
                .get("tag")
                .and_then(|v| v.as_str())
                .unwrap_or("tagged")
                .to_string();
            Ok(Arc::new(Tagger { tag }) as Arc<dyn Plugin>)
        });
        catalog.register("broken", |_| Err(PluginError::failed("broken", "cannot start")));
        catalog
    }

    #[test]
    fn test_load_directory_skips_bad_units() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.yaml"), "").unwrap();
        std::fs::write(dir.path().join("custom404.yaml"), "").unwrap();
        std::fs::write(dir.path().join("tagger.yaml"), "tag: '!'").unwrap();
        std::fs::write(dir.path().join("unknown.yaml"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a unit").unwrap();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/tagger.yaml"), "").unwrap();

        let catalog = catalog();
        let mut registry = HookRegistry::with_hooks(names::PIPELINE_HOOKS);
        let report = PluginLoader::new(&catalog).load_directory(&mut registry, dir.path());

        assert_eq!(report.loaded, vec!["custom404".to_string(), "tagger".to_string()]);
        assert_eq!(report.failed.len(), 2);
        assert_eq!(registry.plugins().len(), 2);
        assert_eq!(
            registry.hook(names::AFTER_RENDER).unwrap().subscribers().len(),
            1
        );
    }

    #[test]
    fn test_invalid_options_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tagger.yaml"), "tag: [unclosed").unwrap();

        let catalog = catalog();
        let mut registry = HookRegistry::with_hooks(names::PIPELINE_HOOKS);
        let report = PluginLoader::new(&catalog).load_directory(&mut registry, dir.path());

        assert!(report.loaded.is_empty());
        assert!(matches!(report.failed[0].1, PluginError::Options { .. }));
    }

    #[test]
    fn test_load_all_walks_cascade() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        std::fs::create_dir_all(content.join("plugins")).unwrap();
        std::fs::create_dir_all(dir.path().join("plugins")).unwrap();
        std::fs::write(content.join("plugins/tagger.yaml"), "").unwrap();
        std::fs::write(dir.path().join("plugins/custom404.yaml"), "").unwrap();

        let resolver = ContentResolver::new(RequestPaths::new(&content, dir.path(), "/"));
        let catalog = catalog();
        let mut registry = HookRegistry::with_hooks(names::PIPELINE_HOOKS);
        let report = PluginLoader::new(&catalog).load_all(&mut registry, &resolver, "plugins");

        assert_eq!(report.loaded, vec!["tagger".to_string(), "custom404".to_string()]);
    }
}
