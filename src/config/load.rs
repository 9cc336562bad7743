//! Configuration loading from files.
//!
//! Settings are layered with the `config` crate, lowest precedence first:
//! the site `quire.yaml`, an optional section `quire.yaml` found through the
//! content cascade, `QUIRE_*` environment variables, then explicit overrides.

use std::path::{Path, PathBuf};

use config::{Environment, File, FileFormat};
use tracing::debug;

use super::{ConfigError, Settings};

/// File name of site and section configuration files.
pub const CONFIG_FILE: &str = "quire.yaml";

/// The layers a `Settings` value was built from.
#[derive(Debug, Clone, Default)]
pub struct SettingsSources {
    /// YAML files, lowest precedence first
    pub files: Vec<PathBuf>,
    /// `key = value` overrides applied last (e.g. from the command line)
    pub overrides: Vec<(String, String)>,
}

impl SettingsSources {
    /// The same layers with one more file on top of the existing ones.
    pub fn with_file(&self, path: &Path) -> Self {
        let mut sources = self.clone();
        sources.files.push(path.to_path_buf());
        sources
    }
}

impl Settings {
    /// Load the site settings from `<site_root>/quire.yaml`.
    pub fn load_site(
        site_root: &Path,
        overrides: Vec<(String, String)>,
    ) -> Result<(Self, SettingsSources), ConfigError> {
        let config_path = site_root.join(CONFIG_FILE);
        if !config_path.is_file() {
            return Err(ConfigError::NotFound(config_path));
        }

        let sources = SettingsSources {
            files: vec![config_path],
            overrides,
        };
        let settings = Self::load(&sources)?;
        Ok((settings, sources))
    }

    /// Build settings from the given layers and validate them.
    pub fn load(sources: &SettingsSources) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        for file in &sources.files {
            debug!(path = %file.display(), "adding settings layer");
            builder = builder.add_source(File::from(file.as_path()).format(FileFormat::Yaml));
        }

        builder = builder.add_source(Environment::with_prefix("QUIRE").separator("__"));

        for (key, value) in &sources.overrides {
            builder = builder.set_override(key.as_str(), value.as_str())?;
        }

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        settings.base_url = settings.base_url.trim_end_matches('/').to_string();
        Ok(settings)
    }

    /// Check that every setting the pipeline depends on is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("base_url"));
        }
        if self.content_ext.is_empty() {
            return Err(ConfigError::Missing("content_ext"));
        }
        if !self.content_ext.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "content_ext must start with a dot, got '{}'",
                self.content_ext
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OrderBy, SortOrder};

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_site_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "base_url: http://localhost:3000/\n");

        let (settings, sources) = Settings::load_site(dir.path(), vec![]).unwrap();

        assert_eq!(settings.base_url, "http://localhost:3000");
        assert_eq!(settings.content_ext, ".md");
        assert_eq!(settings.excerpt_length, 50);
        assert!(!settings.index_recursive);
        assert_eq!(settings.pages_order_by, OrderBy::Alpha);
        assert_eq!(sources.files.len(), 1);
    }

    #[test]
    fn test_load_site_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load_site(dir.path(), vec![]);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_missing_base_url_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "site_title: No URL\n");

        let result = Settings::load_site(dir.path(), vec![]);
        assert!(matches!(result, Err(ConfigError::Missing("base_url"))));
    }

    #[test]
    fn test_override_supplies_base_url() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "site_title: No URL\n");

        let overrides = vec![("base_url".to_string(), "https://example.com".to_string())];
        let (settings, _) = Settings::load_site(dir.path(), overrides).unwrap();
        assert_eq!(settings.base_url, "https://example.com");
    }

    #[test]
    fn test_section_layer_overrides_site() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "base_url: https://example.com\npages_order_by: alpha\nauthor_link: /about\n",
        );
        let section_dir = dir.path().join("blog");
        std::fs::create_dir_all(&section_dir).unwrap();
        let section = write_config(&section_dir, "pages_order_by: date\npages_order: desc\n");

        let (_, sources) = Settings::load_site(dir.path(), vec![]).unwrap();
        let settings = Settings::load(&sources.with_file(&section)).unwrap();

        assert_eq!(settings.pages_order_by, OrderBy::Date);
        assert_eq!(settings.pages_order, SortOrder::Desc);
        assert_eq!(settings.base_url, "https://example.com");
        assert_eq!(
            settings.extra.get("author_link"),
            Some(&serde_json::Value::String("/about".to_string()))
        );
    }

    #[test]
    fn test_content_ext_needs_dot() {
        let settings = Settings {
            base_url: "https://example.com".to_string(),
            content_ext: "md".to_string(),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::Validation(_))));
    }
}
