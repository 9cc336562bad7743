//! Template rendering.

use std::path::Path;

use serde_json::{Map, Value};
use tera::{Context, Tera};

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("theme not found: {0}")]
    ThemeNotFound(String),
}

/// Renders a named template with a set of variables.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, vars: &Map<String, Value>) -> Result<String, RenderError>;
}

/// The template renderer, wrapping Tera.
///
/// Template `name` is loaded from `<theme>/<name>.html`. Output is not
/// escaped since page content is already HTML.
#[derive(Debug)]
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Create a renderer loading every template in the theme directory.
    pub fn new(theme_path: &Path) -> Result<Self, RenderError> {
        if !theme_path.is_dir() {
            return Err(RenderError::ThemeNotFound(
                theme_path.display().to_string(),
            ));
        }

        let glob = theme_path.join("**/*.html");
        let glob_str = glob.to_string_lossy();
        let mut tera = Tera::new(&glob_str)?;
        tera.autoescape_on(vec![]);

        Ok(Self { tera })
    }

    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort();
        names
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template: &str, vars: &Map<String, Value>) -> Result<String, RenderError> {
        let context = Context::from_serialize(vars)?;
        Ok(self.tera.render(&format!("{template}.html"), &context)?)
    }
}
