//! Template engine for parameter-space code templates

use rust_embed::Embed;
use std::collections::BTreeMap;
use std::path::Path;
use tera::Tera;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const TEMPLATE_SUFFIX: &str = ".tera";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),

    #[error("Failed to read template directory {path}: {message}")]
    Io { path: String, message: String },
}

/// Template engine using Tera, seeded with the embedded templates
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Create an engine with the embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if !filename.ends_with(TEMPLATE_SUFFIX) {
                continue;
            }
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(render_message(&e)))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Create an engine and layer a directory of `*.tera` files on top
    ///
    /// Files are registered under their path relative to `dir`, so
    /// `dir/spaces/fillet_feature.vba.tera` replaces the built-in template
    /// of the same name.
    pub fn with_dir(dir: &Path) -> Result<Self, TemplateError> {
        let mut engine = Self::new()?;
        engine.load_dir(dir)?;
        Ok(engine)
    }

    pub fn load_dir(&mut self, dir: &Path) -> Result<(), TemplateError> {
        for entry in WalkDir::new(dir).into_iter() {
            let entry = entry.map_err(|e| TemplateError::Io {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !path.to_string_lossy().ends_with(TEMPLATE_SUFFIX) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(dir) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let source = std::fs::read_to_string(path).map_err(|e| TemplateError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            debug!(template = %name, path = %path.display(), "loaded template override");
            self.add_template(&name, &source)?;
        }
        Ok(())
    }

    /// Register (or replace) a template from source text
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), TemplateError> {
        self.tera
            .add_raw_template(name, source)
            .map_err(|e| TemplateError::RenderError(render_message(&e)))
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tera.get_template_names().map(str::to_string).collect();
        names.sort();
        names
    }

    /// Render a template with pre-rendered string values
    ///
    /// Values are inserted as text so numbers keep the exact formatting
    /// the caller chose.
    pub fn render(&self, name: &str, values: &BTreeMap<String, String>) -> Result<String, TemplateError> {
        if !self.has_template(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        let mut context = tera::Context::new();
        for (key, value) in values {
            context.insert(key.as_str(), value);
        }
        self.tera
            .render(name, &context)
            .map_err(|e| TemplateError::RenderError(render_message(&e)))
    }
}

/// Flatten a tera error chain; the top-level message alone rarely names the
/// missing variable
fn render_message(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_embedded_templates_loaded() {
        let engine = TemplateEngine::new().unwrap();
        assert!(engine.has_template("spaces/fillet_feature.vba.tera"));
        assert_eq!(engine.template_names().len(), 7);
    }

    #[test]
    fn test_render_fillet() {
        let engine = TemplateEngine::new().unwrap();
        let code = engine
            .render("spaces/fillet_feature.vba.tera", &values(&[("radius_mm", "3.0")]))
            .unwrap();
        assert!(code.starts_with("' Fillet: radius=3.0mm\n"));
        assert!(code.contains("    195, 3.0 / 1000#, 0, 0, 0, 0, 0, _\n"));
    }

    #[test]
    fn test_missing_variable_is_render_error() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine
            .render("spaces/fillet_feature.vba.tera", &BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, TemplateError::RenderError(_)));
        assert!(err.to_string().contains("radius_mm"));
    }

    #[test]
    fn test_unknown_template() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine.render("nope.tera", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn test_directory_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("spaces")).unwrap();
        std::fs::write(
            dir.path().join("spaces").join("fillet_feature.vba.tera"),
            "Fillet {{ radius_mm }}",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let engine = TemplateEngine::with_dir(dir.path()).unwrap();
        let code = engine
            .render("spaces/fillet_feature.vba.tera", &values(&[("radius_mm", "4.0")]))
            .unwrap();
        assert_eq!(code, "Fillet 4.0");
        assert!(!engine.has_template("notes.txt"));
    }
}
