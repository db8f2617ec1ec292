//! Prompt Loader
//!
//! Loads prompt templates from the override directory or falls back to the
//! embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (from `prompts.override-dir`)
    override_dir: Option<PathBuf>,
}

impl std::fmt::Debug for PromptLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptLoader")
            .field("override_dir", &self.override_dir)
            .finish()
    }
}

fn engine() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    // Prompt text is not HTML; quotes and ampersands must survive verbatim
    hbs.register_escape_fn(handlebars::no_escape);
    // A misspelt variable in an override template should fail, not render blank
    hbs.set_strict_mode(true);
    hbs
}

impl PromptLoader {
    /// Create a loader that checks `override_dir` before the embedded prompts
    pub fn new(override_dir: Option<&Path>) -> Self {
        debug!(?override_dir, "PromptLoader::new: called");
        let override_dir = match override_dir {
            Some(dir) if dir.is_dir() => {
                info!("Using prompt overrides from {}", dir.display());
                Some(dir.to_path_buf())
            }
            Some(dir) => {
                debug!(?dir, "PromptLoader::new: override directory missing, ignoring");
                None
            }
            None => None,
        };

        Self {
            hbs: engine(),
            override_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: engine(),
            override_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks the override directory first, then the embedded set.
    pub fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in override directory");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not in override directory");
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map(|text| text.trim_end().to_string())
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// The system persona sent with every request
    pub fn system_prompt(&self) -> Result<String> {
        debug!("PromptLoader::system_prompt: called");
        Ok(self.load_template("system")?.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_render_does_not_escape() {
        let loader = PromptLoader::embedded_only();
        let text = loader
            .render(
                "store-lookup",
                &json!({"city": "Navi Mumbai & Thane", "min_stores": 3, "max_stores": 5}),
            )
            .unwrap();
        assert!(text.contains("Navi Mumbai & Thane"));
        assert!(!text.contains("&amp;"));
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.render("store-lookup", &json!({"city": "Pune"})).is_err());
    }

    #[test]
    fn test_override_directory_wins() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("store-lookup.pmt"), "Stores in {{city}} please").unwrap();

        let loader = PromptLoader::new(Some(temp.path()));
        let text = loader.render("store-lookup", &json!({"city": "Goa"})).unwrap();
        assert_eq!(text, "Stores in Goa please");

        // Templates without an override still come from the embedded set
        assert!(loader.system_prompt().unwrap().contains("nutritionist"));
    }

    #[test]
    fn test_missing_override_directory_is_ignored() {
        let loader = PromptLoader::new(Some(Path::new("/nonexistent/prompts")));
        assert!(loader.load_template("diet-plan").is_ok());
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }
}
