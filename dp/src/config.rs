//! Diet planner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation provider configuration
    pub llm: LlmConfig,

    /// Where per-user records live
    pub storage: StorageConfig,

    /// Prompt template overrides
    pub prompts: PromptsConfig,

    /// User to act as when `--user` is not given
    #[serde(rename = "default-user")]
    pub default_user: Option<String>,

    /// Log level used when `--log-level` is not given
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before any generation command runs
    ///
    /// Checks that the API key environment variable is set so a missing key
    /// fails before the request is built.
    pub fn validate(&self) -> Result<()> {
        let var = self.llm.api_key_env();
        if std::env::var(var).is_err() {
            return Err(eyre::eyre!("LLM API key not found. Set the {} environment variable.", var));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local config: .dietplanner.yml
        let local_config = PathBuf::from(".dietplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User config: ~/.config/dietplanner/dietplanner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("dietplanner").join("dietplanner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Supported generation providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenAi => "gpt-4o-mini",
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com",
            Provider::OpenAi => "https://api.openai.com",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

/// Generation provider configuration
///
/// `model`, `api-key-env` and `base-url` fall back to the provider's
/// defaults when left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Provider,

    /// Model identifier
    pub model: Option<String>,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: Option<String>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Transport-level retries on transient HTTP statuses
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            api_key_env: None,
            base_url: None,
            max_tokens: 8192,
            timeout_ms: 120_000,
            max_retries: 0,
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(self.provider.default_model())
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or(self.provider.default_api_key_env())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(self.provider.default_base_url())
            .trim_end_matches('/')
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        let var = self.api_key_env();
        std::env::var(var).context(format!("Environment variable {} is not set", var))
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory of the profile store
    #[serde(rename = "store-dir")]
    pub store_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_dir: profilestore::config::default_store_path(),
        }
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory checked for `{name}.pmt` before the built-in templates
    #[serde(rename = "override-dir")]
    pub override_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, Provider::Gemini);
        assert_eq!(config.llm.model(), "gemini-2.5-flash");
        assert_eq!(config.llm.api_key_env(), "GEMINI_API_KEY");
        assert_eq!(config.llm.max_retries, 0);
        assert!(config.default_user.is_none());
        assert!(config.storage.store_dir.ends_with("dietplanner/store"));
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: openai
  model: gpt-4.1
  api-key-env: MY_API_KEY
  base-url: http://localhost:8080/
  timeout-ms: 60000
  max-retries: 2
storage:
  store-dir: /srv/dietplanner
prompts:
  override-dir: /etc/dietplanner/prompts
default-user: asha
log-level: debug
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.llm.provider, Provider::OpenAi);
        assert_eq!(config.llm.model(), "gpt-4.1");
        assert_eq!(config.llm.api_key_env(), "MY_API_KEY");
        assert_eq!(config.llm.base_url(), "http://localhost:8080");
        assert_eq!(config.llm.timeout_ms, 60000);
        assert_eq!(config.llm.max_retries, 2);
        assert_eq!(config.storage.store_dir, PathBuf::from("/srv/dietplanner"));
        assert_eq!(config.prompts.override_dir, Some(PathBuf::from("/etc/dietplanner/prompts")));
        assert_eq!(config.default_user.as_deref(), Some("asha"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_provider_defaults() {
        let config: Config = serde_yaml::from_str("llm:\n  provider: openai\n").unwrap();
        assert_eq!(config.llm.model(), "gpt-4o-mini");
        assert_eq!(config.llm.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(config.llm.base_url(), "https://api.openai.com");
        assert_eq!(config.llm.max_tokens, 8192);
    }

    #[test]
    fn test_validate_reports_missing_key() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("DIETPLANNER_TEST_KEY_THAT_IS_NEVER_SET".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DIETPLANNER_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/dietplanner.yml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
