use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::prompt::TEXT_PLACEHOLDER;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the summarization server.
#[derive(Clone)]
pub struct Config {
    /// API key for the chat-completion provider.
    pub openai_api_key: String,
    /// Base URL of the OpenAI-compatible API (without the `/chat/completions` suffix).
    pub openai_base_url: String,
    /// Model identifier sent with every completion request.
    pub openai_model: String,
    /// Optional user prompt template replacing the built-in one.
    pub prompt_template: Option<String>,
    /// Origins allowed by the CORS layer; `None` means any origin.
    pub allowed_origins: Option<Vec<String>>,
    /// Address the HTTP listener binds to.
    pub server_host: String,
    /// Port the HTTP listener binds to.
    pub server_port: u16,
    /// Optional cap on request body size. Uploads are unbounded when unset.
    pub upload_limit_bytes: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            openai_api_key: load_env("OPENAI_API_KEY")?,
            openai_base_url: load_env_optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: load_env_optional("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            prompt_template: load_env_optional("SUMMARY_PROMPT_TEMPLATE_FILE")
                .map(|path| load_prompt_template(PathBuf::from(path)))
                .transpose()?,
            allowed_origins: load_env_optional("CORS_ALLOWED_ORIGINS")
                .and_then(|value| parse_origins(&value)),
            server_host: load_env_optional("SERVER_HOST")
                .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_SERVER_PORT),
            upload_limit_bytes: load_env_optional("UPLOAD_LIMIT_BYTES")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("UPLOAD_LIMIT_BYTES".into()))
                })
                .transpose()?,
        })
    }

    /// Configuration targeting `base_url` with defaults for everything else (open CORS,
    /// built-in prompt, unbounded uploads).
    pub fn for_provider(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: api_key.into(),
            openai_base_url: base_url.into(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            prompt_template: None,
            allowed_origins: None,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            upload_limit_bytes: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("prompt_template", &self.prompt_template.is_some())
            .field("allowed_origins", &self.allowed_origins)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("upload_limit_bytes", &self.upload_limit_bytes)
            .finish()
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    load_env_optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_prompt_template(path: PathBuf) -> Result<String, ConfigError> {
    let template = std::fs::read_to_string(&path).map_err(|error| {
        ConfigError::InvalidValue(format!(
            "SUMMARY_PROMPT_TEMPLATE_FILE ({}: {error})",
            path.display()
        ))
    })?;
    validate_prompt_template(&template)?;
    Ok(template)
}

/// Reject templates that would drop the document text.
fn validate_prompt_template(template: &str) -> Result<(), ConfigError> {
    if template.contains(TEXT_PLACEHOLDER) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(format!(
            "SUMMARY_PROMPT_TEMPLATE_FILE (template must contain {TEXT_PLACEHOLDER})"
        )))
    }
}

/// `*` (alone or anywhere in the list) means any origin.
fn parse_origins(value: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        None
    } else {
        Some(origins)
    }
}

/// Load `.env` (when present) and build the configuration from the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        base_url = %config.openai_base_url,
        model = %config.openai_model,
        custom_prompt = config.prompt_template.is_some(),
        allowed_origins = ?config.allowed_origins,
        server_host = %config.server_host,
        server_port = config.server_port,
        upload_limit_bytes = ?config.upload_limit_bytes,
        "Loaded configuration"
    );
    Ok(config)
}
