use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const OPENAI_HOST: &str = "https://api.openai.com";
pub const OPENAI_MODEL: &str = "gpt-4o-mini";
pub const SERPAPI_HOST: &str = "https://serpapi.com";
pub const WIKIPEDIA_HOST: &str = "https://en.wikipedia.org";

/// Load variables from a `.env` file into the process environment.
///
/// With an explicit path that file is loaded, otherwise the usual upward search
/// from the current directory applies. A file that cannot be loaded is only
/// logged, the variables may already be exported.
pub fn load_env(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => match dotenv::from_path(path) {
            Ok(()) => Some(path.to_path_buf()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not load env file");
                None
            }
        },
        None => dotenv::dotenv().ok(),
    }
}

pub trait Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self>
    where
        Self: Sized;

    /// Read an environment variable, falling back to `default` when it is optional
    fn get_env(key: &str, required: bool, default: Option<String>) -> Result<Option<String>> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) if !required => Ok(default),
            Err(env::VarError::NotPresent) => Err(anyhow!(
                "Environment variable '{}' is required but not set.",
                key
            )),
            Err(e) => Err(e).with_context(|| format!("Environment variable '{}' is invalid", key)),
        }
    }

    /// Read and parse an optional environment variable
    fn get_env_parsed<T>(key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Self::get_env(key, false, None)?
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|e| anyhow!("Could not parse {}='{}': {}", key, raw, e))
            })
            .transpose()
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl OpenAiProviderConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            host: OPENAI_HOST.to_string(),
            api_key,
            model: OPENAI_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl OpenAiProviderConfig {
    /// Like `from_env`, but an explicit key takes the place of OPENAI_API_KEY.
    /// The remaining variables are still read and parse failures still surface.
    pub fn from_env_with_key(api_key: Option<String>) -> Result<Self> {
        let api_key = match api_key {
            Some(api_key) => api_key,
            None => Self::get_env("OPENAI_API_KEY", true, None)?
                .ok_or_else(|| anyhow!("OpenAI API key should be present"))?,
        };

        let host = Self::get_env("OPENAI_HOST", false, Some(OPENAI_HOST.to_string()))?
            .unwrap_or_else(|| OPENAI_HOST.to_string());

        let model = Self::get_env("OPENAI_MODEL", false, Some(OPENAI_MODEL.to_string()))?
            .unwrap_or_else(|| OPENAI_MODEL.to_string());

        Ok(Self {
            host,
            api_key,
            model,
            temperature: Self::get_env_parsed("OPENAI_TEMPERATURE")?,
            max_tokens: Self::get_env_parsed("OPENAI_MAX_TOKENS")?,
        })
    }
}

impl Config for OpenAiProviderConfig {
    fn from_env() -> Result<Self> {
        Self::from_env_with_key(None)
    }
}

#[derive(Debug, Clone)]
pub struct SerpApiConfig {
    pub host: String,
    pub api_key: String,
    /// Number of postings rendered per query
    pub max_results: usize,
}

impl SerpApiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            host: SERPAPI_HOST.to_string(),
            api_key,
            max_results: 1,
        }
    }
}

impl Config for SerpApiConfig {
    fn from_env() -> Result<Self> {
        let api_key = Self::get_env("SERPAPI_API_KEY", true, None)?
            .ok_or_else(|| anyhow!("SerpAPI key should be present"))?;

        let host = Self::get_env("SERPAPI_HOST", false, Some(SERPAPI_HOST.to_string()))?
            .unwrap_or_else(|| SERPAPI_HOST.to_string());

        Ok(Self {
            host,
            api_key,
            max_results: Self::get_env_parsed("SERPAPI_MAX_RESULTS")?.unwrap_or(1),
        })
    }
}

#[derive(Debug, Clone)]
pub struct WikipediaConfig {
    pub host: String,
    pub top_k_results: usize,
    pub doc_content_chars_max: usize,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            host: WIKIPEDIA_HOST.to_string(),
            top_k_results: 3,
            doc_content_chars_max: 4000,
        }
    }
}

impl WikipediaConfig {
    /// Read the WIKIPEDIA_* variables, falling back to `defaults` for any that are unset
    pub fn from_env_or(defaults: WikipediaConfig) -> Result<Self> {
        let host = Self::get_env("WIKIPEDIA_HOST", false, Some(defaults.host))?
            .unwrap_or_else(|| WIKIPEDIA_HOST.to_string());

        Ok(Self {
            host,
            top_k_results: Self::get_env_parsed("WIKIPEDIA_TOP_K")?
                .unwrap_or(defaults.top_k_results),
            doc_content_chars_max: Self::get_env_parsed("WIKIPEDIA_MAX_CHARS")?
                .unwrap_or(defaults.doc_content_chars_max),
        })
    }
}

impl Config for WikipediaConfig {
    fn from_env() -> Result<Self> {
        Self::from_env_or(Self::default())
    }
}
