//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `KIDDIEBOX_DATA_DIR` - Directory holding the JSON collections (default: .kiddiebox)
//! - `KIDDIEBOX_CHAT_POLL_MS` - Chat refresh interval in milliseconds (default: 2000)
//! - `GEMINI_API_KEY` - Google Gemini API key (falls back to `API_KEY`).
//!   Without it, recommendations run in simulated mode.
//! - `GEMINI_MODEL` - Gemini model ID (default: gemini-2.5-flash)
//! - `GEMINI_BASE_URL` - API root (default: <https://generativelanguage.googleapis.com>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".kiddiebox";
const DEFAULT_CHAT_POLL_MS: &str = "2000";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory for the file-backed collection store
    pub data_dir: PathBuf,
    /// How often a visible chat surface re-reads the chat log
    pub chat_poll_interval: Duration,
    /// Gemini recommendation configuration
    pub gemini: GeminiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Google Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key. `None` puts the recommendation client in simulated mode.
    pub api_key: Option<SecretString>,
    /// Model ID (e.g., gemini-2.5-flash)
    pub model: String,
    /// API root URL
    pub base_url: Url,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl GeminiConfig {
    /// Configuration with no API key (simulated mode) and default endpoints.
    ///
    /// # Panics
    ///
    /// Never: the default base URL is a valid constant.
    #[must_use]
    pub fn simulated() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            #[allow(clippy::expect_used)]
            base_url: Url::parse(DEFAULT_GEMINI_BASE_URL).expect("default Gemini URL is valid"),
        }
    }

    /// Whether an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn from_lookup(env: &Env<'_>) -> Result<Self, ConfigError> {
        let api_key = env
            .optional("GEMINI_API_KEY")
            .or_else(|| env.optional("API_KEY"))
            .map(|key| {
                if let Some(pattern) = placeholder_pattern(&key) {
                    tracing::warn!("GEMINI_API_KEY looks like a placeholder (contains '{pattern}')");
                }
                SecretString::from(key)
            });

        let base_url_raw = env.or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL);
        let base_url = Url::parse(&base_url_raw)
            .map_err(|e| ConfigError::InvalidEnvVar("GEMINI_BASE_URL".to_string(), e.to_string()))?;

        Ok(Self {
            api_key,
            model: env.or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url,
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set to a value
    /// that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set to a value
    /// that cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { lookup: &lookup };

        let data_dir = PathBuf::from(env.or_default("KIDDIEBOX_DATA_DIR", DEFAULT_DATA_DIR));
        let poll_ms = env
            .or_default("KIDDIEBOX_CHAT_POLL_MS", DEFAULT_CHAT_POLL_MS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("KIDDIEBOX_CHAT_POLL_MS".to_string(), e.to_string())
            })?;
        if poll_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "KIDDIEBOX_CHAT_POLL_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let gemini = GeminiConfig::from_lookup(&env)?;
        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            data_dir,
            chat_poll_interval: Duration::from_millis(poll_ms),
            gemini,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns a reference to the Gemini configuration.
    #[must_use]
    pub const fn gemini(&self) -> &GeminiConfig {
        &self.gemini
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup that treats empty values as unset.
struct Env<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Env<'_> {
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Returns the first placeholder pattern found in `secret`, if any.
fn placeholder_pattern(secret: &str) -> Option<&'static str> {
    let lower = secret.to_lowercase();
    PLACEHOLDER_PATTERNS
        .iter()
        .copied()
        .find(|pattern| lower.contains(pattern))
}

/// Expose a configured API key, treating whitespace-only keys as absent.
pub(crate) fn usable_key(key: Option<&SecretString>) -> Option<&str> {
    key.map(ExposeSecret::expose_secret)
        .filter(|k| !k.trim().is_empty())
}
