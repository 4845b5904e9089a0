//! Bot configuration with documented defaults
//!
//! Values come from three layers, later layers winning:
//! built-in defaults, an optional TOML file, then environment variables.
//! The resulting `BotConfig` is handed to `PistonClient::new` and never
//! mutated afterwards.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::{BotError, Result};

/// Public Piston instance run by Engineer Man's Discord community
pub const DEFAULT_API_URL: &str = "https://emkc.org/api/v2/piston";

/// Environment variable overriding `api_url`
pub const ENV_API_URL: &str = "PISTON_URL";
/// Environment variable carrying the optional authorization token
pub const ENV_AUTH_TOKEN: &str = "PISTON_AUTH";
/// Older name for the token variable, still honoured
pub const ENV_AUTH_TOKEN_LEGACY: &str = "AUTH";
/// Environment variable overriding `request_timeout_secs`
pub const ENV_TIMEOUT_SECS: &str = "PISTON_TIMEOUT_SECS";

/// Configuration for talking to the execution service
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Base URL of the Piston API, without a trailing `/execute`
    ///
    /// `execute` and `runtimes` endpoints are resolved relative to it.
    pub api_url: String,

    /// Value sent verbatim in the `Authorization` header
    ///
    /// `None` sends requests unauthenticated. The public instance accepts
    /// that but applies a stricter rate limit.
    pub auth_token: Option<String>,

    /// Runtime version selector sent with every execution
    ///
    /// `"*"` asks for the latest installed version of the language.
    pub version: String,

    /// Upper bound for one full request/response round trip, in seconds
    pub request_timeout_secs: u64,

    /// Upper bound for establishing the TCP/TLS connection, in seconds
    pub connect_timeout_secs: u64,

    /// Username the bot answers to, used to accept `/run@<name>` commands
    pub bot_username: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            version: "*".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
            bot_username: "iruncode_bot".to_string(),
        }
    }
}

impl BotConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys keep their defaults
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: BotConfig = toml::from_str(content)?;
        Ok(config.normalized())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }

        let non_blank = |key: &str| lookup(key).filter(|t| !t.trim().is_empty());
        if let Some(token) = non_blank(ENV_AUTH_TOKEN).or_else(|| non_blank(ENV_AUTH_TOKEN_LEGACY)) {
            self.auth_token = Some(token);
            tracing::info!("Auth token picked up from environment");
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = secs.trim().parse().map_err(|_| {
                BotError::Config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?;
        }

        Ok(self.normalized())
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(BotError::Config("api_url must not be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BotError::Config(format!(
                "api_url must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        if self.version.trim().is_empty() {
            return Err(BotError::Config("version must not be empty".into()));
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(BotError::Config("timeouts must be at least one second".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Full URL of the execution endpoint
    pub fn execute_url(&self) -> String {
        format!("{}/execute", self.api_url.trim_end_matches('/'))
    }

    /// Full URL of the runtime-list endpoint
    pub fn runtimes_url(&self) -> String {
        format!("{}/runtimes", self.api_url.trim_end_matches('/'))
    }

    // An empty token means "no token", whichever layer it came from.
    fn normalized(mut self) -> Self {
        if self.auth_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            self.auth_token = None;
        }
        self
    }
}
