//! Backend client configuration.
//!
//! # Responsibility
//! - Hold connection settings for the admin backend.
//! - Load them from environment variables for executables.
//!
//! # Invariants
//! - `base_url` is an absolute `http` or `https` URL without query or fragment.
//! - `timeout` is at least one second.

use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const ENV_BASE_URL: &str = "ESTATE_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "ESTATE_API_TIMEOUT_SECS";
pub const ENV_TOKEN: &str = "ESTATE_API_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = concat!("estate-review/", env!("CARGO_PKG_VERSION"));

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidBaseUrl(String),
    InvalidTimeout(String),
    /// The HTTP client could not be constructed from otherwise valid settings.
    ClientBuild(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVar(name) => write!(f, "environment variable `{name}` is not set"),
            Self::InvalidBaseUrl(value) => {
                write!(f, "base url must be an absolute http(s) url, got `{value}`")
            }
            Self::InvalidTimeout(value) => {
                write!(f, "timeout must be a whole number of seconds >= 1, got `{value}`")
            }
            Self::ClientBuild(reason) => write!(f, "failed to build http client: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Admin backend connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
    /// Bearer token sent with every request when present.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ApiConfig {
    /// Creates a configuration with default timeout and no token.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            auth_token: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.auth_token = (!token.trim().is_empty()).then(|| token.trim().to_string());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Re-checks invariants after manual field edits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_base_url(self.base_url.as_str())?;
        if self.timeout < Duration::from_secs(1) {
            return Err(ConfigError::InvalidTimeout(format!("{:?}", self.timeout)));
        }
        Ok(())
    }

    /// Loads configuration from `ESTATE_API_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_BASE_URL))?;
        let mut config = Self::new(base_url.as_str())?;

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs >= 1)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            config = config.with_auth_token(token);
        }

        config.validate()?;
        Ok(config)
    }

    /// Appends `segments` to the base url path.
    ///
    /// Each segment is percent-encoded as a single path segment, so `/` inside
    /// an id never introduces a new level.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // http(s) urls with a host always have a hierarchical path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let trimmed = value.trim();
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl(trimmed.to_string()))?;
    let scheme_ok = matches!(url.scheme(), "http" | "https");
    if !scheme_ok || url.host_str().is_none() || url.query().is_some() || url.fragment().is_some()
    {
        return Err(ConfigError::InvalidBaseUrl(trimmed.to_string()));
    }
    Ok(url)
}
