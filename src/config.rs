//! Connection configuration
//!
//! A `ClientConfig` carries everything needed to build a client: the API
//! base URL, basic-auth credentials, the request timeout and a user agent.
//! It can be assembled with a builder or loaded from a YAML profile.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the API base URL
pub const ENV_BASE_URL: &str = "DHIS2_URL";

/// Environment variable holding the username
pub const ENV_USERNAME: &str = "DHIS2_USER";

/// Environment variable holding the password
pub const ENV_PASSWORD: &str = "DHIS2_PASS";

/// Connection settings shared by the async and blocking clients
#[derive(Clone)]
pub struct ClientConfig {
    /// Normalized API base, e.g. `https://play.dhis2.org/40.0.0/api`
    pub base_url: String,
    /// Basic auth username
    pub username: String,
    /// Basic auth password
    pub password: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl ClientConfig {
    /// Build a config with default timeout and user agent
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::builder()
            .base_url(base_url)
            .credentials(username, password)
            .build()
    }

    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load a connection profile from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse a connection profile from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let profile: ConnectionProfile = serde_yaml::from_str(yaml)?;
        profile.into_config()
    }

    /// Join an endpoint onto the base URL
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for client config
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set basic auth credentials
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<ClientConfig> {
        let mut missing = Vec::new();
        if self.base_url.as_deref().map_or(true, str::is_empty) {
            missing.push(format!("base_url (or set {ENV_BASE_URL})"));
        }
        if self.username.as_deref().map_or(true, str::is_empty) {
            missing.push(format!("user (or set {ENV_USERNAME})"));
        }
        if self.password.as_deref().map_or(true, str::is_empty) {
            missing.push(format!("password (or set {ENV_PASSWORD})"));
        }
        if !missing.is_empty() {
            return Err(Error::MissingConfigField {
                fields: missing.join(", "),
            });
        }

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        if timeout.is_zero() {
            return Err(Error::config("timeout must be greater than zero"));
        }

        Ok(ClientConfig {
            base_url: normalize_base_url(&self.base_url.unwrap_or_default())?,
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            timeout,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| format!("dhis2kit/{}", env!("CARGO_PKG_VERSION"))),
        })
    }
}

/// On-disk connection profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionProfile {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ConnectionProfile {
    /// Load a possibly partial profile; the CLI layers flags and env on top
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Convert into a validated config
    pub fn into_config(self) -> Result<ClientConfig> {
        let mut builder = ClientConfig::builder();
        if let Some(url) = self.base_url {
            builder = builder.base_url(url);
        }
        builder.username = self.username;
        builder.password = self.password;
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }
}

/// Normalize an API base URL
///
/// Trims whitespace, collapses repeated slashes in the path and drops the
/// trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let mut url = Url::parse(raw.trim())?;

    let mut path = url.path().to_string();
    while path.contains("//") {
        path = path.replace("//", "/");
    }
    url.set_path(path.trim_end_matches('/'));

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("  https://play.dhis2.org//40.0.0///api/ ").unwrap(),
            "https://play.dhis2.org/40.0.0/api"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8080/api").unwrap(),
            "http://localhost:8080/api"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8080/").unwrap(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_normalize_base_url_invalid() {
        let err = normalize_base_url("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::new("https://example.org/api/", "admin", "district").unwrap();
        assert_eq!(config.base_url, "https://example.org/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("dhis2kit/"));
        assert_eq!(
            config.url("/dataElements.json"),
            "https://example.org/api/dataElements.json"
        );
    }

    #[test]
    fn test_builder_reports_all_missing_values() {
        let err = ClientConfig::builder()
            .base_url("https://example.org/api")
            .build()
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("user (or set DHIS2_USER)"));
        assert!(message.contains("password (or set DHIS2_PASS)"));
        assert!(!message.contains("base_url"));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let err = ClientConfig::builder()
            .base_url("https://example.org/api")
            .credentials("u", "p")
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ClientConfig::new("https://example.org/api", "admin", "district").unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("district"));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url: http://localhost:8080/api/\nusername: admin\npassword: district\ntimeout_secs: 5"
        )
        .unwrap();

        let config = ClientConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.username, "admin");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_yaml_missing_password() {
        let err = ClientConfig::from_yaml_str("base_url: http://x/api\nusername: admin\n").unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }
}
