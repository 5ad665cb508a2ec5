use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use xbl_api_clients::xboxlive::{Authorization, XboxLiveConfig};
use xbl_api_clients::xboxreplay::{XboxReplayClient, DEFAULT_API_VERSION};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub xboxlive: XboxLiveConfig,
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

/// Xbox Live credentials. Either `authorization` or both token parts.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub user_hash: Option<String>,
    pub xsts_token: Option<String>,
    pub authorization: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("user_hash", &self.user_hash)
            .field("xsts_token", &self.xsts_token.as_ref().map(|_| "<redacted>"))
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AuthConfig {
    /// Build the authorization, preferring a pre-composed header value.
    pub fn authorization(&self) -> Option<Authorization> {
        if let Some(header) = self.authorization.as_deref().filter(|h| !h.is_empty()) {
            return Some(Authorization::from(header));
        }
        match (self.user_hash.as_deref(), self.xsts_token.as_deref()) {
            (Some(hash), Some(token)) if !hash.is_empty() && !token.is_empty() => {
                Some(Authorization::from_token(hash, token))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub client_token: String,
    pub api_version: String,
    pub base_url: Option<String>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            client_token: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            base_url: None,
        }
    }
}

impl ReplayConfig {
    pub fn client(&self, xboxlive: &XboxLiveConfig) -> XboxReplayClient {
        let client = XboxReplayClient::with_api_version(&self.client_token, &self.api_version)
            .with_xuid_policy(xboxlive.xuid_policy);
        match &self.base_url {
            Some(base_url) => client.with_base_url(base_url.as_str()),
            None => client,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            } else {
                return Err(ConfigError::Message(format!("config file not found: {path}")));
            }
        }

        // Override with environment variables (XBL_AUTH__USER_HASH, etc.)
        builder = builder.add_source(
            Environment::with_prefix("XBL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Check the configuration for mistakes that would only surface as
    /// confusing upstream errors later.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "logging.format must be \"json\" or \"pretty\", got \"{}\"",
                self.logging.format
            ));
        }
        if self.xboxlive.allowed_hosts.is_empty() {
            errors.push("xboxlive.allowed_hosts must not be empty".to_string());
        }
        if self.xboxlive.timeout_secs == 0 {
            errors.push("xboxlive.timeout_secs must be greater than zero".to_string());
        }
        if self.auth.user_hash.is_some() != self.auth.xsts_token.is_some() {
            errors.push("auth.user_hash and auth.xsts_token must be set together".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.auth.authorization().is_none());
        assert_eq!(config.replay.api_version, "2.0");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_authorization_precedence() {
        let auth = AuthConfig {
            user_hash: Some("hash".to_string()),
            xsts_token: Some("token".to_string()),
            authorization: None,
        };
        assert_eq!(
            auth.authorization().unwrap().header_value(),
            "XBL3.0 x=hash;token"
        );

        let auth = AuthConfig {
            authorization: Some("XBL3.0 x=other;tok".to_string()),
            ..auth
        };
        assert_eq!(auth.authorization().unwrap().header_value(), "XBL3.0 x=other;tok");
    }

    #[test]
    fn test_validate_reports_all_errors() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        config.xboxlive.allowed_hosts.clear();
        config.auth.user_hash = Some("hash".to_string());

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let auth = AuthConfig {
            user_hash: Some("hash".to_string()),
            xsts_token: Some("secret".to_string()),
            authorization: None,
        };
        assert!(!format!("{auth:?}").contains("secret"));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(AppConfig::load(Some("/nonexistent/xbl.toml")).is_err());
    }
}
