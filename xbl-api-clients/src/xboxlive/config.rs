//! Xbox Live client configuration
//!
//! Immutable value handed to [`super::XboxLiveClient::new`]. Every field has a
//! default so partial configs (file or environment) deserialize cleanly.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::XblError;
use crate::identifier::XuidPolicy;

pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (XboxReplay; XboxLiveAPI/3.0) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/71.0.3578.98 Safari/537.36"
);

/// Base URL of each Xbox Live service used by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseUrls {
    pub profile: String,
    pub screenshots: String,
    pub gameclips: String,
    pub mediahub: String,
    pub activity: String,
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self {
            profile: "https://profile.xboxlive.com".to_string(),
            screenshots: "https://screenshotsmetadata.xboxlive.com".to_string(),
            gameclips: "https://gameclipsmetadata.xboxlive.com".to_string(),
            mediahub: "https://mediahub.xboxlive.com".to_string(),
            activity: "https://avty.xboxlive.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XboxLiveConfig {
    pub base_urls: BaseUrls,
    /// Hosts (and their subdomains) requests may target.
    pub allowed_hosts: Vec<String>,
    pub user_agent: String,
    /// BCP 47 tag sent as `Accept-Language`.
    pub language: String,
    /// Contract version sent when a call does not pick one.
    pub contract_version: u32,
    /// Contract version for the media hub search endpoints.
    pub search_contract_version: u32,
    pub xuid_policy: XuidPolicy,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for XboxLiveConfig {
    fn default() -> Self {
        Self {
            base_urls: BaseUrls::default(),
            allowed_hosts: vec!["xboxlive.com".to_string()],
            user_agent: DEFAULT_USER_AGENT.to_string(),
            language: "en-US".to_string(),
            contract_version: 2,
            search_contract_version: 5,
            xuid_policy: XuidPolicy::default(),
            connect_timeout_secs: 10,
            timeout_secs: 30,
        }
    }
}

impl XboxLiveConfig {
    /// Point every service at one base URL (gateway, proxy, test server) and
    /// allow its host.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, XblError> {
        let parsed = Url::parse(base)
            .map_err(|e| XblError::InvalidInput(format!("invalid base URL {base}: {e}")))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| XblError::InvalidInput(format!("base URL {base} has no host")))?
            .to_string();

        let base = base.trim_end_matches('/').to_string();
        self.base_urls = BaseUrls {
            profile: base.clone(),
            screenshots: base.clone(),
            gameclips: base.clone(),
            mediahub: base.clone(),
            activity: base,
        };
        if !self.allowed_hosts.contains(&host) {
            self.allowed_hosts.push(host);
        }
        Ok(self)
    }

    #[must_use]
    pub const fn with_xuid_policy(mut self, policy: XuidPolicy) -> Self {
        self.xuid_policy = policy;
        self
    }

    /// `Accept-Language` value, e.g. `en-US, en;q=0.9`.
    #[must_use]
    pub fn accept_language(&self) -> String {
        match self.language.split_once('-') {
            Some((primary, _)) => format!("{}, {primary};q=0.9", self.language),
            None => self.language.clone(),
        }
    }
}
