//! XboxReplay HTTP Client
//!
//! Read-only access to the XboxReplay media index. Authenticated with a
//! client token instead of XBL3.0 credentials.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;

use super::types::ReplayMediaOptions;
use crate::dispatch::{CallConfig, Credential, Dispatcher};
use crate::error::XblError;
use crate::identifier::{encode_component, PlayerIdentifier, XuidPolicy};
use crate::xboxlive::MediaKind;

pub const DEFAULT_API_VERSION: &str = "2.0";

const CLIENT_TOKEN_HEADER: &str = "xr-client-token";
const REPLAY_USER_AGENT: &str = "xboxreplay/xboxlive-api";

/// Shared HTTP client for all XboxReplay requests (connection pooling)
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build XboxReplay shared HTTP client")
});

/// XboxReplay HTTP Client
#[derive(Debug, Clone)]
pub struct XboxReplayClient {
    client_token: String,
    base_url: String,
    xuid_policy: XuidPolicy,
    dispatcher: Dispatcher,
}

impl XboxReplayClient {
    /// Create a client for the default API version (reuses shared connection pool)
    pub fn new(client_token: impl Into<String>) -> Self {
        Self::with_api_version(client_token, DEFAULT_API_VERSION)
    }

    pub fn with_api_version(client_token: impl Into<String>, api_version: &str) -> Self {
        let mut baseline = HeaderMap::new();
        baseline.insert(ACCEPT, HeaderValue::from_static("application/json"));
        baseline.insert(USER_AGENT, HeaderValue::from_static(REPLAY_USER_AGENT));

        Self {
            client_token: client_token.into(),
            base_url: format!("https://www.xboxreplay.net/api/v{api_version}"),
            xuid_policy: XuidPolicy::default(),
            dispatcher: Dispatcher::new(SHARED_CLIENT.clone(), baseline),
        }
    }

    /// Override the API root, e.g. for a mirror or a test server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn with_xuid_policy(mut self, policy: XuidPolicy) -> Self {
        self.xuid_policy = policy;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn has_client_token(&self) -> bool {
        !self.client_token.is_empty()
    }

    fn api_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Screenshots indexed for a player (gamertag or XUID).
    pub async fn get_player_screenshots(
        &self,
        target: &str,
        options: &ReplayMediaOptions,
    ) -> Result<Value, XblError> {
        self.media_list(target, MediaKind::Screenshots, options).await
    }

    /// Game clips indexed for a player (gamertag or XUID).
    pub async fn get_player_game_clips(
        &self,
        target: &str,
        options: &ReplayMediaOptions,
    ) -> Result<Value, XblError> {
        self.media_list(target, MediaKind::GameClips, options).await
    }

    async fn media_list(
        &self,
        target: &str,
        kind: MediaKind,
        options: &ReplayMediaOptions,
    ) -> Result<Value, XblError> {
        if !self.has_client_token() {
            return Err(XblError::InvalidInput("Missing client token".to_string()));
        }

        let player = match PlayerIdentifier::classify(target, self.xuid_policy)? {
            PlayerIdentifier::Xuid(xuid) => xuid,
            PlayerIdentifier::Gamertag(gamertag) => encode_component(&gamertag),
        };

        let mut call = CallConfig::get(self.api_url(&format!(
            "/players/{player}/{}",
            kind.listing_collection()
        )));
        call.query = options.to_pairs();

        let credential = Credential::new(
            HeaderName::from_static(CLIENT_TOKEN_HEADER),
            &self.client_token,
        )?;
        self.dispatcher.dispatch(&call, Some(&credential)).await
    }
}
