//! Xbox Live HTTP Client

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA, USER_AGENT,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::auth::Authorization;
use super::config::XboxLiveConfig;
use super::types::{
    ActivityHistoryResponse, ActivityQuery, GameClipsResponse, MediaHubGameClip, MediaHubResponse,
    MediaHubScreenshot, MediaKind, MediaListOptions, MediaSearchOptions, ProfileResponse,
    ProfileSetting, ScreenshotsResponse,
};
use crate::dispatch::{CallConfig, Dispatcher};
use crate::error::XblError;
use crate::identifier::PlayerIdentifier;

/// Xbox Live HTTP Client
///
/// Stateless apart from its immutable configuration; clone freely and share
/// across tasks. Every operation takes the caller's [`Authorization`].
#[derive(Debug, Clone)]
pub struct XboxLiveClient {
    config: Arc<XboxLiveConfig>,
    dispatcher: Dispatcher,
}

impl XboxLiveClient {
    /// Create a client with its own connection pool.
    pub fn new(config: XboxLiveConfig) -> Result<Self, XblError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Self::with_http_client(config, client)
    }

    /// Create a client on top of an existing `reqwest::Client`.
    pub fn with_http_client(config: XboxLiveConfig, client: Client) -> Result<Self, XblError> {
        let dispatcher = Dispatcher::new(client, Self::baseline_headers(&config)?)
            .with_allowed_hosts(config.allowed_hosts.iter().cloned())
            .with_contract_version(config.contract_version)
            .with_correlation_id();

        Ok(Self {
            config: Arc::new(config),
            dispatcher,
        })
    }

    fn baseline_headers(config: &XboxLiveConfig) -> Result<HeaderMap, XblError> {
        let mut headers = HeaderMap::new();
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store, must-revalidate, no-cache"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&config.accept_language())?);
        Ok(headers)
    }

    #[must_use]
    pub fn config(&self) -> &XboxLiveConfig {
        &self.config
    }

    /// Classify a player reference with this client's XUID policy.
    pub fn classify(&self, player: &str) -> Result<PlayerIdentifier, XblError> {
        PlayerIdentifier::classify(player, self.config.xuid_policy)
    }

    /// Send an arbitrary request through the same guard and header layering.
    pub async fn call(
        &self,
        authorization: &Authorization,
        call: &CallConfig,
    ) -> Result<Value, XblError> {
        self.call_json(authorization, call).await
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        authorization: &Authorization,
        call: &CallConfig,
    ) -> Result<T, XblError> {
        let credential = authorization.credential()?;
        self.dispatcher.dispatch_json(call, Some(&credential)).await
    }

    fn settings_url(&self, target: &PlayerIdentifier) -> String {
        format!(
            "{}/users/{}/profile/settings",
            self.config.base_urls.profile,
            target.path_segment()
        )
    }

    /// Return the XUID of a player. XUIDs are returned without a request.
    pub async fn resolve_player_xuid(
        &self,
        player: &str,
        authorization: &Authorization,
    ) -> Result<String, XblError> {
        let identifier = self.classify(player)?;
        self.resolve(&identifier, authorization).await
    }

    async fn resolve(
        &self,
        identifier: &PlayerIdentifier,
        authorization: &Authorization,
    ) -> Result<String, XblError> {
        if let Some(xuid) = identifier.as_xuid() {
            return Ok(xuid.to_string());
        }

        debug!(player = %identifier, "resolving gamertag to XUID");
        let call = CallConfig::get(self.settings_url(identifier));
        let response: ProfileResponse = self.call_json(authorization, &call).await?;

        response
            .profile_users
            .into_iter()
            .next()
            .map(|user| user.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| XblError::MissingData("Could not resolve player's XUID.".to_string()))
    }

    /// Return the requested profile settings of a player.
    ///
    /// The player is addressed directly by XUID or gamertag, so this is always
    /// a single request. A response without a profile entry yields no settings.
    pub async fn get_player_settings(
        &self,
        player: &str,
        authorization: &Authorization,
        settings: &[&str],
    ) -> Result<Vec<ProfileSetting>, XblError> {
        let identifier = self.classify(player)?;
        let call =
            CallConfig::get(self.settings_url(&identifier)).query("settings", settings.join(","));
        let response: ProfileResponse = self.call_json(authorization, &call).await?;

        Ok(response
            .profile_users
            .into_iter()
            .next()
            .and_then(|user| user.settings)
            .unwrap_or_default())
    }

    /// Recent screenshots from the per-user screenshot metadata service.
    pub async fn get_player_screenshots(
        &self,
        player: &str,
        authorization: &Authorization,
        options: &MediaListOptions,
    ) -> Result<ScreenshotsResponse, XblError> {
        self.list_media(player, authorization, MediaKind::Screenshots, options)
            .await
    }

    /// Recent game clips from the per-user clip metadata service.
    pub async fn get_player_game_clips(
        &self,
        player: &str,
        authorization: &Authorization,
        options: &MediaListOptions,
    ) -> Result<GameClipsResponse, XblError> {
        self.list_media(player, authorization, MediaKind::GameClips, options)
            .await
    }

    async fn list_media<T: DeserializeOwned>(
        &self,
        player: &str,
        authorization: &Authorization,
        kind: MediaKind,
        options: &MediaListOptions,
    ) -> Result<T, XblError> {
        let xuid = self.resolve_player_xuid(player, authorization).await?;
        let base = match kind {
            MediaKind::Screenshots => &self.config.base_urls.screenshots,
            MediaKind::GameClips => &self.config.base_urls.gameclips,
        };

        let call = CallConfig::get(format!(
            "{base}/users/xuid({xuid})/{}",
            kind.listing_collection()
        ))
        .query("maxItems", options.effective_max_items())
        .query_opt("continuationToken", options.continuation_token.as_deref());

        self.call_json(authorization, &call).await
    }

    /// Screenshots through the media hub search endpoint.
    pub async fn get_player_screenshots_from_search(
        &self,
        player: &str,
        authorization: &Authorization,
        options: &MediaSearchOptions,
    ) -> Result<MediaHubResponse<MediaHubScreenshot>, XblError> {
        self.search_media(player, authorization, MediaKind::Screenshots, options)
            .await
    }

    /// Game clips through the media hub search endpoint.
    pub async fn get_player_game_clips_from_search(
        &self,
        player: &str,
        authorization: &Authorization,
        options: &MediaSearchOptions,
    ) -> Result<MediaHubResponse<MediaHubGameClip>, XblError> {
        self.search_media(player, authorization, MediaKind::GameClips, options)
            .await
    }

    async fn search_media<T: DeserializeOwned>(
        &self,
        player: &str,
        authorization: &Authorization,
        kind: MediaKind,
        options: &MediaSearchOptions,
    ) -> Result<T, XblError> {
        let xuid = self.resolve_player_xuid(player, authorization).await?;
        let call = CallConfig::post(
            format!(
                "{}/{}/search",
                self.config.base_urls.mediahub,
                kind.search_collection()
            ),
            options.to_body(&xuid),
        )
        .contract_version(self.config.search_contract_version);

        self.call_json(authorization, &call).await
    }

    /// Activity feed of a player, query passed through untouched.
    pub async fn get_player_activity_history(
        &self,
        player: &str,
        authorization: &Authorization,
        query: &ActivityQuery,
    ) -> Result<ActivityHistoryResponse, XblError> {
        let xuid = self.resolve_player_xuid(player, authorization).await?;
        let mut call = CallConfig::get(format!(
            "{}/users/xuid({xuid})/activity/History",
            self.config.base_urls.activity
        ));
        call.query = query.to_pairs();

        self.call_json(authorization, &call).await
    }

    /// Screenshot entries of the activity feed.
    pub async fn get_player_screenshots_from_activity_history(
        &self,
        player: &str,
        authorization: &Authorization,
        query: ActivityQuery,
    ) -> Result<ActivityHistoryResponse, XblError> {
        self.get_player_activity_history(player, authorization, &query.screenshots_only())
            .await
    }

    /// Game clip entries of the activity feed.
    pub async fn get_player_game_clips_from_activity_history(
        &self,
        player: &str,
        authorization: &Authorization,
        query: ActivityQuery,
    ) -> Result<ActivityHistoryResponse, XblError> {
        self.get_player_activity_history(player, authorization, &query.game_clips_only())
            .await
    }
}
