//! Xbox Live API Types
//!
//! Request options and JSON response shapes. Response structs default every
//! field so upstream additions or omissions do not break decoding.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Which kind of captured media an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Screenshots,
    GameClips,
}

impl MediaKind {
    /// Collection name on the per-user metadata services.
    #[must_use]
    pub const fn listing_collection(self) -> &'static str {
        match self {
            Self::Screenshots => "screenshots",
            Self::GameClips => "clips",
        }
    }

    /// Collection name on the media hub search service.
    #[must_use]
    pub const fn search_collection(self) -> &'static str {
        match self {
            Self::Screenshots => "screenshots",
            Self::GameClips => "gameclips",
        }
    }
}

// ===== Profile =====

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_users: Vec<ProfileUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUser {
    /// XUID, sent either as a string or as a JSON number.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub host_id: Option<String>,
    pub settings: Option<Vec<ProfileSetting>>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_sponsored_user: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSetting {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or a number, got {other}"
        ))),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string_or_number(deserializer)?.unwrap_or_default())
}

// ===== Direct media listing =====

/// Options for the per-user screenshot / clip listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaListOptions {
    /// Defaults to [`MediaListOptions::DEFAULT_MAX_ITEMS`], also when zero.
    pub max_items: Option<u32>,
    pub continuation_token: Option<String>,
}

impl MediaListOptions {
    pub const DEFAULT_MAX_ITEMS: u32 = 25;

    #[must_use]
    pub fn effective_max_items(&self) -> u32 {
        self.max_items
            .filter(|&n| n > 0)
            .unwrap_or(Self::DEFAULT_MAX_ITEMS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagingInfo {
    pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaThumbnail {
    pub uri: String,
    pub file_size: u64,
    pub thumbnail_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaUri {
    pub uri: String,
    pub file_size: u64,
    pub uri_type: String,
    pub expiration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenshotNode {
    pub screenshot_id: String,
    pub resolution_height: u32,
    pub resolution_width: u32,
    pub state: String,
    pub date_published: Option<String>,
    pub date_taken: Option<String>,
    pub last_modified: Option<String>,
    pub user_caption: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub scid: String,
    pub title_id: u64,
    pub rating: f64,
    pub rating_count: u64,
    pub views: u64,
    pub title_data: String,
    pub system_properties: String,
    pub saved_by_user: bool,
    pub achievement_id: String,
    pub greatest_moment_id: Option<String>,
    pub thumbnails: Vec<MediaThumbnail>,
    pub screenshot_uris: Vec<MediaUri>,
    pub xuid: String,
    pub screenshot_name: String,
    pub title_name: String,
    pub screenshot_locale: String,
    pub device_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameClipNode {
    pub game_clip_id: String,
    pub state: String,
    pub date_published: Option<String>,
    pub date_recorded: Option<String>,
    pub last_modified: Option<String>,
    pub user_caption: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration_in_seconds: u64,
    pub scid: String,
    pub title_id: u64,
    pub rating: f64,
    pub rating_count: u64,
    pub views: u64,
    pub title_data: String,
    pub system_properties: String,
    pub saved_by_user: bool,
    pub achievement_id: String,
    pub greatest_moment_id: Option<String>,
    pub thumbnails: Vec<MediaThumbnail>,
    pub game_clip_uris: Vec<MediaUri>,
    pub xuid: String,
    pub clip_name: String,
    pub title_name: String,
    pub game_clip_locale: String,
    pub device_type: String,
    pub comment_count: u64,
    pub like_count: u64,
    pub share_count: u64,
    pub partial_views: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenshotsResponse {
    pub screenshots: Vec<ScreenshotNode>,
    pub paging_info: PagingInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameClipsResponse {
    pub game_clips: Vec<GameClipNode>,
    pub paging_info: PagingInfo,
}

// ===== Media hub search =====

/// Options for the media hub search endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSearchOptions {
    /// Extra filter clause, ANDed with the ownership clause.
    pub query: Option<String>,
    /// Capped at [`MediaSearchOptions::MAX_ITEMS`], which is also used for
    /// zero or negative values.
    pub max: Option<i64>,
    /// Floored at zero.
    pub skip: Option<i64>,
    pub continuation_token: Option<String>,
}

impl MediaSearchOptions {
    pub const MAX_ITEMS: i64 = 100;

    #[must_use]
    pub fn effective_max(&self) -> i64 {
        self.max
            .filter(|&n| n > 0)
            .map_or(Self::MAX_ITEMS, |n| n.min(Self::MAX_ITEMS))
    }

    #[must_use]
    pub fn effective_skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    /// Search filter owned by `xuid`, with the caller's clause appended.
    #[must_use]
    pub fn filter_for(&self, xuid: &str) -> String {
        let owner = format!("OwnerXuid eq {xuid}");
        match self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(extra) => format!("{owner} and {extra}"),
            None => owner,
        }
    }

    /// JSON payload for the search POST.
    #[must_use]
    pub fn to_body(&self, xuid: &str) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), Value::from(self.filter_for(xuid)));
        body.insert("max".to_string(), Value::from(self.effective_max()));
        body.insert("skip".to_string(), Value::from(self.effective_skip()));
        if let Some(token) = &self.continuation_token {
            body.insert("continuationToken".to_string(), Value::from(token.clone()));
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentLocator {
    pub file_size: Option<u64>,
    pub locator_type: String,
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaHubScreenshot {
    pub content_id: String,
    pub capture_date: Option<String>,
    pub content_locators: Vec<ContentLocator>,
    pub content_state: String,
    pub creation_type: String,
    pub device_type: String,
    pub local_id: String,
    pub owner_xuid: u64,
    pub resolution_height: u32,
    pub resolution_width: u32,
    pub sandbox: String,
    pub shared_by: String,
    pub title_id: u64,
    pub title_name: String,
    pub upload_date: Option<String>,
    pub upload_language: String,
    pub upload_region: String,
    pub upload_title_id: u64,
    pub upload_device_type: String,
    pub comment_count: u64,
    pub like_count: u64,
    pub share_count: u64,
    pub view_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaHubGameClip {
    pub content_id: String,
    pub upload_date: Option<String>,
    pub content_locators: Vec<ContentLocator>,
    pub content_state: String,
    pub creation_type: String,
    pub device_type: String,
    pub duration_in_seconds: u64,
    pub frame_rate: u32,
    pub local_id: String,
    pub owner_xuid: u64,
    pub resolution_height: u32,
    pub resolution_width: u32,
    pub sandbox: String,
    pub shared_by: String,
    pub title_id: u64,
    pub title_name: String,
    pub upload_language: String,
    pub upload_region: String,
    pub upload_title_id: u64,
    pub upload_device_type: String,
    pub comment_count: u64,
    pub like_count: u64,
    pub share_count: u64,
    pub view_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaHubResponse<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

// ===== Activity history =====

/// Query options for the activity history feed, sent as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityQuery {
    pub num_items: Option<u32>,
    pub content_types: Option<String>,
    pub activity_types: Option<String>,
    pub exclude_types: Option<String>,
    pub include_self: Option<bool>,
    pub polling_token: Option<String>,
    pub cont_token: Option<String>,
}

impl ActivityQuery {
    /// Restrict to game screenshots. Overwrites any caller-set type filters.
    #[must_use]
    pub fn screenshots_only(mut self) -> Self {
        self.content_types = Some("Game".to_string());
        self.activity_types = Some("Screenshot".to_string());
        self.exclude_types = Some("GameDVR".to_string());
        self
    }

    /// Restrict to game DVR clips. Overwrites any caller-set type filters.
    #[must_use]
    pub fn game_clips_only(mut self) -> Self {
        self.content_types = Some("Game".to_string());
        self.activity_types = Some("GameDVR".to_string());
        self.exclude_types = Some("Screenshot".to_string());
        self
    }

    /// Wire-name query pairs, absent values skipped.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let fields: [(&str, Option<String>); 7] = [
            ("numItems", self.num_items.map(|n| n.to_string())),
            ("contentTypes", self.content_types.clone()),
            ("activityTypes", self.activity_types.clone()),
            ("excludeTypes", self.exclude_types.clone()),
            ("includeSelf", self.include_self.map(|b| b.to_string())),
            ("pollingToken", self.polling_token.clone()),
            ("contToken", self.cont_token.clone()),
        ];
        fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityItem {
    pub activity_item_type: Option<String>,
    pub content_type: Option<String>,
    pub date: Option<String>,
    pub content_title: Option<String>,
    pub user_xuid: Option<String>,
    pub gamertag: Option<String>,
    /// Fields specific to the item type (screenshot URIs, clip metadata, ...).
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityHistoryResponse {
    pub num_items: u64,
    pub activity_items: Vec<ActivityItem>,
    pub polling_token: Option<String>,
    pub polling_interval_seconds: Option<u64>,
    pub cont_token: Option<String>,
}
