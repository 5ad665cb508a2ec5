//! Xbox Live Client
//!
//! Typed access to the Xbox Live profile, media metadata, media hub and
//! activity services. Tokens are supplied by the caller on every call.
//!
//! # Example
//!
//! ```no_run
//! use xbl_api_clients::xboxlive::{
//!     Authorization, MediaListOptions, XboxLiveClient, XboxLiveConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = XboxLiveClient::new(XboxLiveConfig::default())?;
//! let auth = Authorization::from_token("user-hash", "xsts-token");
//! let xuid = client.resolve_player_xuid("Major Nelson", &auth).await?;
//! let screenshots = client
//!     .get_player_screenshots(&xuid, &auth, &MediaListOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
pub mod config;
pub mod types;

pub use auth::Authorization;
pub use client::XboxLiveClient;
pub use config::{BaseUrls, XboxLiveConfig};
pub use types::*;
