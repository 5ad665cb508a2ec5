// Xbox Live API Clients
//
// Typed async clients for the Xbox Live REST services and the XboxReplay media
// index. Both facades share one identifier resolver and one request dispatcher.
//
// Architecture:
// - identifier: gamertag / XUID classification
// - dispatch: host guard, layered headers, status classification
// - xboxlive / xboxreplay: operation functions per upstream

// Shared error types
pub mod error;

// Shared building blocks
pub mod dispatch;
pub mod identifier;

// HTTP clients
pub mod xboxlive;
pub mod xboxreplay;

// Re-export client types for convenience
pub use dispatch::{CallConfig, Credential, Dispatcher};
pub use error::{ErrorKind, XblError};
pub use identifier::{PlayerIdentifier, XuidPolicy};
pub use reqwest::Method;
pub use xboxlive::{Authorization, XboxLiveClient, XboxLiveConfig};
pub use xboxreplay::XboxReplayClient;
