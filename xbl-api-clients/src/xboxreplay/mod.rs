//! XboxReplay Client
//!
//! Third-party media index for Xbox captures. Complements the Xbox Live
//! metadata services, which omit media for some recent titles.

mod client;
pub mod types;

pub use client::{XboxReplayClient, DEFAULT_API_VERSION};
pub use types::*;
