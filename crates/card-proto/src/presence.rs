//! Presence data model and the Lanyard HTTP client.
//!
//! The snapshot types mirror the subset of the Lanyard `data` object the card
//! reads. Every field has a serde default so partial documents still decode.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PresenceConfig;

/// Hash prefix Discord uses for animated avatars.
pub const ANIMATED_AVATAR_PREFIX: &str = "a_";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Online,
    Idle,
    Dnd,
    #[default]
    Offline,
    /// Anything the provider sends that we don't recognise.
    #[serde(other)]
    Unknown,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::Dnd => "do not disturb",
            Self::Offline | Self::Unknown => "offline",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PresenceSnapshot {
    #[serde(default)]
    pub discord_status: Status,
    #[serde(default)]
    pub listening_to_spotify: bool,
    #[serde(default)]
    pub spotify: Option<Listening>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub discord_user: DiscordUser,
}

/// Currently playing track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Listening {
    #[serde(default)]
    pub song: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub album_art_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Activity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiscordUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl DiscordUser {
    pub fn has_animated_avatar(&self) -> bool {
        self.avatar
            .as_deref()
            .is_some_and(|hash| hash.starts_with(ANIMATED_AVATAR_PREFIX))
    }
}

/// Response envelope: `{ "success": bool, "data": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<PresenceSnapshot>,
}

impl ApiEnvelope {
    pub fn into_snapshot(self) -> Result<PresenceSnapshot, PresenceError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(PresenceError::Rejected),
        }
    }
}

#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("presence API returned status {0}")]
    Status(u16),
    #[error("invalid presence document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("presence API reported failure or sent no data")]
    Rejected,
}

/// Anything that can produce a fresh presence snapshot.
pub trait PresenceSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<PresenceSnapshot, PresenceError>> + Send;
}

/// Decode a raw response body.
pub fn parse_body(body: &str) -> Result<PresenceSnapshot, PresenceError> {
    let envelope: ApiEnvelope = serde_json::from_str(body)?;
    envelope.into_snapshot()
}

#[derive(Debug, Clone)]
pub struct LanyardClient {
    client: reqwest::Client,
    endpoint: String,
}

impl LanyardClient {
    pub fn new(config: &PresenceConfig) -> Result<Self, PresenceError> {
        Self::with_timeout(config.endpoint(), config.request_timeout())
    }

    pub fn with_timeout(endpoint: String, timeout: Duration) -> Result<Self, PresenceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("zephyr-id/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PresenceSource for LanyardClient {
    async fn fetch(&self) -> Result<PresenceSnapshot, PresenceError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PresenceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_body(&body)
    }
}
