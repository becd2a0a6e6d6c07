use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub presence: PresenceConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub tilt: TiltConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Where presence comes from and how often it is refreshed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_avatar_cdn_base")]
    pub avatar_cdn_base: String,
    #[serde(default = "default_avatar_url")]
    pub default_avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// IANA timezone name, e.g. `Asia/Tokyo`.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_location_label")]
    pub location_label: String,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Spring constants and output ranges for the pointer tilt effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiltConfig {
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_max_rotation_deg")]
    pub max_rotation_deg: f64,
    #[serde(default = "default_brightness_min")]
    pub brightness_min: f64,
    #[serde(default = "default_brightness_max")]
    pub brightness_max: f64,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

/// Static identity shown on the card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_handle")]
    pub handle: String,
    #[serde(default = "default_tagline")]
    pub tagline: String,
    #[serde(default = "default_note")]
    pub note: String,
    #[serde(default = "default_open_to_work")]
    pub open_to_work: bool,
    #[serde(default = "default_portfolio_url")]
    pub portfolio_url: String,
    /// Defaults to the presence provider's web profile for `presence.user_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            api_base: default_api_base(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            avatar_cdn_base: default_avatar_cdn_base(),
            default_avatar_url: default_avatar_url(),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            location_label: default_location_label(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            stiffness: default_stiffness(),
            damping: default_damping(),
            max_rotation_deg: default_max_rotation_deg(),
            brightness_min: default_brightness_min(),
            brightness_max: default_brightness_max(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            handle: default_handle(),
            tagline: default_tagline(),
            note: default_note(),
            open_to_work: default_open_to_work(),
            portfolio_url: default_portfolio_url(),
            profile_url: None,
        }
    }
}

fn default_user_id() -> String {
    "1329835276020748321".to_string()
}

fn default_api_base() -> String {
    "https://api.lanyard.rest".to_string()
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_avatar_cdn_base() -> String {
    "https://cdn.discordapp.com/avatars".to_string()
}

fn default_avatar_url() -> String {
    "https://cdn.discordapp.com/embed/avatars/0.png".to_string()
}

fn default_timezone() -> String {
    "Asia/Tokyo".to_string()
}

fn default_location_label() -> String {
    "Tokyo, JP".to_string()
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_stiffness() -> f64 {
    500.0
}

fn default_damping() -> f64 {
    100.0
}

fn default_max_rotation_deg() -> f64 {
    15.0
}

fn default_brightness_min() -> f64 {
    1.0
}

fn default_brightness_max() -> f64 {
    1.2
}

fn default_frame_rate() -> u32 {
    60
}

fn default_handle() -> String {
    "@zephyr.dev".to_string()
}

fn default_tagline() -> String {
    "Founder & CEO of WebLooM inc. / BuildCore / Vertex Creative".to_string()
}

fn default_note() -> String {
    "Feel free to reach out".to_string()
}

fn default_open_to_work() -> bool {
    true
}

fn default_portfolio_url() -> String {
    "https://zephyrdevontop.vercel.app".to_string()
}

impl PresenceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }

    /// Full endpoint for this user's presence document.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/users/{}",
            self.api_base.trim_end_matches('/'),
            self.user_id
        )
    }
}

impl ClockConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Parsed timezone. Unknown names fall back to Asia/Tokyo.
    pub fn tz(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(e) => {
                tracing::warn!("invalid timezone {:?} ({}), using Asia/Tokyo", self.timezone, e);
                Tz::Asia__Tokyo
            }
        }
    }
}

impl TiltConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.clamp(1, 240)))
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    pub fn profile_url(&self) -> String {
        self.profile
            .profile_url
            .clone()
            .unwrap_or_else(|| format!("https://discord.com/users/{}", self.presence.user_id))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presence: PresenceConfig::default(),
            clock: ClockConfig::default(),
            tilt: TiltConfig::default(),
            profile: ProfileConfig::default(),
        }
    }
}
