//! Pure derivation from the latest presence snapshot to display-ready fields.

use crate::config::PresenceConfig;
use crate::presence::{PresenceSnapshot, Status};

pub const FALLBACK_PRIMARY: &str = "Chilling";
pub const FALLBACK_SECONDARY: &str = "No active session";

const AVATAR_SIZE: u32 = 256;

/// Plain RGB triple so the palette stays independent of any renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const STATUS_ONLINE: Rgb = Rgb(34, 197, 94);
pub const STATUS_IDLE: Rgb = Rgb(234, 179, 8);
pub const STATUS_DND: Rgb = Rgb(239, 68, 68);
pub const STATUS_OFFLINE: Rgb = Rgb(113, 113, 122);

pub fn status_color(status: Status) -> Rgb {
    match status {
        Status::Online => STATUS_ONLINE,
        Status::Idle => STATUS_IDLE,
        Status::Dnd => STATUS_DND,
        Status::Offline | Status::Unknown => STATUS_OFFLINE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Listening,
    Activity,
    Idle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresenceView {
    pub status: Status,
    pub status_color: Rgb,
    pub avatar_url: String,
    pub animated_avatar: bool,
    pub display_name: Option<String>,
    pub activity_kind: ActivityKind,
    pub primary: String,
    pub secondary: String,
    pub art_url: Option<String>,
}

impl PresenceView {
    /// `None` (nothing fetched yet, or every fetch failed) yields the
    /// fallback view.
    pub fn derive(snapshot: Option<&PresenceSnapshot>, config: &PresenceConfig) -> Self {
        let status = snapshot.map(|s| s.discord_status).unwrap_or(Status::Offline);
        let (activity_kind, primary, secondary, art_url) = activity_line(snapshot);
        Self {
            status,
            status_color: status_color(status),
            avatar_url: avatar_url(snapshot, config),
            animated_avatar: snapshot.is_some_and(|s| s.discord_user.has_animated_avatar()),
            display_name: snapshot.and_then(display_name),
            activity_kind,
            primary,
            secondary,
            art_url,
        }
    }
}

pub fn avatar_url(snapshot: Option<&PresenceSnapshot>, config: &PresenceConfig) -> String {
    let hash = snapshot
        .and_then(|s| s.discord_user.avatar.as_deref())
        .filter(|h| !h.is_empty());
    match hash {
        Some(hash) => {
            let ext = if snapshot.is_some_and(|s| s.discord_user.has_animated_avatar()) {
                "gif"
            } else {
                "png"
            };
            format!(
                "{}/{}/{}.{}?size={}",
                config.avatar_cdn_base.trim_end_matches('/'),
                config.user_id,
                hash,
                ext,
                AVATAR_SIZE
            )
        }
        None => config.default_avatar_url.clone(),
    }
}

fn display_name(snapshot: &PresenceSnapshot) -> Option<String> {
    let user = &snapshot.discord_user;
    user.global_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .or_else(|| Some(user.username.as_str()).filter(|n| !n.is_empty()))
        .map(str::to_string)
}

fn activity_line(
    snapshot: Option<&PresenceSnapshot>,
) -> (ActivityKind, String, String, Option<String>) {
    if let Some(snap) = snapshot {
        if snap.listening_to_spotify {
            if let Some(track) = &snap.spotify {
                return (
                    ActivityKind::Listening,
                    track.song.clone(),
                    format!("by {}", track.artist),
                    track.album_art_url.clone(),
                );
            }
        }
    }

    let first = snapshot.and_then(|s| s.activities.first());
    let name = first.map(|a| a.name.as_str()).filter(|n| !n.is_empty());
    let details = first
        .and_then(|a| a.details.as_deref())
        .filter(|d| !d.is_empty());
    let kind = if name.is_some() {
        ActivityKind::Activity
    } else {
        ActivityKind::Idle
    };
    (
        kind,
        name.unwrap_or(FALLBACK_PRIMARY).to_string(),
        details.unwrap_or(FALLBACK_SECONDARY).to_string(),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::{Activity, DiscordUser, Listening};

    fn cfg() -> PresenceConfig {
        PresenceConfig {
            user_id: "42".to_string(),
            ..PresenceConfig::default()
        }
    }

    fn with_status(status: Status) -> PresenceSnapshot {
        PresenceSnapshot {
            discord_status: status,
            ..Default::default()
        }
    }

    #[test]
    fn test_status_palette() {
        let c = cfg();
        let cases = [
            (Status::Online, STATUS_ONLINE),
            (Status::Idle, STATUS_IDLE),
            (Status::Dnd, STATUS_DND),
            (Status::Offline, STATUS_OFFLINE),
            (Status::Unknown, STATUS_OFFLINE),
        ];
        for (status, color) in cases {
            let view = PresenceView::derive(Some(&with_status(status)), &c);
            assert_eq!(view.status_color, color, "{:?}", status);
        }
        assert_eq!(PresenceView::derive(None, &c).status_color, STATUS_OFFLINE);
    }

    #[test]
    fn test_avatar_extension() {
        let c = cfg();
        let mut snap = PresenceSnapshot {
            discord_user: DiscordUser {
                avatar: Some("a_abc".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let view = PresenceView::derive(Some(&snap), &c);
        assert_eq!(
            view.avatar_url,
            "https://cdn.discordapp.com/avatars/42/a_abc.gif?size=256"
        );
        assert!(view.animated_avatar);

        snap.discord_user.avatar = Some("abc".to_string());
        let view = PresenceView::derive(Some(&snap), &c);
        assert_eq!(
            view.avatar_url,
            "https://cdn.discordapp.com/avatars/42/abc.png?size=256"
        );
        assert!(!view.animated_avatar);
    }

    #[test]
    fn test_default_avatar_when_absent() {
        let c = cfg();
        assert_eq!(PresenceView::derive(None, &c).avatar_url, c.default_avatar_url);
        let empty = PresenceSnapshot {
            discord_user: DiscordUser {
                avatar: Some(String::new()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            PresenceView::derive(Some(&empty), &c).avatar_url,
            c.default_avatar_url
        );
    }

    #[test]
    fn test_listening_line() {
        let snap = PresenceSnapshot {
            listening_to_spotify: true,
            spotify: Some(Listening {
                song: "S".to_string(),
                artist: "A".to_string(),
                album_art_url: Some("https://art/x.jpg".to_string()),
                ..Default::default()
            }),
            activities: vec![Activity {
                name: "Spotify".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let view = PresenceView::derive(Some(&snap), &cfg());
        assert_eq!(view.activity_kind, ActivityKind::Listening);
        assert_eq!(view.primary, "S");
        assert_eq!(view.secondary, "by A");
        assert_eq!(view.art_url.as_deref(), Some("https://art/x.jpg"));
    }

    #[test]
    fn test_generic_activity_line() {
        let snap = PresenceSnapshot {
            activities: vec![
                Activity {
                    name: "Coding".to_string(),
                    details: Some("VS Code".to_string()),
                    ..Default::default()
                },
                Activity {
                    name: "Ignored".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let view = PresenceView::derive(Some(&snap), &cfg());
        assert_eq!(view.activity_kind, ActivityKind::Activity);
        assert_eq!(view.primary, "Coding");
        assert_eq!(view.secondary, "VS Code");
        assert!(view.art_url.is_none());
    }

    #[test]
    fn test_activity_without_details() {
        let snap = PresenceSnapshot {
            activities: vec![Activity {
                name: "Coding".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let view = PresenceView::derive(Some(&snap), &cfg());
        assert_eq!(view.primary, "Coding");
        assert_eq!(view.secondary, FALLBACK_SECONDARY);
    }

    #[test]
    fn test_no_snapshot_fallback() {
        let view = PresenceView::derive(None, &cfg());
        assert_eq!(view.status, Status::Offline);
        assert_eq!(view.activity_kind, ActivityKind::Idle);
        assert_eq!(view.primary, "Chilling");
        assert_eq!(view.secondary, "No active session");
        assert!(view.display_name.is_none());
    }

    #[test]
    fn test_listening_flag_without_payload_falls_through() {
        let snap = PresenceSnapshot {
            listening_to_spotify: true,
            ..Default::default()
        };
        let view = PresenceView::derive(Some(&snap), &cfg());
        assert_eq!(view.primary, FALLBACK_PRIMARY);
        assert_eq!(view.secondary, FALLBACK_SECONDARY);
    }

    #[test]
    fn test_display_name_prefers_global_name() {
        let mut snap = PresenceSnapshot {
            discord_user: DiscordUser {
                username: "zephyr.dev".to_string(),
                global_name: Some("Zephyr".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let c = cfg();
        assert_eq!(
            PresenceView::derive(Some(&snap), &c).display_name.as_deref(),
            Some("Zephyr")
        );
        snap.discord_user.global_name = None;
        assert_eq!(
            PresenceView::derive(Some(&snap), &c).display_name.as_deref(),
            Some("zephyr.dev")
        );
    }
}
