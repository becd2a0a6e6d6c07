//! AppState — shared read-only data passed to all components during
//! render/event.
//!
//! The App event-loop is the only thing that writes to AppState, and only
//! with values published by the clock and presence producers.

use std::sync::Arc;

use card_proto::clock::CLOCK_PLACEHOLDER;
use card_proto::config::{Config, PresenceConfig, ProfileConfig};
use card_proto::presence::PresenceSnapshot;
use card_proto::view::PresenceView;

#[derive(Debug, Clone)]
pub struct AppState {
    pub clock: String,
    pub presence: Option<Arc<PresenceSnapshot>>,
    /// Local time the last snapshot arrived.
    pub presence_updated_at: Option<chrono::DateTime<chrono::Local>>,
    pub presence_config: PresenceConfig,
    pub profile: ProfileConfig,
    pub profile_url: String,
    pub location_label: String,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            clock: CLOCK_PLACEHOLDER.to_string(),
            presence: None,
            presence_updated_at: None,
            presence_config: config.presence.clone(),
            profile: config.profile.clone(),
            profile_url: config.profile_url(),
            location_label: config.clock.location_label.clone(),
        }
    }

    /// Derived fresh on every call; never stored.
    pub fn view(&self) -> PresenceView {
        PresenceView::derive(self.presence.as_deref(), &self.presence_config)
    }
}
