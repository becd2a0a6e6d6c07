//! Clock producer: publishes the wall-clock time of one fixed timezone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::ClockConfig;
use crate::task::TaskHandle;

/// Shown until the first tick lands.
pub const CLOCK_PLACEHOLDER: &str = "--:--";

/// 24-hour `HH:MM` for `now` in `tz`.
pub fn format_clock(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).format("%H:%M").to_string()
}

pub struct ClockProducer;

impl ClockProducer {
    /// Start ticking. The first tick fires one period after the call.
    pub fn spawn(config: &ClockConfig) -> (TaskHandle, watch::Receiver<String>) {
        Self::spawn_with(config, Utc::now)
    }

    /// Same as [`ClockProducer::spawn`] with an injectable time source.
    pub fn spawn_with<F>(config: &ClockConfig, now: F) -> (TaskHandle, watch::Receiver<String>)
    where
        F: Fn() -> DateTime<Utc> + Send + 'static,
    {
        let tz = config.tz();
        let period = config.tick();
        let (tx, rx) = watch::channel(CLOCK_PLACEHOLDER.to_string());
        let token = CancellationToken::new();
        let task_token = token.clone();

        let join = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let text = format_clock(now(), tz);
                        tx.send_if_modified(|current| {
                            if *current == text {
                                false
                            } else {
                                *current = text;
                                true
                            }
                        });
                    }
                }
            }
        });

        (TaskHandle::new("clock", token, join), rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_clock_tokyo() {
        // 15:04 UTC is 00:04 the next day in Tokyo (UTC+9, no DST).
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 15, 4, 59).unwrap();
        assert_eq!(format_clock(now, Tz::Asia__Tokyo), "00:04");
    }

    #[test]
    fn test_format_clock_zero_pads() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 7, 0).unwrap();
        assert_eq!(format_clock(now, Tz::UTC), "00:07");
        assert_eq!(format_clock(now, Tz::Asia__Tokyo), "09:07");
    }

    #[test]
    fn test_format_clock_tracks_dst_zone() {
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        assert_eq!(format_clock(winter, Tz::Europe__Paris), "13:00");
        assert_eq!(format_clock(summer, Tz::Europe__Paris), "14:00");
    }
}
