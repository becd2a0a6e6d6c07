//! Presence poller: fetch once on start, then on a fixed interval.
//!
//! Each tick spawns its own fetch, so a slow response never delays the next
//! tick and several requests can be in flight at once. Whichever resolves
//! last wins; there is no sequencing. Failures are logged and the previously
//! published snapshot stays in place.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::presence::{PresenceSnapshot, PresenceSource};
use crate::task::TaskHandle;

/// Latest successfully parsed snapshot, `None` until the first success.
pub type SnapshotReceiver = watch::Receiver<Option<Arc<PresenceSnapshot>>>;

pub struct PresencePoller;

impl PresencePoller {
    pub fn spawn<S: PresenceSource>(source: S, every: Duration) -> (TaskHandle, SnapshotReceiver) {
        let source = Arc::new(source);
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);
        let token = CancellationToken::new();
        let task_token = token.clone();

        let join = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut seq: u64 = 0;
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        seq += 1;
                        tokio::spawn(fetch_once(
                            seq,
                            Arc::clone(&source),
                            Arc::clone(&tx),
                            task_token.clone(),
                        ));
                    }
                }
            }
        });

        (TaskHandle::new("presence poller", token, join), rx)
    }
}

async fn fetch_once<S: PresenceSource>(
    seq: u64,
    source: Arc<S>,
    tx: Arc<watch::Sender<Option<Arc<PresenceSnapshot>>>>,
    token: CancellationToken,
) {
    let result = source.fetch().await;
    // The card may have been torn down while the request was in flight.
    if token.is_cancelled() {
        debug!("[presence] dropping late response #{}", seq);
        return;
    }
    match result {
        Ok(snapshot) => {
            debug!(
                "[presence] #{} status={:?} listening={} activities={}",
                seq,
                snapshot.discord_status,
                snapshot.listening_to_spotify,
                snapshot.activities.len()
            );
            // send_replace never fails, even with no receivers left.
            tx.send_replace(Some(Arc::new(snapshot)));
        }
        Err(e) => {
            warn!("[presence] #{} fetch failed, keeping previous snapshot: {}", seq, e);
        }
    }
}
