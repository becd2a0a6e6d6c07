mod common;

use std::time::Duration;

use card_proto::poller::PresencePoller;
use card_proto::presence::Status;
use common::{snapshot, ScriptedSource};

const EVERY: Duration = Duration::from_secs(5);

fn status_of(rx: &card_proto::poller::SnapshotReceiver) -> Option<Status> {
    rx.borrow().as_ref().map(|s| s.discord_status)
}

#[tokio::test(start_paused = true)]
async fn fetches_immediately_then_every_interval() {
    let source = ScriptedSource::new(vec![Ok(snapshot(Status::Online))]);
    let (handle, rx) = PresencePoller::spawn(source.clone(), EVERY);
    assert_eq!(status_of(&rx), None);

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(source.calls(), 1);
    assert_eq!(status_of(&rx), Some(Status::Online));

    tokio::time::sleep(EVERY).await;
    assert_eq!(source.calls(), 2);
    tokio::time::sleep(EVERY * 2).await;
    assert_eq!(source.calls(), 4);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_keeps_previous_snapshot() {
    let source = ScriptedSource::new(vec![
        Ok(snapshot(Status::Online)),
        Err("network down".to_string()),
        Ok(snapshot(Status::Idle)),
    ]);
    let (handle, rx) = PresencePoller::spawn(source.clone(), EVERY);

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(status_of(&rx), Some(Status::Online));

    tokio::time::sleep(EVERY).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(status_of(&rx), Some(Status::Online));

    tokio::time::sleep(EVERY).await;
    assert_eq!(status_of(&rx), Some(Status::Idle));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn failures_before_first_success_publish_nothing() {
    let source = ScriptedSource::new(vec![Err("dns".to_string())]);
    let (handle, rx) = PresencePoller::spawn(source.clone(), EVERY);

    tokio::time::sleep(EVERY * 3).await;
    assert!(source.calls() >= 3);
    assert_eq!(status_of(&rx), None);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn slow_fetches_overlap() {
    let source = ScriptedSource::new(vec![Ok(snapshot(Status::Dnd))])
        .with_delay(Duration::from_secs(12));
    let (handle, rx) = PresencePoller::spawn(source.clone(), EVERY);

    tokio::time::sleep(Duration::from_secs(11)).await;
    // Ticks at 0s, 5s and 10s all started; none has answered yet.
    assert_eq!(source.calls(), 3);
    assert_eq!(status_of(&rx), None);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(status_of(&rx), Some(Status::Dnd));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_polling() {
    let source = ScriptedSource::new(vec![Ok(snapshot(Status::Online))]);
    let (handle, _rx) = PresencePoller::spawn(source.clone(), EVERY);

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(source.calls(), 1);

    handle.shutdown().await;
    tokio::time::sleep(EVERY * 12).await;
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn late_response_after_shutdown_is_dropped() {
    let source = ScriptedSource::new(vec![Ok(snapshot(Status::Online))])
        .with_delay(Duration::from_secs(3));
    let (handle, mut rx) = PresencePoller::spawn(source.clone(), EVERY);

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(source.calls(), 1);

    handle.shutdown().await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(status_of(&rx), None);
    // Every sender is gone once the in-flight request has finished.
    assert!(rx.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_cancels() {
    let source = ScriptedSource::new(vec![Ok(snapshot(Status::Online))]);
    let (handle, _rx) = PresencePoller::spawn(source.clone(), EVERY);
    tokio::time::sleep(Duration::from_millis(1)).await;

    drop(handle);
    tokio::time::sleep(EVERY * 4).await;
    assert_eq!(source.calls(), 1);
}
