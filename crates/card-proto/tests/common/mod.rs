#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use card_proto::presence::{PresenceError, PresenceSnapshot, PresenceSource, Status};

pub fn snapshot(status: Status) -> PresenceSnapshot {
    PresenceSnapshot {
        discord_status: status,
        ..Default::default()
    }
}

/// Scripted source: pops one result per fetch, repeats the last one when
/// the script runs dry, and sleeps `delay` before answering.
#[derive(Clone)]
pub struct ScriptedSource {
    calls: Arc<AtomicUsize>,
    script: Arc<Mutex<VecDeque<Result<PresenceSnapshot, String>>>>,
    last: Arc<Mutex<Option<Result<PresenceSnapshot, String>>>>,
    delay: Duration,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<PresenceSnapshot, String>>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            script: Arc::new(Mutex::new(script.into())),
            last: Arc::new(Mutex::new(None)),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_result(&self) -> Result<PresenceSnapshot, String> {
        let mut script = self.script.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(next) = script.pop_front() {
            *last = Some(next.clone());
            next
        } else {
            last.clone().unwrap_or_else(|| Err("empty script".to_string()))
        }
    }
}

impl PresenceSource for ScriptedSource {
    fn fetch(&self) -> impl Future<Output = Result<PresenceSnapshot, PresenceError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self.next_result();
        let delay = self.delay;
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result.map_err(|_| PresenceError::Rejected)
        }
    }
}
