//! Ownership handle for a background timer task.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns a spawned periodic task. The task stops when `shutdown` is awaited
/// or when the handle is dropped.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl TaskHandle {
    pub fn new(name: &'static str, token: CancellationToken, join: JoinHandle<()>) -> Self {
        Self {
            name,
            token,
            join: Some(join),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel the timer and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                tracing::warn!("{} task ended abnormally: {}", self.name, e);
            }
        }
        tracing::debug!("{} stopped", self.name);
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
