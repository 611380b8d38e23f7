//! Delayed navigation to the login surface after an auth failure

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Moves the user to another surface
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

/// Navigator that only logs the redirect
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, target: &str) {
        info!(target, "Redirecting to login");
    }
}

/// Navigator that remembers where it was sent
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &str) {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target.to_string());
    }
}

/// Schedules login redirects
///
/// Each call to [`Redirector::schedule`] spawns an independent timer; there
/// is no cancellation. Concurrent auth failures each schedule their own
/// redirect to the same target.
#[derive(Clone)]
pub struct Redirector {
    navigator: Arc<dyn Navigator>,
    target: String,
    delay: Duration,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Redirector {
    pub fn new(navigator: Arc<dyn Navigator>, target: impl Into<String>, delay: Duration) -> Self {
        Self {
            navigator,
            target: target.into(),
            delay,
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Navigate to the target once the delay has elapsed.
    pub fn schedule(&self) {
        let navigator = Arc::clone(&self.navigator);
        let target = self.target.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(&target);
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Number of redirects not yet performed.
    pub fn pending(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }

    /// Wait for every scheduled redirect to fire.
    pub async fn drain(&self) {
        let handles: Vec<_> = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for handle in handles {
            let _ = handle.await;
        }
    }
}
