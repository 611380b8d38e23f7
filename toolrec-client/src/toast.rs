//! Toast notifications
//!
//! At most one toast is alive per [`ToastManager`]. Each toast walks
//! `Created → Showing → Dismissing → Destroyed`:
//!
//! - `Showing` one render frame after creation
//! - `Dismissing` after its duration, or on [`ToastManager::dismiss`]
//! - `Destroyed` after the exit animation delay
//!
//! A new toast tears the previous one down immediately (skipping its exit
//! delay): the newest message always wins, nothing is queued.

use crate::config::ToastConfig;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Toast style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Lifecycle phase of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToastPhase {
    Created,
    Showing,
    Dismissing,
    Destroyed,
}

impl ToastPhase {
    /// Occupying the screen (`Showing` or `Dismissing`)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Showing | Self::Dismissing)
    }
}

/// Point-in-time view of a toast, handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastSnapshot {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub duration: Duration,
    pub phase: ToastPhase,
}

impl ToastSnapshot {
    pub fn visible(&self) -> bool {
        self.phase == ToastPhase::Showing
    }
}

/// Draws toasts
///
/// Called synchronously on every phase change while the manager's state is
/// locked; implementations must not call back into the manager.
pub trait ToastRenderer: Send + Sync {
    fn render(&self, toast: &ToastSnapshot);
}

/// Renders toasts as log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRenderer;

impl ToastRenderer for TracingRenderer {
    fn render(&self, toast: &ToastSnapshot) {
        if toast.phase != ToastPhase::Showing {
            debug!(id = toast.id, phase = ?toast.phase, "toast");
            return;
        }
        match toast.kind {
            ToastKind::Error => error!(id = toast.id, "{}", toast.message),
            ToastKind::Warning => warn!(id = toast.id, "{}", toast.message),
            ToastKind::Success | ToastKind::Info => info!(id = toast.id, "{}", toast.message),
        }
    }
}

/// Records every snapshot it is given
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    seen: Mutex<Vec<ToastSnapshot>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshots, in render order.
    pub fn snapshots(&self) -> Vec<ToastSnapshot> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Snapshots for one phase only.
    pub fn in_phase(&self, phase: ToastPhase) -> Vec<ToastSnapshot> {
        self.snapshots()
            .into_iter()
            .filter(|s| s.phase == phase)
            .collect()
    }

    /// Number of toasts ever created.
    pub fn created(&self) -> usize {
        self.in_phase(ToastPhase::Created).len()
    }
}

impl ToastRenderer for RecordingRenderer {
    fn render(&self, toast: &ToastSnapshot) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast.clone());
    }
}

struct ActiveToast {
    snapshot: ToastSnapshot,
    timer: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Slot {
    active: Option<ActiveToast>,
    next_id: u64,
}

struct Inner {
    config: ToastConfig,
    renderer: Arc<dyn ToastRenderer>,
    slot: Mutex<Slot>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move toast `id` from `from` to `to`. False if it was superseded or
    /// already moved on.
    fn transition(&self, id: u64, from: ToastPhase, to: ToastPhase) -> bool {
        let mut slot = self.lock();
        match slot.active.as_mut() {
            Some(active) if active.snapshot.id == id && active.snapshot.phase == from => {
                active.snapshot.phase = to;
                self.renderer.render(&active.snapshot);
                true
            }
            _ => false,
        }
    }

    fn destroy(&self, id: u64) {
        let mut slot = self.lock();
        if slot.active.as_ref().is_some_and(|a| a.snapshot.id == id) {
            if let Some(mut active) = slot.active.take() {
                active.snapshot.phase = ToastPhase::Destroyed;
                self.renderer.render(&active.snapshot);
            }
        }
    }
}

/// Owner of the on-screen toast
///
/// Cloning yields another handle to the same toast slot. Must be used from
/// within a tokio runtime.
#[derive(Clone)]
pub struct ToastManager {
    inner: Arc<Inner>,
}

impl ToastManager {
    pub fn new(config: ToastConfig, renderer: Arc<dyn ToastRenderer>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                renderer,
                slot: Mutex::new(Slot::default()),
            }),
        }
    }

    /// Manager that renders through `tracing`
    pub fn with_tracing(config: ToastConfig) -> Self {
        Self::new(config, Arc::new(TracingRenderer))
    }

    pub fn config(&self) -> &ToastConfig {
        &self.inner.config
    }

    /// Show a toast, replacing any current one. Returns the new toast id.
    pub fn notify(&self, message: impl Into<String>, kind: ToastKind, duration: Duration) -> u64 {
        let inner = &self.inner;
        let mut slot = inner.lock();

        if let Some(mut previous) = slot.active.take() {
            if let Some(timer) = previous.timer.take() {
                timer.abort();
            }
            previous.snapshot.phase = ToastPhase::Destroyed;
            inner.renderer.render(&previous.snapshot);
        }

        let id = slot.next_id;
        slot.next_id += 1;

        let snapshot = ToastSnapshot {
            id,
            message: message.into(),
            kind,
            duration,
            phase: ToastPhase::Created,
        };
        inner.renderer.render(&snapshot);

        let timer = tokio::spawn(run_lifecycle(Arc::clone(inner), id, duration));
        slot.active = Some(ActiveToast {
            snapshot,
            timer: Some(timer),
        });
        id
    }

    /// Start the exit of the current toast. No-op when nothing is showing
    /// or the toast is already leaving.
    pub fn dismiss(&self) {
        let inner = &self.inner;
        let mut slot = inner.lock();
        let Some(active) = slot.active.as_mut() else {
            return;
        };
        if !matches!(active.snapshot.phase, ToastPhase::Created | ToastPhase::Showing) {
            return;
        }

        if let Some(timer) = active.timer.take() {
            timer.abort();
        }
        active.snapshot.phase = ToastPhase::Dismissing;
        inner.renderer.render(&active.snapshot);

        let id = active.snapshot.id;
        let exit = Duration::from_millis(inner.config.exit_ms);
        let owner = Arc::clone(inner);
        active.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(exit).await;
            owner.destroy(id);
        }));
    }

    /// Snapshot of the live toast, if any.
    pub fn current(&self) -> Option<ToastSnapshot> {
        self.inner.lock().active.as_ref().map(|a| a.snapshot.clone())
    }

    fn default_duration(&self) -> Duration {
        Duration::from_millis(self.inner.config.default_duration_ms)
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(message, ToastKind::Success, self.default_duration())
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(message, ToastKind::Error, self.default_duration())
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.notify(message, ToastKind::Warning, self.default_duration())
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.notify(message, ToastKind::Info, self.default_duration())
    }

    pub fn hide(&self) {
        self.dismiss()
    }
}

async fn run_lifecycle(inner: Arc<Inner>, id: u64, duration: Duration) {
    let frame = Duration::from_millis(inner.config.frame_ms);
    let exit = Duration::from_millis(inner.config.exit_ms);

    tokio::time::sleep(frame).await;
    if !inner.transition(id, ToastPhase::Created, ToastPhase::Showing) {
        return;
    }

    tokio::time::sleep(duration).await;
    if !inner.transition(id, ToastPhase::Showing, ToastPhase::Dismissing) {
        return;
    }

    tokio::time::sleep(exit).await;
    inner.destroy(id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn manager() -> (ToastManager, Arc<RecordingRenderer>) {
        let renderer = Arc::new(RecordingRenderer::new());
        (ToastManager::new(ToastConfig::default(), renderer.clone()), renderer)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn phases(renderer: &RecordingRenderer, id: u64) -> Vec<ToastPhase> {
        renderer
            .snapshots()
            .into_iter()
            .filter(|s| s.id == id)
            .map(|s| s.phase)
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_lifecycle() {
        let (toasts, renderer) = manager();
        let id = toasts.info("saved");

        // Not visible synchronously
        assert_eq!(toasts.current().unwrap().phase, ToastPhase::Created);

        sleep(ms(20)).await;
        let current = toasts.current().unwrap();
        assert_eq!(current.phase, ToastPhase::Showing);
        assert!(current.visible());

        // 16 + 3000 = 3016 => Dismissing
        sleep(ms(3000)).await;
        assert_eq!(toasts.current().unwrap().phase, ToastPhase::Dismissing);

        // + 300 exit => Destroyed
        sleep(ms(300)).await;
        assert!(toasts.current().is_none());

        assert_eq!(
            phases(&renderer, id),
            vec![
                ToastPhase::Created,
                ToastPhase::Showing,
                ToastPhase::Dismissing,
                ToastPhase::Destroyed
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_toast_replaces_showing_one() {
        let (toasts, renderer) = manager();
        let first = toasts.error("first");
        sleep(ms(100)).await;

        let second = toasts.error("second");
        // Torn down synchronously, no exit delay
        assert_eq!(
            phases(&renderer, first),
            vec![ToastPhase::Created, ToastPhase::Showing, ToastPhase::Destroyed]
        );
        assert_eq!(toasts.current().unwrap().id, second);

        // The first toast's timers never fire
        sleep(ms(10_000)).await;
        assert_eq!(phases(&renderer, first).len(), 3);
        assert_eq!(
            phases(&renderer, second),
            vec![
                ToastPhase::Created,
                ToastPhase::Showing,
                ToastPhase::Dismissing,
                ToastPhase::Destroyed
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_toast_replaces_dismissing_one() {
        let (toasts, renderer) = manager();
        let first = toasts.warning("first");
        sleep(ms(50)).await;
        toasts.dismiss();
        sleep(ms(100)).await;
        assert_eq!(toasts.current().unwrap().phase, ToastPhase::Dismissing);

        toasts.success("second");
        assert_eq!(
            phases(&renderer, first).last(),
            Some(&ToastPhase::Destroyed)
        );

        // The abandoned exit timer must not destroy the new toast
        sleep(ms(400)).await;
        let current = toasts.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.phase, ToastPhase::Showing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_at_most_one_active_and_last_wins() {
        let (toasts, renderer) = manager();
        for i in 0..10 {
            toasts.info(format!("message {}", i));
            sleep(ms(7 * i)).await;
        }
        sleep(ms(20)).await;

        assert_eq!(toasts.current().unwrap().message, "message 9");

        // Replay the render log: never two active toasts at once
        let mut live: Option<u64> = None;
        for snap in renderer.snapshots() {
            if snap.phase == ToastPhase::Created {
                assert!(live.is_none(), "toast {} created over {:?}", snap.id, live);
            }
            live = match snap.phase {
                ToastPhase::Destroyed => None,
                _ => Some(snap.id),
            };
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_is_idempotent() {
        let (toasts, renderer) = manager();
        let id = toasts.info("bye");
        sleep(ms(20)).await;

        toasts.dismiss();
        toasts.dismiss();
        sleep(ms(301)).await;
        toasts.dismiss();

        assert!(toasts.current().is_none());
        let destroyed = phases(&renderer, id)
            .into_iter()
            .filter(|p| *p == ToastPhase::Destroyed)
            .count();
        assert_eq!(destroyed, 1);
        assert_eq!(renderer.in_phase(ToastPhase::Dismissing).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_without_toast_is_noop() {
        let (toasts, renderer) = manager();
        toasts.hide();
        assert!(toasts.current().is_none());
        assert!(renderer.snapshots().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_before_first_frame_never_shows() {
        let (toasts, renderer) = manager();
        let id = toasts.info("blink");
        toasts.dismiss();
        sleep(ms(400)).await;

        assert_eq!(
            phases(&renderer, id),
            vec![ToastPhase::Created, ToastPhase::Dismissing, ToastPhase::Destroyed]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_duration() {
        let (toasts, _) = manager();
        toasts.notify("quick", ToastKind::Success, ms(500));
        sleep(ms(510)).await;
        assert_eq!(toasts.current().unwrap().phase, ToastPhase::Showing);
        sleep(ms(10)).await;
        assert_eq!(toasts.current().unwrap().phase, ToastPhase::Dismissing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_managers() {
        let (a, _) = manager();
        let (b, _) = manager();
        a.error("a");
        b.error("b");
        assert_eq!(a.current().unwrap().message, "a");
        assert_eq!(b.current().unwrap().message, "b");
    }
}
