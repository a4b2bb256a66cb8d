//! Session-scoped timer registry.
//!
//! Every periodic refresh, animation and one-shot timer the console starts is
//! a tokio task registered here under a [`TimerKind`]. Registering a kind that
//! is already live replaces (and aborts) the previous task, so re-activating a
//! page never stacks duplicate loops. Logout calls
//! [`TimerRegistry::cancel_all`]; a task left running after logout is a leak.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::model::KpiMetric;

/// What a registered timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Dashboard KPI and fleet refresh.
    DashboardRefresh,
    /// Tracking page progress advance.
    TrackingRefresh,
    /// Relative "time ago" labels.
    TimeLabels,
    /// Dashboard count-up animation for one metric.
    CountUp(KpiMetric),
    /// Hides the login error message.
    LoginErrorDismiss,
}

impl std::fmt::Display for TimerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DashboardRefresh => write!(f, "dashboard_refresh"),
            Self::TrackingRefresh => write!(f, "tracking_refresh"),
            Self::TimeLabels => write!(f, "time_labels"),
            Self::CountUp(metric) => write!(f, "count_up:{metric}"),
            Self::LoginErrorDismiss => write!(f, "login_error_dismiss"),
        }
    }
}

/// Registry of live timer tasks.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    handles: HashMap<TimerKind, JoinHandle<()>>,
}

impl TimerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `tick` every `period`, first firing one period from now.
    ///
    /// Late ticks are delayed rather than burst.
    pub fn spawn_interval<F, Fut>(&mut self, kind: TimerKind, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                trace!(timer = %kind, "tick");
                tick().await;
            }
        });
        debug!(timer = %kind, period_ms = period.as_millis(), "interval registered");
        self.insert(kind, handle);
    }

    /// Run `task` once after `delay`.
    pub fn spawn_after<Fut>(&mut self, kind: TimerKind, delay: Duration, task: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        self.insert(kind, handle);
    }

    /// Run `task` now, tracked under `kind` until it completes.
    pub fn spawn<Fut>(&mut self, kind: TimerKind, task: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.insert(kind, tokio::spawn(task));
    }

    fn insert(&mut self, kind: TimerKind, handle: JoinHandle<()>) {
        self.prune_finished();
        if let Some(previous) = self.handles.insert(kind, handle) {
            if !previous.is_finished() {
                debug!(timer = %kind, "replacing live timer");
            }
            previous.abort();
        }
    }

    /// Cancel one timer. Returns whether it was still live.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        match self.handles.remove(&kind) {
            Some(handle) => {
                let live = !handle.is_finished();
                handle.abort();
                live
            }
            None => false,
        }
    }

    /// Cancel every timer. Returns how many were still live.
    pub fn cancel_all(&mut self) -> usize {
        let mut live = 0;
        for (kind, handle) in self.handles.drain() {
            if !handle.is_finished() {
                live += 1;
                trace!(timer = %kind, "cancelled");
            }
            handle.abort();
        }
        debug!(cancelled = live, "all timers cancelled");
        live
    }

    /// Whether a timer of `kind` is registered and has not finished.
    #[must_use]
    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.handles.get(&kind).is_some_and(|h| !h.is_finished())
    }

    /// Number of registered timers that have not finished.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.handles.values().filter(|h| !h.is_finished()).count()
    }

    fn prune_finished(&mut self) {
        self.handles.retain(|_, handle| !handle.is_finished());
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        for handle in self.handles.values() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[test]
    fn test_timer_kind_display() {
        assert_eq!(TimerKind::DashboardRefresh.to_string(), "dashboard_refresh");
        assert_eq!(
            TimerKind::CountUp(KpiMetric::SuccessRate).to_string(),
            "count_up:success_rate"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticks_each_period() {
        let mut registry = TimerRegistry::new();
        let ticks = counter();
        let seen = Arc::clone(&ticks);

        registry.spawn_interval(TimerKind::DashboardRefresh, Duration::from_secs(5), move || {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(10_200)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert!(registry.is_active(TimerKind::DashboardRefresh));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_stops_ticks() {
        let mut registry = TimerRegistry::new();
        let ticks = counter();

        for kind in [TimerKind::DashboardRefresh, TimerKind::TrackingRefresh] {
            let seen = Arc::clone(&ticks);
            registry.spawn_interval(kind, Duration::from_secs(1), move || {
                let seen = Arc::clone(&seen);
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
        assert_eq!(registry.active_count(), 2);

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let before = ticks.load(Ordering::SeqCst);
        assert_eq!(before, 4);

        assert_eq!(registry.cancel_all(), 2);
        assert_eq!(registry.active_count(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_kind_replaces_previous() {
        let mut registry = TimerRegistry::new();
        let first = counter();
        let second = counter();

        let seen = Arc::clone(&first);
        registry.spawn_interval(TimerKind::TrackingRefresh, Duration::from_secs(3), move || {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });
        let seen = Arc::clone(&second);
        registry.spawn_interval(TimerKind::TrackingRefresh, Duration::from_secs(3), move || {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(9_500)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 3);
        assert_eq!(registry.active_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_after_fires_once() {
        let mut registry = TimerRegistry::new();
        let fired = counter();
        let seen = Arc::clone(&fired);

        registry.spawn_after(TimerKind::LoginErrorDismiss, Duration::from_secs(5), async move {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert!(registry.is_active(TimerKind::LoginErrorDismiss));

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!registry.is_active(TimerKind::LoginErrorDismiss));

        registry.spawn(TimerKind::TimeLabels, std::future::pending());
        assert_eq!(registry.handles.len(), 1);
        assert!(!registry.cancel(TimerKind::LoginErrorDismiss));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_single_timer() {
        let mut registry = TimerRegistry::new();
        let fired = counter();
        let seen = Arc::clone(&fired);

        registry.spawn_after(TimerKind::LoginErrorDismiss, Duration::from_secs(5), async move {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert!(registry.cancel(TimerKind::LoginErrorDismiss));

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
