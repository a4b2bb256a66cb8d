//! Frame-driven count-up animation for the dashboard KPIs.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::model::KpiMetric;
use crate::render::RenderTarget;

/// Ease-out curve: fast start, gentle landing.
#[must_use]
pub fn ease_out(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Animate `element` from 0 to `value` over the metric's duration, one step
/// per `frame`, then write the exact final string.
pub async fn count_up(
    target: Arc<dyn RenderTarget>,
    element: &'static str,
    metric: KpiMetric,
    value: f64,
    frame: Duration,
) {
    let duration = metric.count_up_duration();
    let start = Instant::now();
    let mut ticker = interval(frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let elapsed = start.elapsed();
        if elapsed >= duration {
            break;
        }
        let progress = elapsed.as_secs_f64() / duration.as_secs_f64();
        target.set_text(element, &metric.format(value * ease_out(progress)));
    }

    target.set_text(element, &metric.format(value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ids, MemoryTarget};

    #[test]
    fn test_ease_out_endpoints() {
        assert!(ease_out(0.0).abs() < f64::EPSILON);
        assert!((ease_out(1.0) - 1.0).abs() < f64::EPSILON);
        assert!(ease_out(0.5) > 0.5);
        assert!((ease_out(2.0) - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_up_snaps_to_final_string() {
        let target = Arc::new(MemoryTarget::standard());
        let handle = tokio::spawn(count_up(
            Arc::clone(&target) as Arc<dyn RenderTarget>,
            ids::SUCCESS_RATE,
            KpiMetric::SuccessRate,
            94.5,
            Duration::from_millis(16),
        ));

        tokio::time::sleep(Duration::from_millis(500)).await;
        let midway = target.text(ids::SUCCESS_RATE).unwrap();
        assert_ne!(midway, "94.5%");
        assert!(midway.ends_with('%'));

        handle.await.unwrap();
        assert_eq!(target.text(ids::SUCCESS_RATE).as_deref(), Some("94.5%"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_up_finishes_within_duration() {
        let target = Arc::new(MemoryTarget::standard());
        let started = Instant::now();

        count_up(
            Arc::clone(&target) as Arc<dyn RenderTarget>,
            ids::TOTAL_DRONES,
            KpiMetric::TotalDrones,
            15.0,
            Duration::from_millis(16),
        )
        .await;

        assert!(started.elapsed() <= Duration::from_millis(1_100));
        assert_eq!(target.text(ids::TOTAL_DRONES).as_deref(), Some("15"));
    }
}
