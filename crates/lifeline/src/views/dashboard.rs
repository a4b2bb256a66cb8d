//! Dashboard: KPI counters, fleet status chart, alert and activity feeds,
//! the system status panel, plus the periodic refresh and the relative
//! time-label tick.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{format_time_ago, status_counts, synthetic_age_minutes};
use crate::animation::count_up;
use crate::app::AppContext;
use crate::model::{Activity, Alert, Drone, DroneStatus, KpiMetric, KpiSnapshot, SystemHealth};
use crate::render::{ids, Card, ChartConfig, ChartKind, RenderTarget};
use crate::simulate::{drift_batteries, jitter_kpis};
use crate::timers::TimerKind;

/// Canvas of the fleet status donut.
pub const FLEET_CHART: &str = "fleet-status-chart";

/// Element showing a metric.
#[must_use]
pub fn metric_element(metric: KpiMetric) -> &'static str {
    match metric {
        KpiMetric::TotalDrones => ids::TOTAL_DRONES,
        KpiMetric::ActiveMissions => ids::ACTIVE_MISSIONS,
        KpiMetric::SuccessRate => ids::SUCCESS_RATE,
        KpiMetric::AvgDeliveryTime => ids::AVG_DELIVERY_TIME,
    }
}

/// Donut data: the four primary statuses always, anything else when present.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fleet_status_config(fleet: &[Drone]) -> ChartConfig {
    let counts = status_counts(fleet);
    let primary = [
        DroneStatus::Active,
        DroneStatus::Charging,
        DroneStatus::Idle,
        DroneStatus::Maintenance,
    ];

    let mut points: Vec<(String, f64)> = primary
        .iter()
        .map(|status| {
            let count = counts.get(status).copied().unwrap_or(0);
            (status.to_string(), count as f64)
        })
        .collect();
    points.extend(
        counts
            .iter()
            .filter(|(status, _)| !primary.contains(status))
            .map(|(status, count)| (status.to_string(), *count as f64)),
    );

    ChartConfig::single("Drones", points)
}

/// Write every KPI's final text.
pub fn render_kpis(target: &dyn RenderTarget, kpis: &KpiSnapshot) {
    for metric in KpiMetric::ALL {
        target.set_text(metric_element(metric), &metric.format(kpis.value(metric)));
    }
}

/// Blank every KPI.
pub fn clear_kpis(target: &dyn RenderTarget) {
    for metric in KpiMetric::ALL {
        target.set_text(metric_element(metric), "");
    }
}

/// Rebuild the alert feed.
pub fn render_alerts(target: &dyn RenderTarget, alerts: &[Alert], ticks: u64) {
    target.clear(ids::ALERTS_LIST);
    for (index, alert) in alerts.iter().enumerate() {
        let key = if alert.id.is_empty() {
            format!("alert-{index}")
        } else {
            alert.id.clone()
        };
        let mut card = Card::new(key, &alert.title).with_field("message", &alert.message);
        if !alert.severity.is_empty() {
            card = card.with_class(&alert.severity);
        }
        if !alert.source.is_empty() {
            card = card.with_field("source", &alert.source);
        }
        let card = card.with_field("time", format_time_ago(synthetic_age_minutes(index, ticks)));
        target.append_card(ids::ALERTS_LIST, card);
    }
}

/// Rebuild the activity feed.
pub fn render_activities(target: &dyn RenderTarget, activities: &[Activity], ticks: u64) {
    target.clear(ids::ACTIVITIES_LIST);
    for (index, activity) in activities.iter().enumerate() {
        let mut card = Card::new(format!("activity-{index}"), &activity.description);
        if !activity.kind.is_empty() {
            card = card.with_class(&activity.kind);
        }
        if !activity.user.is_empty() {
            card = card.with_field("user", &activity.user);
        }
        let card = card.with_field("time", format_time_ago(synthetic_age_minutes(index, ticks)));
        target.append_card(ids::ACTIVITIES_LIST, card);
    }
}

/// Rebuild the system status panel: one card per component, `ok` when the
/// component reports `OK` and `fault` otherwise.
pub fn render_system_health(target: &dyn RenderTarget, health: &SystemHealth) {
    target.clear(ids::SYSTEM_HEALTH_LIST);
    for (component, status) in health {
        let class = if status == "OK" { "ok" } else { "fault" };
        let card = Card::new(component, component)
            .with_class(class)
            .with_field("status", status);
        target.append_card(ids::SYSTEM_HEALTH_LIST, card);
    }
}

/// Load the dashboard and start the KPI count-up animations.
pub async fn initialize(ctx: &AppContext) {
    let epoch = ctx.epoch().await;
    let api = ctx.api();
    let (kpis, fleet, alerts, activities, health) = tokio::join!(
        api.kpis(),
        api.fleet_status(),
        api.alerts(),
        api.activities(),
        api.system_health()
    );

    let mut store = ctx.store().lock().await;
    if !store.is_current(epoch) {
        debug!(epoch, "discarding stale dashboard load");
        return;
    }

    match kpis {
        Ok(kpis) => store.set_kpis(kpis),
        Err(e) => warn!(error = %e, "KPI fetch failed, using cached values"),
    }
    match fleet {
        Ok(fleet) => store.set_fleet(fleet),
        Err(e) => warn!(error = %e, "fleet fetch failed, using cached fleet"),
    }
    match alerts {
        Ok(alerts) => store.set_alerts(alerts),
        Err(e) => warn!(error = %e, "alert fetch failed, using cached alerts"),
    }
    match activities {
        Ok(activities) => store.set_activities(activities),
        Err(e) => warn!(error = %e, "activity fetch failed, using cached activities"),
    }
    match health {
        Ok(health) => store.set_system_health(health),
        Err(e) => warn!(error = %e, "health fetch failed, using cached status"),
    }

    let target = ctx.target();
    let ticks = store.time_label_ticks();
    render_alerts(target.as_ref(), store.alerts_mut(), ticks);
    render_activities(target.as_ref(), store.activities_mut(), ticks);
    render_system_health(target.as_ref(), store.system_health_mut());

    let config = fleet_status_config(store.fleet_mut());
    ctx.charts()
        .lock()
        .await
        .replace(FLEET_CHART, ChartKind::Doughnut, config);

    let kpis = store.kpis_mut().clone();
    let frame = ctx.config().frame_interval();
    let mut timers = ctx.timers().lock().await;
    for metric in KpiMetric::ALL {
        timers.spawn(
            TimerKind::CountUp(metric),
            count_up(
                Arc::clone(target),
                metric_element(metric),
                metric,
                kpis.value(metric),
                frame,
            ),
        );
    }
}

/// One refresh cycle: concurrent KPI and fleet fetch, random walk for
/// whatever failed, then numbers and chart.
pub async fn refresh(ctx: &AppContext) {
    let epoch = ctx.epoch().await;
    let (kpis, fleet) = tokio::join!(ctx.api().kpis(), ctx.api().fleet_status());

    let mut store = ctx.store().lock().await;
    if !store.is_current(epoch) {
        debug!(epoch, "discarding stale dashboard refresh");
        return;
    }

    {
        let mut rng = rand::thread_rng();
        match kpis {
            Ok(kpis) => store.set_kpis(kpis),
            Err(e) => {
                warn!(error = %e, "KPI refresh failed, simulating");
                jitter_kpis(store.kpis_mut(), &mut rng);
            }
        }
        match fleet {
            Ok(fleet) => store.set_fleet(fleet),
            Err(e) => {
                warn!(error = %e, "fleet refresh failed, simulating");
                drift_batteries(store.fleet_mut(), &mut rng);
            }
        }
    }

    let config = fleet_status_config(store.fleet_mut());
    ctx.charts()
        .lock()
        .await
        .replace(FLEET_CHART, ChartKind::Doughnut, config);

    let mut timers = ctx.timers().lock().await;
    for metric in KpiMetric::ALL {
        timers.cancel(TimerKind::CountUp(metric));
    }
    drop(timers);

    render_kpis(ctx.target().as_ref(), store.kpis_mut());
}

/// Start the periodic dashboard refresh.
pub async fn start_refresh(ctx: &AppContext) {
    let period = ctx.config().dashboard_interval();
    let tick_ctx = ctx.clone();
    ctx.timers()
        .lock()
        .await
        .spawn_interval(TimerKind::DashboardRefresh, period, move || {
            let ctx = tick_ctx.clone();
            async move { refresh(&ctx).await }
        });
}

/// Advance the synthetic clock and rewrite the feed time labels.
pub async fn refresh_time_labels(ctx: &AppContext) {
    let mut store = ctx.store().lock().await;
    if store.session().is_none() {
        return;
    }
    let ticks = store.advance_time_labels();
    let target = ctx.target().as_ref();
    render_alerts(target, store.alerts_mut(), ticks);
    render_activities(target, store.activities_mut(), ticks);
}

/// Start the relative time-label tick.
pub async fn start_time_labels(ctx: &AppContext) {
    let period = ctx.config().time_label_interval();
    let tick_ctx = ctx.clone();
    ctx.timers()
        .lock()
        .await
        .spawn_interval(TimerKind::TimeLabels, period, move || {
            let ctx = tick_ctx.clone();
            async move { refresh_time_labels(&ctx).await }
        });
}
