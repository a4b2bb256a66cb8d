//! Analytics page: delivery trend, battery distribution, performance profile
//! and mission distribution charts.

use tracing::{debug, warn};

use crate::app::AppContext;
use crate::model::{DeliveryTrendPoint, Drone, DroneStatus, KpiSnapshot, MissionDistribution};
use crate::render::{ChartConfig, ChartKind};
use crate::simulate::DELIVERY_MINUTES_RANGE;

/// Canvas of the 7-day delivery trend.
pub const TREND_CHART: &str = "delivery-trend-chart";
/// Canvas of the battery distribution.
pub const BATTERY_CHART: &str = "battery-distribution-chart";
/// Canvas of the performance radar.
pub const PERFORMANCE_CHART: &str = "performance-chart";
/// Canvas of the mission distribution pie.
pub const MISSION_CHART: &str = "mission-distribution-chart";

const TREND_DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const TREND_OFFSETS: [f64; 7] = [1.2, 0.8, -0.4, 0.9, -0.6, 0.3, 0.0];

/// Synthetic seven days of delivery times ending at the current average,
/// used when the backend has never reported a trend.
#[must_use]
pub fn delivery_trend(avg_delivery_minutes: f64) -> Vec<(String, f64)> {
    let (lo, hi) = DELIVERY_MINUTES_RANGE;
    TREND_DAYS
        .iter()
        .zip(TREND_OFFSETS)
        .map(|(day, offset)| {
            let minutes = (avg_delivery_minutes + offset).clamp(lo, hi);
            ((*day).to_string(), (minutes * 10.0).round() / 10.0)
        })
        .collect()
}

/// Line points for a backend trend, one decimal place.
#[must_use]
pub fn trend_points(trend: &[DeliveryTrendPoint]) -> Vec<(String, f64)> {
    trend
        .iter()
        .map(|point| {
            let minutes = (point.avg_delivery_time * 10.0).round() / 10.0;
            (point.label(), minutes)
        })
        .collect()
}

/// Drone counts per battery bucket, highest bucket first.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn battery_distribution(fleet: &[Drone]) -> Vec<(String, f64)> {
    let mut buckets = [0usize; 5];
    for drone in fleet {
        let battery = drone.battery_percent;
        let index = if battery >= 80.0 {
            0
        } else if battery >= 60.0 {
            1
        } else if battery >= 40.0 {
            2
        } else if battery >= 20.0 {
            3
        } else {
            4
        };
        buckets[index] += 1;
    }

    ["80-100%", "60-80%", "40-60%", "20-40%", "0-20%"]
        .iter()
        .zip(buckets)
        .map(|(label, count)| ((*label).to_string(), count as f64))
        .collect()
}

/// Fleet performance on a 0-100 scale per axis.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn performance_profile(kpis: &KpiSnapshot, fleet: &[Drone]) -> Vec<(String, f64)> {
    let (fastest, slowest) = DELIVERY_MINUTES_RANGE;
    let speed = (slowest - kpis.avg_delivery_minutes) / (slowest - fastest) * 100.0;

    let total = fleet.len().max(1) as f64;
    let available = fleet
        .iter()
        .filter(|d| d.status != DroneStatus::Maintenance)
        .count() as f64;
    let battery = if fleet.is_empty() {
        0.0
    } else {
        fleet.iter().map(|d| d.battery_percent).sum::<f64>() / total
    };
    let utilization = if kpis.total_drones == 0 {
        0.0
    } else {
        f64::from(kpis.active_missions) / f64::from(kpis.total_drones) * 100.0
    };

    [
        ("Success Rate", kpis.success_rate_percent),
        ("Delivery Speed", speed),
        ("Availability", available / total * 100.0),
        ("Battery Health", battery),
        ("Utilization", utilization),
    ]
    .into_iter()
    .map(|(axis, value)| (axis.to_string(), value.clamp(0.0, 100.0)))
    .collect()
}

/// Pie slices for the mission mix.
#[must_use]
pub fn mission_points(distribution: &MissionDistribution) -> Vec<(String, f64)> {
    distribution
        .iter()
        .map(|(mission, count)| (mission.clone(), f64::from(*count)))
        .collect()
}

/// Fetch what the charts need and recreate all four.
pub async fn initialize(ctx: &AppContext) {
    let epoch = ctx.epoch().await;
    let api = ctx.api();
    let (kpis, fleet, missions, trend) = tokio::join!(
        api.kpis(),
        api.fleet_status(),
        api.mission_distribution(),
        api.delivery_trends()
    );

    let mut store = ctx.store().lock().await;
    if !store.is_current(epoch) {
        debug!(epoch, "discarding stale analytics load");
        return;
    }
    match kpis {
        Ok(kpis) => store.set_kpis(kpis),
        Err(e) => warn!(error = %e, "KPI fetch failed, charting cached values"),
    }
    match fleet {
        Ok(fleet) => store.set_fleet(fleet),
        Err(e) => warn!(error = %e, "fleet fetch failed, charting cached fleet"),
    }
    match missions {
        Ok(missions) => store.set_mission_distribution(missions),
        Err(e) => warn!(error = %e, "mission distribution fetch failed, charting cached mix"),
    }
    match trend {
        Ok(trend) if !trend.is_empty() => store.set_delivery_trend(trend),
        Ok(_) => debug!("backend reported an empty delivery trend"),
        Err(e) => warn!(error = %e, "delivery trend fetch failed, charting cached trend"),
    }

    let kpis = store.kpis_mut().clone();
    let trend = match store.delivery_trend() {
        Some(points) => trend_points(points),
        None => delivery_trend(kpis.avg_delivery_minutes),
    };
    let trend = ChartConfig::single("Avg delivery (min)", trend);
    let battery = ChartConfig::single("Drones", battery_distribution(store.fleet_mut()));
    let profile = ChartConfig::single("Performance", performance_profile(&kpis, store.fleet_mut()));
    let missions = ChartConfig::single("Missions", mission_points(store.mission_distribution_mut()));

    let mut charts = ctx.charts().lock().await;
    charts.replace(TREND_CHART, ChartKind::Line, trend);
    charts.replace(BATTERY_CHART, ChartKind::Bar, battery);
    charts.replace(PERFORMANCE_CHART, ChartKind::Radar, profile);
    charts.replace(MISSION_CHART, ChartKind::Pie, missions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{paths, ApiError, MockTransport};
    use crate::app::testing::{harness_with, offline_harness};
    use crate::model::default_fleet;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_delivery_trend_ends_at_current_average() {
        let trend = delivery_trend(12.3);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].0, "Mon");
        assert!((trend[6].1 - 12.3).abs() < 1e-9);
        assert!(trend.iter().all(|(_, v)| (8.0..=20.0).contains(v)));
    }

    #[test]
    fn test_battery_distribution_buckets() {
        let points = battery_distribution(&default_fleet());
        let counts: Vec<f64> = points.iter().map(|(_, c)| *c).collect();
        // 87, 45, 62, 23, 78, 100
        assert_eq!(counts, vec![2.0, 2.0, 1.0, 1.0, 0.0]);
        assert_eq!(points[0].0, "80-100%");
    }

    #[test]
    fn test_battery_distribution_boundaries() {
        let fleet: Vec<Drone> = [80.0, 79.9, 20.0, 19.9]
            .into_iter()
            .map(|b| Drone::new("X", DroneStatus::Idle, "", "", b))
            .collect();
        let counts: Vec<f64> = battery_distribution(&fleet).iter().map(|(_, c)| *c).collect();
        assert_eq!(counts, vec![1.0, 1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_performance_profile_is_bounded() {
        let profile = performance_profile(&KpiSnapshot::default(), &default_fleet());
        assert_eq!(profile.len(), 5);
        assert!(profile.iter().all(|(_, v)| (0.0..=100.0).contains(v)));

        let success = profile.iter().find(|(a, _)| a == "Success Rate").unwrap();
        assert!((success.1 - 94.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_performance_profile_empty_fleet() {
        let kpis = KpiSnapshot {
            total_drones: 0,
            ..KpiSnapshot::default()
        };
        let profile = performance_profile(&kpis, &[]);
        assert!(profile.iter().all(|(_, v)| v.is_finite()));
    }

    #[tokio::test]
    async fn test_initialize_creates_four_charts() {
        let h = offline_harness();
        initialize(&h.ctx).await;

        let ledger = h.charts.ledger();
        assert_eq!(ledger.live(), 4);
        assert_eq!(h.charts.last(TREND_CHART).unwrap().0, ChartKind::Line);
        assert_eq!(h.charts.last(BATTERY_CHART).unwrap().0, ChartKind::Bar);
        assert_eq!(h.charts.last(PERFORMANCE_CHART).unwrap().0, ChartKind::Radar);

        let (kind, missions) = h.charts.last(MISSION_CHART).unwrap();
        assert_eq!(kind, ChartKind::Pie);
        assert_eq!(missions.value_of("Medical Delivery"), Some(65.0));
    }

    #[tokio::test]
    async fn test_repeated_activation_does_not_leak_charts() {
        let h = offline_harness();
        for _ in 0..3 {
            initialize(&h.ctx).await;
        }
        let ledger = h.charts.ledger();
        assert_eq!(ledger.created, 12);
        assert_eq!(ledger.destroyed, 8);
        assert_eq!(ledger.live(), 4);
    }

    #[test]
    fn test_trend_points_round_and_label() {
        let trend = vec![DeliveryTrendPoint {
            date: "2025-10-13".to_string(),
            avg_delivery_time: 9.46,
            missions_completed: Some(12),
        }];
        assert_eq!(trend_points(&trend), vec![("Mon".to_string(), 9.5)]);
    }

    #[tokio::test]
    async fn test_backend_delivery_trend_is_charted() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|path| match path {
            paths::DELIVERY_TRENDS => Ok(json!([
                {"date": "2025-10-13", "avg_delivery_time": 9.5},
                {"date": "2025-10-14", "avg_delivery_time": 15.25}
            ])),
            other => Err(ApiError::transport(other, "down")),
        });
        let h = harness_with(Arc::new(mock));

        initialize(&h.ctx).await;

        let (_, trend) = h.charts.last(TREND_CHART).unwrap();
        assert_eq!(trend.labels, vec!["Mon", "Tue"]);
        assert_eq!(trend.value_of("Mon"), Some(9.5));
    }

    #[tokio::test]
    async fn test_trend_falls_back_to_cached_then_synthetic() {
        let h = offline_harness();
        initialize(&h.ctx).await;
        let (_, synthetic) = h.charts.last(TREND_CHART).unwrap();
        assert_eq!(synthetic.labels.len(), 7);
        assert_eq!(synthetic.labels[0], "Mon");
        assert_eq!(synthetic.value_of("Sun"), Some(12.3));

        h.ctx.store().lock().await.set_delivery_trend(vec![DeliveryTrendPoint {
            date: "2025-10-15".to_string(),
            avg_delivery_time: 11.0,
            missions_completed: None,
        }]);
        initialize(&h.ctx).await;
        let (_, cached) = h.charts.last(TREND_CHART).unwrap();
        assert_eq!(cached.labels, vec!["Wed"]);
    }

    #[tokio::test]
    async fn test_backend_mission_distribution_is_charted() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|path| match path {
            paths::MISSION_DISTRIBUTION => Ok(json!({"Supply Drop": 40, "Medical Delivery": 60})),
            other => Err(ApiError::transport(other, "down")),
        });
        let h = harness_with(Arc::new(mock));

        initialize(&h.ctx).await;

        let (_, missions) = h.charts.last(MISSION_CHART).unwrap();
        assert_eq!(missions.labels, vec!["Medical Delivery", "Supply Drop"]);
        assert_eq!(missions.value_of("Supply Drop"), Some(40.0));
    }
}
