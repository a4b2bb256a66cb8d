//! Maintenance page.

use tracing::{debug, warn};

use super::{battery_level, format_percent, status_counts};
use crate::app::AppContext;
use crate::model::{Drone, DroneStatus};
use crate::render::{ids, Card, ChartConfig, ChartKind, RenderTarget};

/// Canvas of the status bar chart.
pub const STATUS_CHART: &str = "maintenance-status-chart";

/// Bar chart of drones per status.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn status_chart(fleet: &[Drone]) -> ChartConfig {
    let points = status_counts(fleet)
        .into_iter()
        .map(|(status, count)| (status.to_string(), count as f64))
        .collect();
    ChartConfig::single("Drones", points)
}

/// List the grounded drones and their count.
pub fn render(target: &dyn RenderTarget, fleet: &[Drone]) {
    target.clear(ids::MAINTENANCE_LIST);
    let mut grounded = 0;
    for drone in fleet.iter().filter(|d| d.status == DroneStatus::Maintenance) {
        grounded += 1;
        let card = Card::new(&drone.id, &drone.id)
            .with_class(battery_level(drone.battery_percent))
            .with_field("location", &drone.location)
            .with_field("battery", format_percent(drone.battery_percent));
        target.append_card(ids::MAINTENANCE_LIST, card);
    }
    target.set_text(ids::MAINTENANCE_COUNT, &grounded.to_string());
}

/// Fetch the fleet, then chart and list it.
pub async fn initialize(ctx: &AppContext) {
    let epoch = ctx.epoch().await;
    let result = ctx.api().fleet_status().await;

    let mut store = ctx.store().lock().await;
    if !store.is_current(epoch) {
        debug!(epoch, "discarding stale maintenance load");
        return;
    }
    match result {
        Ok(fleet) => store.set_fleet(fleet),
        Err(e) => warn!(error = %e, "fleet fetch failed, rendering cached fleet"),
    }

    let fleet = store.fleet_mut();
    render(ctx.target().as_ref(), fleet);
    let config = status_chart(fleet);
    ctx.charts()
        .lock()
        .await
        .replace(STATUS_CHART, ChartKind::Bar, config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::offline_harness;
    use crate::model::default_fleet;
    use crate::render::MemoryTarget;

    #[test]
    fn test_status_chart_counts_present_statuses() {
        let config = status_chart(&default_fleet());
        assert_eq!(config.labels, vec!["Active", "Charging", "Idle", "Maintenance"]);
        assert_eq!(config.value_of("Maintenance"), Some(1.0));
    }

    #[test]
    fn test_render_lists_only_grounded_drones() {
        let target = MemoryTarget::standard();
        let mut fleet = default_fleet();
        fleet[0].status = DroneStatus::Maintenance;

        render(&target, &fleet);

        let cards = target.cards(ids::MAINTENANCE_LIST);
        let keys: Vec<&str> = cards.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["LLA-001", "LLA-004"]);
        assert_eq!(target.text(ids::MAINTENANCE_COUNT).as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_initialize_offline() {
        let h = offline_harness();
        initialize(&h.ctx).await;
        initialize(&h.ctx).await;

        assert_eq!(h.target.cards(ids::MAINTENANCE_LIST).len(), 1);
        assert_eq!(h.charts.ledger().live(), 1);
        assert_eq!(h.charts.last(STATUS_CHART).unwrap().0, ChartKind::Bar);
    }
}
