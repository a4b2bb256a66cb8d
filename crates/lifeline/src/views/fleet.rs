//! Fleet page: one card per drone.

use tracing::{debug, warn};

use super::{battery_level, format_percent};
use crate::app::AppContext;
use crate::model::Drone;
use crate::render::{ids, Card, RenderTarget};

/// Card for one drone.
#[must_use]
pub fn drone_card(drone: &Drone) -> Card {
    let mut card = Card::new(&drone.id, &drone.id)
        .with_class(battery_level(drone.battery_percent))
        .with_field("status", drone.status.to_string())
        .with_field("mission", &drone.mission)
        .with_field("location", &drone.location)
        .with_field("battery", format_percent(drone.battery_percent))
        .with_progress(drone.battery_percent.clamp(0.0, 100.0));
    if let Some(altitude) = drone.altitude {
        card = card.with_field("altitude", format!("{altitude:.0} m"));
    }
    if let Some(speed) = drone.speed {
        card = card.with_field("speed", format!("{speed:.0} km/h"));
    }
    card
}

/// One plain-text row per drone: id, status, whole-percent battery, location.
#[must_use]
pub fn summary_line(drone: &Drone) -> String {
    format!(
        "{:<10} {:<12} {:>5}  {}",
        drone.id,
        drone.status.to_string(),
        format_percent(drone.battery_percent),
        drone.location
    )
}

/// Rebuild the fleet list.
pub fn render(target: &dyn RenderTarget, fleet: &[Drone]) {
    target.clear(ids::FLEET_LIST);
    for drone in fleet {
        target.append_card(ids::FLEET_LIST, drone_card(drone));
    }
}

/// Fetch the fleet and render it, or render the cached fleet on failure.
pub async fn initialize(ctx: &AppContext) {
    let epoch = ctx.epoch().await;
    let result = ctx.api().fleet_status().await;

    let mut store = ctx.store().lock().await;
    if !store.is_current(epoch) {
        debug!(epoch, "discarding stale fleet load");
        return;
    }
    match result {
        Ok(fleet) => store.set_fleet(fleet),
        Err(e) => warn!(error = %e, "fleet fetch failed, rendering cached fleet"),
    }
    render(ctx.target().as_ref(), store.fleet_mut());
}
