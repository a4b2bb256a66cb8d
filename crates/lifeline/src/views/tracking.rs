//! Tracking page: flights in progress with progress bar, percent and ETA.
//!
//! Flights are seeded from the drones that are `Active` when the page is
//! first opened; afterwards the tracking timer advances them locally.

use tracing::{debug, warn};

use super::format_percent;
use crate::app::AppContext;
use crate::model::{Drone, DroneStatus, Flight};
use crate::render::{ids, Card, RenderTarget};
use crate::simulate::{advance_flight, initial_progress};
use crate::timers::TimerKind;

/// Card for one flight.
#[must_use]
pub fn flight_card(flight: &Flight) -> Card {
    let eta = if flight.is_complete() {
        "Arrived".to_string()
    } else {
        format!("{} min", flight.eta_minutes())
    };
    Card::new(&flight.drone_id, &flight.drone_id)
        .with_field("destination", &flight.destination)
        .with_field("progress", format_percent(flight.progress_percent))
        .with_field("eta", eta)
        .with_progress(flight.progress_percent)
}

/// Rebuild the flight list.
pub fn render(target: &dyn RenderTarget, flights: &[Flight]) {
    target.clear(ids::FLIGHTS_LIST);
    for flight in flights {
        target.append_card(ids::FLIGHTS_LIST, flight_card(flight));
    }
}

fn seed_flights(fleet: &[Drone]) -> Vec<Flight> {
    let mut rng = rand::thread_rng();
    fleet
        .iter()
        .filter(|d| d.status == DroneStatus::Active)
        .map(|d| Flight {
            drone_id: d.id.clone(),
            destination: if d.location.is_empty() {
                d.mission.clone()
            } else {
                d.location.clone()
            },
            progress_percent: initial_progress(&mut rng),
        })
        .collect()
}

/// Advance every visible flight one step and re-render.
pub async fn tick(ctx: &AppContext) {
    let mut store = ctx.store().lock().await;
    if store.session().is_none() {
        return;
    }
    {
        let mut rng = rand::thread_rng();
        for flight in store.flights_mut() {
            advance_flight(flight, &mut rng);
        }
    }
    render(ctx.target().as_ref(), store.flights());
}

/// Load flights, render them and start the tracking timer.
pub async fn initialize(ctx: &AppContext) {
    let epoch = ctx.epoch().await;
    let result = ctx.api().fleet_status().await;

    let mut store = ctx.store().lock().await;
    if !store.is_current(epoch) {
        debug!(epoch, "discarding stale tracking load");
        return;
    }
    match result {
        Ok(fleet) => store.set_fleet(fleet),
        Err(e) => warn!(error = %e, "fleet fetch failed, tracking cached fleet"),
    }
    if store.flights().is_empty() {
        let flights = seed_flights(store.fleet_mut());
        *store.flights_mut() = flights;
    }
    render(ctx.target().as_ref(), store.flights());
    drop(store);

    start(ctx).await;
}

/// Start (or restart) the tracking timer.
pub async fn start(ctx: &AppContext) {
    let period = ctx.config().tracking_interval();
    let tick_ctx = ctx.clone();
    ctx.timers()
        .lock()
        .await
        .spawn_interval(TimerKind::TrackingRefresh, period, move || {
            let ctx = tick_ctx.clone();
            async move { tick(&ctx).await }
        });
}

/// Stop the tracking timer.
pub async fn stop(ctx: &AppContext) {
    if ctx.timers().lock().await.cancel(TimerKind::TrackingRefresh) {
        debug!("tracking timer stopped");
    }
}
