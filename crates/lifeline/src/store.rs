//! In-memory cache of last-known backend data.
//!
//! The store holds the session identity and every cached entity for the
//! lifetime of one authenticated session. An epoch counter is bumped on every
//! session boundary; a refresh records the epoch when it starts and must not
//! write back if the epoch has moved since.

use tracing::debug;

use crate::model::{
    default_activities, default_alerts, default_fleet, default_inventory,
    default_mission_distribution, default_system_health, Activity, Alert, DeliveryTrendPoint,
    Drone, Flight, KpiSnapshot, MissionDistribution, Session, SupplyItem, SystemHealth,
};

/// Cached console state.
#[derive(Debug, Default)]
pub struct StateStore {
    epoch: u64,
    session: Option<Session>,
    kpis: Option<KpiSnapshot>,
    fleet: Option<Vec<Drone>>,
    inventory: Option<Vec<SupplyItem>>,
    alerts: Option<Vec<Alert>>,
    activities: Option<Vec<Activity>>,
    mission_distribution: Option<MissionDistribution>,
    delivery_trend: Option<Vec<DeliveryTrendPoint>>,
    system_health: Option<SystemHealth>,
    flights: Vec<Flight>,
    time_label_ticks: u64,
}

impl StateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session epoch.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a refresh that started at `epoch` may still write.
    #[must_use]
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Drop everything and start a new session. Returns the new epoch.
    pub fn begin_session(&mut self, session: Session) -> u64 {
        self.clear();
        self.session = Some(session);
        self.epoch
    }

    /// Drop the session and every cached entity.
    pub fn clear(&mut self) {
        let epoch = self.epoch.wrapping_add(1);
        *self = Self {
            epoch,
            ..Self::default()
        };
        debug!(epoch, "state store cleared");
    }

    /// The authenticated session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kpis.is_none()
            && self.fleet.is_none()
            && self.inventory.is_none()
            && self.alerts.is_none()
            && self.activities.is_none()
            && self.mission_distribution.is_none()
            && self.delivery_trend.is_none()
            && self.system_health.is_none()
            && self.flights.is_empty()
    }

    // === KPIs ===

    /// Cached KPIs, if a fetch (or fallback) has ever populated them.
    #[must_use]
    pub fn kpis(&self) -> Option<&KpiSnapshot> {
        self.kpis.as_ref()
    }

    /// Replace the cached KPIs.
    pub fn set_kpis(&mut self, kpis: KpiSnapshot) {
        self.kpis = Some(kpis);
    }

    /// Cached KPIs, seeded with the first-load default when empty.
    pub fn kpis_mut(&mut self) -> &mut KpiSnapshot {
        self.kpis.get_or_insert_with(KpiSnapshot::default)
    }

    // === Fleet ===

    /// Cached fleet.
    #[must_use]
    pub fn fleet(&self) -> Option<&[Drone]> {
        self.fleet.as_deref()
    }

    /// Replace the cached fleet.
    pub fn set_fleet(&mut self, fleet: Vec<Drone>) {
        self.fleet = Some(fleet);
    }

    /// Cached fleet, seeded with the first-load default when empty.
    pub fn fleet_mut(&mut self) -> &mut Vec<Drone> {
        self.fleet.get_or_insert_with(default_fleet)
    }

    // === Inventory ===

    /// Cached inventory.
    #[must_use]
    pub fn inventory(&self) -> Option<&[SupplyItem]> {
        self.inventory.as_deref()
    }

    /// Replace the cached inventory.
    pub fn set_inventory(&mut self, inventory: Vec<SupplyItem>) {
        self.inventory = Some(inventory);
    }

    /// Cached inventory, seeded with the first-load default when empty.
    pub fn inventory_mut(&mut self) -> &mut Vec<SupplyItem> {
        self.inventory.get_or_insert_with(default_inventory)
    }

    // === Alerts and activities ===

    /// Replace the cached alerts.
    pub fn set_alerts(&mut self, alerts: Vec<Alert>) {
        self.alerts = Some(alerts);
    }

    /// Cached alerts, seeded with the first-load default when empty.
    pub fn alerts_mut(&mut self) -> &mut Vec<Alert> {
        self.alerts.get_or_insert_with(default_alerts)
    }

    /// Replace the cached activities.
    pub fn set_activities(&mut self, activities: Vec<Activity>) {
        self.activities = Some(activities);
    }

    /// Cached activities, seeded with the first-load default when empty.
    pub fn activities_mut(&mut self) -> &mut Vec<Activity> {
        self.activities.get_or_insert_with(default_activities)
    }

    // === Analytics ===

    /// Replace the cached mission distribution.
    pub fn set_mission_distribution(&mut self, distribution: MissionDistribution) {
        self.mission_distribution = Some(distribution);
    }

    /// Cached mission distribution, seeded with the default when empty.
    pub fn mission_distribution_mut(&mut self) -> &mut MissionDistribution {
        self.mission_distribution
            .get_or_insert_with(default_mission_distribution)
    }

    /// Last delivery trend the backend reported, if any.
    #[must_use]
    pub fn delivery_trend(&self) -> Option<&[DeliveryTrendPoint]> {
        self.delivery_trend.as_deref()
    }

    /// Replace the cached delivery trend.
    pub fn set_delivery_trend(&mut self, trend: Vec<DeliveryTrendPoint>) {
        self.delivery_trend = Some(trend);
    }

    // === System health ===

    /// Replace the cached component health.
    pub fn set_system_health(&mut self, health: SystemHealth) {
        self.system_health = Some(health);
    }

    /// Cached component health, seeded with the all-OK default when empty.
    pub fn system_health_mut(&mut self) -> &mut SystemHealth {
        self.system_health.get_or_insert_with(default_system_health)
    }

    // === Tracking ===

    /// Flights visible on the tracking page.
    #[must_use]
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// Mutable access to the visible flights.
    pub fn flights_mut(&mut self) -> &mut Vec<Flight> {
        &mut self.flights
    }

    // === Time labels ===

    /// Number of time-label ticks in this session.
    #[must_use]
    pub fn time_label_ticks(&self) -> u64 {
        self.time_label_ticks
    }

    /// Advance the time-label tick counter, returning the new count.
    pub fn advance_time_labels(&mut self) -> u64 {
        self.time_label_ticks += 1;
        self.time_label_ticks
    }
}
