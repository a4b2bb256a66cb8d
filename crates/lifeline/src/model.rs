//! Core data types for lifeline.
//!
//! These mirror the JSON documents served by the fleet backend. Field names
//! follow the backend's snake_case wire format; camelCase aliases are accepted
//! as well.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where an authenticated session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSource {
    /// The backend accepted the credentials.
    Backend,
    /// The built-in offline credential table accepted the credentials.
    OfflineTable,
}

/// An authenticated operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Login name.
    pub username: String,
    /// Name shown in the console header.
    pub display_name: String,
    /// Operator role.
    pub role: String,
    /// When the session was created.
    pub logged_in_at: DateTime<Utc>,
    /// Which authentication path produced the session.
    pub source: SessionSource,
}

impl Session {
    /// Create a new session stamped with the current time.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        display_name: impl Into<String>,
        role: impl Into<String>,
        source: SessionSource,
    ) -> Self {
        Self {
            username: username.into(),
            display_name: display_name.into(),
            role: role.into(),
            logged_in_at: Utc::now(),
            source,
        }
    }
}

/// Operational state of a drone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DroneStatus {
    /// Flying a mission.
    Active,
    /// Docked and charging.
    Charging,
    /// Docked and idle.
    Idle,
    /// Grounded for maintenance.
    Maintenance,
    /// Ready for deployment.
    Standby,
    /// Returning to base.
    Returning,
    /// Any status this client does not know about.
    Other(String),
}

impl From<String> for DroneStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Active" => Self::Active,
            "Charging" => Self::Charging,
            "Idle" => Self::Idle,
            "Maintenance" => Self::Maintenance,
            "Standby" => Self::Standby,
            "Returning" => Self::Returning,
            _ => Self::Other(value),
        }
    }
}

impl From<DroneStatus> for String {
    fn from(status: DroneStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for DroneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Charging => write!(f, "Charging"),
            Self::Idle => write!(f, "Idle"),
            Self::Maintenance => write!(f, "Maintenance"),
            Self::Standby => write!(f, "Standby"),
            Self::Returning => write!(f, "Returning"),
            Self::Other(other) => write!(f, "{other}"),
        }
    }
}

/// A managed drone as reported by `GET /fleet/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    /// Fleet identifier, e.g. `LLA-001`.
    pub id: String,
    /// Current status.
    pub status: DroneStatus,
    /// Mission type currently assigned.
    #[serde(default)]
    pub mission: String,
    /// Operating zone.
    #[serde(default)]
    pub location: String,
    /// Battery charge in percent.
    #[serde(rename = "battery", alias = "batteryPercent")]
    pub battery_percent: f64,
    /// Latitude, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Longitude, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// Altitude in metres, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Ground speed in km/h, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl Drone {
    /// Create a drone with no position telemetry.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        status: DroneStatus,
        mission: impl Into<String>,
        location: impl Into<String>,
        battery_percent: f64,
    ) -> Self {
        Self {
            id: id.into(),
            status,
            mission: mission.into(),
            location: location.into(),
            battery_percent,
            lat: None,
            lon: None,
            altitude: None,
            speed: None,
        }
    }
}

/// A medical supply line from `GET /medical/inventory`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyItem {
    /// Inventory identifier, e.g. `MED-0001`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    /// Item name.
    #[serde(rename = "item_name", alias = "name")]
    pub name: String,
    /// Units currently in stock.
    #[serde(alias = "currentStock")]
    pub current_stock: u32,
    /// Reorder threshold.
    #[serde(rename = "min_stock_level", alias = "minThreshold")]
    pub min_threshold: u32,
    /// Unit of measure, e.g. `vials`.
    #[serde(rename = "unit_of_measure", alias = "unitLabel")]
    pub unit_label: String,
    /// Quality check result, `Good` when the batch passed.
    #[serde(alias = "qualityStatus")]
    pub quality_status: String,
    /// Supply category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Handling priority, e.g. `Critical`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl SupplyItem {
    /// Create a supply item without catalogue metadata.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        current_stock: u32,
        min_threshold: u32,
        unit_label: impl Into<String>,
        quality_status: impl Into<String>,
    ) -> Self {
        Self {
            item_id: None,
            name: name.into(),
            current_stock,
            min_threshold,
            unit_label: unit_label.into(),
            quality_status: quality_status.into(),
            category: None,
            priority: None,
        }
    }
}

/// Headline fleet metrics from `GET /dashboard/kpis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    /// Drones in the fleet.
    #[serde(alias = "totalDrones")]
    pub total_drones: u32,
    /// Missions in flight.
    #[serde(alias = "activeMissions")]
    pub active_missions: u32,
    /// Mission success rate in percent.
    #[serde(rename = "success_rate", alias = "successRatePercent")]
    pub success_rate_percent: f64,
    /// Average delivery time in minutes.
    #[serde(rename = "avg_delivery_time", alias = "avgDeliveryMinutes")]
    pub avg_delivery_minutes: f64,
}

impl Default for KpiSnapshot {
    fn default() -> Self {
        Self {
            total_drones: 15,
            active_missions: 8,
            success_rate_percent: 94.5,
            avg_delivery_minutes: 12.3,
        }
    }
}

impl KpiSnapshot {
    /// Value of a single metric as a float.
    #[must_use]
    pub fn value(&self, metric: KpiMetric) -> f64 {
        match metric {
            KpiMetric::TotalDrones => f64::from(self.total_drones),
            KpiMetric::ActiveMissions => f64::from(self.active_missions),
            KpiMetric::SuccessRate => self.success_rate_percent,
            KpiMetric::AvgDeliveryTime => self.avg_delivery_minutes,
        }
    }
}

/// The four headline metrics shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KpiMetric {
    /// Fleet size.
    TotalDrones,
    /// Missions in flight.
    ActiveMissions,
    /// Success rate percentage.
    SuccessRate,
    /// Average delivery minutes.
    AvgDeliveryTime,
}

impl KpiMetric {
    /// All metrics in display order.
    pub const ALL: [Self; 4] = [
        Self::TotalDrones,
        Self::ActiveMissions,
        Self::SuccessRate,
        Self::AvgDeliveryTime,
    ];

    /// How long the dashboard count-up animation runs for this metric.
    #[must_use]
    pub fn count_up_duration(self) -> Duration {
        match self {
            Self::TotalDrones => Duration::from_millis(1000),
            Self::ActiveMissions => Duration::from_millis(1200),
            Self::AvgDeliveryTime => Duration::from_millis(1500),
            Self::SuccessRate => Duration::from_millis(1800),
        }
    }

    /// Format a value of this metric for display.
    ///
    /// Counts are whole numbers; rates and times keep one decimal place.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn format(self, value: f64) -> String {
        match self {
            Self::TotalDrones | Self::ActiveMissions => format!("{}", value.round() as i64),
            Self::SuccessRate => format!("{value:.1}%"),
            Self::AvgDeliveryTime => format!("{value:.1} min"),
        }
    }
}

impl std::fmt::Display for KpiMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TotalDrones => write!(f, "total_drones"),
            Self::ActiveMissions => write!(f, "active_missions"),
            Self::SuccessRate => write!(f, "success_rate"),
            Self::AvgDeliveryTime => write!(f, "avg_delivery_time"),
        }
    }
}

/// An operational alert from `GET /alerts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert identifier.
    #[serde(default)]
    pub id: String,
    /// Alert category, e.g. `drone_battery`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// `critical`, `warning`, `info` or `success`.
    #[serde(default)]
    pub severity: String,
    /// Headline.
    pub title: String,
    /// Detail text.
    #[serde(default)]
    pub message: String,
    /// Originating subsystem.
    #[serde(default)]
    pub source: String,
}

impl Alert {
    /// The critical alert raised by the emergency quick action.
    #[must_use]
    pub fn emergency() -> Self {
        Self {
            id: format!("ALT-EMG-{}", Utc::now().format("%Y%m%d%H%M%S")),
            kind: "emergency".to_string(),
            severity: "critical".to_string(),
            title: "Emergency Protocol Activated".to_string(),
            message: "Emergency protocol has been manually activated. All active drones are \
                      being recalled to base station immediately."
                .to_string(),
            source: "Manual Override".to_string(),
        }
    }
}

/// An audit-trail entry from `GET /activities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity category, e.g. `system`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// What happened.
    pub description: String,
    /// Who did it.
    #[serde(default)]
    pub user: String,
}

/// A flight shown on the tracking page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Drone flying the mission.
    pub drone_id: String,
    /// Destination or mission label.
    pub destination: String,
    /// Completion in percent, `0..=100`.
    pub progress_percent: f64,
}

impl Flight {
    /// Minutes remaining: `max(1, round((100 - progress) * 0.2))`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn eta_minutes(&self) -> u32 {
        let remaining = ((100.0 - self.progress_percent) * 0.2).round().max(1.0);
        remaining as u32
    }

    /// Whether the flight has arrived.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress_percent >= 100.0
    }
}

/// Mission type counts from `GET /analytics/mission-distribution`.
pub type MissionDistribution = BTreeMap<String, u32>;

/// Component status from `GET /system/health`, e.g. `GPS Tracking` to `OK`.
pub type SystemHealth = BTreeMap<String, String>;

/// One day from `GET /analytics/delivery-trends`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTrendPoint {
    /// Day the sample covers, as sent by the backend.
    #[serde(default)]
    pub date: String,
    /// Average delivery minutes that day.
    #[serde(alias = "avgDeliveryTime")]
    pub avg_delivery_time: f64,
    /// Missions completed that day.
    #[serde(default, alias = "missionsCompleted")]
    pub missions_completed: Option<u32>,
}

impl DeliveryTrendPoint {
    /// Weekday label (`Mon`) when the date parses, otherwise the raw date.
    ///
    /// Accepts HTTP-style dates (`Mon, 13 Oct 2025 00:00:00 GMT`), RFC 3339
    /// timestamps and plain `YYYY-MM-DD`.
    #[must_use]
    pub fn label(&self) -> String {
        let date = self.date.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc2822(date) {
            return parsed.format("%a").to_string();
        }
        if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
            return parsed.format("%a").to_string();
        }
        let day = date.get(..10).unwrap_or(date);
        match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            Ok(parsed) => parsed.format("%a").to_string(),
            Err(_) => date.to_string(),
        }
    }
}

/// Fleet shown before the backend has ever answered.
#[must_use]
pub fn default_fleet() -> Vec<Drone> {
    vec![
        Drone::new("LLA-001", DroneStatus::Active, "Medical Delivery", "Zone Alpha", 87.0),
        Drone::new("LLA-002", DroneStatus::Charging, "Standby", "Base Station", 45.0),
        Drone::new("LLA-003", DroneStatus::Active, "Search & Rescue", "Zone Beta", 62.0),
        Drone::new("LLA-004", DroneStatus::Maintenance, "Standby", "Base Station", 23.0),
        Drone::new("LLA-005", DroneStatus::Active, "Supply Drop", "Zone Gamma", 78.0),
        Drone::new("LLA-006", DroneStatus::Idle, "Standby", "Base Station", 100.0),
    ]
}

/// Inventory shown before the backend has ever answered.
#[must_use]
pub fn default_inventory() -> Vec<SupplyItem> {
    vec![
        SupplyItem::new("O- Blood Pack", 24, 15, "packs", "Good"),
        SupplyItem::new("Epinephrine Auto-Injector", 8, 20, "units", "Good"),
        SupplyItem::new("Normal Saline (0.9%)", 65, 25, "units", "Good"),
        SupplyItem::new("Trauma Surgery Kit", 12, 10, "kits", "Warning"),
        SupplyItem::new("Anti-Venom Serum", 5, 12, "vials", "Good"),
    ]
}

/// Alerts shown before the backend has ever answered.
#[must_use]
pub fn default_alerts() -> Vec<Alert> {
    vec![
        Alert {
            id: "ALT-000001".to_string(),
            kind: "drone_battery".to_string(),
            severity: "warning".to_string(),
            title: "Low Battery Alert".to_string(),
            message: "Drone LLA-004 battery level at 23%. Consider returning to base.".to_string(),
            source: "LLA-004".to_string(),
        },
        Alert {
            id: "ALT-000002".to_string(),
            kind: "medical_supply".to_string(),
            severity: "warning".to_string(),
            title: "Low Stock Alert - Epinephrine Auto-Injector".to_string(),
            message: "Epinephrine Auto-Injector stock is running low.".to_string(),
            source: "Inventory System".to_string(),
        },
    ]
}

/// Activities shown before the backend has ever answered.
#[must_use]
pub fn default_activities() -> Vec<Activity> {
    [
        "System initialization completed successfully",
        "Weather data synchronization active",
        "Drone fleet status monitoring enabled",
        "Medical inventory tracking online",
        "Emergency protocols loaded and verified",
    ]
    .into_iter()
    .map(|description| Activity {
        kind: "system".to_string(),
        description: description.to_string(),
        user: "System".to_string(),
    })
    .collect()
}

/// Component health shown when the health endpoint is unavailable.
#[must_use]
pub fn default_system_health() -> SystemHealth {
    [
        "Drone Fleet",
        "GPS Tracking",
        "Communication",
        "Medical Inventory",
        "Weather Service",
        "Database",
    ]
    .into_iter()
    .map(|component| (component.to_string(), "OK".to_string()))
    .collect()
}

/// Mission mix shown when the analytics endpoint is unavailable.
#[must_use]
pub fn default_mission_distribution() -> MissionDistribution {
    [
        ("Medical Delivery", 65),
        ("Search & Rescue", 15),
        ("Supply Drop", 12),
        ("Reconnaissance", 5),
        ("Emergency Response", 3),
    ]
    .into_iter()
    .map(|(name, count)| (name.to_string(), count))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drone_status_round_trips_known_and_unknown() {
        assert_eq!(DroneStatus::from("Active".to_string()), DroneStatus::Active);
        assert_eq!(
            DroneStatus::from("Docked".to_string()),
            DroneStatus::Other("Docked".to_string())
        );
        assert_eq!(String::from(DroneStatus::Returning), "Returning");
    }

    #[test]
    fn test_drone_deserializes_backend_payload() {
        let json = r#"{
            "id": "LLA-007",
            "status": "Charging",
            "battery": 41.5,
            "mission": "Standby",
            "location": "Base Station",
            "lat": 28.61,
            "lon": 77.2,
            "altitude": 0.0,
            "speed": 0,
            "last_update": "Tue, 17 Oct 2026 10:00:00 GMT"
        }"#;
        let drone: Drone = serde_json::from_str(json).unwrap();
        assert_eq!(drone.id, "LLA-007");
        assert_eq!(drone.status, DroneStatus::Charging);
        assert!((drone.battery_percent - 41.5).abs() < f64::EPSILON);
        assert_eq!(drone.lat, Some(28.61));
    }

    #[test]
    fn test_drone_accepts_camel_case_battery() {
        let json = r#"{"id": "LLA-1", "status": "Idle", "batteryPercent": 90}"#;
        let drone: Drone = serde_json::from_str(json).unwrap();
        assert!((drone.battery_percent - 90.0).abs() < f64::EPSILON);
        assert!(drone.mission.is_empty());
    }

    #[test]
    fn test_supply_item_deserializes_backend_payload() {
        let json = r#"{
            "item_id": "MED-0001",
            "category": "Blood Products",
            "item_name": "O+ Blood Pack",
            "current_stock": 42,
            "min_stock_level": 18,
            "unit_of_measure": "packs",
            "quality_status": "Warning",
            "priority": "Critical",
            "supplier": "MedSupply Corp"
        }"#;
        let item: SupplyItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.priority.as_deref(), Some("Critical"));
        assert_eq!(item.name, "O+ Blood Pack");
        assert_eq!(item.current_stock, 42);
        assert_eq!(item.min_threshold, 18);
        assert_eq!(item.unit_label, "packs");
        assert_eq!(item.quality_status, "Warning");
    }

    #[test]
    fn test_kpi_default_matches_first_load_values() {
        let kpis = KpiSnapshot::default();
        assert_eq!(kpis.total_drones, 15);
        assert_eq!(kpis.active_missions, 8);
        assert!((kpis.success_rate_percent - 94.5).abs() < f64::EPSILON);
        assert!((kpis.avg_delivery_minutes - 12.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kpi_deserializes_backend_names() {
        let json = r#"{"total_drones": 12, "active_missions": 3,
                       "success_rate": 96.12, "avg_delivery_time": 9.87}"#;
        let kpis: KpiSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(kpis.total_drones, 12);
        assert!((kpis.value(KpiMetric::SuccessRate) - 96.12).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metric_format() {
        assert_eq!(KpiMetric::TotalDrones.format(14.6), "15");
        assert_eq!(KpiMetric::SuccessRate.format(94.5), "94.5%");
        assert_eq!(KpiMetric::SuccessRate.format(96.149), "96.1%");
        assert_eq!(KpiMetric::AvgDeliveryTime.format(12.3), "12.3 min");
    }

    #[test]
    fn test_metric_durations_within_bounds() {
        for metric in KpiMetric::ALL {
            let duration = metric.count_up_duration();
            assert!(duration >= Duration::from_millis(1000));
            assert!(duration <= Duration::from_millis(1800));
        }
    }

    #[test]
    fn test_flight_eta() {
        let mut flight = Flight {
            drone_id: "LLA-001".to_string(),
            destination: "Station A".to_string(),
            progress_percent: 40.0,
        };
        assert_eq!(flight.eta_minutes(), 12);

        flight.progress_percent = 97.0;
        assert_eq!(flight.eta_minutes(), 1);

        flight.progress_percent = 100.0;
        assert_eq!(flight.eta_minutes(), 1);
        assert!(flight.is_complete());
    }

    #[test]
    fn test_alert_and_activity_deserialize() {
        let alert: Alert = serde_json::from_str(
            r#"{"id": "ALT-1", "type": "weather", "severity": "warning",
                "title": "Weather Advisory", "message": "High winds"}"#,
        )
        .unwrap();
        assert_eq!(alert.kind, "weather");
        assert!(alert.source.is_empty());

        let activity: Activity =
            serde_json::from_str(r#"{"type": "alert", "description": "Alert created"}"#).unwrap();
        assert_eq!(activity.kind, "alert");
    }

    #[test]
    fn test_defaults_are_populated() {
        assert!(!default_fleet().is_empty());
        assert!(!default_inventory().is_empty());
        assert!(!default_alerts().is_empty());
        assert!(!default_activities().is_empty());
        assert_eq!(default_mission_distribution().values().sum::<u32>(), 100);
        assert_eq!(default_system_health().len(), 6);
        assert!(default_system_health().values().all(|s| s == "OK"));
    }

    #[test]
    fn test_emergency_alert_is_critical() {
        let alert = Alert::emergency();
        assert_eq!(alert.severity, "critical");
        assert_eq!(alert.kind, "emergency");
        assert!(alert.id.starts_with("ALT-EMG-"));
        assert!(alert.message.contains("recalled to base"));
    }

    #[test]
    fn test_delivery_trend_point_labels() {
        let point = |date: &str| DeliveryTrendPoint {
            date: date.to_string(),
            avg_delivery_time: 11.0,
            missions_completed: None,
        };
        assert_eq!(point("Mon, 13 Oct 2025 00:00:00 GMT").label(), "Mon");
        assert_eq!(point("2025-10-14T09:30:00+00:00").label(), "Tue");
        assert_eq!(point("2025-10-15").label(), "Wed");
        assert_eq!(point("yesterday").label(), "yesterday");
    }

    #[test]
    fn test_delivery_trend_point_deserializes() {
        let json = r#"{"date": "2025-10-16", "avg_delivery_time": 12.75, "missions_completed": 14}"#;
        let point: DeliveryTrendPoint = serde_json::from_str(json).unwrap();
        assert!((point.avg_delivery_time - 12.75).abs() < f64::EPSILON);
        assert_eq!(point.missions_completed, Some(14));
        assert_eq!(point.label(), "Thu");
    }
}
