//! Page renderers.
//!
//! Every page follows one pattern: note the store epoch, fetch fresh data,
//! take the store lock, drop the result if the epoch moved, otherwise merge
//! successes into the store and render from the store. A failed fetch is
//! logged and the page renders the last cached snapshot (or the first-load
//! default) instead.

pub mod analytics;
pub mod dashboard;
pub mod fleet;
pub mod inventory;
pub mod maintenance;
pub mod tracking;

use std::collections::BTreeMap;
use std::fmt;

use crate::app::AppContext;
use crate::model::{Drone, DroneStatus};

/// A console page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// KPIs, fleet status chart and feeds.
    Dashboard,
    /// One card per drone.
    Fleet,
    /// Trend, battery, performance and mission charts.
    Analytics,
    /// One card per supply line.
    Inventory,
    /// Status chart and grounded drones.
    Maintenance,
    /// Flights in progress.
    Tracking,
}

impl Page {
    /// Every page in navigation order.
    pub const ALL: [Self; 6] = [
        Self::Dashboard,
        Self::Fleet,
        Self::Analytics,
        Self::Inventory,
        Self::Maintenance,
        Self::Tracking,
    ];

    /// Page identifier used in element ids.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Fleet => "fleet",
            Self::Analytics => "analytics",
            Self::Inventory => "inventory",
            Self::Maintenance => "maintenance",
            Self::Tracking => "tracking",
        }
    }

    /// Look a page up by identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.id() == id)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Run a page's initializer.
pub async fn initialize(ctx: &AppContext, page: Page) {
    match page {
        Page::Dashboard => dashboard::initialize(ctx).await,
        Page::Fleet => fleet::initialize(ctx).await,
        Page::Analytics => analytics::initialize(ctx).await,
        Page::Inventory => inventory::initialize(ctx).await,
        Page::Maintenance => maintenance::initialize(ctx).await,
        Page::Tracking => tracking::initialize(ctx).await,
    }
}

/// Battery class: above 60 is `high`, 30 to 60 is `medium`, below 30 is
/// `low`.
#[must_use]
pub fn battery_level(percent: f64) -> &'static str {
    if percent > 60.0 {
        "high"
    } else if percent >= 30.0 {
        "medium"
    } else {
        "low"
    }
}

/// Stock fill class: `good` only for a `Good` quality check.
#[must_use]
pub fn stock_fill(quality_status: &str) -> &'static str {
    if quality_status == "Good" {
        "good"
    } else {
        "low"
    }
}

/// Whole-percent battery label.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_percent(percent: f64) -> String {
    format!("{}%", percent.round() as i64)
}

/// Relative age label for something `minutes` old.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_time_ago(minutes: f64) -> String {
    let minutes = minutes.max(0.0).floor() as u64;
    match minutes {
        0 => "Just now".to_string(),
        1..=59 => format!("{minutes} min ago"),
        60..=1439 => format!("{} hr ago", minutes / 60),
        _ => {
            let days = minutes / 1440;
            if days == 1 {
                "1 day ago".to_string()
            } else {
                format!("{days} days ago")
            }
        }
    }
}

/// Synthetic age of the `index`th feed item after `ticks` label refreshes.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn synthetic_age_minutes(index: usize, ticks: u64) -> f64 {
    index as f64 * 5.0 + ticks as f64 * 0.5
}

/// Drone count per status.
#[must_use]
pub fn status_counts(fleet: &[Drone]) -> BTreeMap<DroneStatus, usize> {
    let mut counts = BTreeMap::new();
    for drone in fleet {
        *counts.entry(drone.status.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_level_thresholds() {
        assert_eq!(battery_level(61.0), "high");
        assert_eq!(battery_level(60.0), "medium");
        assert_eq!(battery_level(30.0), "medium");
        assert_eq!(battery_level(29.0), "low");
        assert_eq!(battery_level(100.0), "high");
        assert_eq!(battery_level(0.0), "low");
    }

    #[test]
    fn test_battery_level_uses_raw_value() {
        assert_eq!(battery_level(60.4), "high");
        assert_eq!(battery_level(60.0), "medium");
        assert_eq!(battery_level(30.0), "medium");
        assert_eq!(battery_level(29.6), "low");
        assert_eq!(format_percent(29.6), "30%");
    }

    #[test]
    fn test_stock_fill() {
        assert_eq!(stock_fill("Good"), "good");
        assert_eq!(stock_fill("Warning"), "low");
        assert_eq!(stock_fill("good"), "low");
    }

    #[test]
    fn test_page_ids_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_id(page.id()), Some(page));
        }
        assert_eq!(Page::from_id("settings"), None);
    }

    #[test]
    fn test_format_time_ago() {
        assert_eq!(format_time_ago(0.4), "Just now");
        assert_eq!(format_time_ago(5.0), "5 min ago");
        assert_eq!(format_time_ago(59.9), "59 min ago");
        assert_eq!(format_time_ago(125.0), "2 hr ago");
        assert_eq!(format_time_ago(1440.0), "1 day ago");
        assert_eq!(format_time_ago(4000.0), "2 days ago");
    }

    #[test]
    fn test_synthetic_age() {
        assert!((synthetic_age_minutes(0, 0)).abs() < f64::EPSILON);
        assert!((synthetic_age_minutes(2, 4) - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_status_counts() {
        let counts = status_counts(&crate::model::default_fleet());
        assert_eq!(counts.get(&DroneStatus::Active), Some(&3));
        assert_eq!(counts.get(&DroneStatus::Maintenance), Some(&1));
        assert_eq!(counts.get(&DroneStatus::Returning), None);
    }
}
