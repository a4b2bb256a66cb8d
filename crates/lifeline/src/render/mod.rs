//! Presentation contract.
//!
//! Views never touch a concrete surface; they write through a
//! [`RenderTarget`] addressed by static element ids and through the chart
//! factory in [`charts`]. [`memory::MemoryTarget`] is the in-process surface
//! used by the CLI and the tests.

pub mod charts;
pub mod memory;

use std::fmt;

pub use charts::{
    ChartConfig, ChartFactory, ChartHandle, ChartKind, ChartRegistry, Dataset, RecordingCharts,
};
pub use memory::MemoryTarget;

/// Top-level view: the login form or the authenticated console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Login form.
    #[default]
    Login,
    /// Authenticated console.
    Console,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Console => write!(f, "console"),
        }
    }
}

/// Static element identifiers.
pub mod ids {
    /// Username input.
    pub const USERNAME: &str = "username";
    /// Password input.
    pub const PASSWORD: &str = "password";
    /// Inline login error.
    pub const LOGIN_ERROR: &str = "login-error";

    /// KPI: fleet size.
    pub const TOTAL_DRONES: &str = "total-drones";
    /// KPI: missions in flight.
    pub const ACTIVE_MISSIONS: &str = "active-missions";
    /// KPI: success rate.
    pub const SUCCESS_RATE: &str = "success-rate";
    /// KPI: average delivery time.
    pub const AVG_DELIVERY_TIME: &str = "avg-delivery-time";

    /// Fleet card container.
    pub const FLEET_LIST: &str = "fleet-list";
    /// Inventory card container.
    pub const INVENTORY_LIST: &str = "inventory-list";
    /// Alert feed container.
    pub const ALERTS_LIST: &str = "alerts-list";
    /// Activity feed container.
    pub const ACTIVITIES_LIST: &str = "activities-list";
    /// Tracking flight container.
    pub const FLIGHTS_LIST: &str = "flights-list";
    /// Maintenance card container.
    pub const MAINTENANCE_LIST: &str = "maintenance-list";
    /// Number of drones in maintenance.
    pub const MAINTENANCE_COUNT: &str = "maintenance-count";
    /// System status panel container.
    pub const SYSTEM_HEALTH_LIST: &str = "system-health-list";

    /// Header: operator display name.
    pub const USER_DISPLAY_NAME: &str = "user-display-name";
    /// Header: operator role.
    pub const USER_ROLE: &str = "user-role";

    /// Every fixed element id.
    pub const ALL: [&str; 17] = [
        USERNAME,
        PASSWORD,
        LOGIN_ERROR,
        TOTAL_DRONES,
        ACTIVE_MISSIONS,
        SUCCESS_RATE,
        AVG_DELIVERY_TIME,
        FLEET_LIST,
        INVENTORY_LIST,
        ALERTS_LIST,
        ACTIVITIES_LIST,
        FLIGHTS_LIST,
        MAINTENANCE_LIST,
        MAINTENANCE_COUNT,
        SYSTEM_HEALTH_LIST,
        USER_DISPLAY_NAME,
        USER_ROLE,
    ];

    /// Containers emptied on logout.
    pub const CONTAINERS: [&str; 7] = [
        FLEET_LIST,
        INVENTORY_LIST,
        ALERTS_LIST,
        ACTIVITIES_LIST,
        FLIGHTS_LIST,
        MAINTENANCE_LIST,
        SYSTEM_HEALTH_LIST,
    ];

    /// Page element id for a page.
    #[must_use]
    pub fn page(page_id: &str) -> String {
        format!("page-{page_id}")
    }

    /// Nav indicator id for a page.
    #[must_use]
    pub fn nav(page_id: &str) -> String {
        format!("nav-{page_id}")
    }
}

/// Class toggled on the active page and nav indicator.
pub const ACTIVE_CLASS: &str = "active";

/// Class toggled on the login error while it is shown.
pub const VISIBLE_CLASS: &str = "visible";

/// One entity rendered into a list container.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Entity key, e.g. a drone id.
    pub key: String,
    /// Heading.
    pub title: String,
    /// Visual classification, e.g. `high` or `low`.
    pub class: Option<String>,
    /// Labelled values in display order.
    pub fields: Vec<(String, String)>,
    /// Progress bar fill in percent.
    pub progress: Option<f64>,
}

impl Card {
    /// Start a card.
    #[must_use]
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            class: None,
            fields: Vec::new(),
            progress: None,
        }
    }

    /// Set the visual class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Append a labelled value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Set the progress bar fill.
    #[must_use]
    pub fn with_progress(mut self, percent: f64) -> Self {
        self.progress = Some(percent);
        self
    }

    /// Value of the field labelled `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(label, _)| label == name)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.key, self.title)?;
        if let Some(class) = &self.class {
            write!(f, " ({class})")?;
        }
        for (name, value) in &self.fields {
            write!(f, " {name}={value}")?;
        }
        if let Some(progress) = self.progress {
            write!(f, " progress={progress:.0}%")?;
        }
        Ok(())
    }
}

/// A presentation surface addressed by element id.
///
/// Writes to an id the surface does not have are ignored; callers that need
/// to know check [`RenderTarget::has_element`] first.
pub trait RenderTarget: Send + Sync + fmt::Debug {
    /// Whether the element exists.
    fn has_element(&self, id: &str) -> bool;

    /// Replace an element's text.
    fn set_text(&self, id: &str, text: &str);

    /// Add (`on`) or remove a class on an element.
    fn set_class(&self, id: &str, class: &str, on: bool);

    /// Remove every card from a container.
    fn clear(&self, id: &str);

    /// Append a card to a container.
    fn append_card(&self, container: &str, card: Card);

    /// Replace an input's value.
    fn set_value(&self, id: &str, value: &str);

    /// Move keyboard focus to an element.
    fn focus(&self, id: &str);

    /// Switch the top-level view.
    fn show_view(&self, view: View);
}
