//! Page switching.

use tracing::{debug, error};

use crate::app::AppContext;
use crate::render::{ids, ACTIVE_CLASS};
use crate::views::{self, Page};

/// Tracks the active page and switches between pages.
#[derive(Debug, Clone)]
pub struct Navigator {
    ctx: AppContext,
    current: Option<String>,
}

impl Navigator {
    /// A navigator with no active page.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx, current: None }
    }

    /// Identifier of the active page.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Activate `page_id`.
    ///
    /// Both `page-<id>` and `nav-<id>` must exist; otherwise nothing changes
    /// and an error is logged. Known pages then run their initializer;
    /// unknown ones render nothing extra. Returns whether the page was
    /// activated.
    pub async fn activate(&mut self, page_id: &str) -> bool {
        let target = self.ctx.target();
        let page_el = ids::page(page_id);
        let nav_el = ids::nav(page_id);
        if !target.has_element(&page_el) || !target.has_element(&nav_el) {
            error!(page = page_id, "page or nav element missing");
            return false;
        }

        if let Some(previous) = self.current.take() {
            target.set_class(&ids::page(&previous), ACTIVE_CLASS, false);
            target.set_class(&ids::nav(&previous), ACTIVE_CLASS, false);
            if previous == Page::Tracking.id() && page_id != previous {
                views::tracking::stop(&self.ctx).await;
            }
        }
        target.set_class(&page_el, ACTIVE_CLASS, true);
        target.set_class(&nav_el, ACTIVE_CLASS, true);
        self.current = Some(page_id.to_string());
        debug!(page = page_id, "page activated");

        match Page::from_id(page_id) {
            Some(page) => views::initialize(&self.ctx, page).await,
            None => debug!(page = page_id, "no initializer for page"),
        }

        self.ctx.charts().lock().await.resize_all();
        true
    }

    /// Forget the active page and clear its indicators.
    pub fn reset(&mut self) {
        if let Some(previous) = self.current.take() {
            let target = self.ctx.target();
            target.set_class(&ids::page(&previous), ACTIVE_CLASS, false);
            target.set_class(&ids::nav(&previous), ACTIVE_CLASS, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::offline_harness;
    use crate::model::{Session, SessionSource};
    use crate::render::MemoryTarget;
    use crate::timers::TimerKind;

    async fn navigator() -> (Navigator, crate::app::testing::Harness) {
        let h = offline_harness();
        h.ctx.store().lock().await.begin_session(Session::new(
            "demo",
            "Demo User",
            "Observer",
            SessionSource::OfflineTable,
        ));
        (Navigator::new(h.ctx.clone()), h)
    }

    #[tokio::test]
    async fn test_activate_switches_active_class() {
        let (mut nav, h) = navigator().await;

        assert!(nav.activate("fleet").await);
        assert!(h.target.has_class("page-fleet", ACTIVE_CLASS));
        assert!(h.target.has_class("nav-fleet", ACTIVE_CLASS));

        assert!(nav.activate("inventory").await);
        assert!(!h.target.has_class("page-fleet", ACTIVE_CLASS));
        assert!(!h.target.has_class("nav-fleet", ACTIVE_CLASS));
        assert!(h.target.has_class("page-inventory", ACTIVE_CLASS));
        assert_eq!(nav.current(), Some("inventory"));
    }

    #[tokio::test]
    async fn test_activate_runs_initializer() {
        let (mut nav, h) = navigator().await;
        nav.activate("fleet").await;
        assert_eq!(h.target.cards(ids::FLEET_LIST).len(), 6);
    }

    #[tokio::test]
    async fn test_missing_element_is_a_no_op() {
        let (mut nav, h) = navigator().await;
        nav.activate("fleet").await;

        assert!(!nav.activate("settings").await);
        assert_eq!(nav.current(), Some("fleet"));
        assert!(h.target.has_class("page-fleet", ACTIVE_CLASS));
    }

    #[tokio::test]
    async fn test_unknown_page_with_elements_renders_nothing_extra() {
        let h = offline_harness();
        let target = std::sync::Arc::new(MemoryTarget::with_elements([
            "page-help",
            "nav-help",
        ]));
        let ctx = crate::app::AppContext::new(
            h.ctx.api().clone(),
            crate::config::Config::default(),
            target.clone(),
            std::sync::Arc::new(crate::render::charts::RecordingCharts::new()),
        );
        let mut nav = Navigator::new(ctx);

        assert!(nav.activate("help").await);
        assert!(target.has_class("page-help", ACTIVE_CLASS));
        assert_eq!(target.mutation_count(), 2);
    }

    #[tokio::test]
    async fn test_activate_resizes_live_charts() {
        let (mut nav, h) = navigator().await;
        nav.activate("analytics").await;
        assert_eq!(h.charts.ledger().resized, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_tracking_stops_its_timer() {
        let (mut nav, h) = navigator().await;
        nav.activate("tracking").await;
        assert!(h.ctx.timers().lock().await.is_active(TimerKind::TrackingRefresh));

        nav.activate("fleet").await;
        assert!(!h.ctx.timers().lock().await.is_active(TimerKind::TrackingRefresh));
    }

    #[tokio::test]
    async fn test_reset_clears_indicators() {
        let (mut nav, h) = navigator().await;
        nav.activate("maintenance").await;
        nav.reset();

        assert_eq!(nav.current(), None);
        assert!(!h.target.has_class("page-maintenance", ACTIVE_CLASS));
    }
}
