//! The application-state object shared by every controller and view.
//!
//! Lock order, when more than one is held: store, charts, timers. The timer
//! registry is never held while awaiting another lock.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::ApiClient;
use crate::config::Config;
use crate::render::{ChartFactory, ChartRegistry, RenderTarget};
use crate::store::StateStore;
use crate::timers::TimerRegistry;

/// Handles to everything a session touches. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppContext {
    api: ApiClient,
    config: Arc<Config>,
    target: Arc<dyn RenderTarget>,
    store: Arc<Mutex<StateStore>>,
    timers: Arc<Mutex<TimerRegistry>>,
    charts: Arc<Mutex<ChartRegistry>>,
}

impl AppContext {
    /// Assemble a context with an empty store, timer registry and chart
    /// registry.
    #[must_use]
    pub fn new(
        api: ApiClient,
        config: Config,
        target: Arc<dyn RenderTarget>,
        chart_factory: Arc<dyn ChartFactory>,
    ) -> Self {
        Self {
            api,
            config: Arc::new(config),
            target,
            store: Arc::new(Mutex::new(StateStore::new())),
            timers: Arc::new(Mutex::new(TimerRegistry::new())),
            charts: Arc::new(Mutex::new(ChartRegistry::new(chart_factory))),
        }
    }

    /// Backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Loaded configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Presentation surface.
    #[must_use]
    pub fn target(&self) -> &Arc<dyn RenderTarget> {
        &self.target
    }

    /// Cached state.
    #[must_use]
    pub fn store(&self) -> &Mutex<StateStore> {
        &self.store
    }

    /// Session-scoped timers.
    #[must_use]
    pub fn timers(&self) -> &Mutex<TimerRegistry> {
        &self.timers
    }

    /// Live chart widgets.
    #[must_use]
    pub fn charts(&self) -> &Mutex<ChartRegistry> {
        &self.charts
    }

    /// Current store epoch.
    pub async fn epoch(&self) -> u64 {
        self.store.lock().await.epoch()
    }
}
