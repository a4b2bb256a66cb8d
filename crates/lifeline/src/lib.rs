//! `lifeline` - Operations console for a medical drone fleet
//!
//! This library provides the console core: a client for the fleet backend,
//! the session-scoped state store, page renderers, navigation, login and
//! logout, and the periodic refreshes that fall back to a local simulation
//! when the backend is unreachable.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod animation;
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod render;
pub mod session;
pub mod simulate;
pub mod store;
pub mod timers;
pub mod views;

pub use api::{ApiClient, ApiError, Transport};
pub use app::AppContext;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Drone, DroneStatus, KpiSnapshot, Session, SessionSource};
pub use navigation::Navigator;
pub use render::{ChartFactory, MemoryTarget, RenderTarget, View};
pub use session::{SessionController, SessionState};
pub use store::StateStore;
pub use timers::{TimerKind, TimerRegistry};
pub use views::Page;
