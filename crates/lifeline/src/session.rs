//! Login, logout and session lifecycle.
//!
//! The controller is the only way into the console. A successful login
//! starts the session's timers and opens the dashboard; logout tears every
//! one of them down again and returns the surface to the login form.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::app::AppContext;
use crate::config::OfflineFallback;
use crate::error::{Error, Result};
use crate::model::{Activity, Alert, Session, SessionSource};
use crate::navigation::Navigator;
use crate::render::{ids, RenderTarget, View, VISIBLE_CLASS};
use crate::timers::TimerKind;
use crate::views::{dashboard, Page};

/// An entry in the offline credential table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfflineCredential {
    /// Login name.
    pub username: &'static str,
    /// Plaintext password.
    pub password: &'static str,
    /// Operator role.
    pub role: &'static str,
    /// Name shown in the console header.
    pub display_name: &'static str,
}

/// Demo accounts accepted when the backend cannot authenticate.
///
/// Plaintext and client-visible: a convenience for running without a
/// backend, not a security boundary.
pub const OFFLINE_CREDENTIALS: [OfflineCredential; 4] = [
    OfflineCredential {
        username: "admin",
        password: "admin123",
        role: "Administrator",
        display_name: "System Administrator",
    },
    OfflineCredential {
        username: "fleet_mgr",
        password: "fleet123",
        role: "Fleet Manager",
        display_name: "Fleet Operations Manager",
    },
    OfflineCredential {
        username: "medical",
        password: "medical123",
        role: "Medical Coordinator",
        display_name: "Medical Supply Coordinator",
    },
    OfflineCredential {
        username: "demo",
        password: "demo123",
        role: "Observer",
        display_name: "Demo User",
    },
];

/// Case-sensitive exact match against the offline table.
#[must_use]
pub fn lookup_offline(username: &str, password: &str) -> Option<&'static OfflineCredential> {
    OFFLINE_CREDENTIALS
        .iter()
        .find(|c| c.username == username && c.password == password)
}

/// Authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Login form showing.
    LoggedOut,
    /// Console open for this session.
    LoggedIn(Session),
}

/// Drives login, logout and navigation for one console.
#[derive(Debug)]
pub struct SessionController {
    ctx: AppContext,
    navigator: Navigator,
    state: SessionState,
}

impl SessionController {
    /// A logged-out controller.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        let navigator = Navigator::new(ctx.clone());
        Self {
            ctx,
            navigator,
            state: SessionState::LoggedOut,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The active session, if logged in.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::LoggedIn(session) => Some(session),
            SessionState::LoggedOut => None,
        }
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn(_))
    }

    /// Active page, if any.
    #[must_use]
    pub fn current_page(&self) -> Option<&str> {
        self.navigator.current()
    }

    /// Shared application context.
    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Log in.
    ///
    /// Tries the backend first and the offline table according to the
    /// configured fallback policy. On failure the error is shown inline, the
    /// inputs are cleared and the message is dismissed after a delay. Calling
    /// this while logged in returns the current session and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty field,
    /// [`Error::InvalidCredentials`] when no path accepts the credentials, or
    /// [`Error::Network`] when the backend failed and policy forbids the
    /// offline table.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session> {
        if let SessionState::LoggedIn(session) = &self.state {
            debug!(user = %session.username, "login ignored, already logged in");
            return Ok(session.clone());
        }

        match self.authenticate(username, password).await {
            Ok(session) => {
                self.start_session(session.clone()).await;
                Ok(session)
            }
            Err(e) => {
                info!(user = username, error = %e, "login failed");
                self.show_login_error(&e).await;
                Err(e)
            }
        }
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Session> {
        if username.trim().is_empty() {
            return Err(Error::validation("username"));
        }
        if password.is_empty() {
            return Err(Error::validation("password"));
        }

        let policy = self.ctx.config().auth.offline_fallback;
        match self.ctx.api().login(username, password).await {
            Ok(response) if response.success => {
                let session = match response.user {
                    Some(user) => {
                        let display = user.full_name.unwrap_or_else(|| user.username.clone());
                        Session::new(user.username, display, user.role, SessionSource::Backend)
                    }
                    None => Session::new(username, username, "Operator", SessionSource::Backend),
                };
                return Ok(session);
            }
            Ok(response) => {
                debug!(reason = ?response.message, "backend rejected credentials");
                if policy != OfflineFallback::Always {
                    return Err(Error::InvalidCredentials);
                }
            }
            Err(e) => {
                warn!(error = %e, "login request failed");
                if !fallback_allowed(policy, &e) {
                    return Err(match e.status() {
                        Some(401 | 403) => Error::InvalidCredentials,
                        _ => Error::Network(e),
                    });
                }
            }
        }

        lookup_offline(username, password)
            .map(|c| {
                debug!(user = username, "accepted by offline table");
                Session::new(c.username, c.display_name, c.role, SessionSource::OfflineTable)
            })
            .ok_or(Error::InvalidCredentials)
    }

    async fn start_session(&mut self, session: Session) {
        self.ctx.store().lock().await.begin_session(session.clone());
        self.ctx
            .timers()
            .lock()
            .await
            .cancel(TimerKind::LoginErrorDismiss);

        let target = self.ctx.target();
        hide_login_error(target.as_ref());
        target.set_value(ids::PASSWORD, "");
        target.set_text(ids::USER_DISPLAY_NAME, &session.display_name);
        target.set_text(ids::USER_ROLE, &session.role);
        target.show_view(View::Console);

        info!(
            user = %session.username,
            role = %session.role,
            source = ?session.source,
            "logged in"
        );
        self.state = SessionState::LoggedIn(session);

        dashboard::start_refresh(&self.ctx).await;
        dashboard::start_time_labels(&self.ctx).await;
        self.navigator.activate(Page::Dashboard.id()).await;
    }

    async fn show_login_error(&self, error: &Error) {
        let target = self.ctx.target();
        target.set_text(ids::LOGIN_ERROR, &error.login_message());
        target.set_class(ids::LOGIN_ERROR, VISIBLE_CLASS, true);
        target.set_value(ids::USERNAME, "");
        target.set_value(ids::PASSWORD, "");
        target.focus(ids::USERNAME);

        let dismiss_target = Arc::clone(target);
        self.ctx.timers().lock().await.spawn_after(
            TimerKind::LoginErrorDismiss,
            self.ctx.config().error_dismiss(),
            async move { hide_login_error(dismiss_target.as_ref()) },
        );
    }

    /// Log out. Returns `false` if no session was active.
    pub async fn logout(&mut self) -> bool {
        let SessionState::LoggedIn(session) = &self.state else {
            debug!("logout ignored, not logged in");
            return false;
        };
        let username = session.username.clone();

        // Bumping the epoch first waits out any refresh holding the store.
        self.ctx.store().lock().await.clear();
        let timers = self.ctx.timers().lock().await.cancel_all();
        let charts = self.ctx.charts().lock().await.destroy_all();
        self.navigator.reset();

        let target = self.ctx.target();
        for container in ids::CONTAINERS {
            target.clear(container);
        }
        dashboard::clear_kpis(target.as_ref());
        target.set_text(ids::MAINTENANCE_COUNT, "");
        target.set_text(ids::USER_DISPLAY_NAME, "");
        target.set_text(ids::USER_ROLE, "");
        hide_login_error(target.as_ref());
        target.show_view(View::Login);
        target.set_value(ids::USERNAME, "");
        target.set_value(ids::PASSWORD, "");
        target.focus(ids::USERNAME);

        self.state = SessionState::LoggedOut;
        info!(user = %username, timers, charts, "logged out");
        true
    }

    /// Activate the emergency protocol.
    ///
    /// Puts a critical alert and an activity entry at the top of the
    /// dashboard feeds, then notifies the backend. A backend failure is
    /// logged and the local alert stands.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] without an active session.
    pub async fn trigger_emergency(&mut self) -> Result<Alert> {
        let Some(session) = self.session() else {
            warn!("emergency ignored, not logged in");
            return Err(Error::NotLoggedIn);
        };
        let activity = Activity {
            kind: "emergency".to_string(),
            description: "Emergency protocol activated".to_string(),
            user: session.username.clone(),
        };
        let alert = Alert::emergency();

        {
            let mut store = self.ctx.store().lock().await;
            store.alerts_mut().insert(0, alert.clone());
            store.activities_mut().insert(0, activity);
            let ticks = store.time_label_ticks();
            let target = self.ctx.target().as_ref();
            dashboard::render_alerts(target, store.alerts_mut(), ticks);
            dashboard::render_activities(target, store.activities_mut(), ticks);
        }
        warn!(alert = %alert.id, "emergency protocol activated");

        match self.ctx.api().raise_emergency().await {
            Ok(true) => info!(alert = %alert.id, "emergency acknowledged by backend"),
            Ok(false) => warn!(alert = %alert.id, "backend did not acknowledge emergency"),
            Err(e) => warn!(error = %e, "emergency request failed, alert kept locally"),
        }
        Ok(alert)
    }

    /// Switch pages. Ignored while logged out.
    pub async fn navigate(&mut self, page_id: &str) -> bool {
        if !self.is_logged_in() {
            warn!(page = page_id, "navigation ignored, not logged in");
            return false;
        }
        self.navigator.activate(page_id).await
    }
}

fn fallback_allowed(policy: OfflineFallback, error: &ApiError) -> bool {
    match policy {
        OfflineFallback::Always => true,
        OfflineFallback::TransportOnly => error.is_transport(),
        OfflineFallback::Never => false,
    }
}

fn hide_login_error(target: &dyn RenderTarget) {
    target.set_class(ids::LOGIN_ERROR, VISIBLE_CLASS, false);
    target.set_text(ids::LOGIN_ERROR, "");
}
