//! Backend API client.
//!
//! [`Transport`] is the raw JSON contract (`get`/`post` returning a JSON value
//! or an [`ApiError`]). [`ApiClient`] layers the typed endpoints of the fleet
//! backend on top of any transport. Nothing in this module touches shared
//! state; callers own caching and fallback.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::Config;
use crate::model::{
    Activity, Alert, DeliveryTrendPoint, Drone, KpiSnapshot, MissionDistribution, SupplyItem,
    SystemHealth,
};

#[cfg(test)]
use mockall::automock;

/// Endpoint paths, relative to the configured base URL.
pub mod paths {
    /// `POST` credentials.
    pub const LOGIN: &str = "/login";
    /// `GET` headline metrics.
    pub const KPIS: &str = "/dashboard/kpis";
    /// `GET` per-drone status.
    pub const FLEET_STATUS: &str = "/fleet/status";
    /// `GET` medical inventory.
    pub const INVENTORY: &str = "/medical/inventory";
    /// `GET` active alerts.
    pub const ALERTS: &str = "/alerts";
    /// `GET` recent activities.
    pub const ACTIVITIES: &str = "/activities";
    /// `GET` mission type counts.
    pub const MISSION_DISTRIBUTION: &str = "/analytics/mission-distribution";
    /// `GET` daily delivery-time averages.
    pub const DELIVERY_TRENDS: &str = "/analytics/delivery-trends";
    /// `POST` the emergency protocol.
    pub const EMERGENCY: &str = "/alerts/emergency";
    /// `GET` per-component health.
    pub const SYSTEM_HEALTH: &str = "/system/health";
}

/// A failed backend request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("request to {path} failed with status {status}")]
    Status {
        /// Endpoint path.
        path: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request never produced a response.
    #[error("request to {path} failed: {message}")]
    Transport {
        /// Endpoint path.
        path: String,
        /// Description of the failure.
        message: String,
    },

    /// The response body was not what the endpoint promises.
    #[error("unexpected response from {path}: {message}")]
    Decode {
        /// Endpoint path.
        path: String,
        /// Description of the mismatch.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl ApiError {
    /// Create a transport error for `path`.
    #[must_use]
    pub fn transport(path: &str, message: impl Into<String>) -> Self {
        Self::Transport {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// HTTP status code, when the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend could not be reached at all.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Raw JSON request contract.
///
/// Implementations send `Content-Type: application/json` and classify every
/// non-2xx status or transport failure as an [`ApiError`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a `GET` for `path`.
    async fn get(&self, path: &str) -> Result<Value, ApiError>;

    /// Issue a `POST` of `body` to `path`.
    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError>;
}

/// [`Transport`] over HTTP using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for the configured base URL.
    ///
    /// No overall request timeout is set; a hung request simply never
    /// resolves its refresh.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = ClientBuilder::new().user_agent(concat!(
            "lifeline/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api.base_url.clone(),
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn read_json(path: &str, response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        response.json::<Value>().await.map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.build_url(path);
        trace!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::transport(path, e.to_string()))?;
        Self::read_json(path, response).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let url = self.build_url(path);
        trace!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::transport(path, e.to_string()))?;
        Self::read_json(path, response).await
    }
}

/// A transport that is never connected.
///
/// Every request fails with [`ApiError::Transport`], which drives the
/// console entirely from cached data, defaults and the offline credential
/// table.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTransport;

#[async_trait]
impl Transport for OfflineTransport {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        Err(ApiError::transport(path, "offline"))
    }

    async fn post(&self, path: &str, _body: Value) -> Result<Value, ApiError> {
        Err(ApiError::transport(path, "offline"))
    }
}

/// User record inside a login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendUser {
    /// Login name.
    pub username: String,
    /// Operator role.
    #[serde(default)]
    pub role: String,
    /// Display name.
    #[serde(default, alias = "fullName", alias = "display_name")]
    pub full_name: Option<String>,
}

/// Body of a `POST /login` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Whether the backend accepted the credentials.
    pub success: bool,
    /// The authenticated user, on success.
    #[serde(default)]
    pub user: Option<BackendUser>,
    /// Rejection reason, on failure.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Acknowledgement {
    #[serde(default)]
    success: bool,
}

/// Typed client for the fleet backend.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Wrap a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// A client whose every request fails.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineTransport))
    }

    /// Raw `GET`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on non-2xx status or transport failure.
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.transport.get(path).await
    }

    /// Raw `POST`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on non-2xx status or transport failure.
    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.transport.post(path, body).await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.get(path).await?;
        decode(path, value)
    }

    /// `POST /login`.
    ///
    /// A rejection the backend reports with a non-2xx status surfaces as
    /// [`ApiError::Status`]; one reported in-band has `success == false`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = json!({ "username": username, "password": password });
        let value = self.post(paths::LOGIN, body).await?;
        let response: LoginResponse = decode(paths::LOGIN, value)?;
        debug!(success = response.success, "login response");
        Ok(response)
    }

    /// `GET /dashboard/kpis`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn kpis(&self) -> Result<KpiSnapshot, ApiError> {
        self.fetch(paths::KPIS).await
    }

    /// `GET /fleet/status`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn fleet_status(&self) -> Result<Vec<Drone>, ApiError> {
        self.fetch(paths::FLEET_STATUS).await
    }

    /// `GET /medical/inventory`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn inventory(&self) -> Result<Vec<SupplyItem>, ApiError> {
        self.fetch(paths::INVENTORY).await
    }

    /// `GET /alerts`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn alerts(&self) -> Result<Vec<Alert>, ApiError> {
        self.fetch(paths::ALERTS).await
    }

    /// `GET /activities`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn activities(&self) -> Result<Vec<Activity>, ApiError> {
        self.fetch(paths::ACTIVITIES).await
    }

    /// `GET /analytics/mission-distribution`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn mission_distribution(&self) -> Result<MissionDistribution, ApiError> {
        self.fetch(paths::MISSION_DISTRIBUTION).await
    }

    /// `GET /analytics/delivery-trends`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn delivery_trends(&self) -> Result<Vec<DeliveryTrendPoint>, ApiError> {
        self.fetch(paths::DELIVERY_TRENDS).await
    }

    /// `GET /system/health`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn system_health(&self) -> Result<SystemHealth, ApiError> {
        self.fetch(paths::SYSTEM_HEALTH).await
    }

    /// `POST /alerts/emergency`. Returns whether the backend acknowledged it.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn raise_emergency(&self) -> Result<bool, ApiError> {
        let value = self.post(paths::EMERGENCY, json!({})).await?;
        let ack: Acknowledgement = decode(paths::EMERGENCY, value)?;
        Ok(ack.success)
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
