//! HTTP client for the door-control gateway.
//!
//! Wraps the gateway's unlock endpoint using [`reqwest`]. Every way the call
//! can fail (transport, non-2xx status, `success: false`) is reported as a
//! [`GatewayError`] so the controller can treat them uniformly.

use std::time::Duration;

use async_trait::async_trait;

use crate::messages::{UnlockRequest, UnlockResponse};

/// Surfaced when the gateway answers `success: false` without a message.
pub const FALLBACK_REJECTED_MESSAGE: &str = "Failed to unlock door";

/// Surfaced when the call fails without a parseable `errorMessage`.
pub const FALLBACK_TRANSPORT_MESSAGE: &str = "Network error occurred";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the gateway client layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (connection refused, DNS, timeout,
    /// undecodable body).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Gateway returned HTTP {status}")]
    Http {
        status: u16,
        /// `errorMessage` from the body, when the body parsed.
        error_message: Option<String>,
    },

    /// The gateway answered `success: false`.
    #[error("Gateway rejected unlock: {}", .error_message.as_deref().unwrap_or(FALLBACK_REJECTED_MESSAGE))]
    Rejected { error_message: Option<String> },
}

impl GatewayError {
    /// `true` for an application-level rejection, `false` for transport and
    /// HTTP failures.
    pub fn is_rejection(&self) -> bool {
        matches!(self, GatewayError::Rejected { .. })
    }

    /// Human-readable reason to surface to the user.
    pub fn reason(&self) -> String {
        match self {
            GatewayError::Rejected { error_message } => error_message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_REJECTED_MESSAGE.to_string()),
            GatewayError::Http { error_message, .. } => error_message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_TRANSPORT_MESSAGE.to_string()),
            GatewayError::Request(_) => FALLBACK_TRANSPORT_MESSAGE.to_string(),
        }
    }
}

/// The door-control gateway as seen by the unlock controller.
#[async_trait]
pub trait DoorGateway: Send + Sync {
    /// Ask the gateway to open a door. `Ok(())` only when it reports success.
    async fn unlock(&self, request: &UnlockRequest) -> Result<(), GatewayError>;
}

/// reqwest-backed [`DoorGateway`].
#[derive(Debug, Clone)]
pub struct HttpDoorGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDoorGateway {
    /// Create a client for the gateway at `base_url`, e.g.
    /// `https://gateway.example.com`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn unlock_url(&self) -> String {
        format!("{}/api/unlock", self.base_url)
    }

    // ---- private helpers ----

    /// Map a non-2xx response to [`GatewayError::Http`], keeping the
    /// `errorMessage` when the body is JSON carrying one.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error_message = serde_json::from_str::<UnlockResponse>(&body)
            .ok()
            .and_then(|r| r.error_message);

        Err(GatewayError::Http {
            status: status.as_u16(),
            error_message,
        })
    }
}

#[async_trait]
impl DoorGateway for HttpDoorGateway {
    async fn unlock(&self, request: &UnlockRequest) -> Result<(), GatewayError> {
        tracing::debug!(
            tenant_key = %request.tenant_key,
            entry_id = %request.entry_id,
            url = %self.unlock_url(),
            "Sending unlock request to gateway",
        );

        let response = self
            .client
            .post(self.unlock_url())
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.json::<UnlockResponse>().await?;

        if body.success {
            Ok(())
        } else {
            Err(GatewayError::Rejected {
                error_message: body.error_message,
            })
        }
    }
}
