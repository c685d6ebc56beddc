//! Gate client: one POST per call to the remote ambiguity gate.
//!
//! The client is stateless. Each `submit` sends the scenario's context and the
//! binding (or an explicit `null`), then classifies the outcome into a
//! [`GateResponse`] or a [`GateError`]. No retries, no caching.

pub mod response;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::GateError;
use crate::scenario::Scenario;

pub use response::{
    GateOption, GateRequest, GateResponse, GateStatus, VERDICT_ADMISSIBLE,
    VERDICT_AMBIGUOUS_UNRESOLVED, VERDICT_INADMISSIBLE_UNSUPPORTED, derive_verdict_label,
};

/// Anything that can judge a scenario context.
///
/// Implementations must not keep per-call state: two calls in flight at once
/// must not affect each other.
#[async_trait]
pub trait GateClient: Send + Sync {
    async fn submit(
        &self,
        scenario: &Scenario,
        binding: Option<&str>,
    ) -> Result<GateResponse, GateError>;
}

/// HTTP implementation against a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpGateClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpGateClient {
    /// Build a client for `endpoint`; `timeout` bounds the whole round trip.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, GateError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| GateError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GateClient for HttpGateClient {
    async fn submit(
        &self,
        scenario: &Scenario,
        binding: Option<&str>,
    ) -> Result<GateResponse, GateError> {
        let request = GateRequest {
            context: scenario.context,
            binding,
        };
        debug!(
            endpoint = %self.endpoint,
            scenario = scenario.id,
            binding = ?binding,
            "submitting context to gate"
        );

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| GateError::Transport(error_chain(&e)))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "gate returned non-success status");
            return Err(GateError::Service {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| GateError::Transport(error_chain(&e)))?;
        let parsed = GateResponse::from_json(&body)?;

        debug!(status = %parsed.status, verdict = %parsed.verdict, "gate replied");
        Ok(parsed)
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !out.contains(&cause_text) {
            out.push_str(": ");
            out.push_str(&cause_text);
        }
        source = cause.source();
    }
    out
}
