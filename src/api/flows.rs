//! Flow inspection client.
//!
//! Provides a trait-based abstraction over the snapshot fetch to enable:
//! - Unit testing without a real backend
//! - Scripting fetch outcomes in the integration suite
//!
//! The production implementation talks to the backend's flow inspector
//! endpoint over HTTPS.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::error::ApiError;
use crate::config::ApiConfig;
use crate::types::FlowInspection;

/// Source of flow inspection snapshots.
///
/// One fetch per advance signal; each call is independent, with no
/// de-duplication or cancellation of in-flight requests.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the current inspection snapshot for a flow.
    async fn fetch_inspection(&self, flow_slug: &str) -> Result<FlowInspection, ApiError>;
}

/// HTTP client for the flow inspector endpoint
pub struct FlowsClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl FlowsClient {
    /// Create a client from API configuration.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("flowscope/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            token: api.token.clone(),
            client,
        })
    }

    fn inspector_url(&self, flow_slug: &str) -> String {
        format!("{}/api/v3/flows/inspector/{}/", self.base_url, flow_slug)
    }
}

#[async_trait]
impl SnapshotSource for FlowsClient {
    async fn fetch_inspection(&self, flow_slug: &str) -> Result<FlowInspection, ApiError> {
        let url = self.inspector_url(flow_slug);
        tracing::debug!(%url, "fetching inspection snapshot");

        let mut request = self.client.get(&url).header("accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Error"),
            ));
        }

        response
            .json::<FlowInspection>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
