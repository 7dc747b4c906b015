//! HTTP liveness check against the database's status endpoint.

use std::time::Duration;

use reqwest::StatusCode;

use crate::client::GraphClient;

impl GraphClient {
    /// Probe the configured HTTP endpoint.
    pub async fn is_alive(&self) -> bool {
        self.is_alive_at(None, None).await
    }

    /// Probe an HTTP endpoint, defaulting to the configured host and port.
    pub async fn is_alive_at(&self, address: Option<&str>, http_port: Option<u16>) -> bool {
        let config = self.config();
        check_http(
            address.unwrap_or(&config.host),
            http_port.unwrap_or(config.http_port),
            Duration::from_millis(config.liveness_timeout_ms),
        )
        .await
    }
}

/// True iff `HEAD http://host:port/` answers `200 OK` within `timeout`.
///
/// Refused connections, timeouts, and malformed responses all yield false.
pub async fn check_http(host: &str, port: u16, timeout: Duration) -> bool {
    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            tracing::debug!(error = %e, "Could not build HTTP client");
            return false;
        }
    };

    let url = format!("http://{host}:{port}/");
    match client.head(&url).send().await {
        Ok(response) => {
            let status = response.status();
            let alive = status == StatusCode::OK;
            tracing::debug!(url = %url, status = %status, alive, "HTTP endpoint answered");
            alive
        }
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "HTTP endpoint unreachable");
            false
        }
    }
}
