//! Connection warm-up job.
//!
//! Issued once at startup so the first real listing fetch does not pay the
//! DNS and TLS setup cost.  The job owns its task handle: it can be
//! cancelled, polled for completion, and dropping it aborts any request
//! still in flight.  Nobody consumes its result.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::CloudConfig;

/// Handle to a running warm-up request.
pub struct Preconnect {
    handle: JoinHandle<()>,
}

impl Preconnect {
    /// Spawn the warm-up request in the background.
    pub fn spawn(config: &CloudConfig) -> Self {
        let base_url = config.base_url.clone();
        let timeout = config.request_timeout;

        let handle = tokio::spawn(async move {
            match warm_up(&base_url, timeout).await {
                Ok(status) => {
                    tracing::debug!(url = %base_url, %status, "service warm-up done");
                }
                Err(e) => {
                    tracing::warn!(url = %base_url, error = %e, "service warm-up failed");
                }
            }
        });

        Self { handle }
    }

    /// Whether the warm-up request has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Abort the request if it is still in flight.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for Preconnect {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn warm_up(base_url: &str, timeout: Duration) -> Result<reqwest::StatusCode, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.head(base_url).send().await?;
    Ok(response.status())
}
