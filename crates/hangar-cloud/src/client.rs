//! REST client for the build service.
//!
//! Wraps the service's listing endpoint using [`reqwest`].  Authentication
//! is HTTP basic with the profile's API key as the user name, which is how
//! the service expects credentials to arrive.

use async_trait::async_trait;

use crate::config::CloudConfig;
use crate::error::CloudError;
use crate::source::{CloudProject, ProjectSource};

/// HTTP client for one build service instance.
pub struct CloudClient {
    client: reqwest::Client,
    base_url: String,
}

impl CloudClient {
    /// Create a client from configuration.  Fails only if the underlying
    /// TLS backend cannot be initialised.
    pub fn new(config: &CloudConfig) -> Result<Self, CloudError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Ensure the response has a success status code.  Returns the response
    /// unchanged on success, or a [`CloudError::Api`] with the status and
    /// body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CloudError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CloudError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ProjectSource for CloudClient {
    async fn fetch_projects(&self, api_key: &str) -> Result<Vec<CloudProject>, CloudError> {
        let url = self.endpoint("api/v1/projects");
        tracing::debug!(%url, "fetching remote project listing");

        let response = self
            .client
            .get(&url)
            .basic_auth(api_key, None::<&str>)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let projects: Vec<CloudProject> = response.json().await?;
        tracing::debug!(count = projects.len(), "remote project listing fetched");
        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base: &str) -> CloudClient {
        let config = CloudConfig {
            base_url: base.to_string(),
            ..CloudConfig::default()
        };
        CloudClient::new(&config).unwrap()
    }

    #[test]
    fn endpoint_joins_without_doubled_slashes() {
        let client = client_for("https://example.test/");
        assert_eq!(
            client.endpoint("/api/v1/projects"),
            "https://example.test/api/v1/projects"
        );
        assert_eq!(
            client.endpoint("api/v1/projects"),
            "https://example.test/api/v1/projects"
        );
    }

    #[test]
    fn listing_decodes_from_wire_format() {
        let body = r#"[
            {"guid": "p-1", "orgid": "org-a", "name": "Alpha", "cachedIcon": "https://cdn.test/a.png"},
            {"guid": "p-2", "orgid": "org-a", "name": "Beta"}
        ]"#;

        let projects: Vec<CloudProject> = serde_json::from_str(body).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].cloud_id, "p-1");
        assert_eq!(projects[0].icon_path, "https://cdn.test/a.png");
        assert_eq!(projects[1].name, "Beta");
        assert_eq!(projects[1].icon_path, "");
    }
}
