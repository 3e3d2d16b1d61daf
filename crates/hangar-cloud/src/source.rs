//! Remote listing source abstraction.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::CloudError;

/// A project as listed by the remote build service.
///
/// Field names follow the service's wire format; `cloud_id` is the only
/// identity the service knows, local UUIDs are assigned on this side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloudProject {
    /// Remote identity, unique within one credential's listing.
    #[serde(rename = "guid")]
    pub cloud_id: String,

    /// Owning organisation.
    #[serde(rename = "orgid")]
    pub org_id: String,

    /// Display name.
    pub name: String,

    /// Icon location as cached by the service.  Absent for projects that
    /// never uploaded one.
    #[serde(rename = "cachedIcon", default)]
    pub icon_path: String,
}

/// Anything that can produce the remote project listing for a credential.
///
/// One call yields one complete listing; there is no pagination or
/// streaming.  The production implementation is
/// [`CloudClient`](crate::client::CloudClient); tests substitute their own.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// Fetch every project visible to `api_key`.
    async fn fetch_projects(&self, api_key: &str) -> Result<Vec<CloudProject>, CloudError>;
}
