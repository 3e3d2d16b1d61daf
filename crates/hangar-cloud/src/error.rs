use thiserror::Error;

/// Errors from the cloud API layer.
#[derive(Debug, Error)]
pub enum CloudError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status code.
    #[error("cloud API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}
