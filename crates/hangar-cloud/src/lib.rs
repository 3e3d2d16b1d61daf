// HTTP client layer for the remote build service.

pub mod client;
pub mod config;
pub mod preconnect;
pub mod source;

mod error;

pub use client::CloudClient;
pub use config::CloudConfig;
pub use error::CloudError;
pub use preconnect::Preconnect;
pub use source::{CloudProject, ProjectSource};
