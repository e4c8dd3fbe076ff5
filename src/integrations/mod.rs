pub mod api;
pub mod loader;

use once_cell::sync::Lazy;
use std::time::Duration;

pub use api::ApiClient;
pub use loader::LoadEvent;

/// Shared HTTP client for all backend requests to enable connection pooling
pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(5)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to configure HTTP client, using defaults: {}", e);
            reqwest::Client::new()
        })
});
