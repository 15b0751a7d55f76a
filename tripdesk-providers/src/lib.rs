pub mod amadeus;
pub mod duffel;
pub mod fallback;

pub use amadeus::AmadeusAdapter;
pub use duffel::DuffelAdapter;
pub use fallback::simulate_booking;

use std::sync::Arc;
use std::time::Duration;
use tripdesk_core::AdapterRegistry;

/// Shared outbound HTTP client. Every provider call runs with a bounded
/// timeout; a timed-out call surfaces as a ProviderError like any other
/// provider failure.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Registry with both live adapters registered.
pub fn default_registry(
    http: reqwest::Client,
    amadeus_base_url: String,
    duffel_base_url: String,
) -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(AmadeusAdapter::new(amadeus_base_url, http.clone())));
    registry.register(Arc::new(DuffelAdapter::new(duffel_base_url, http)));
    registry
}
