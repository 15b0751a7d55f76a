use crate::booking::{BookingOrder, BookingResult, ProviderCredential};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Provider-side failure for one booking attempt. Carries a human-readable
/// detail extracted from the provider's error envelope when possible.
#[derive(Debug, Error)]
#[error("Provider {provider} rejected the booking: {detail}")]
pub struct ProviderError {
    pub provider: String,
    pub detail: String,
}

/// Common booking contract implemented by every external provider adapter.
/// Adapters never retry internally; any non-success response is fatal for
/// the attempt and retry policy belongs to the caller.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Registry key, e.g. "amadeus".
    fn name(&self) -> &str;

    async fn book(
        &self,
        credential: &ProviderCredential,
        order: &BookingOrder,
    ) -> Result<BookingResult, ProviderError>;
}

/// Adapter lookup keyed by provider name. Adding a provider means
/// registering an adapter here, not editing a dispatch function.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    pub fn get(&self, provider: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(provider).cloned()
    }
}
