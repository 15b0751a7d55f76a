use crate::booking::{Environment, NewBookingRecord, ProviderCredential};
use async_trait::async_trait;
use uuid::Uuid;

/// Read-only credential lookup. Absence of an active credential is not an
/// error for callers; it signals the fallback path.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_active(
        &self,
        provider: &str,
        environment: Environment,
    ) -> Result<Option<ProviderCredential>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Append-only booking record persistence.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(
        &self,
        record: &NewBookingRecord,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;
}
