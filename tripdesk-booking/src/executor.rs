use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tripdesk_core::{
    scan_passengers, validate, AdapterRegistry, BookingOrder, BookingRequest, BookingResult,
    BookingStore, CredentialStore, Environment, NewBookingRecord, RateLimiter,
    SensitiveDataRejected, ValidationError,
};
use tripdesk_providers::simulate_booking;
use uuid::Uuid;

/// Caller-facing failures. Provider-side failures never appear here: the
/// engine substitutes a simulated outcome instead of a hard error, trading
/// ground truth for availability.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    SensitiveData(#[from] SensitiveDataRejected),
    #[error("Rate limit exceeded for booking requests")]
    RateLimited { remaining: u32 },
}

#[derive(Debug)]
pub struct BookingOutcome {
    pub result: BookingResult,
    /// Identifier of the persisted record; None when the insert failed.
    pub booking_id: Option<Uuid>,
}

/// The booking execution pipeline: validate, scrub, admit, resolve
/// credentials, dispatch to a provider adapter or the fallback policy,
/// and record the outcome. Each call runs the steps sequentially in one
/// task; the rate limiter is the only shared mutable state.
pub struct BookingExecutor {
    registry: AdapterRegistry,
    credentials: Arc<dyn CredentialStore>,
    records: Arc<dyn BookingStore>,
    limiter: Arc<dyn RateLimiter>,
    environment: Environment,
}

impl BookingExecutor {
    pub fn new(
        registry: AdapterRegistry,
        credentials: Arc<dyn CredentialStore>,
        records: Arc<dyn BookingStore>,
        limiter: Arc<dyn RateLimiter>,
        environment: Environment,
    ) -> Self {
        Self {
            registry,
            credentials,
            records,
            limiter,
            environment,
        }
    }

    pub async fn execute(
        &self,
        identity: &str,
        request: BookingRequest,
    ) -> Result<BookingOutcome, ExecuteError> {
        let order = validate(request)?;
        scan_passengers(&order.passengers)?;

        let admission = self.limiter.admit(identity);
        if !admission.allowed {
            tracing::warn!(identity, "booking request rejected by rate limiter");
            return Err(ExecuteError::RateLimited {
                remaining: admission.remaining,
            });
        }

        let result = self.dispatch(&order).await;

        // Provider truth over database truth: a failed insert is logged and
        // the caller still learns the provider-side outcome. Voiding a live
        // reservation over a local write failure would be the worse
        // inconsistency.
        let record = build_record(identity, &order, &result);
        let booking_id = match self.records.insert(&record).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    reference = %result.booking_reference,
                    "failed to persist booking record"
                );
                None
            }
        };

        Ok(BookingOutcome { result, booking_id })
    }

    async fn dispatch(&self, order: &BookingOrder) -> BookingResult {
        let adapter = match self.registry.get(&order.provider) {
            Some(adapter) => adapter,
            None => {
                tracing::info!(provider = %order.provider, "no adapter registered, using fallback");
                return simulate_booking(order);
            }
        };

        let credential = match self
            .credentials
            .find_active(&order.provider, self.environment)
            .await
        {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                tracing::info!(
                    provider = %order.provider,
                    environment = %self.environment,
                    "no active credential, using fallback"
                );
                return simulate_booking(order);
            }
            Err(e) => {
                tracing::warn!(provider = %order.provider, error = %e, "credential lookup failed, using fallback");
                return simulate_booking(order);
            }
        };

        match adapter.book(&credential, order).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(provider = %order.provider, error = %e, "provider booking failed, using fallback");
                simulate_booking(order)
            }
        }
    }
}

/// Audit record derived from the outcome. Passenger names are stored in
/// redacted form only; credentials never appear here.
fn build_record(user_id: &str, order: &BookingOrder, result: &BookingResult) -> NewBookingRecord {
    let passengers: Vec<String> = order.passengers.iter().map(|p| p.redacted_name()).collect();
    NewBookingRecord {
        user_id: user_id.to_string(),
        booking_type: "flight".to_string(),
        status: result.status,
        details: json!({
            "flightId": order.flight_id,
            "provider": result.provider,
            "bookingReference": result.booking_reference,
            "passengers": passengers,
            "totalPrice": result.total_price,
            "currency": result.currency,
            "contactEmail": order.contact_email,
            "contactPhone": order.contact_phone,
            "simulated": result.simulated,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;
    use std::time::Duration;
    use tripdesk_core::{
        BookingStatus, Gender, PassengerInput, ProviderAdapter, ProviderCredential, ProviderError,
        WindowLimiter,
    };

    struct MemoryCredentials(Vec<ProviderCredential>);

    #[async_trait]
    impl CredentialStore for MemoryCredentials {
        async fn find_active(
            &self,
            provider: &str,
            environment: Environment,
        ) -> Result<Option<ProviderCredential>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self
                .0
                .iter()
                .find(|c| c.provider == provider && c.environment == environment && c.is_active)
                .cloned())
        }
    }

    struct MemoryRecords {
        rows: Mutex<Vec<NewBookingRecord>>,
        fail: bool,
    }

    impl MemoryRecords {
        fn new() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl BookingStore for MemoryRecords {
        async fn insert(
            &self,
            record: &NewBookingRecord,
        ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
            if self.fail {
                return Err("connection reset".into());
            }
            self.rows.lock().unwrap().push(record.clone());
            Ok(Uuid::new_v4())
        }
    }

    struct FailingAdapter;

    #[async_trait]
    impl ProviderAdapter for FailingAdapter {
        fn name(&self) -> &str {
            "duffel"
        }

        async fn book(
            &self,
            _credential: &ProviderCredential,
            _order: &BookingOrder,
        ) -> Result<BookingResult, ProviderError> {
            Err(ProviderError {
                provider: "duffel".to_string(),
                detail: "offer expired".to_string(),
            })
        }
    }

    fn request(provider: &str) -> BookingRequest {
        BookingRequest {
            flight_id: Some("F1".to_string()),
            provider: Some(provider.to_string()),
            booking_token: Some("off_123".to_string()),
            passengers: vec![PassengerInput {
                first_name: Some("Jane".to_string()),
                last_name: Some("Doe".to_string()),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
                gender: Some(Gender::Female),
                email: None,
                phone: None,
            }],
            contact_email: Some("jane@x.com".to_string()),
            contact_phone: None,
        }
    }

    fn executor_with(
        registry: AdapterRegistry,
        credentials: Vec<ProviderCredential>,
        records: Arc<MemoryRecords>,
    ) -> BookingExecutor {
        BookingExecutor::new(
            registry,
            Arc::new(MemoryCredentials(credentials)),
            records,
            Arc::new(WindowLimiter::new(10, Duration::from_secs(60))),
            Environment::Sandbox,
        )
    }

    #[tokio::test]
    async fn unknown_provider_falls_back_to_simulated_booking() {
        let records = Arc::new(MemoryRecords::new());
        let executor = executor_with(AdapterRegistry::new(), vec![], records.clone());

        let outcome = executor.execute("user-1", request("mock")).await.unwrap();
        assert!(outcome.result.success);
        assert!(outcome.result.simulated);
        assert_eq!(outcome.result.provider, "mock");
        assert_eq!(outcome.result.total_price, 299.99);
        assert!(outcome.booking_id.is_some());

        let rows = records.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, BookingStatus::Confirmed);
        assert_eq!(rows[0].details["passengers"][0], "J. Doe");
        assert_eq!(rows[0].details["simulated"], true);
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_fallback_outcome() {
        let mut registry = AdapterRegistry::new();
        registry.register(Arc::new(FailingAdapter));
        let credential = ProviderCredential {
            provider: "duffel".to_string(),
            environment: Environment::Sandbox,
            api_key: tripdesk_core::Masked("key".to_string()),
            api_secret: tripdesk_core::Masked("secret".to_string()),
            is_active: true,
        };
        let records = Arc::new(MemoryRecords::new());
        let executor = executor_with(registry, vec![credential], records.clone());

        let outcome = executor.execute("user-1", request("duffel")).await.unwrap();
        assert!(outcome.result.success);
        assert!(outcome.result.simulated);
        assert_eq!(outcome.result.provider, "duffel");
    }

    #[tokio::test]
    async fn missing_credential_skips_live_adapter() {
        let mut registry = AdapterRegistry::new();
        registry.register(Arc::new(FailingAdapter));
        let records = Arc::new(MemoryRecords::new());
        // Adapter registered but no credential row: the adapter must never
        // be invoked, so its failure cannot occur.
        let executor = executor_with(registry, vec![], records.clone());

        let outcome = executor.execute("user-1", request("duffel")).await.unwrap();
        assert!(outcome.result.simulated);
        assert!(outcome.result.booking_reference.starts_with("MOCK-"));
    }

    #[tokio::test]
    async fn persistence_failure_keeps_provider_outcome() {
        let records = Arc::new(MemoryRecords::failing());
        let executor = executor_with(AdapterRegistry::new(), vec![], records);

        let outcome = executor.execute("user-1", request("mock")).await.unwrap();
        assert!(outcome.result.success);
        assert!(outcome.booking_id.is_none());
    }

    #[tokio::test]
    async fn repeated_requests_get_distinct_references() {
        let records = Arc::new(MemoryRecords::new());
        let executor = executor_with(AdapterRegistry::new(), vec![], records);

        let first = executor.execute("user-1", request("mock")).await.unwrap();
        let second = executor.execute("user-1", request("mock")).await.unwrap();
        assert_ne!(
            first.result.booking_reference,
            second.result.booking_reference
        );
    }

    #[tokio::test]
    async fn eleventh_request_is_rate_limited() {
        let records = Arc::new(MemoryRecords::new());
        let executor = executor_with(AdapterRegistry::new(), vec![], records);

        for _ in 0..10 {
            executor.execute("user-1", request("mock")).await.unwrap();
        }
        let err = executor
            .execute("user-1", request("mock"))
            .await
            .unwrap_err();
        match err {
            ExecuteError::RateLimited { remaining } => assert_eq!(remaining, 0),
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn sensitive_payload_is_never_dispatched_or_recorded() {
        let records = Arc::new(MemoryRecords::new());
        let executor = executor_with(AdapterRegistry::new(), vec![], records.clone());

        let mut req = request("mock");
        req.passengers[0].first_name = Some("4111 1111 1111 1111".to_string());
        let err = executor.execute("user-1", req).await.unwrap_err();
        assert!(matches!(err, ExecuteError::SensitiveData(_)));
        assert!(records.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_admission() {
        let records = Arc::new(MemoryRecords::new());
        let executor = executor_with(AdapterRegistry::new(), vec![], records.clone());

        let mut req = request("mock");
        req.contact_email = None;
        let err = executor.execute("user-1", req).await.unwrap_err();
        assert!(matches!(err, ExecuteError::Validation(_)));
        assert!(records.rows.lock().unwrap().is_empty());
    }
}
