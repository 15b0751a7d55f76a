use async_trait::async_trait;
use sqlx::PgPool;
use tripdesk_core::{BookingStore, NewBookingRecord};
use uuid::Uuid;

/// Append-only booking record writes. Records are never updated here;
/// modifications belong to the external change-request workflow.
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn insert(
        &self,
        record: &NewBookingRecord,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO booking_records (id, user_id, booking_type, status, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&record.user_id)
        .bind(&record.booking_type)
        .bind(record.status.to_string())
        .bind(&record.details)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }
}
