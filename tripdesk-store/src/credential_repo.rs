use async_trait::async_trait;
use sqlx::PgPool;
use tripdesk_core::{CredentialStore, Environment, Masked, ProviderCredential};

/// Credential lookup with service-level read access. Rows are written by
/// the external admin surface; this repository never mutates them.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    provider: String,
    environment: String,
    api_key: String,
    api_secret: String,
    is_active: bool,
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_active(
        &self,
        provider: &str,
        environment: Environment,
    ) -> Result<Option<ProviderCredential>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT provider, environment, api_key, api_secret, is_active
            FROM provider_credentials
            WHERE provider = $1 AND environment = $2 AND is_active = TRUE
            "#,
        )
        .bind(provider)
        .bind(environment.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| ProviderCredential {
            provider: r.provider,
            environment: if r.environment == "production" {
                Environment::Production
            } else {
                Environment::Sandbox
            },
            api_key: Masked(r.api_key),
            api_secret: Masked(r.api_secret),
            is_active: r.is_active,
        }))
    }
}
