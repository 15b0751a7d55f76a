pub mod app_config;
pub mod booking_repo;
pub mod credential_repo;
pub mod database;

pub use booking_repo::PgBookingStore;
pub use credential_repo::PgCredentialStore;
pub use database::DbClient;
