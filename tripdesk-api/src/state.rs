use std::sync::Arc;
use tripdesk_booking::BookingExecutor;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<BookingExecutor>,
    pub auth: AuthConfig,
}
