pub mod booking;
pub mod pii;
pub mod provider;
pub mod ratelimit;
pub mod repository;
pub mod validate;

pub use booking::{
    BookingOrder, BookingRequest, BookingResult, BookingStatus, Environment, Gender,
    NewBookingRecord, Passenger, PassengerInput, ProviderCredential,
};
pub use pii::{scan_passengers, Masked, SensitiveCategory, SensitiveDataRejected};
pub use provider::{AdapterRegistry, ProviderAdapter, ProviderError};
pub use ratelimit::{Admission, Clock, RateLimiter, SystemClock, WindowLimiter};
pub use repository::{BookingStore, CredentialStore};
pub use validate::{validate, ValidationError};
