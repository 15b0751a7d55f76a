pub mod executor;

pub use executor::{BookingExecutor, BookingOutcome, ExecuteError};
