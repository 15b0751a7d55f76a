use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Inbound Request (wire format)
// ============================================================================

/// Raw booking request as received from the HTTP layer. Fields are optional
/// here so the validator can report which one is missing instead of failing
/// at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRequest {
    pub flight_id: Option<String>,
    pub provider: Option<String>,
    pub booking_token: Option<String>,
    pub passengers: Vec<PassengerInput>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassengerInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Binary gender as required by airline interline ticketing standards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

// ============================================================================
// Validated Order (domain)
// ============================================================================

/// A structurally validated booking request. Produced only by
/// `validate::validate`; every downstream component may rely on the
/// invariants (non-empty passengers, contact email present).
#[derive(Debug, Clone)]
pub struct BookingOrder {
    pub flight_id: String,
    pub provider: String,
    /// Opaque provider-issued offer handle. Only the matching adapter may
    /// interpret its contents.
    pub booking_token: String,
    pub passengers: Vec<Passenger>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Passenger {
    /// Redacted display form for persisted records: initial plus last name.
    pub fn redacted_name(&self) -> String {
        let initial = self.first_name.chars().next().unwrap_or('?');
        format!("{}. {}", initial, self.last_name)
    }
}

// ============================================================================
// Credentials
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active API credentials for one provider in one environment. Read-only to
/// the engine; rotation happens through the external admin surface. Never
/// serialized into responses or booking records; the key material is masked
/// in Debug output.
#[derive(Debug, Clone)]
pub struct ProviderCredential {
    pub provider: String,
    pub environment: Environment,
    pub api_key: crate::pii::Masked<String>,
    pub api_secret: crate::pii::Masked<String>,
    pub is_active: bool,
}

// ============================================================================
// Outcome
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Failed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => f.write_str("confirmed"),
            BookingStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Outcome of one booking execution attempt. Always produced, whichever
/// path (live adapter or fallback) was taken, so a record can always be
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResult {
    pub success: bool,
    pub booking_reference: String,
    /// Provider reported to the caller. For fallback bookings this is the
    /// originally requested provider name, not "mock".
    pub provider: String,
    pub status: BookingStatus,
    pub total_price: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_numbers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_url: Option<String>,
    /// True when no live reservation exists behind this result.
    pub simulated: bool,
}

/// Row handed to the booking store. Append-only; the engine never updates
/// a record after insert.
#[derive(Debug, Clone)]
pub struct NewBookingRecord {
    pub user_id: String,
    pub booking_type: String,
    pub status: BookingStatus,
    pub details: serde_json::Value,
}
