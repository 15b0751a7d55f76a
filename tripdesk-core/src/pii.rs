use crate::booking::Passenger;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Sensitive-Data Guard
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitiveCategory {
    PaymentCard,
    NationalId,
}

impl fmt::Display for SensitiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensitiveCategory::PaymentCard => f.write_str("payment card number"),
            SensitiveCategory::NationalId => f.write_str("national identifier"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Sensitive data detected: {0} must not be included in passenger details")]
pub struct SensitiveDataRejected(pub SensitiveCategory);

// 16 digits, grouped (1234-5678-... / 1234 5678 ...) or ungrouped.
static PAYMENT_CARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}\b").expect("payment card pattern")
});

// 9 digits in the dash-grouped national-identifier shape.
static NATIONAL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("national id pattern"));

/// Shape-based scan of the passenger payload, run before any provider call.
/// This is a coarse heuristic, not a PII classifier: a match blocks the
/// request outright, and misses are accepted.
pub fn scan_passengers(passengers: &[Passenger]) -> Result<(), SensitiveDataRejected> {
    let haystack = serde_json::to_string(passengers).unwrap_or_default();
    if PAYMENT_CARD.is_match(&haystack) {
        return Err(SensitiveDataRejected(SensitiveCategory::PaymentCard));
    }
    if NATIONAL_ID.is_match(&haystack) {
        return Err(SensitiveDataRejected(SensitiveCategory::NationalId));
    }
    Ok(())
}

// ============================================================================
// Masked wrapper
// ============================================================================

/// A wrapper for sensitive data that masks its value in Debug/Display output.
/// Serialization passes the real value through; the wrapper exists to prevent
/// accidental leakage in log macros like tracing::info!("{:?}", ...).
#[derive(Clone, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }

    pub fn expose(&self) -> &T {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Gender;
    use chrono::NaiveDate;

    fn passenger_with_first_name(first_name: &str) -> Passenger {
        Passenger {
            first_name: first_name.to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender: Gender::Female,
            email: None,
            phone: None,
        }
    }

    #[test]
    fn rejects_ungrouped_card_number() {
        let err = scan_passengers(&[passenger_with_first_name("4111111111111111")]).unwrap_err();
        assert_eq!(err.0, SensitiveCategory::PaymentCard);
    }

    #[test]
    fn rejects_grouped_card_number() {
        let err =
            scan_passengers(&[passenger_with_first_name("4111-1111-1111-1111")]).unwrap_err();
        assert_eq!(err.0, SensitiveCategory::PaymentCard);
    }

    #[test]
    fn rejects_space_grouped_card_number() {
        let err =
            scan_passengers(&[passenger_with_first_name("4111 1111 1111 1111")]).unwrap_err();
        assert_eq!(err.0, SensitiveCategory::PaymentCard);
    }

    #[test]
    fn rejects_national_identifier() {
        let mut p = passenger_with_first_name("Jane");
        p.email = Some("123-45-6789".to_string());
        let err = scan_passengers(&[p]).unwrap_err();
        assert_eq!(err.0, SensitiveCategory::NationalId);
    }

    #[test]
    fn accepts_clean_payload() {
        let mut p = passenger_with_first_name("Jane");
        p.phone = Some("+1-555-0100".to_string());
        assert!(scan_passengers(&[p]).is_ok());
    }

    #[test]
    fn masked_hides_value_in_debug() {
        let m = Masked("secret@example.com".to_string());
        assert_eq!(format!("{:?}", m), "********");
        assert_eq!(format!("{}", m), "********");
    }
}
