use crate::booking::{BookingOrder, BookingRequest, Passenger};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Validation failed: {0}")]
pub struct ValidationError(pub String);

fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError(format!("missing required field: {}", field)))
}

fn required_str(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ValidationError(format!("missing required field: {}", field))),
    }
}

/// Structural validation of an inbound booking request. No side effects;
/// runs before the rate limiter so malformed input never triggers an
/// outbound call.
pub fn validate(req: BookingRequest) -> Result<BookingOrder, ValidationError> {
    let flight_id = required_str(req.flight_id, "flightId")?;
    let provider = required_str(req.provider, "provider")?;
    let contact_email = required_str(req.contact_email, "contactEmail")?;

    if req.passengers.is_empty() {
        return Err(ValidationError(
            "at least one passenger is required".to_string(),
        ));
    }

    let mut passengers = Vec::with_capacity(req.passengers.len());
    for (i, p) in req.passengers.into_iter().enumerate() {
        passengers.push(Passenger {
            first_name: required_str(p.first_name, &format!("passengers[{}].firstName", i))?,
            last_name: required_str(p.last_name, &format!("passengers[{}].lastName", i))?,
            date_of_birth: required(p.date_of_birth, &format!("passengers[{}].dateOfBirth", i))?,
            gender: required(p.gender, &format!("passengers[{}].gender", i))?,
            email: p.email,
            phone: p.phone,
        });
    }

    Ok(BookingOrder {
        flight_id,
        provider,
        booking_token: req.booking_token.unwrap_or_default(),
        passengers,
        contact_email,
        contact_phone: req.contact_phone,
    })
}
