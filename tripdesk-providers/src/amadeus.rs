use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tripdesk_core::{
    BookingOrder, BookingResult, BookingStatus, Gender, Passenger, ProviderAdapter,
    ProviderCredential, ProviderError,
};

const PROVIDER: &str = "amadeus";

/// OAuth2 client-credentials provider. Every booking attempt exchanges the
/// stored key/secret for a bearer token, then submits a flight order
/// referencing the offer carried in the booking token.
pub struct AmadeusAdapter {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl AmadeusAdapter {
    pub fn new(base_url: String, http: reqwest::Client) -> Self {
        Self { base_url, http }
    }

    fn err(&self, detail: impl Into<String>) -> ProviderError {
        ProviderError {
            provider: PROVIDER.to_string(),
            detail: detail.into(),
        }
    }

    async fn fetch_token(&self, credential: &ProviderCredential) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(format!("{}/v1/security/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credential.api_key.expose().as_str()),
                ("client_secret", credential.api_secret.expose().as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.err(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.err(format!(
                "token exchange returned {}: {}",
                status,
                error_detail(&body)
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| self.err(format!("malformed token response: {}", e)))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl ProviderAdapter for AmadeusAdapter {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn book(
        &self,
        credential: &ProviderCredential,
        order: &BookingOrder,
    ) -> Result<BookingResult, ProviderError> {
        let token = self.fetch_token(credential).await?;

        // The booking token is this provider's own priced offer, obtained
        // at search time. Anything else cannot be submitted.
        let offer: Value = serde_json::from_str(&order.booking_token)
            .map_err(|_| self.err("booking token is not a valid flight offer"))?;

        let travelers: Vec<Value> = order
            .passengers
            .iter()
            .enumerate()
            .map(|(i, p)| traveler_payload(i, p, &order.contact_email))
            .collect();

        let body = json!({
            "data": {
                "type": "flight-order",
                "flightOffers": [offer.clone()],
                "travelers": travelers,
            }
        });

        tracing::info!(provider = PROVIDER, flight_id = %order.flight_id, "submitting flight order");

        let response = self
            .http
            .post(format!("{}/v1/booking/flight-orders", self.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.err(format!("order request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.err(format!(
                "order submission returned {}: {}",
                status,
                error_detail(&body)
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| self.err(format!("malformed order response: {}", e)))?;
        let data = &payload["data"];

        let booking_reference = extract_reference(data)
            .unwrap_or_else(|| format!("AMA-{}", chrono::Utc::now().timestamp_millis()));
        let ticket_numbers = extract_tickets(data);
        let (total_price, currency) =
            extract_price(data).or_else(|| extract_price(&offer)).unwrap_or((0.0, "USD".to_string()));

        Ok(BookingResult {
            success: true,
            booking_reference,
            provider: PROVIDER.to_string(),
            status: BookingStatus::Confirmed,
            total_price,
            currency,
            ticket_numbers,
            confirmation_url: None,
            simulated: false,
        })
    }
}

/// Traveler block in the order payload. Names are upper-cased per airline
/// ticketing convention; contact details fall back to the booking-level
/// contact email.
fn traveler_payload(index: usize, passenger: &Passenger, contact_email: &str) -> Value {
    let gender = match passenger.gender {
        Gender::Male => "MALE",
        Gender::Female => "FEMALE",
    };
    let email = passenger.email.as_deref().unwrap_or(contact_email);

    let mut traveler = json!({
        "id": (index + 1).to_string(),
        "dateOfBirth": passenger.date_of_birth.format("%Y-%m-%d").to_string(),
        "name": {
            "firstName": passenger.first_name.to_uppercase(),
            "lastName": passenger.last_name.to_uppercase(),
        },
        "gender": gender,
        "contact": {
            "emailAddress": email,
        }
    });
    if let Some(phone) = &passenger.phone {
        traveler["contact"]["phones"] = json!([{
            "deviceType": "MOBILE",
            "number": phone,
        }]);
    }
    traveler
}

/// Booking reference from the order response's associated records, when the
/// provider supplies one.
fn extract_reference(data: &Value) -> Option<String> {
    data["associatedRecords"][0]["reference"]
        .as_str()
        .map(str::to_string)
        .or_else(|| data["id"].as_str().map(str::to_string))
}

/// Per-traveler ticket numbers from the order response, when present.
fn extract_tickets(data: &Value) -> Option<Vec<String>> {
    let tickets: Vec<String> = data["tickets"]
        .as_array()?
        .iter()
        .filter_map(|t| t["documentNumber"].as_str().map(str::to_string))
        .collect();
    if tickets.is_empty() {
        None
    } else {
        Some(tickets)
    }
}

fn extract_price(value: &Value) -> Option<(f64, String)> {
    let price = &value["flightOffers"][0]["price"];
    let price = if price.is_object() { price } else { &value["price"] };
    let total = price["grandTotal"].as_str()?.parse::<f64>().ok()?;
    let currency = price["currency"].as_str().unwrap_or("USD").to_string();
    Some((total, currency))
}

/// Human-readable detail from the provider's error envelope, falling back
/// to the raw body when it is not the documented JSON shape.
fn error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(detail) = value["errors"][0]["detail"]
            .as_str()
            .or_else(|| value["errors"][0]["title"].as_str())
            .or_else(|| value["error_description"].as_str())
        {
            return detail.to_string();
        }
    }
    body.trim().chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn passenger() -> Passenger {
        Passenger {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender: Gender::Female,
            email: None,
            phone: Some("+15550100".to_string()),
        }
    }

    #[test]
    fn traveler_names_are_upper_cased() {
        let traveler = traveler_payload(0, &passenger(), "jane@x.com");
        assert_eq!(traveler["name"]["firstName"], "JANE");
        assert_eq!(traveler["name"]["lastName"], "DOE");
        assert_eq!(traveler["gender"], "FEMALE");
        assert_eq!(traveler["id"], "1");
        assert_eq!(traveler["contact"]["emailAddress"], "jane@x.com");
        assert_eq!(traveler["contact"]["phones"][0]["number"], "+15550100");
    }

    #[test]
    fn reference_prefers_associated_record() {
        let data = serde_json::json!({
            "id": "order-1",
            "associatedRecords": [{"reference": "QX7PLM"}],
        });
        assert_eq!(extract_reference(&data).unwrap(), "QX7PLM");
    }

    #[test]
    fn reference_falls_back_to_order_id() {
        let data = serde_json::json!({"id": "order-1"});
        assert_eq!(extract_reference(&data).unwrap(), "order-1");
    }

    #[test]
    fn tickets_are_collected_per_traveler() {
        let data = serde_json::json!({
            "tickets": [
                {"documentNumber": "172-1234567890", "travelerId": "1"},
                {"documentNumber": "172-1234567891", "travelerId": "2"},
            ]
        });
        assert_eq!(
            extract_tickets(&data).unwrap(),
            vec!["172-1234567890", "172-1234567891"]
        );
    }

    #[test]
    fn price_is_read_from_offer_envelope() {
        let data = serde_json::json!({
            "flightOffers": [{"price": {"grandTotal": "512.40", "currency": "EUR"}}]
        });
        let (total, currency) = extract_price(&data).unwrap();
        assert_eq!(total, 512.40);
        assert_eq!(currency, "EUR");
    }

    #[test]
    fn error_detail_reads_provider_envelope() {
        let body = r#"{"errors":[{"title":"INVALID DATA","detail":"flight offer expired"}]}"#;
        assert_eq!(error_detail(body), "flight offer expired");
    }

    #[test]
    fn error_detail_falls_back_to_raw_body() {
        assert_eq!(error_detail("gateway timeout"), "gateway timeout");
    }
}
