use async_trait::async_trait;
use serde_json::{json, Value};
use tripdesk_core::{
    BookingOrder, BookingResult, BookingStatus, Gender, Passenger, ProviderAdapter,
    ProviderCredential, ProviderError,
};

const PROVIDER: &str = "duffel";

/// Bearer-token provider. The booking token is passed through untouched as
/// the selected offer id; price and reference are provider-authoritative
/// and read back from the order response.
pub struct DuffelAdapter {
    base_url: String,
    http: reqwest::Client,
}

impl DuffelAdapter {
    pub fn new(base_url: String, http: reqwest::Client) -> Self {
        Self { base_url, http }
    }

    fn err(&self, detail: impl Into<String>) -> ProviderError {
        ProviderError {
            provider: PROVIDER.to_string(),
            detail: detail.into(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for DuffelAdapter {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn book(
        &self,
        credential: &ProviderCredential,
        order: &BookingOrder,
    ) -> Result<BookingResult, ProviderError> {
        let passengers: Vec<Value> = order
            .passengers
            .iter()
            .map(|p| passenger_payload(p, &order.contact_email, order.contact_phone.as_deref()))
            .collect();

        let body = json!({
            "data": {
                "type": "instant",
                "selected_offers": [order.booking_token],
                "passengers": passengers,
            }
        });

        tracing::info!(provider = PROVIDER, flight_id = %order.flight_id, "submitting order");

        let response = self
            .http
            .post(format!("{}/air/orders", self.base_url))
            .bearer_auth(credential.api_key.expose())
            .header("Duffel-Version", "v2")
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

        let booking_reference = data["booking_reference"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("DUF-{}", chrono::Utc::now().timestamp_millis()));

        // Provider-authoritative pricing; never computed locally.
        let total_price = data["total_amount"]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0);
        let currency = data["total_currency"].as_str().unwrap_or("USD").to_string();
        let ticket_numbers = extract_tickets(data);

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

fn gender_code(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "m",
        Gender::Female => "f",
    }
}

fn passenger_payload(
    passenger: &Passenger,
    contact_email: &str,
    contact_phone: Option<&str>,
) -> Value {
    json!({
        "given_name": passenger.first_name,
        "family_name": passenger.last_name,
        "born_on": passenger.date_of_birth.format("%Y-%m-%d").to_string(),
        "gender": gender_code(passenger.gender),
        "email": passenger.email.as_deref().unwrap_or(contact_email),
        "phone_number": passenger
            .phone
            .as_deref()
            .or(contact_phone)
            .unwrap_or(""),
    })
}

fn extract_tickets(data: &Value) -> Option<Vec<String>> {
    let tickets: Vec<String> = data["documents"]
        .as_array()?
        .iter()
        .filter(|d| d["type"].as_str() == Some("electronic_ticket"))
        .filter_map(|d| d["unique_identifier"].as_str().map(str::to_string))
        .collect();
    if tickets.is_empty() {
        None
    } else {
        Some(tickets)
    }
}

fn error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(detail) = value["errors"][0]["message"]
            .as_str()
            .or_else(|| value["errors"][0]["title"].as_str())
        {
            return detail.to_string();
        }
    }
    body.trim().chars().take(200).collect()
}
