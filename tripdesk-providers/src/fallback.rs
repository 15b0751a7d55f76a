use rand::Rng;
use tripdesk_core::{BookingOrder, BookingResult, BookingStatus};

/// Flat per-passenger fare used by simulated bookings.
pub const FLAT_FARE: f64 = 299.99;

/// Deterministic price model, synthesized reference and ticket numbers.
/// Used whenever no active credential or registered adapter exists for the
/// requested provider, and when a live adapter fails. The result reports
/// the originally requested provider name so the persisted record reflects
/// caller intent; the `simulated` flag is what distinguishes it from a
/// real reservation downstream.
pub fn simulate_booking(order: &BookingOrder) -> BookingResult {
    let reference = mock_reference();
    let ticket_numbers: Vec<String> = (1..=order.passengers.len())
        .map(|i| format!("{}-T{}", reference, i))
        .collect();

    tracing::info!(
        provider = %order.provider,
        reference = %reference,
        "no live booking path, issuing simulated confirmation"
    );

    BookingResult {
        success: true,
        booking_reference: reference,
        provider: order.provider.clone(),
        status: BookingStatus::Confirmed,
        total_price: FLAT_FARE * order.passengers.len() as f64,
        currency: "USD".to_string(),
        ticket_numbers: Some(ticket_numbers),
        confirmation_url: None,
        simulated: true,
    }
}

fn mock_reference() -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("MOCK-{}", suffix)
}
