//! Commission calculation business logic.
//!
//! Pure functions over booking data and the injected rate configuration.
//! Commission is a derived quantity: it is recomputed from the booking's
//! exact stored total every time instead of being incrementally maintained,
//! so repeated evaluation of the same confirmed booking always yields the
//! same amounts. Nothing here touches the store.

use crate::{
    config::rates::CommissionRates,
    entities::{BookingStatus, booking, property},
};

/// The two sides of a commission split for a single booking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionSplit {
    /// Amount owed to the referring agent
    pub agent_amount: f64,
    /// Amount retained by the platform
    pub platform_amount: f64,
}

impl CommissionSplit {
    /// The zero split contributed by non-confirmed bookings.
    pub const ZERO: Self = Self {
        agent_amount: 0.0,
        platform_amount: 0.0,
    };
}

/// A derived commission ledger row for one confirmed booking.
///
/// Never persisted: recomputed on demand from bookings so stored figures
/// can never drift from the source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionRecord {
    /// The confirmed booking this commission derives from
    pub booking_id: i64,
    /// The referring agent credited with the commission
    pub agent_id: i64,
    /// The partner whose property was booked
    pub partner_id: i64,
    /// The booked property
    pub property_id: i64,
    /// The booking's total price
    pub booking_amount: f64,
    /// Agent-side rate applied
    pub agent_rate: f64,
    /// Platform-side rate applied
    pub platform_rate: f64,
    /// `round2(booking_amount * agent_rate)`
    pub agent_amount: f64,
    /// `round2(booking_amount * platform_rate)`
    pub platform_amount: f64,
}

/// Rounds a currency amount to 2 decimal places, half-up.
///
/// Applied once per derived figure; intermediate sums always restart from
/// the exact stored booking totals so rounding drift cannot accumulate.
#[must_use]
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Computes the commission split for a booking.
///
/// Only bookings whose status is exactly `Confirmed` carry commission;
/// pending and cancelled bookings contribute the zero split. Idempotent:
/// identical inputs always produce identical output.
#[must_use]
pub fn compute_commission(booking: &booking::Model, rates: &CommissionRates) -> CommissionSplit {
    if booking.status != BookingStatus::Confirmed {
        return CommissionSplit::ZERO;
    }

    CommissionSplit {
        agent_amount: round_to_cents(booking.total_price * rates.agent_rate),
        platform_amount: round_to_cents(booking.total_price * rates.platform_rate),
    }
}

/// Materializes the derived audit row for one booking under one agent.
///
/// The caller supplies the property so the partner attribution is carried
/// through; `rates` should already have any per-agent override applied
/// (see [`CommissionRates::with_agent_rate`]).
#[must_use]
pub fn commission_record(
    booking: &booking::Model,
    property: &property::Model,
    agent_id: i64,
    rates: &CommissionRates,
) -> CommissionRecord {
    let split = compute_commission(booking, rates);

    CommissionRecord {
        booking_id: booking.id,
        agent_id,
        partner_id: property.partner_id,
        property_id: property.id,
        booking_amount: booking.total_price,
        agent_rate: rates.agent_rate,
        platform_rate: rates.platform_rate,
        agent_amount: split.agent_amount,
        platform_amount: split.platform_amount,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use chrono::Utc;

    fn booking_with(total_price: f64, status: BookingStatus) -> booking::Model {
        booking::Model {
            id: 1,
            property_id: 7,
            guest_name: "Guest".to_string(),
            total_price,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_round_to_cents_half_up() {
        assert_eq!(round_to_cents(14.9985), 15.0);
        assert_eq!(round_to_cents(10.101), 10.10);
        assert_eq!(round_to_cents(0.005), 0.01);
        assert_eq!(round_to_cents(1000.0), 1000.0);
    }

    #[test]
    fn test_confirmed_booking_default_rates() {
        // 10,000 booking at 10%/15% => 1,000 agent / 1,500 platform
        let booking = booking_with(10_000.0, BookingStatus::Confirmed);
        let split = compute_commission(&booking, &CommissionRates::default());

        assert_eq!(split.agent_amount, 1000.0);
        assert_eq!(split.platform_amount, 1500.0);
    }

    #[test]
    fn test_rates_are_independent_not_complementary() {
        let rates = CommissionRates {
            agent_rate: 0.10,
            platform_rate: 0.15,
        };
        let booking = booking_with(200.0, BookingStatus::Confirmed);
        let split = compute_commission(&booking, &rates);

        // 25% total leaves the remainder to the host, outside this engine
        assert_eq!(split.agent_amount + split.platform_amount, 50.0);
    }

    #[test]
    fn test_non_confirmed_statuses_contribute_zero() {
        let rates = CommissionRates::default();

        for status in [BookingStatus::Pending, BookingStatus::Cancelled] {
            let booking = booking_with(10_000.0, status);
            assert_eq!(compute_commission(&booking, &rates), CommissionSplit::ZERO);
        }
    }

    #[test]
    fn test_compute_commission_idempotent() {
        // No hidden state or randomness: identical inputs, identical output
        let booking = booking_with(4321.99, BookingStatus::Confirmed);
        let rates = CommissionRates::default();

        let first = compute_commission(&booking, &rates);
        let second = compute_commission(&booking, &rates);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_price_booking() {
        let booking = booking_with(0.0, BookingStatus::Confirmed);
        let split = compute_commission(&booking, &CommissionRates::default());

        assert_eq!(split.agent_amount, 0.0);
        assert_eq!(split.platform_amount, 0.0);
    }

    #[test]
    fn test_commission_record_carries_attribution() {
        let booking = booking_with(10_000.0, BookingStatus::Confirmed);
        let property = property::Model {
            id: 7,
            partner_id: 3,
            name: "Beach House".to_string(),
            created_at: Utc::now(),
        };
        let rates = CommissionRates::default().with_agent_rate(0.08);

        let record = commission_record(&booking, &property, 42, &rates);

        assert_eq!(record.booking_id, 1);
        assert_eq!(record.agent_id, 42);
        assert_eq!(record.partner_id, 3);
        assert_eq!(record.property_id, 7);
        assert_eq!(record.booking_amount, 10_000.0);
        assert_eq!(record.agent_rate, 0.08);
        assert_eq!(record.agent_amount, 800.0);
        assert_eq!(record.platform_amount, 1500.0);
    }
}
