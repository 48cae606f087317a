//! Booking business logic - reservations feeding the accrual aggregator.
//!
//! Booking status transitions are owned by marketplace flows outside the
//! referral engine; the helpers here only guard the obvious illegal edits
//! (changing a cancelled booking) and validate amounts at creation.

use crate::{
    entities::{Booking, BookingStatus, booking},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new booking with status `Pending`.
///
/// # Errors
/// Returns `Error::InvalidAmount` for a negative or non-finite price and
/// `Error::PropertyNotFound` for an unknown property.
pub async fn create_booking(
    db: &DatabaseConnection,
    property_id: i64,
    guest_name: String,
    total_price: f64,
) -> Result<booking::Model> {
    if !total_price.is_finite() || total_price < 0.0 {
        return Err(Error::InvalidAmount {
            amount: total_price,
        });
    }

    crate::core::property::get_property_by_id(db, property_id)
        .await?
        .ok_or_else(|| Error::PropertyNotFound {
            id: property_id.to_string(),
        })?;

    let booking = booking::ActiveModel {
        property_id: Set(property_id),
        guest_name: Set(guest_name),
        total_price: Set(total_price),
        status: Set(BookingStatus::Pending),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    booking.insert(db).await.map_err(Into::into)
}

/// Retrieves a specific booking by its unique ID.
pub async fn get_booking_by_id(
    db: &DatabaseConnection,
    booking_id: i64,
) -> Result<Option<booking::Model>> {
    Booking::find_by_id(booking_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all bookings for a property, newest first.
pub async fn get_bookings_for_property(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<Vec<booking::Model>> {
    Booking::find()
        .filter(booking::Column::PropertyId.eq(property_id))
        .order_by_desc(booking::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks a booking as confirmed, making it commission-bearing.
pub async fn confirm_booking(db: &DatabaseConnection, booking_id: i64) -> Result<booking::Model> {
    set_booking_status(db, booking_id, BookingStatus::Confirmed).await
}

/// Cancels a booking; cancelled bookings never carry commission.
pub async fn cancel_booking(db: &DatabaseConnection, booking_id: i64) -> Result<booking::Model> {
    set_booking_status(db, booking_id, BookingStatus::Cancelled).await
}

async fn set_booking_status(
    db: &DatabaseConnection,
    booking_id: i64,
    next: BookingStatus,
) -> Result<booking::Model> {
    let booking = get_booking_by_id(db, booking_id)
        .await?
        .ok_or_else(|| Error::BookingNotFound {
            id: booking_id.to_string(),
        })?;

    if booking.status.is_terminal() {
        return Err(Error::InvalidStatusTransition {
            from: booking.status.to_string(),
            to: next.to_string(),
        });
    }

    let mut active_model: booking::ActiveModel = booking.into();
    active_model.status = Set(next);
    active_model.update(db).await.map_err(Into::into)
}
