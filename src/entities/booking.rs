//! Booking entity - A guest reservation at a property.
//!
//! Status transitions are owned by booking-management flows outside the
//! referral engine; the engine only reads bookings, and only `Confirmed`
//! ones contribute to commission.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BookingStatus {
    /// Reserved but not yet confirmed; contributes no commission
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Confirmed stay; the only status that contributes commission
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Cancelled reservation (terminal); contributes no commission
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl BookingStatus {
    /// Terminal statuses cannot be edited further.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Stable lowercase name, matching the stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    /// Unique identifier for the booking
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The booked property
    pub property_id: i64,
    /// Name of the guest who booked
    pub guest_name: String,
    /// Final total price of the stay, in currency units
    pub total_price: f64,
    /// Current booking status
    pub status: BookingStatus,
    /// When the booking was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Booking and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each booking belongs to one property
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id"
    )]
    Property,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
