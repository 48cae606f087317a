//! Property business logic - listings owned by partners.
//!
//! The engine only needs properties as the join surface between bookings
//! and the owning partner's attachment, so this stays minimal: validated
//! creation and the lookups the aggregator uses.

use crate::{
    entities::{Property, property},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new property under an existing partner.
///
/// # Errors
/// Returns `Error::PartnerNotFound` if the owning partner does not exist
/// and `Error::Config` for an empty name.
pub async fn create_property(
    db: &DatabaseConnection,
    partner_id: i64,
    name: String,
) -> Result<property::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Property name cannot be empty".to_string(),
        });
    }

    crate::core::partner::get_partner_by_id(db, partner_id)
        .await?
        .ok_or_else(|| Error::PartnerNotFound {
            id: partner_id.to_string(),
        })?;

    let property = property::ActiveModel {
        partner_id: Set(partner_id),
        name: Set(name.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    property.insert(db).await.map_err(Into::into)
}

/// Retrieves a specific property by its unique ID.
pub async fn get_property_by_id(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<Option<property::Model>> {
    Property::find_by_id(property_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all properties owned by a partner, ordered by name.
pub async fn get_properties_for_partner(
    db: &DatabaseConnection,
    partner_id: i64,
) -> Result<Vec<property::Model>> {
    Property::find()
        .filter(property::Column::PartnerId.eq(partner_id))
        .order_by_asc(property::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
