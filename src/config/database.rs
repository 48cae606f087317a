//! Database configuration module for the referral engine.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary tables
//! based on the entity definitions. The module uses `SeaORM`'s `Schema::create_table_from_entity`
//! method to automatically generate SQL statements from the entity models, ensuring that the
//! database schema matches the Rust struct definitions without requiring manual SQL. The unique
//! indexes on `agents.referral_code` and `attachments.partner_id` are part of the generated
//! schema, so store-level uniqueness holds on every backend.

use crate::entities::{Agent, Attachment, Booking, Partner, Payout, Property};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/referral_engine.sqlite".to_string())
}

/// Establishes a connection to the database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
/// This function handles connection errors and provides a clean interface for database access
/// throughout the application.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper SQL
/// statements for table creation, ensuring the database schema matches the Rust struct
/// definitions. It creates tables for agents, partners, attachments, properties, bookings,
/// and payouts. Existing tables are left untouched, so this is safe to run on every startup.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    // Use SeaORM's proper table creation using Schema::create_table_from_entity
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut agent_table = schema.create_table_from_entity(Agent);
    let mut partner_table = schema.create_table_from_entity(Partner);
    let mut attachment_table = schema.create_table_from_entity(Attachment);
    let mut property_table = schema.create_table_from_entity(Property);
    let mut booking_table = schema.create_table_from_entity(Booking);
    let mut payout_table = schema.create_table_from_entity(Payout);

    db.execute(builder.build(agent_table.if_not_exists())).await?;
    db.execute(builder.build(partner_table.if_not_exists())).await?;
    db.execute(builder.build(attachment_table.if_not_exists()))
        .await?;
    db.execute(builder.build(property_table.if_not_exists()))
        .await?;
    db.execute(builder.build(booking_table.if_not_exists())).await?;
    db.execute(builder.build(payout_table.if_not_exists())).await?;

    Ok(())
}
