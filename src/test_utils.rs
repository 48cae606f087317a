//! Shared test utilities for the referral engine.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults.

use crate::{
    config::rates::CommissionRates,
    core::{agent, booking, partner, property},
    entities::{self, AgentStatus, PayoutStatus},
    errors::Result,
};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The default platform rate configuration (10% agent / 15% platform).
#[must_use]
pub fn test_rates() -> CommissionRates {
    CommissionRates::default()
}

fn user_id_for(display_name: &str) -> String {
    format!("user-{}", display_name.to_lowercase().replace(' ', "-"))
}

/// Registers an agent and approves it, returning the `Active` model.
pub async fn create_test_agent(
    db: &DatabaseConnection,
    display_name: &str,
) -> Result<entities::agent::Model> {
    let registered = agent::register_agent(
        db,
        user_id_for(display_name),
        display_name.to_string(),
        None,
        &test_rates(),
    )
    .await?;
    agent::approve_agent(db, registered.id).await
}

/// Registers an agent and leaves it `Pending`.
pub async fn create_pending_agent(
    db: &DatabaseConnection,
    display_name: &str,
) -> Result<entities::agent::Model> {
    agent::register_agent(
        db,
        user_id_for(display_name),
        display_name.to_string(),
        None,
        &test_rates(),
    )
    .await
}

/// Creates an `Active` agent holding a fixed referral code.
/// Use this when a test scenario depends on the exact code string.
pub async fn create_test_agent_with_code(
    db: &DatabaseConnection,
    display_name: &str,
    referral_code: &str,
) -> Result<entities::agent::Model> {
    let model = entities::agent::ActiveModel {
        user_id: Set(user_id_for(display_name)),
        display_name: Set(display_name.to_string()),
        referral_code: Set(referral_code.to_string()),
        status: Set(AgentStatus::Active),
        commission_rate: Set(test_rates().agent_rate),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Registers a partner without a referral code.
pub async fn create_test_partner(
    db: &DatabaseConnection,
    display_name: &str,
) -> Result<entities::partner::Model> {
    let (model, _) = partner::register_partner(
        db,
        user_id_for(display_name),
        display_name.to_string(),
        None,
    )
    .await?;
    Ok(model)
}

/// Creates a property under the given partner.
pub async fn create_test_property(
    db: &DatabaseConnection,
    partner_id: i64,
    name: &str,
) -> Result<entities::property::Model> {
    property::create_property(db, partner_id, name.to_string()).await
}

/// Creates a booking and confirms it, making it commission-bearing.
pub async fn create_confirmed_booking(
    db: &DatabaseConnection,
    property_id: i64,
    total_price: f64,
) -> Result<entities::booking::Model> {
    let created =
        booking::create_booking(db, property_id, "Test Guest".to_string(), total_price).await?;
    booking::confirm_booking(db, created.id).await
}

/// Sets up an active agent with one attributed partner.
/// Returns (db, agent, partner) for accrual-focused tests.
pub async fn setup_attributed_partner() -> Result<(
    DatabaseConnection,
    entities::agent::Model,
    entities::partner::Model,
)> {
    let db = setup_test_db().await?;
    let agent = create_test_agent(&db, "Attributed Agent").await?;
    let (partner, _) = partner::register_partner(
        &db,
        "host-attributed".to_string(),
        "Attributed Partner".to_string(),
        Some(&agent.referral_code),
    )
    .await?;
    Ok((db, agent, partner))
}

/// Inserts a `Paid` payout row directly, bypassing the ledger's checks.
/// Used to simulate corrupted data for invariant-detection tests.
pub async fn mark_paid_directly(
    db: &DatabaseConnection,
    agent_id: i64,
    amount: f64,
) -> Result<entities::payout::Model> {
    let model = entities::payout::ActiveModel {
        agent_id: Set(agent_id),
        amount: Set(amount),
        payment_method: Set("bank_transfer".to_string()),
        payment_details: Set("test".to_string()),
        status: Set(PayoutStatus::Paid),
        created_at: Set(chrono::Utc::now()),
        processed_at: Set(Some(chrono::Utc::now())),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}
