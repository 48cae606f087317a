//! Unified error handling for the referral engine.
//!
//! Domain outcomes that are not failures (an unknown referral code, an
//! inactive referrer) are deliberately *not* represented here; partner
//! registration must proceed without attribution in those cases, so they
//! live in [`crate::core::attachment::AttachmentOutcome`] instead.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read, parsed, or validated
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the configuration problem
        message: String,
    },

    /// Underlying store operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A monetary amount or rate was zero, negative, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending value
        amount: f64,
    },

    /// No agent matched the given identifier
    #[error("Agent not found: {id}")]
    AgentNotFound {
        /// Agent id or referral code used for the lookup
        id: String,
    },

    /// The agent exists but its status forbids the requested operation
    #[error("Agent {id} is not active (status: {status})")]
    AgentNotActive {
        /// Agent id
        id: i64,
        /// The agent's current status
        status: String,
    },

    /// No partner matched the given identifier
    #[error("Partner not found: {id}")]
    PartnerNotFound {
        /// Partner id used for the lookup
        id: String,
    },

    /// No property matched the given identifier
    #[error("Property not found: {id}")]
    PropertyNotFound {
        /// Property id used for the lookup
        id: String,
    },

    /// No booking matched the given identifier
    #[error("Booking not found: {id}")]
    BookingNotFound {
        /// Booking id used for the lookup
        id: String,
    },

    /// No payout record matched the given identifier
    #[error("Payout not found: {id}")]
    PayoutNotFound {
        /// Payout id used for the lookup
        id: String,
    },

    /// A payout request asked for more than the agent's available balance
    #[error("Requested payout of {requested:.2} exceeds available balance of {available:.2}")]
    ExceedsAvailableBalance {
        /// Amount the agent asked for
        requested: f64,
        /// Balance actually available for new requests
        available: f64,
    },

    /// A lifecycle status change violated the state machine
    #[error("Illegal status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// An operation would orphan records that reference the target
    #[error("Referential integrity violation: {message}")]
    ReferentialIntegrity {
        /// Description of the blocking references
        message: String,
    },

    /// Detected `total_paid > total_earned` for an agent.
    ///
    /// This indicates corrupted ledger data, not a user mistake. It is
    /// logged at error level where detected and must never be silently
    /// corrected.
    #[error(
        "Balance invariant violated for agent {agent_id}: \
         paid {total_paid:.2} exceeds earned {total_earned:.2}"
    )]
    BalanceInvariantViolation {
        /// Agent whose ledger is inconsistent
        agent_id: i64,
        /// Lifetime commission earned from confirmed bookings
        total_earned: f64,
        /// Lifetime paid-out total
        total_paid: f64,
    },

    /// Referral code generation kept colliding with existing codes
    #[error("Referral code generation failed after {attempts} attempts")]
    CodeGeneration {
        /// Number of generate-and-check attempts made
        attempts: u32,
    },
}

// Convenience `Result` type
/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
