//! Payout entity - A recorded payment from the platform to an agent.
//!
//! Once a payout reaches `Paid` its amount permanently counts against the
//! agent's earned total and the record becomes immutable. `Rejected`
//! payouts return their amount to the available pool.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status of a payout record.
///
/// Legal transitions: `Pending -> Processing | Paid | Rejected` and
/// `Processing -> Paid | Rejected`. `Paid` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PayoutStatus {
    /// Requested by the agent, not yet handled
    #[sea_orm(string_value = "pending")]
    Pending,
    /// An administrator has started handling the payment
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Settled; counts against the agent's earned total (terminal)
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Declined; amount returns to the available pool (terminal)
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl PayoutStatus {
    /// Returns true if the ledger permits moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Paid)
                | (Self::Pending, Self::Rejected)
                | (Self::Processing, Self::Paid)
                | (Self::Processing, Self::Rejected)
        )
    }

    /// Terminal records are immutable.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Rejected)
    }

    /// Stable lowercase name, matching the stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Paid => "paid",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payout database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payouts")]
pub struct Model {
    /// Unique identifier for the payout
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The agent being paid
    pub agent_id: i64,
    /// Amount of the payout, always positive
    pub amount: f64,
    /// How the payment is delivered (e.g. `"bank_transfer"`, `"paypal"`)
    pub payment_method: String,
    /// Free-form delivery details (account number, wallet address)
    pub payment_details: String,
    /// Current ledger status
    pub status: PayoutStatus,
    /// When the payout was requested
    pub created_at: DateTimeUtc,
    /// When the payout reached a terminal status, if it has
    pub processed_at: Option<DateTimeUtc>,
}

/// Defines relationships between Payout and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payout belongs to one agent
    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::AgentId",
        to = "super::agent::Column::Id"
    )]
    Agent,
}

impl Related<super::agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
