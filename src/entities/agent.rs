//! Agent entity - Represents a referral agent on the platform.
//!
//! Each agent holds a globally unique, immutable referral code and a
//! commission rate applied to confirmed bookings at attached partners'
//! properties. Status is mutated only through the lifecycle state machine
//! in [`crate::core::agent`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an agent.
///
/// Legal transitions are `Pending -> Active`, `Pending -> Rejected`,
/// `Active -> Suspended`, and `Suspended -> Active`; see
/// [`AgentStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AgentStatus {
    /// Registered, awaiting administrator approval
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved; may receive attributions and request payouts
    #[sea_orm(string_value = "active")]
    Active,
    /// Application declined by an administrator (terminal)
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Temporarily barred; historical data remains queryable
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

impl AgentStatus {
    /// Returns true if the lifecycle state machine permits moving from
    /// `self` to `next`. There is no direct `Pending -> Suspended` edge.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Active)
                | (Self::Pending, Self::Rejected)
                | (Self::Active, Self::Suspended)
                | (Self::Suspended, Self::Active)
        )
    }

    /// Stable lowercase name, matching the stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Suspended => "suspended",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agent database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agents")]
pub struct Model {
    /// Unique identifier for the agent
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account id of the user behind this agent
    pub user_id: String,
    /// Human-readable name shown on dashboards
    pub display_name: String,
    /// Unique, immutable referral code shared with prospective partners
    #[sea_orm(unique)]
    pub referral_code: String,
    /// Current lifecycle status
    pub status: AgentStatus,
    /// Fraction of a confirmed booking's total price owed to this agent
    pub commission_rate: f64,
    /// When the agent registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Agent and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One agent has many partner attachments
    #[sea_orm(has_many = "super::attachment::Entity")]
    Attachments,
    /// One agent has many payout records
    #[sea_orm(has_many = "super::payout::Entity")]
    Payouts,
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl Related<super::payout::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payouts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
