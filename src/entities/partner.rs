//! Partner entity - Represents a property host on the platform.
//!
//! Partners own properties and are independently approved by an
//! administrator. A partner is relevant to the referral engine only
//! through its optional, permanent attachment to an agent.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a partner. Same four-state machine as agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PartnerStatus {
    /// Registered, awaiting administrator approval
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved; properties are live on the marketplace
    #[sea_orm(string_value = "active")]
    Active,
    /// Application declined by an administrator (terminal)
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Temporarily barred
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

impl PartnerStatus {
    /// Returns true if the lifecycle state machine permits moving from
    /// `self` to `next`.
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

impl std::fmt::Display for PartnerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partner database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    /// Unique identifier for the partner
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account id of the user behind this partner
    pub user_id: String,
    /// Human-readable name shown on dashboards
    pub display_name: String,
    /// Current lifecycle status
    pub status: PartnerStatus,
    /// When the partner registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Partner and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A partner has at most one attachment; modeled as has_many with the
    /// uniqueness enforced by the index on `attachment.partner_id`
    #[sea_orm(has_many = "super::attachment::Entity")]
    Attachments,
    /// One partner owns many properties
    #[sea_orm(has_many = "super::property::Entity")]
    Properties,
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
