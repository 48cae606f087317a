//! Attachment entity - The permanent agent-partner referral link.
//!
//! Created exactly once, at partner-registration time, when a valid
//! referral code of an active agent was supplied. The unique index on
//! `partner_id` guarantees at most one attachment per partner, ever;
//! the pairing is never reassigned.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status of an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AttachmentStatus {
    /// The link counts toward commission accrual
    #[sea_orm(string_value = "active")]
    Active,
    /// Soft-invalidated link; preserved for history, excluded from accrual
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// Attachment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    /// Unique identifier for the attachment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The referring agent
    pub agent_id: i64,
    /// The referred partner; unique so a partner is attributed at most once
    #[sea_orm(unique)]
    pub partner_id: i64,
    /// Whether the link currently counts toward accrual
    pub status: AttachmentStatus,
    /// When the attribution was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Attachment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each attachment references the referring agent
    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::AgentId",
        to = "super::agent::Column::Id"
    )]
    Agent,
    /// Each attachment references the referred partner
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id"
    )]
    Partner,
}

impl Related<super::agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agent.def()
    }
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
