//! Referral attachment business logic - the permanent agent-partner link.
//!
//! Resolution happens once, at partner-registration time. The outcome of
//! presenting a referral code is data, not an error: an unknown code or an
//! inactive referrer means the partner simply registers without
//! attribution. Only store failures surface as `Err`. Attribution is
//! first-wins and immutable; the unique index on `attachments.partner_id`
//! backs the in-code checks against concurrent registration races.

use crate::{
    entities::{Attachment, AttachmentStatus, AgentStatus, attachment},
    errors::Result,
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::{info, warn};

/// Result of presenting a referral code for a newly registered partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentOutcome {
    /// A new attribution was created
    Attached(attachment::Model),
    /// No agent holds the presented code; registration proceeds unattributed
    InvalidCode,
    /// The code's agent is not `Active` and cannot receive new attributions
    InactiveReferrer,
    /// The partner is already attributed; the first attachment wins
    AlreadyAttached(attachment::Model),
}

/// Resolves a referral code for a new partner, creating the attachment
/// when the code belongs to an active agent.
///
/// Invoking this twice for the same partner is a no-op that reports the
/// surviving first attachment. A lost insert race against a concurrent
/// registration for the same partner likewise degrades to
/// [`AttachmentOutcome::AlreadyAttached`] instead of erroring, so the
/// losing registration still succeeds without attribution.
///
/// # Errors
/// Only store failures; every domain-level miss is an `Ok` outcome.
pub async fn resolve_attachment(
    db: &DatabaseConnection,
    candidate_code: &str,
    partner_id: i64,
) -> Result<AttachmentOutcome> {
    // First attachment wins, regardless of its current status
    if let Some(existing) = get_attachment_for_partner(db, partner_id).await? {
        return Ok(AttachmentOutcome::AlreadyAttached(existing));
    }

    let Some(referrer) =
        crate::core::agent::get_agent_by_referral_code(db, candidate_code).await?
    else {
        return Ok(AttachmentOutcome::InvalidCode);
    };

    if referrer.status != AgentStatus::Active {
        return Ok(AttachmentOutcome::InactiveReferrer);
    }

    let model = attachment::ActiveModel {
        agent_id: Set(referrer.id),
        partner_id: Set(partner_id),
        status: Set(AttachmentStatus::Active),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(created) => {
            info!(
                agent_id = referrer.id,
                partner_id, "created referral attachment"
            );
            Ok(AttachmentOutcome::Attached(created))
        }
        Err(insert_err) => {
            // The unique index on partner_id rejects double attribution;
            // if a row exists now, a concurrent registration won the race.
            if let Some(existing) = get_attachment_for_partner(db, partner_id).await? {
                warn!(partner_id, "lost attachment race, keeping first attribution");
                Ok(AttachmentOutcome::AlreadyAttached(existing))
            } else {
                Err(insert_err.into())
            }
        }
    }
}

/// Finds the attachment for a partner, if any, regardless of status.
///
/// Any existing row blocks re-attribution: the agent-partner pairing is
/// immutable even after soft-invalidation.
pub async fn get_attachment_for_partner(
    db: &DatabaseConnection,
    partner_id: i64,
) -> Result<Option<attachment::Model>> {
    Attachment::find()
        .filter(attachment::Column::PartnerId.eq(partner_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an agent's active attachments, oldest first.
pub async fn get_active_attachments_for_agent(
    db: &impl ConnectionTrait,
    agent_id: i64,
) -> Result<Vec<attachment::Model>> {
    Attachment::find()
        .filter(attachment::Column::AgentId.eq(agent_id))
        .filter(attachment::Column::Status.eq(AttachmentStatus::Active))
        .order_by_asc(attachment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts an agent's active attachments.
pub async fn count_active_attachments_for_agent(
    db: &DatabaseConnection,
    agent_id: i64,
) -> Result<u64> {
    Attachment::find()
        .filter(attachment::Column::AgentId.eq(agent_id))
        .filter(attachment::Column::Status.eq(AttachmentStatus::Active))
        .count(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]
    use super::*;
    use crate::{
        errors::Error,
        test_utils::{
            create_pending_agent, create_test_agent, create_test_agent_with_code,
            create_test_partner, setup_test_db,
        },
    };

    #[tokio::test]
    async fn test_resolve_with_active_agent() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent_with_code(&db, "Ref Agent", "REF123ABC").await?;
        let partner = create_test_partner(&db, "New Partner").await?;

        let outcome = resolve_attachment(&db, "REF123ABC", partner.id).await?;

        let AttachmentOutcome::Attached(created) = outcome else {
            panic!("expected a new attachment");
        };
        assert_eq!(created.agent_id, agent.id);
        assert_eq!(created.partner_id, partner.id);
        assert_eq!(created.status, AttachmentStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() -> Result<()> {
        let db = setup_test_db().await?;
        let partner = create_test_partner(&db, "Unattributed").await?;

        let outcome = resolve_attachment(&db, "NOSUCHCODE1", partner.id).await?;
        assert_eq!(outcome, AttachmentOutcome::InvalidCode);

        // No attachment row was created
        assert!(get_attachment_for_partner(&db, partner.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_inactive_referrer() -> Result<()> {
        let db = setup_test_db().await?;

        // Pending agent: registered but not yet approved
        let pending = create_pending_agent(&db, "Pending Agent").await?;
        let partner = create_test_partner(&db, "Partner A").await?;
        let outcome = resolve_attachment(&db, &pending.referral_code, partner.id).await?;
        assert_eq!(outcome, AttachmentOutcome::InactiveReferrer);

        // Suspended agent: previously active, currently barred
        let agent = create_test_agent(&db, "Once Active").await?;
        crate::core::agent::suspend_agent(&db, agent.id).await?;
        let partner_b = create_test_partner(&db, "Partner B").await?;
        let outcome = resolve_attachment(&db, &agent.referral_code, partner_b.id).await?;
        assert_eq!(outcome, AttachmentOutcome::InactiveReferrer);

        Ok(())
    }

    #[tokio::test]
    async fn test_second_resolution_is_noop() -> Result<()> {
        let db = setup_test_db().await?;
        let first_agent = create_test_agent_with_code(&db, "First", "FIRSTCODE1").await?;
        let second_agent = create_test_agent_with_code(&db, "Second", "SECONDCODE2").await?;
        let partner = create_test_partner(&db, "Poached Partner").await?;

        let outcome = resolve_attachment(&db, "FIRSTCODE1", partner.id).await?;
        let AttachmentOutcome::Attached(original) = outcome else {
            panic!("expected attachment");
        };

        // A different agent's valid code cannot re-link the partner
        let outcome = resolve_attachment(&db, "SECONDCODE2", partner.id).await?;
        let AttachmentOutcome::AlreadyAttached(existing) = outcome else {
            panic!("expected a first-wins no-op");
        };
        assert_eq!(existing.id, original.id);
        assert_eq!(existing.agent_id, first_agent.id);
        assert_ne!(existing.agent_id, second_agent.id);

        // Still exactly one attachment for the partner
        let count = Attachment::find()
            .filter(attachment::Column::PartnerId.eq(partner.id))
            .count(&db)
            .await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_same_code_two_partners_two_attachments() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent_with_code(&db, "Busy Agent", "BUSYCODE99").await?;
        let partner_a = create_test_partner(&db, "Partner A").await?;
        let partner_b = create_test_partner(&db, "Partner B").await?;

        // Independent attachments keyed by their own partner ids never race
        let a = resolve_attachment(&db, "BUSYCODE99", partner_a.id).await?;
        let b = resolve_attachment(&db, "BUSYCODE99", partner_b.id).await?;
        assert!(matches!(a, AttachmentOutcome::Attached(_)));
        assert!(matches!(b, AttachmentOutcome::Attached(_)));

        assert_eq!(count_active_attachments_for_agent(&db, agent.id).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_direct_insert_of_duplicate_partner_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Agent").await?;
        let other = create_test_agent(&db, "Other Agent").await?;
        let partner = create_test_partner(&db, "Partner").await?;

        resolve_attachment(&db, &agent.referral_code, partner.id).await?;

        // Bypassing the resolver, the store-level unique index still holds
        let dup = attachment::ActiveModel {
            agent_id: Set(other.id),
            partner_id: Set(partner.id),
            status: Set(AttachmentStatus::Active),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        let result: std::result::Result<_, Error> =
            dup.insert(&db).await.map_err(Into::into);
        assert!(result.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_inactive_attachment_still_blocks_relink() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Agent").await?;
        let partner = create_test_partner(&db, "Partner").await?;

        let AttachmentOutcome::Attached(created) =
            resolve_attachment(&db, &agent.referral_code, partner.id).await?
        else {
            panic!("expected attachment");
        };

        // Soft-invalidate the link
        let mut active_model: attachment::ActiveModel = created.clone().into();
        active_model.status = Set(AttachmentStatus::Inactive);
        active_model.update(&db).await?;

        // The pairing stays immutable even after soft-invalidation
        let outcome = resolve_attachment(&db, &agent.referral_code, partner.id).await?;
        let AttachmentOutcome::AlreadyAttached(existing) = outcome else {
            panic!("expected no-op");
        };
        assert_eq!(existing.id, created.id);
        assert_eq!(existing.status, AttachmentStatus::Inactive);

        // Inactive links no longer count toward the agent's active set
        assert_eq!(count_active_attachments_for_agent(&db, agent.id).await?, 0);

        Ok(())
    }
}
