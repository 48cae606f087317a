//! Agent business logic - registration, lifecycle, and guarded deletion.
//!
//! Agents enter as `Pending` with a freshly issued unique referral code
//! and are moved through the lifecycle state machine exclusively by
//! administrator actions. The engine itself carries no authentication;
//! callers are responsible for gating the admin operations. Deletion is
//! refused while attachments reference the agent, so attribution history
//! can never be silently cascaded away.

use crate::{
    config::rates::CommissionRates,
    entities::{Agent, AgentStatus, Attachment, agent, attachment},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::info;

/// Registers a new agent with status `Pending` and a unique referral code.
///
/// The commission rate defaults to the configured agent rate when not
/// supplied. The issued code is immutable for the agent's lifetime.
///
/// # Errors
/// Returns an error if:
/// - `user_id` or `display_name` is empty or whitespace-only
/// - the supplied rate is not a finite fraction in `[0, 1]`
/// - code issuance or the insert fails
pub async fn register_agent(
    db: &DatabaseConnection,
    user_id: String,
    display_name: String,
    commission_rate: Option<f64>,
    rates: &CommissionRates,
) -> Result<agent::Model> {
    // Validate inputs
    if user_id.trim().is_empty() {
        return Err(Error::Config {
            message: "Agent user id cannot be empty".to_string(),
        });
    }

    if display_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Agent display name cannot be empty".to_string(),
        });
    }

    let rate = commission_rate.unwrap_or(rates.agent_rate);
    if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
        return Err(Error::InvalidAmount { amount: rate });
    }

    let referral_code = crate::core::referral_code::issue_unique_referral_code(db).await?;

    let agent = agent::ActiveModel {
        user_id: Set(user_id.trim().to_string()),
        display_name: Set(display_name.trim().to_string()),
        referral_code: Set(referral_code),
        status: Set(AgentStatus::Pending),
        commission_rate: Set(rate),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = agent.insert(db).await?;
    info!(
        agent_id = result.id,
        referral_code = %result.referral_code,
        "registered agent"
    );
    Ok(result)
}

/// Retrieves a specific agent by its unique ID.
pub async fn get_agent_by_id(
    db: &DatabaseConnection,
    agent_id: i64,
) -> Result<Option<agent::Model>> {
    Agent::find_by_id(agent_id).one(db).await.map_err(Into::into)
}

/// Finds the agent holding a referral code, case-sensitive exact match.
///
/// This is the lookup the attachment resolver depends on; no
/// normalization is applied beyond what the caller already did.
pub async fn get_agent_by_referral_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<agent::Model>> {
    Agent::find()
        .filter(agent::Column::ReferralCode.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all agents, ordered by registration (oldest first).
pub async fn get_all_agents(db: &DatabaseConnection) -> Result<Vec<agent::Model>> {
    Agent::find()
        .order_by_asc(agent::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all agents currently in the given status.
pub async fn get_agents_by_status(
    db: &DatabaseConnection,
    status: AgentStatus,
) -> Result<Vec<agent::Model>> {
    Agent::find()
        .filter(agent::Column::Status.eq(status))
        .order_by_asc(agent::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Moves an agent to a new lifecycle status (administrator action).
///
/// The transition must be legal per [`AgentStatus::can_transition_to`];
/// notably there is no direct `Pending -> Suspended` edge.
///
/// # Errors
/// Returns `Error::AgentNotFound` for unknown ids and
/// `Error::InvalidStatusTransition` for illegal edges.
pub async fn transition_agent_status(
    db: &DatabaseConnection,
    agent_id: i64,
    next: AgentStatus,
) -> Result<agent::Model> {
    let agent = get_agent_by_id(db, agent_id)
        .await?
        .ok_or_else(|| Error::AgentNotFound {
            id: agent_id.to_string(),
        })?;

    if !agent.status.can_transition_to(next) {
        return Err(Error::InvalidStatusTransition {
            from: agent.status.to_string(),
            to: next.to_string(),
        });
    }

    let previous = agent.status;
    let mut active_model: agent::ActiveModel = agent.into();
    active_model.status = Set(next);
    let updated = active_model.update(db).await?;

    info!(agent_id, from = %previous, to = %next, "agent status transition");
    Ok(updated)
}

/// Approves a pending agent (`Pending -> Active`).
pub async fn approve_agent(db: &DatabaseConnection, agent_id: i64) -> Result<agent::Model> {
    transition_agent_status(db, agent_id, AgentStatus::Active).await
}

/// Rejects a pending agent (`Pending -> Rejected`).
pub async fn reject_agent(db: &DatabaseConnection, agent_id: i64) -> Result<agent::Model> {
    transition_agent_status(db, agent_id, AgentStatus::Rejected).await
}

/// Suspends an active agent (`Active -> Suspended`).
pub async fn suspend_agent(db: &DatabaseConnection, agent_id: i64) -> Result<agent::Model> {
    transition_agent_status(db, agent_id, AgentStatus::Suspended).await
}

/// Reinstates a suspended agent (`Suspended -> Active`).
pub async fn reactivate_agent(db: &DatabaseConnection, agent_id: i64) -> Result<agent::Model> {
    transition_agent_status(db, agent_id, AgentStatus::Active).await
}

/// Deletes an agent, permitted only when nothing references it.
///
/// An agent with attachments must be soft-invalidated via status instead;
/// hard deletion would orphan the attribution history behind its
/// commissions.
///
/// # Errors
/// Returns `Error::ReferentialIntegrity` when attachments still reference
/// the agent; the caller must surface this as a blocking error.
pub async fn delete_agent(db: &DatabaseConnection, agent_id: i64) -> Result<()> {
    let agent = get_agent_by_id(db, agent_id)
        .await?
        .ok_or_else(|| Error::AgentNotFound {
            id: agent_id.to_string(),
        })?;

    let attachment_count = Attachment::find()
        .filter(attachment::Column::AgentId.eq(agent_id))
        .count(db)
        .await?;

    if attachment_count > 0 {
        return Err(Error::ReferentialIntegrity {
            message: format!(
                "agent {agent_id} still has {attachment_count} attachment(s); \
                 suspend the agent instead of deleting it"
            ),
        });
    }

    agent.delete(db).await?;
    info!(agent_id, "deleted agent");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{
        create_pending_agent, create_test_agent, create_test_partner, setup_test_db, test_rates,
    };

    #[tokio::test]
    async fn test_register_agent_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let rates = test_rates();

        let result =
            register_agent(&db, String::new(), "Name".to_string(), None, &rates).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        let result =
            register_agent(&db, "user1".to_string(), "   ".to_string(), None, &rates).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        let result = register_agent(
            &db,
            "user1".to_string(),
            "Name".to_string(),
            Some(1.5),
            &rates,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { amount: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_agent_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        let agent = register_agent(
            &db,
            "user-reg".to_string(),
            "Fresh Agent".to_string(),
            None,
            &test_rates(),
        )
        .await?;

        assert_eq!(agent.status, AgentStatus::Pending);
        assert_eq!(agent.commission_rate, 0.10);
        assert!(!agent.referral_code.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_registered_codes_are_unique() -> Result<()> {
        let db = setup_test_db().await?;
        let rates = test_rates();

        let mut codes = std::collections::HashSet::new();
        for i in 0..5 {
            let agent = register_agent(
                &db,
                format!("user-{i}"),
                format!("Agent {i}"),
                None,
                &rates,
            )
            .await?;
            assert!(codes.insert(agent.referral_code));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_get_agent_by_referral_code_case_sensitive() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Case Agent").await?;

        let found = get_agent_by_referral_code(&db, &agent.referral_code).await?;
        assert_eq!(found.unwrap().id, agent.id);

        // Exact match only: the lowercased code is a different string
        let lowered = agent.referral_code.to_lowercase();
        assert_ne!(lowered, agent.referral_code);
        let not_found = get_agent_by_referral_code(&db, &lowered).await?;
        assert!(not_found.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_lifecycle_allowed_transitions() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_pending_agent(&db, "Lifecycle Agent").await?;

        let agent = approve_agent(&db, agent.id).await?;
        assert_eq!(agent.status, AgentStatus::Active);

        let agent = suspend_agent(&db, agent.id).await?;
        assert_eq!(agent.status, AgentStatus::Suspended);

        let agent = reactivate_agent(&db, agent.id).await?;
        assert_eq!(agent.status, AgentStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn test_lifecycle_rejects_pending_to_suspended() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_pending_agent(&db, "No Shortcut").await?;

        let result = suspend_agent(&db, agent.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidStatusTransition { from: _, to: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_lifecycle_rejected_is_terminal() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_pending_agent(&db, "Declined").await?;

        reject_agent(&db, agent.id).await?;
        let result = approve_agent(&db, agent.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidStatusTransition { from: _, to: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_transition_unknown_agent() -> Result<()> {
        let db = setup_test_db().await?;

        let result = approve_agent(&db, 999).await;
        assert!(matches!(result.unwrap_err(), Error::AgentNotFound { id: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_agent_without_attachments() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Deletable").await?;

        delete_agent(&db, agent.id).await?;
        assert!(get_agent_by_id(&db, agent.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_agent_with_attachments_refused() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Referrer").await?;
        let partner = create_test_partner(&db, "Referred Partner").await?;

        let outcome = crate::core::attachment::resolve_attachment(
            &db,
            &agent.referral_code,
            partner.id,
        )
        .await?;
        assert!(matches!(
            outcome,
            crate::core::attachment::AttachmentOutcome::Attached(_)
        ));

        let result = delete_agent(&db, agent.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ReferentialIntegrity { message: _ }
        ));

        // The agent must still exist after the refused deletion
        assert!(get_agent_by_id(&db, agent.id).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_agents_by_status() -> Result<()> {
        let db = setup_test_db().await?;
        let active = create_test_agent(&db, "Active One").await?;
        let pending = create_pending_agent(&db, "Pending One").await?;

        let actives = get_agents_by_status(&db, AgentStatus::Active).await?;
        assert_eq!(actives.len(), 1);
        assert_eq!(actives[0].id, active.id);

        let pendings = get_agents_by_status(&db, AgentStatus::Pending).await?;
        assert_eq!(pendings.len(), 1);
        assert_eq!(pendings[0].id, pending.id);

        Ok(())
    }
}
