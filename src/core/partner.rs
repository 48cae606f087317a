//! Partner business logic - registration with best-effort referral
//! resolution, lookups, and the admin lifecycle.
//!
//! A referral code is always optional at registration. Whatever happens
//! during attachment resolution - unknown code, inactive referrer, even a
//! store failure - the partner row is already committed and registration
//! succeeds; the outcome is reported alongside so operators can see why an
//! attribution did or did not happen.

use crate::{
    core::attachment::AttachmentOutcome,
    entities::{Partner, PartnerStatus, attachment, partner},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, warn};

/// What happened to the referral side of a partner registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferralOutcome {
    /// An attribution was created for the presented code
    Attached(attachment::Model),
    /// No code was presented
    NoCode,
    /// The presented code matched no agent
    InvalidCode,
    /// The code's agent is not active
    InactiveReferrer,
    /// The partner was already attributed (first attachment wins)
    AlreadyAttached(attachment::Model),
    /// Resolution hit a store failure; registration succeeded anyway
    Failed {
        /// Description of the failure, for the operator
        message: String,
    },
}

impl From<AttachmentOutcome> for ReferralOutcome {
    fn from(outcome: AttachmentOutcome) -> Self {
        match outcome {
            AttachmentOutcome::Attached(model) => Self::Attached(model),
            AttachmentOutcome::InvalidCode => Self::InvalidCode,
            AttachmentOutcome::InactiveReferrer => Self::InactiveReferrer,
            AttachmentOutcome::AlreadyAttached(model) => Self::AlreadyAttached(model),
        }
    }
}

/// Registers a new partner, resolving an optional referral code.
///
/// The partner is created with status `Pending` first; the attachment is
/// then resolved best-effort. Attachment failure is surfaced in the
/// returned [`ReferralOutcome`], never as an `Err` - referral attribution
/// must not block partner onboarding.
pub async fn register_partner(
    db: &DatabaseConnection,
    user_id: String,
    display_name: String,
    referral_code: Option<&str>,
) -> Result<(partner::Model, ReferralOutcome)> {
    if user_id.trim().is_empty() {
        return Err(Error::Config {
            message: "Partner user id cannot be empty".to_string(),
        });
    }

    if display_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Partner display name cannot be empty".to_string(),
        });
    }

    let partner = partner::ActiveModel {
        user_id: Set(user_id.trim().to_string()),
        display_name: Set(display_name.trim().to_string()),
        status: Set(PartnerStatus::Pending),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let partner = partner.insert(db).await?;
    info!(partner_id = partner.id, "registered partner");

    let code = referral_code.map(str::trim).filter(|c| !c.is_empty());
    let outcome = match code {
        None => ReferralOutcome::NoCode,
        Some(code) => {
            match crate::core::attachment::resolve_attachment(db, code, partner.id).await {
                Ok(outcome) => outcome.into(),
                Err(err) => {
                    warn!(
                        partner_id = partner.id,
                        error = %err,
                        "referral attachment failed; partner registered without attribution"
                    );
                    ReferralOutcome::Failed {
                        message: err.to_string(),
                    }
                }
            }
        }
    };

    Ok((partner, outcome))
}

/// Retrieves a specific partner by its unique ID.
pub async fn get_partner_by_id(
    db: &DatabaseConnection,
    partner_id: i64,
) -> Result<Option<partner::Model>> {
    Partner::find_by_id(partner_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all partners, ordered by registration (oldest first).
pub async fn get_all_partners(db: &DatabaseConnection) -> Result<Vec<partner::Model>> {
    Partner::find()
        .order_by_asc(partner::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Moves a partner to a new lifecycle status (administrator action).
///
/// Partners share the agents' four-state machine, including the absence
/// of a direct `Pending -> Suspended` edge.
pub async fn transition_partner_status(
    db: &DatabaseConnection,
    partner_id: i64,
    next: PartnerStatus,
) -> Result<partner::Model> {
    let partner = get_partner_by_id(db, partner_id)
        .await?
        .ok_or_else(|| Error::PartnerNotFound {
            id: partner_id.to_string(),
        })?;

    if !partner.status.can_transition_to(next) {
        return Err(Error::InvalidStatusTransition {
            from: partner.status.to_string(),
            to: next.to_string(),
        });
    }

    let previous = partner.status;
    let mut active_model: partner::ActiveModel = partner.into();
    active_model.status = Set(next);
    let updated = active_model.update(db).await?;

    info!(partner_id, from = %previous, to = %next, "partner status transition");
    Ok(updated)
}

/// Approves a pending partner (`Pending -> Active`).
pub async fn approve_partner(db: &DatabaseConnection, partner_id: i64) -> Result<partner::Model> {
    transition_partner_status(db, partner_id, PartnerStatus::Active).await
}
