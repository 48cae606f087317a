//! Payout ledger business logic.
//!
//! Requests are checked and created inside a single store transaction so
//! two concurrent requests cannot both pass the balance check and jointly
//! overdraw - the read-then-write race flagged in the original design is
//! closed here, not replicated. Outstanding (pending/processing) requests
//! reserve their amount against new requests; only `Paid` records reduce
//! the displayed balance. Terminal records are immutable.

use crate::{
    config::rates::CommissionRates,
    core::accrual::{self, BALANCE_EPSILON},
    entities::{Agent, AgentStatus, Payout, PayoutStatus, payout},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{error, info};

/// Creates a payout request for an agent, status `Pending`.
///
/// Preconditions, all checked inside one transaction with the insert:
/// - the amount is finite and positive
/// - the agent exists and is `Active` (suspended agents keep their
///   history queryable but cannot open new requests)
/// - the amount does not exceed the agent's available balance, i.e. the
///   pending balance minus amounts already reserved by outstanding
///   requests
///
/// # Errors
/// `Error::ExceedsAvailableBalance` rejections create no record.
pub async fn request_payout(
    db: &DatabaseConnection,
    agent_id: i64,
    amount: f64,
    payment_method: String,
    payment_details: String,
    rates: &CommissionRates,
) -> Result<payout::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    // Check and create atomically; see module docs
    let txn = db.begin().await?;

    let agent = Agent::find_by_id(agent_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::AgentNotFound {
            id: agent_id.to_string(),
        })?;

    if agent.status != AgentStatus::Active {
        return Err(Error::AgentNotActive {
            id: agent_id,
            status: agent.status.to_string(),
        });
    }

    let accrual = accrual::compute_agent_accrual(&txn, agent_id, rates).await?;
    let reserved = outstanding_total(&txn, agent_id).await?;
    let available = accrual.pending_balance - reserved;

    if amount - available > BALANCE_EPSILON {
        return Err(Error::ExceedsAvailableBalance {
            requested: amount,
            available: available.max(0.0),
        });
    }

    let record = payout::ActiveModel {
        agent_id: Set(agent_id),
        amount: Set(amount),
        payment_method: Set(payment_method),
        payment_details: Set(payment_details),
        status: Set(PayoutStatus::Pending),
        created_at: Set(chrono::Utc::now()),
        processed_at: Set(None),
        ..Default::default()
    };
    let record = record.insert(&txn).await?;

    txn.commit().await?;

    info!(agent_id, payout_id = record.id, amount, "payout requested");
    Ok(record)
}

/// Sum of an agent's outstanding (`Pending` or `Processing`) payout
/// amounts - funds reserved but not yet settled.
pub async fn outstanding_total<C: ConnectionTrait>(db: &C, agent_id: i64) -> Result<f64> {
    let outstanding = Payout::find()
        .filter(payout::Column::AgentId.eq(agent_id))
        .filter(payout::Column::Status.is_in([PayoutStatus::Pending, PayoutStatus::Processing]))
        .all(db)
        .await?;

    Ok(outstanding.iter().map(|p| p.amount).sum())
}

/// Marks a payout as being handled (`Pending -> Processing`).
pub async fn mark_processing(db: &DatabaseConnection, payout_id: i64) -> Result<payout::Model> {
    let txn = db.begin().await?;
    let updated = transition_payout(&txn, payout_id, PayoutStatus::Processing).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Settles a payout (`Pending | Processing -> Paid`), stamping
/// `processed_at`. From this point the amount permanently counts against
/// the agent's earned total and the record is immutable.
///
/// The global invariant `paid <= earned` is re-verified inside the
/// transaction before committing; a payout whose settlement would break
/// it is refused with `Error::BalanceInvariantViolation` (and logged),
/// since that can only mean the ledger drifted after the request passed
/// its original check.
pub async fn mark_paid(
    db: &DatabaseConnection,
    payout_id: i64,
    rates: &CommissionRates,
) -> Result<payout::Model> {
    let txn = db.begin().await?;

    let record = Payout::find_by_id(payout_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::PayoutNotFound {
            id: payout_id.to_string(),
        })?;

    if !record.status.can_transition_to(PayoutStatus::Paid) {
        return Err(Error::InvalidStatusTransition {
            from: record.status.to_string(),
            to: PayoutStatus::Paid.to_string(),
        });
    }

    let accrual = accrual::compute_agent_accrual(&txn, record.agent_id, rates).await?;
    if record.amount - accrual.pending_balance > BALANCE_EPSILON {
        error!(
            agent_id = record.agent_id,
            payout_id,
            amount = record.amount,
            pending_balance = accrual.pending_balance,
            "refusing settlement: paying this payout would exceed earned total"
        );
        return Err(Error::BalanceInvariantViolation {
            agent_id: record.agent_id,
            total_earned: accrual.total_earned,
            total_paid: accrual.total_paid + record.amount,
        });
    }

    let mut active_model: payout::ActiveModel = record.into();
    active_model.status = Set(PayoutStatus::Paid);
    active_model.processed_at = Set(Some(chrono::Utc::now()));
    let updated = active_model.update(&txn).await?;

    txn.commit().await?;

    info!(payout_id, amount = updated.amount, "payout settled");
    Ok(updated)
}

/// Declines a payout (`Pending | Processing -> Rejected`), stamping
/// `processed_at`. The amount returns to the agent's available pool.
pub async fn mark_rejected(db: &DatabaseConnection, payout_id: i64) -> Result<payout::Model> {
    let txn = db.begin().await?;
    let updated = transition_payout(&txn, payout_id, PayoutStatus::Rejected).await?;
    txn.commit().await?;

    info!(payout_id, amount = updated.amount, "payout rejected");
    Ok(updated)
}

/// Applies a validated ledger transition, stamping `processed_at` when
/// the target status is terminal.
async fn transition_payout<C: ConnectionTrait>(
    db: &C,
    payout_id: i64,
    next: PayoutStatus,
) -> Result<payout::Model> {
    let record = Payout::find_by_id(payout_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::PayoutNotFound {
            id: payout_id.to_string(),
        })?;

    if !record.status.can_transition_to(next) {
        return Err(Error::InvalidStatusTransition {
            from: record.status.to_string(),
            to: next.to_string(),
        });
    }

    let mut active_model: payout::ActiveModel = record.into();
    active_model.status = Set(next);
    if next.is_terminal() {
        active_model.processed_at = Set(Some(chrono::Utc::now()));
    }
    active_model.update(db).await.map_err(Into::into)
}

/// Retrieves an agent's payout history, newest first.
pub async fn get_payouts_for_agent(
    db: &DatabaseConnection,
    agent_id: i64,
) -> Result<Vec<payout::Model>> {
    Payout::find()
        .filter(payout::Column::AgentId.eq(agent_id))
        .order_by_desc(payout::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific payout by its unique ID.
pub async fn get_payout_by_id(
    db: &DatabaseConnection,
    payout_id: i64,
) -> Result<Option<payout::Model>> {
    Payout::find_by_id(payout_id)
        .one(db)
        .await
        .map_err(Into::into)
}
