//! Accrual aggregation business logic.
//!
//! An agent's lifetime figures are recomputed on demand by walking the
//! attribution chain: active attachments -> partners -> properties ->
//! confirmed bookings, applying the commission calculator per booking, and
//! subtracting paid payouts. Nothing is incrementally maintained, so the
//! stored bookings stay the single source of truth and recomputation is
//! idempotent. Correctness is deliberately prioritized over query count.

use crate::{
    config::rates::CommissionRates,
    core::commission::{self, CommissionRecord},
    entities::{Agent, Booking, BookingStatus, Payout, PayoutStatus, Property,
        agent, booking, payout, property},
    errors::{Error, Result},
};
use sea_orm::prelude::*;
use std::collections::HashMap;
use tracing::error;

/// Tolerance for comparing sums of rounded currency amounts.
pub(crate) const BALANCE_EPSILON: f64 = 1e-6;

/// An agent's aggregated lifetime figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentAccrual {
    /// Lifetime commission over confirmed bookings of attached partners
    pub total_earned: f64,
    /// Sum of payouts that reached `Paid`
    pub total_paid: f64,
    /// `total_earned - total_paid`; what the agent could still be paid
    pub pending_balance: f64,
}

/// Recomputes an agent's lifetime accrual from first principles.
///
/// Every step tolerates emptiness: an agent with no attachments, partners
/// without properties, or properties without confirmed bookings all yield
/// zero earned, not an error.
///
/// # Errors
/// Returns `Error::AgentNotFound` for unknown agents and
/// `Error::BalanceInvariantViolation` (also logged at error level) when
/// the paid total exceeds the earned total - corrupted ledger data that
/// must never be silently clamped away.
pub async fn compute_agent_accrual<C: ConnectionTrait>(
    db: &C,
    agent_id: i64,
    rates: &CommissionRates,
) -> Result<AgentAccrual> {
    let agent = Agent::find_by_id(agent_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::AgentNotFound {
            id: agent_id.to_string(),
        })?;

    let (total_earned, total_paid) = accrual_figures(db, &agent, rates).await?;

    if total_paid - total_earned > BALANCE_EPSILON {
        error!(
            agent_id,
            total_earned, total_paid, "balance invariant violated: paid exceeds earned"
        );
        return Err(Error::BalanceInvariantViolation {
            agent_id,
            total_earned,
            total_paid,
        });
    }

    Ok(AgentAccrual {
        total_earned,
        total_paid,
        pending_balance: total_earned - total_paid,
    })
}

/// Raw `(earned, paid)` figures without the invariant gate.
///
/// The admin overview uses this to keep reporting on agents whose ledgers
/// are inconsistent instead of erroring out of the whole listing.
pub(crate) async fn accrual_figures<C: ConnectionTrait>(
    db: &C,
    agent: &agent::Model,
    rates: &CommissionRates,
) -> Result<(f64, f64)> {
    let total_earned = records_for_agent(db, agent, rates)
        .await?
        .iter()
        .map(|record| record.agent_amount)
        .sum();

    let paid_payouts = Payout::find()
        .filter(payout::Column::AgentId.eq(agent.id))
        .filter(payout::Column::Status.eq(PayoutStatus::Paid))
        .all(db)
        .await?;
    let total_paid = paid_payouts.iter().map(|p| p.amount).sum();

    Ok((total_earned, total_paid))
}

/// Materializes the derived commission ledger backing `total_earned`.
///
/// One record per confirmed booking at the agent's attached partners'
/// properties, using the agent's stored rate for the agent side and the
/// configured rate for the platform side.
pub async fn commission_records_for_agent<C: ConnectionTrait>(
    db: &C,
    agent_id: i64,
    rates: &CommissionRates,
) -> Result<Vec<CommissionRecord>> {
    let agent = Agent::find_by_id(agent_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::AgentNotFound {
            id: agent_id.to_string(),
        })?;

    records_for_agent(db, &agent, rates).await
}

async fn records_for_agent<C: ConnectionTrait>(
    db: &C,
    agent: &agent::Model,
    rates: &CommissionRates,
) -> Result<Vec<CommissionRecord>> {
    // Step 1: active attachments -> attributed partner ids
    let attachments =
        crate::core::attachment::get_active_attachments_for_agent(db, agent.id).await?;
    if attachments.is_empty() {
        return Ok(Vec::new());
    }
    let partner_ids: Vec<i64> = attachments.iter().map(|a| a.partner_id).collect();

    // Step 2: partner ids -> owned properties
    let properties = Property::find()
        .filter(property::Column::PartnerId.is_in(partner_ids))
        .all(db)
        .await?;
    if properties.is_empty() {
        return Ok(Vec::new());
    }
    let properties_by_id: HashMap<i64, &property::Model> =
        properties.iter().map(|p| (p.id, p)).collect();

    // Step 3: property ids -> confirmed bookings only
    let property_ids: Vec<i64> = properties.iter().map(|p| p.id).collect();
    let bookings = Booking::find()
        .filter(booking::Column::PropertyId.is_in(property_ids))
        .filter(booking::Column::Status.eq(BookingStatus::Confirmed))
        .all(db)
        .await?;

    // Step 4: one derived record per booking, per-agent rate applied
    let effective_rates = rates.with_agent_rate(agent.commission_rate);
    let records = bookings
        .iter()
        .filter_map(|booking| {
            properties_by_id
                .get(&booking.property_id)
                .map(|property| {
                    commission::commission_record(booking, property, agent.id, &effective_rates)
                })
        })
        .collect();

    Ok(records)
}
