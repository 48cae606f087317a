//! Report generation business logic.
//!
//! Structured, framework-agnostic views over the accrual figures for the
//! agent dashboard and the admin panel, plus small formatting helpers for
//! whatever layer renders them.

use crate::{
    config::rates::CommissionRates,
    core::{
        accrual::{self, AgentAccrual},
        commission::CommissionRecord,
    },
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;

/// Default number of recent commission rows included in a report.
const DEFAULT_COMMISSION_LIMIT: usize = 10;

/// A comprehensive per-agent report.
#[derive(Debug, Clone)]
pub struct AgentReport {
    /// The agent being reported on
    pub agent: crate::entities::agent::Model,
    /// Lifetime earned/paid/pending figures
    pub accrual: AgentAccrual,
    /// Number of partners currently attributed to this agent
    pub partner_count: u64,
    /// Most recent derived commission rows, newest booking first
    pub recent_commissions: Vec<CommissionRecord>,
}

/// One row of the admin accrual overview.
///
/// Unlike [`accrual::compute_agent_accrual`], the overview keeps listing
/// agents whose ledgers violate the balance invariant; such rows carry
/// `anomaly = true` so the panel can alert instead of hiding them.
#[derive(Debug, Clone)]
pub struct AdminOverviewRow {
    /// The agent in this row
    pub agent: crate::entities::agent::Model,
    /// Lifetime commission over confirmed bookings
    pub total_earned: f64,
    /// Sum of paid payouts
    pub total_paid: f64,
    /// `total_earned - total_paid` (negative when `anomaly` is set)
    pub pending_balance: f64,
    /// True when `total_paid` exceeds `total_earned`
    pub anomaly: bool,
}

/// Generates a comprehensive report for a specific agent.
///
/// # Arguments
/// * `db` - Database connection
/// * `agent_id` - ID of the agent to report on
/// * `rates` - Injected commission rate configuration
/// * `commission_limit` - Maximum recent commission rows (default 10)
pub async fn generate_agent_report(
    db: &DatabaseConnection,
    agent_id: i64,
    rates: &CommissionRates,
    commission_limit: Option<usize>,
) -> Result<AgentReport> {
    let agent = crate::core::agent::get_agent_by_id(db, agent_id)
        .await?
        .ok_or_else(|| Error::AgentNotFound {
            id: agent_id.to_string(),
        })?;

    let accrual = accrual::compute_agent_accrual(db, agent_id, rates).await?;
    let partner_count =
        crate::core::attachment::count_active_attachments_for_agent(db, agent_id).await?;

    let limit = commission_limit.unwrap_or(DEFAULT_COMMISSION_LIMIT);
    let mut recent_commissions =
        accrual::commission_records_for_agent(db, agent_id, rates).await?;
    // Booking ids are monotonic, so this is newest-booking-first
    recent_commissions.sort_by(|a, b| b.booking_id.cmp(&a.booking_id));
    recent_commissions.truncate(limit);

    Ok(AgentReport {
        agent,
        accrual,
        partner_count,
        recent_commissions,
    })
}

/// Generates the admin accrual overview across all agents.
pub async fn generate_admin_overview(
    db: &DatabaseConnection,
    rates: &CommissionRates,
) -> Result<Vec<AdminOverviewRow>> {
    let agents = crate::core::agent::get_all_agents(db).await?;

    let mut rows = Vec::with_capacity(agents.len());
    for agent in agents {
        let (total_earned, total_paid) = accrual::accrual_figures(db, &agent, rates).await?;
        rows.push(AdminOverviewRow {
            agent,
            total_earned,
            total_paid,
            pending_balance: total_earned - total_paid,
            anomaly: total_paid - total_earned > accrual::BALANCE_EPSILON,
        });
    }

    Ok(rows)
}

/// Formats a currency amount like `"$1000.00"`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Formats a rate fraction like `"10.0%"`.
#[must_use]
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Summary line for one derived commission row.
#[must_use]
pub fn format_commission_line(record: &CommissionRecord) -> String {
    format!(
        "booking #{} | {} x {} = {}",
        record.booking_id,
        format_amount(record.booking_amount),
        format_rate(record.agent_rate),
        format_amount(record.agent_amount),
    )
}
