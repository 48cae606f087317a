//! One-shot operational entry point: prints the admin accrual overview.
//!
//! All aggregation is computed on demand at query time; this binary just
//! bootstraps configuration and the store, then renders the overview the
//! admin panel would show.

use dotenvy::dotenv;
use referral_engine::{
    config,
    core::report,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load commission rate configuration
    let rates = config::rates::load_or_default()
        .inspect_err(|e| error!("Failed to load commission configuration: {}", e))?;
    info!(
        agent_rate = rates.agent_rate,
        platform_rate = rates.platform_rate,
        "Loaded commission configuration."
    );

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;

    config::database::create_tables(&db)
        .await
        .inspect(|()| info!("Database schema ensured."))
        .inspect_err(|e| error!("Failed to ensure database schema: {}", e))?;

    // 5. Render the admin accrual overview
    let rows = report::generate_admin_overview(&db, &rates).await?;
    if rows.is_empty() {
        println!("No agents registered.");
        return Ok(());
    }

    println!("agent | status | earned | paid | pending");
    for row in &rows {
        let flag = if row.anomaly { "  [ANOMALY: paid > earned]" } else { "" };
        println!(
            "{} ({}) | {} | {} | {} | {}{}",
            row.agent.display_name,
            row.agent.referral_code,
            row.agent.status,
            report::format_amount(row.total_earned),
            report::format_amount(row.total_paid),
            report::format_amount(row.pending_balance),
            flag,
        );
    }

    Ok(())
}
