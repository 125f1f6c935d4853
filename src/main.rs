//! bankcore - Banking Back-Office Core
//!
//! Long-running process that verifies the schema, wires up the
//! repositories and services, and drives the periodic ledger jobs
//! (loan bill assignment, loan status checks, stale bill cleanup).

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bankcore::clock::{Clock, SystemClock};
use bankcore::jobs::{HangingBillsRemoval, LoanStatusCheck, MonthlyBillAssignment, Scheduler};
use bankcore::repo::{BillRepository, LoanRepository, PenaltyRepository};
use bankcore::{db, Config, TransactionExecutor};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bankcore=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;

    tracing::info!("Starting bankcore");
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    db::verify_connection(&pool).await?;
    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }
    if !db::check_house_account(&pool, config.house_account_id).await? {
        return Err(anyhow::anyhow!("House account missing"));
    }

    tracing::info!("Database connected successfully");

    let executor = TransactionExecutor::new(pool.clone());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let loans = LoanRepository::new(executor.clone());
    let bills = BillRepository::new(executor.clone());
    let penalties = PenaltyRepository::new(executor.clone());

    let scheduler = Scheduler::new(
        MonthlyBillAssignment::new(
            loans.clone(),
            bills.clone(),
            penalties,
            &config,
            Arc::clone(&clock),
        ),
        LoanStatusCheck::new(loans, bills.clone(), Arc::clone(&clock)),
        HangingBillsRemoval::new(bills, &config, Arc::clone(&clock)),
        Arc::clone(&clock),
    );

    let handle = scheduler.start();

    shutdown_signal().await;

    handle.abort();
    tracing::info!("Scheduler stopped, shutting down...");
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
