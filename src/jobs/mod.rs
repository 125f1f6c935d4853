//! Scheduled ledger jobs
//!
//! Periodic tasks that drive loans, bills and penalties through their
//! time-based lifecycle. Each job is a pure function of current time
//! plus storage state; the scheduler here drives them on tokio timers,
//! but any external scheduler invoking `run` once per tick conforms.

mod hanging_bills;
mod loan_bills;
mod loan_status;

pub use hanging_bills::HangingBillsRemoval;
pub use loan_bills::MonthlyBillAssignment;
pub use loan_status::LoanStatusCheck;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use tokio::time::interval;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::AppError;

/// Job execution errors. A job aborts its tick on the first storage
/// failure rather than partially applying and silently continuing.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Job failed: {0}")]
    App(#[from] AppError),
}

impl From<sqlx::Error> for JobError {
    fn from(e: sqlx::Error) -> Self {
        JobError::App(AppError::Storage(e))
    }
}

/// What one job tick did
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job: &'static str,
    pub run_id: Uuid,
    pub bills_created: u64,
    pub penalties_created: u64,
    pub loans_closed: u64,
    pub loans_marked_overdue: u64,
    pub bills_deleted: u64,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobReport {
    pub fn new(job: &'static str) -> Self {
        Self {
            job,
            run_id: Uuid::new_v4(),
            bills_created: 0,
            penalties_created: 0,
            loans_closed: 0,
            loans_marked_overdue: 0,
            bills_deleted: 0,
            completed_at: None,
        }
    }

    pub fn finish(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }
}

/// Cron-style registration record for an external scheduler
#[derive(Debug, Clone, Copy)]
pub struct JobDefinition {
    pub id: &'static str,
    pub schedule: &'static str,
}

/// The jobs this crate ships, with their cron cadences
pub const JOB_DEFINITIONS: [JobDefinition; 3] = [
    JobDefinition {
        id: MonthlyBillAssignment::ID,
        schedule: MonthlyBillAssignment::SCHEDULE,
    },
    JobDefinition {
        id: LoanStatusCheck::ID,
        schedule: LoanStatusCheck::SCHEDULE,
    },
    JobDefinition {
        id: HangingBillsRemoval::ID,
        schedule: HangingBillsRemoval::SCHEDULE,
    },
];

/// Configuration for the built-in scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// How often the month-boundary check runs (default: daily);
    /// the monthly job itself only fires on the 1st
    pub monthly_check_interval: Duration,
    /// Interval for the loan status check (default: daily)
    pub status_check_interval: Duration,
    /// Interval for hanging bill cleanup (default: 8 hours)
    pub hanging_bills_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            monthly_check_interval: Duration::from_secs(24 * 3600),
            status_check_interval: Duration::from_secs(24 * 3600),
            hanging_bills_interval: Duration::from_secs(8 * 3600),
        }
    }
}

/// Drives the three ledger jobs on independent periodic timers. Jobs
/// never run concurrently with themselves: each timer awaits its job
/// before the next tick is taken.
pub struct Scheduler {
    bill_assignment: MonthlyBillAssignment,
    status_check: LoanStatusCheck,
    hanging_bills: HangingBillsRemoval,
    config: SchedulerConfig,
    clock: Arc<dyn Clock>,
}

impl Scheduler {
    pub fn new(
        bill_assignment: MonthlyBillAssignment,
        status_check: LoanStatusCheck,
        hanging_bills: HangingBillsRemoval,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bill_assignment,
            status_check,
            hanging_bills,
            config: SchedulerConfig::default(),
            clock,
        }
    }

    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Start the scheduler in the background. Abort the handle to stop.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        tracing::info!("ledger job scheduler started");

        let mut monthly = interval(self.config.monthly_check_interval);
        let mut status = interval(self.config.status_check_interval);
        let mut hanging = interval(self.config.hanging_bills_interval);

        // An interval yields immediately on creation; consuming that
        // tick keeps a process restart on the 1st from re-firing the
        // monthly job straight away. The status and cleanup jobs are
        // idempotent, so their immediate first run is fine.
        monthly.tick().await;

        loop {
            tokio::select! {
                _ = monthly.tick() => {
                    if self.clock.today().day() == 1 {
                        log_outcome(self.bill_assignment.run().await);
                    }
                }
                _ = status.tick() => {
                    log_outcome(self.status_check.run().await);
                }
                _ = hanging.tick() => {
                    log_outcome(self.hanging_bills.run().await);
                }
            }
        }
    }

    /// Run every job once regardless of schedule, for manual triggering
    /// and tests. Failures are collected, not propagated.
    pub async fn run_all_once(&self) -> MaintenanceReport {
        let mut report = MaintenanceReport::default();

        match self.bill_assignment.run().await {
            Ok(r) => report.runs.push(r),
            Err(e) => report.errors.push(format!("{}: {e}", MonthlyBillAssignment::ID)),
        }
        match self.status_check.run().await {
            Ok(r) => report.runs.push(r),
            Err(e) => report.errors.push(format!("{}: {e}", LoanStatusCheck::ID)),
        }
        match self.hanging_bills.run().await {
            Ok(r) => report.runs.push(r),
            Err(e) => report.errors.push(format!("{}: {e}", HangingBillsRemoval::ID)),
        }

        report.completed_at = Some(self.clock.now());
        report
    }
}

fn log_outcome(outcome: Result<JobReport, JobError>) {
    match outcome {
        Ok(report) => tracing::info!(
            job = report.job,
            run_id = %report.run_id,
            bills_created = report.bills_created,
            penalties_created = report.penalties_created,
            loans_closed = report.loans_closed,
            loans_marked_overdue = report.loans_marked_overdue,
            bills_deleted = report.bills_deleted,
            "job tick completed"
        ),
        Err(e) => tracing::error!(error = %e, "job tick aborted"),
    }
}

/// Report from a manual run of all jobs
#[derive(Debug, Clone, Default)]
pub struct MaintenanceReport {
    pub runs: Vec<JobReport>,
    pub errors: Vec<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_definitions_cover_all_jobs() {
        let ids: Vec<_> = JOB_DEFINITIONS.iter().map(|d| d.id).collect();
        assert_eq!(
            ids,
            vec![
                "monthly-bill-assignment",
                "loan-status-check",
                "hanging-bills-removal"
            ]
        );
        assert!(JOB_DEFINITIONS.iter().all(|d| !d.schedule.is_empty()));
    }

    #[test]
    fn test_scheduler_config_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.hanging_bills_interval, Duration::from_secs(8 * 3600));
        assert_eq!(config.status_check_interval, Duration::from_secs(24 * 3600));
    }

    #[test]
    fn test_job_report_finish_stamps_completion() {
        let report = JobReport::new("loan-status-check").finish(Utc::now());
        assert!(report.completed_at.is_some());
        assert_eq!(report.job, "loan-status-check");
    }
}
