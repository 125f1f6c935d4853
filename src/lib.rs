//! bankcore Library
//!
//! Re-exports modules for integration testing and external use.

pub mod clock;
pub mod criteria;
pub mod executor;
pub mod jobs;
pub mod model;
pub mod operations;
pub mod repo;
pub mod services;

pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult, Precondition};
pub use executor::{ExecOutcome, Statement, TransactionExecutor};
pub use operations::{NewOperation, OperationEngine};
