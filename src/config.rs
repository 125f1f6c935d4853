//! Configuration module
//!
//! Loads configuration from environment variables. Every banking
//! parameter is resolved once at startup; a missing or malformed key is
//! a startup-fatal `ConfigError`, never a runtime error.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Id of the bank's own operating account. Commissions and loan
    /// disbursement counter-entries flow through it.
    pub house_account_id: i32,

    /// Penalty rate applied to a loan's starting value for every
    /// month of overdue after the first (fraction, e.g. 0.05)
    pub loan_overdue_penalty_rate: Decimal,

    /// Commission charged on transfers, in percent of the value
    pub transfer_commission_percent: Decimal,

    /// Minimum loan duration in months
    pub loans_min_time_months: u32,

    /// Maximum loan duration in months
    pub loans_max_time_months: u32,

    /// Yearly interest rate bounds for new loans, in percent
    pub loans_min_interest: Decimal,
    pub loans_max_interest: Decimal,

    /// Minimum value of a new loan
    pub loans_min_value: Decimal,

    /// Maximum number of non-closed loans per user
    pub loans_max_active: u32,

    /// Maximum pending (not yet approved) accounts one user may hold
    pub account_requests_max: u32,

    /// Maximum pending requested bills one bearer may accumulate
    pub bill_requests_max: u32,

    /// Months a pending bill without a due date may hang before the
    /// cleanup job deletes it
    pub bill_hanging_months_limit: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", "10")?,
            house_account_id: required("HOUSE_ACCOUNT_ID")?,
            loan_overdue_penalty_rate: required("LOAN_OVERDUE_PENALTY_RATE")?,
            transfer_commission_percent: required("TRANSFER_COMMISSION_PERCENT")?,
            loans_min_time_months: parse_or("LOANS_MIN_TIME_MONTHS", "6")?,
            loans_max_time_months: parse_or("LOANS_MAX_TIME_MONTHS", "120")?,
            loans_min_interest: parse_or("LOANS_MIN_INTEREST", "1")?,
            loans_max_interest: parse_or("LOANS_MAX_INTEREST", "30")?,
            loans_min_value: parse_or("LOANS_MIN_VALUE", "100")?,
            loans_max_active: parse_or("LOANS_MAX_ACTIVE", "3")?,
            account_requests_max: parse_or("ACCOUNT_REQUESTS_MAX", "5")?,
            bill_requests_max: parse_or("BILL_REQUESTS_MAX", "10")?,
            bill_hanging_months_limit: parse_or("BILL_HANGING_MONTHS_LIMIT", "3")?,
        })
    }
}

/// Parse a required environment variable
fn required<T: FromStr>(key: &'static str) -> Result<T, ConfigError> {
    env::var(key)
        .map_err(|_| ConfigError::MissingEnv(key))?
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key))
}

/// Parse an environment variable, falling back to a default
fn parse_or<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key))
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_uses_default() {
        let limit: u32 = parse_or("BANKCORE_TEST_UNSET_KEY", "3").unwrap();
        assert_eq!(limit, 3);
    }

    #[test]
    fn test_parse_or_rejects_garbage() {
        let res: Result<u32, _> = parse_or("BANKCORE_TEST_UNSET_KEY_2", "not-a-number");
        assert!(matches!(res, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_required_missing() {
        let res: Result<i32, _> = required("BANKCORE_TEST_UNSET_KEY_3");
        assert!(matches!(res, Err(ConfigError::MissingEnv(_))));
    }
}
