//! Error handling module
//!
//! Centralized error taxonomy for the back-office core.
//! Validation and NotFound are caller faults, Precondition is a business
//! rule refusal with a machine-readable reason code, Storage wraps every
//! backend failure into one opaque kind.

use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or insufficient input to a command. Never retried.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Entity absent where one is required. A validation-class failure.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i32 },

    /// Business rule refused the operation.
    #[error(transparent)]
    Precondition(#[from] Precondition),

    /// Connectivity, constraint violation or transaction abort.
    /// The batch guarantees no partial effect, so callers may retry.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        AppError::NotFound { entity, id }
    }

    /// Whether a caller may safely retry the failed call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Storage(_))
    }
}

/// Business rule violations, each carrying a stable reason code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Precondition {
    #[error("Insufficient funds on source endpoint")]
    InsufficientFunds,

    #[error("Source account is suspended or blocked")]
    AccountLocked,

    #[error("Target account has not been approved yet")]
    TargetAccountPending,

    #[error("Card is locked or expired")]
    CardUnusable,

    #[error("Loan duration is outside the configured bounds")]
    LoanDurationOutOfBounds,

    #[error("Loan interest rate is outside the configured bounds")]
    LoanInterestOutOfBounds,

    #[error("Loan value is below the configured minimum")]
    LoanValueTooSmall,

    #[error("User already has the maximum number of active loans")]
    TooManyActiveLoans,

    #[error("Bill is already closed")]
    BillAlreadyClosed,

    #[error("User already has the maximum number of pending accounts")]
    TooManyAccountRequests,

    #[error("Bearer already has the maximum number of pending bills")]
    TooManyBillRequests,
}

impl Precondition {
    /// Stable machine-readable reason code surfaced to callers.
    pub fn code(&self) -> &'static str {
        match self {
            Precondition::InsufficientFunds => "insufficient_funds",
            Precondition::AccountLocked => "account_locked",
            Precondition::TargetAccountPending => "target_account_pending",
            Precondition::CardUnusable => "card_unusable",
            Precondition::LoanDurationOutOfBounds => "loan_duration_out_of_bounds",
            Precondition::LoanInterestOutOfBounds => "loan_interest_out_of_bounds",
            Precondition::LoanValueTooSmall => "loan_value_too_small",
            Precondition::TooManyActiveLoans => "too_many_active_loans",
            Precondition::BillAlreadyClosed => "bill_already_closed",
            Precondition::TooManyAccountRequests => "too_many_account_requests",
            Precondition::TooManyBillRequests => "too_many_bill_requests",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_codes_are_stable() {
        assert_eq!(Precondition::InsufficientFunds.code(), "insufficient_funds");
        assert_eq!(
            Precondition::LoanDurationOutOfBounds.code(),
            "loan_duration_out_of_bounds"
        );
    }

    #[test]
    fn test_storage_errors_are_retryable() {
        let err = AppError::Storage(sqlx::Error::PoolClosed);
        assert!(err.is_retryable());

        let err = AppError::Validation("missing value".into());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_not_found_display() {
        let err = AppError::not_found("loan", 42);
        assert_eq!(err.to_string(), "loan not found: 42");
    }
}
