//! Loan origination
//!
//! Validates a loan request against the configured bounds and creates
//! the loan through the repository's disbursement batch: the house
//! account funds the borrower's account atomically with the insert.

use std::sync::Arc;

use chrono::Months;
use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::config::Config;
use crate::criteria::{Criteria, CriteriaValue, LoanField};
use crate::error::{AppError, AppResult, Precondition};
use crate::model::{AccountStatus, LoanStatus};
use crate::repo::{AccountRepository, LoanRepository, NewLoan};

#[derive(Debug, Clone)]
pub struct LoanRequest {
    pub value: Decimal,
    pub duration_months: u32,
    pub yearly_interest_rate: Decimal,
    pub user_id: i32,
    /// Disbursement target
    pub account_id: i32,
    pub card_id: Option<i32>,
}

#[derive(Clone)]
pub struct LoanService {
    loans: LoanRepository,
    accounts: AccountRepository,
    config: Config,
    clock: Arc<dyn Clock>,
}

impl LoanService {
    pub fn new(
        loans: LoanRepository,
        accounts: AccountRepository,
        config: Config,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            loans,
            accounts,
            config,
            clock,
        }
    }

    /// Validate and create a loan. Returns the generated loan id.
    pub async fn request_loan(&self, request: &LoanRequest) -> AppResult<i32> {
        self.check_bounds(request)?;
        self.check_active_loans(request.user_id).await?;

        let account = self
            .accounts
            .find_by_id(request.account_id)
            .await?
            .ok_or_else(|| AppError::not_found("account", request.account_id))?;
        if account.status == AccountStatus::Pending {
            return Err(Precondition::TargetAccountPending.into());
        }
        if !account.status.can_receive() {
            return Err(Precondition::AccountLocked.into());
        }

        let today = self.clock.today();
        let due_date = today
            .checked_add_months(Months::new(request.duration_months))
            .ok_or_else(|| AppError::Validation("loan due date out of range".into()))?;

        let total = total_payment_value(
            request.value,
            request.yearly_interest_rate,
            request.duration_months,
        );
        let single = (total / Decimal::from(request.duration_months)).round_dp(2);

        let loan = NewLoan {
            single_payment_value: single,
            starting_value: request.value,
            total_payment_value: total,
            yearly_interest_rate: request.yearly_interest_rate,
            issue_date: today,
            due_date,
            user_id: request.user_id,
            account_id: request.account_id,
            card_id: request.card_id,
        };

        let loan_id = self
            .loans
            .create(&loan, self.config.house_account_id)
            .await?;

        tracing::info!(
            loan_id,
            user_id = request.user_id,
            value = %request.value,
            months = request.duration_months,
            "loan created and disbursed"
        );
        Ok(loan_id)
    }

    fn check_bounds(&self, request: &LoanRequest) -> AppResult<()> {
        let config = &self.config;
        if request.value < config.loans_min_value {
            return Err(Precondition::LoanValueTooSmall.into());
        }
        if request.duration_months < config.loans_min_time_months
            || request.duration_months > config.loans_max_time_months
        {
            return Err(Precondition::LoanDurationOutOfBounds.into());
        }
        if request.yearly_interest_rate < config.loans_min_interest
            || request.yearly_interest_rate > config.loans_max_interest
        {
            return Err(Precondition::LoanInterestOutOfBounds.into());
        }
        Ok(())
    }

    async fn check_active_loans(&self, user_id: i32) -> AppResult<()> {
        let mut criteria = Criteria::new();
        criteria
            .add(LoanField::User, CriteriaValue::equals(user_id))
            // Pending and Overdue codes are adjacent; Closed sits above
            .add(
                LoanField::Status,
                CriteriaValue::between(LoanStatus::Pending.code(), LoanStatus::Overdue.code()),
            );

        let active = self.loans.find_by_criteria(&criteria).await?;
        if active.len() >= self.config.loans_max_active as usize {
            return Err(Precondition::TooManyActiveLoans.into());
        }
        Ok(())
    }
}

/// Simple interest over the whole duration, rounded to cents:
/// `value * (1 + rate/100 * months/12)`
fn total_payment_value(value: Decimal, yearly_rate: Decimal, months: u32) -> Decimal {
    let rate = yearly_rate / Decimal::ONE_HUNDRED;
    let years = Decimal::from(months) / Decimal::from(12);
    (value * (Decimal::ONE + rate * years)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_payment_value_simple_interest() {
        // 1000 at 12% over 12 months -> 1120
        assert_eq!(total_payment_value(dec!(1000), dec!(12), 12), dec!(1120.00));
        // 1000 at 12% over 6 months -> 1060
        assert_eq!(total_payment_value(dec!(1000), dec!(12), 6), dec!(1060.00));
        // zero interest pays back exactly the principal
        assert_eq!(total_payment_value(dec!(500), dec!(0), 24), dec!(500.00));
    }
}
