//! Daily loan status check
//!
//! Closes loans whose linked closed bills cover the total payment
//! value, and marks loans overdue once their due date has passed.
//! Both predicates re-check current status, so repeated ticks are
//! no-ops on already-transitioned loans.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::criteria::{BillField, Criteria, CriteriaValue};
use crate::model::{BillStatus, Loan, LoanStatus};
use crate::repo::{BillRepository, LoanRepository};

use super::{JobError, JobReport};

pub struct LoanStatusCheck {
    loans: LoanRepository,
    bills: BillRepository,
    clock: Arc<dyn Clock>,
}

impl LoanStatusCheck {
    pub const ID: &'static str = "loan-status-check";
    /// Every day at 23:45
    pub const SCHEDULE: &'static str = "0 45 23 ? * * *";

    pub fn new(loans: LoanRepository, bills: BillRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            loans,
            bills,
            clock,
        }
    }

    pub async fn run(&self) -> Result<JobReport, JobError> {
        let mut report = JobReport::new(Self::ID);
        let today = self.clock.today();

        for loan in self.loans.find_all().await? {
            if loan.status == LoanStatus::Closed {
                continue;
            }

            let paid = self.closed_bills_total(loan.id).await?;
            if is_paid_off(loan.total_payment_value, paid) {
                self.loans.update_status(loan.id, LoanStatus::Closed).await?;
                report.loans_closed += 1;
                tracing::info!(loan_id = loan.id, paid = %paid, "loan paid off and closed");
                continue;
            }

            if should_mark_overdue(&loan, today) {
                self.loans
                    .update_status(loan.id, LoanStatus::Overdue)
                    .await?;
                report.loans_marked_overdue += 1;
                tracing::info!(loan_id = loan.id, due_date = %loan.due_date, "loan marked overdue");
            }
        }

        Ok(report.finish(self.clock.now()))
    }

    /// Sum of closed bills linked to the loan
    async fn closed_bills_total(&self, loan_id: i32) -> Result<Decimal, JobError> {
        let mut criteria = Criteria::new();
        criteria
            .add(BillField::Loan, CriteriaValue::equals(loan_id))
            .add(
                BillField::Status,
                CriteriaValue::equals(BillStatus::Closed.code()),
            );

        let bills = self.bills.find_by_criteria(&criteria).await?;
        Ok(bills.iter().map(|b| b.value).sum())
    }
}

fn is_paid_off(total_payment_value: Decimal, closed_bills_total: Decimal) -> bool {
    closed_bills_total >= total_payment_value
}

/// Overdue means the due date has passed and the loan is not already
/// flagged
fn should_mark_overdue(loan: &Loan, today: NaiveDate) -> bool {
    loan.status != LoanStatus::Overdue && loan.due_date < today
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loan(status: LoanStatus, due: NaiveDate) -> Loan {
        Loan {
            id: 1,
            single_payment_value: dec!(100),
            starting_value: dec!(1000),
            total_payment_value: dec!(1120),
            yearly_interest_rate: dec!(12),
            issue_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            due_date: due,
            user_id: 7,
            account_id: 3,
            card_id: None,
            status,
        }
    }

    #[test]
    fn test_paid_off_predicate() {
        assert!(is_paid_off(dec!(1120), dec!(1120)));
        assert!(is_paid_off(dec!(1120), dec!(1200)));
        assert!(!is_paid_off(dec!(1120), dec!(1119.99)));
    }

    #[test]
    fn test_overdue_requires_due_date_in_the_past() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let past = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let future = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        assert!(should_mark_overdue(&loan(LoanStatus::Pending, past), today));
        assert!(!should_mark_overdue(&loan(LoanStatus::Pending, future), today));
        // due today is not yet overdue
        assert!(!should_mark_overdue(&loan(LoanStatus::Pending, today), today));
    }

    #[test]
    fn test_overdue_transition_is_idempotent() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let past = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        // first tick transitions, second tick sees Overdue and skips
        assert!(should_mark_overdue(&loan(LoanStatus::Pending, past), today));
        assert!(!should_mark_overdue(&loan(LoanStatus::Overdue, past), today));
    }
}
