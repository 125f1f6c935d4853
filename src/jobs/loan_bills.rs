//! Monthly bill assignment job
//!
//! Fires on the first of each month. PENDING loans get a plain bill for
//! their single payment value; OVERDUE loans accrue one month of
//! compound interest, a penalty and a follow-up bill due in a month.

use std::sync::Arc;

use chrono::{Datelike, Months};
use rust_decimal::{Decimal, MathematicalOps};

use crate::clock::Clock;
use crate::config::Config;
use crate::criteria::{BillField, Criteria, CriteriaValue};
use crate::model::{BillStatus, Loan, LoanStatus, PenaltyStatus, PenaltyType};
use crate::repo::{BillRepository, LoanRepository, NewBill, NewPenalty, PenaltyRepository};

use super::{JobError, JobReport};

pub struct MonthlyBillAssignment {
    loans: LoanRepository,
    bills: BillRepository,
    penalties: PenaltyRepository,
    penalty_rate: Decimal,
    house_account_id: i32,
    clock: Arc<dyn Clock>,
}

impl MonthlyBillAssignment {
    pub const ID: &'static str = "monthly-bill-assignment";
    /// First day of every month, midnight
    pub const SCHEDULE: &'static str = "0 0 0 1 * ? *";

    pub fn new(
        loans: LoanRepository,
        bills: BillRepository,
        penalties: PenaltyRepository,
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            loans,
            bills,
            penalties,
            penalty_rate: config.loan_overdue_penalty_rate,
            house_account_id: config.house_account_id,
            clock,
        }
    }

    /// One tick. A loan is billed at most once per calendar month, so
    /// re-running within the same month (a restart on the 1st, a manual
    /// trigger) is a no-op for already-billed loans. A storage failure
    /// on any loan aborts the remaining loans in this run; the next
    /// tick re-evaluates from current state.
    pub async fn run(&self) -> Result<JobReport, JobError> {
        let mut report = JobReport::new(Self::ID);

        for loan in self.loans.find_all().await? {
            if loan.status != LoanStatus::Closed && self.billed_this_month(loan.id).await? {
                continue;
            }
            match loan.status {
                LoanStatus::Pending => {
                    self.assign_payment(&loan).await?;
                    report.bills_created += 1;
                }
                LoanStatus::Overdue => {
                    self.assign_payment_overdue(&loan).await?;
                    report.bills_created += 1;
                    report.penalties_created += 1;
                }
                LoanStatus::Closed => {}
            }
        }

        Ok(report.finish(self.clock.now()))
    }

    /// Whether a bill linked to the loan was already issued since the
    /// start of the current month.
    async fn billed_this_month(&self, loan_id: i32) -> Result<bool, JobError> {
        let today = self.clock.today();
        let month_start = today.with_day(1).expect("every month has a first day");

        let mut criteria = Criteria::new();
        criteria
            .add(BillField::Loan, CriteriaValue::equals(loan_id))
            .add(
                BillField::IssueDate,
                CriteriaValue::between(month_start, today),
            );
        Ok(!self.bills.find_by_criteria(&criteria).await?.is_empty())
    }

    /// Plain monthly payment: no due date, monitored for staleness by
    /// the cleanup job instead.
    async fn assign_payment(&self, loan: &Loan) -> Result<(), JobError> {
        let bill = NewBill {
            value: loan.single_payment_value,
            issue_date: self.clock.today(),
            due_date: None,
            user_id: loan.user_id,
            bearer_id: loan.user_id,
            payment_account_id: self.house_account_id,
            status: BillStatus::Pending,
            penalty_id: None,
            loan_id: Some(loan.id),
            notice: None,
        };
        let bill_id = self.bills.create(&bill).await?;
        tracing::debug!(loan_id = loan.id, bill_id, "monthly loan bill assigned");
        Ok(())
    }

    /// Overdue accrual: grow the debt by one month of compound
    /// interest, charge a penalty and issue a follow-up bill due in a
    /// month that carries the penalty link.
    async fn assign_payment_overdue(&self, loan: &Loan) -> Result<(), JobError> {
        let overdue_value = overdue_increment(loan.total_payment_value, loan.yearly_interest_rate);

        let penalty = NewPenalty {
            value: (loan.starting_value * self.penalty_rate).round_dp(2),
            payment_account_id: self.house_account_id,
            penalty_type: PenaltyType::Fee,
            status: PenaltyStatus::Unassigned,
            notice: Some(format!(
                "{}% of loan starting sum for every month of overdue after the first",
                self.penalty_rate * Decimal::ONE_HUNDRED
            )),
            user_id: loan.user_id,
        };
        let penalty_id = self.penalties.create(&penalty).await?;

        let due_date = self
            .clock
            .today()
            .checked_add_months(Months::new(1))
            .expect("one month ahead is always representable");
        let bill = NewBill {
            value: overdue_value,
            issue_date: self.clock.today(),
            due_date: Some(due_date),
            user_id: loan.user_id,
            bearer_id: loan.user_id,
            payment_account_id: self.house_account_id,
            status: BillStatus::Pending,
            penalty_id: Some(penalty_id),
            loan_id: Some(loan.id),
            notice: None,
        };
        let bill_id = self.bills.create(&bill).await?;

        let new_total = loan.total_payment_value + overdue_value;
        self.loans
            .update_total_payment_value(loan.id, new_total)
            .await?;

        tracing::info!(
            loan_id = loan.id,
            bill_id,
            penalty_id,
            overdue_value = %overdue_value,
            new_total = %new_total,
            "overdue loan accrued"
        );
        Ok(())
    }
}

/// Monthly growth factor for a yearly rate in percent:
/// `(1 + rate/100)^(1/12)`
pub(crate) fn monthly_growth_factor(yearly_rate: Decimal) -> Decimal {
    (Decimal::ONE + yearly_rate / Decimal::ONE_HUNDRED).powf(1.0 / 12.0)
}

/// One month of compound growth on the outstanding total, in cents
pub(crate) fn overdue_increment(total_payment_value: Decimal, yearly_rate: Decimal) -> Decimal {
    (total_payment_value * (monthly_growth_factor(yearly_rate) - Decimal::ONE)).round_dp(2)
}
