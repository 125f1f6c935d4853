//! Loan repository
//!
//! Creating a loan is itself a money movement: the loan row insert,
//! the house account debit and the borrower account credit commit as
//! one batch.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::criteria::{Criteria, LoanField, Param};
use crate::error::AppResult;
use crate::executor::{Statement, TransactionExecutor};
use crate::model::{Loan, LoanStatus};

const SELECT: &str = "SELECT * FROM loans";

const INSERT: &str = "INSERT INTO loans \
    (single_payment_value, starting_value, total_payment_value, yearly_interest_rate, \
     issue_date, due_date, user_id, account_id, card_id, status_id) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id";

const UPDATE_ACC_BALANCE: &str = "UPDATE accounts SET balance = balance + $1 WHERE id = $2";

const UPDATE_STATUS: &str = "UPDATE loans SET status_id = $1 WHERE id = $2";

const UPDATE_TOTAL: &str = "UPDATE loans SET total_payment_value = $1 WHERE id = $2";

#[derive(Debug, Clone)]
pub struct NewLoan {
    pub single_payment_value: Decimal,
    pub starting_value: Decimal,
    pub total_payment_value: Decimal,
    pub yearly_interest_rate: Decimal,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub user_id: i32,
    pub account_id: i32,
    pub card_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct LoanRepository {
    executor: TransactionExecutor,
}

impl LoanRepository {
    pub fn new(executor: TransactionExecutor) -> Self {
        Self { executor }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Loan>> {
        let stmt = Statement::new(format!("{SELECT} WHERE id = $1"), vec![Param::Int(id)]);
        self.executor.query_single(&stmt).await
    }

    pub async fn find_all(&self) -> AppResult<Vec<Loan>> {
        self.executor.query(&Statement::new(SELECT, vec![])).await
    }

    pub async fn find_by_criteria(&self, criteria: &Criteria<LoanField>) -> AppResult<Vec<Loan>> {
        let (sql, params) = criteria.generate_query(SELECT);
        self.executor.query(&Statement::new(sql, params)).await
    }

    /// Insert the loan and disburse its starting value: house account
    /// loses it, the borrower's account gains it, all in one batch.
    /// Returns the generated loan id.
    pub async fn create(&self, loan: &NewLoan, house_account_id: i32) -> AppResult<i32> {
        let batch = vec![
            Statement::returning_id(
                INSERT,
                vec![
                    Param::Decimal(loan.single_payment_value),
                    Param::Decimal(loan.starting_value),
                    Param::Decimal(loan.total_payment_value),
                    Param::Decimal(loan.yearly_interest_rate),
                    Param::Date(loan.issue_date),
                    Param::Date(loan.due_date),
                    Param::Int(loan.user_id),
                    Param::Int(loan.account_id),
                    Param::OptInt(loan.card_id),
                    Param::SmallInt(LoanStatus::Pending.code()),
                ],
            ),
            Statement::new(
                UPDATE_ACC_BALANCE,
                vec![
                    Param::Decimal(-loan.starting_value),
                    Param::Int(house_account_id),
                ],
            ),
            Statement::new(
                UPDATE_ACC_BALANCE,
                vec![
                    Param::Decimal(loan.starting_value),
                    Param::Int(loan.account_id),
                ],
            ),
        ];
        let outcome = self.executor.execute_batch(&batch).await?;
        outcome.require_generated_id()
    }

    pub async fn update_status(&self, id: i32, status: LoanStatus) -> AppResult<u64> {
        let stmt = Statement::new(
            UPDATE_STATUS,
            vec![Param::SmallInt(status.code()), Param::Int(id)],
        );
        Ok(self.executor.update(&stmt).await?.rows_affected())
    }

    pub async fn update_total_payment_value(&self, id: i32, total: Decimal) -> AppResult<u64> {
        let stmt = Statement::new(UPDATE_TOTAL, vec![Param::Decimal(total), Param::Int(id)]);
        Ok(self.executor.update(&stmt).await?.rows_affected())
    }
}
