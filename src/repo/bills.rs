//! Bill repository

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::criteria::{BillField, Criteria, Param};
use crate::error::AppResult;
use crate::executor::{Statement, TransactionExecutor};
use crate::model::{Bill, BillStatus};

const SELECT: &str = "SELECT * FROM bills";

const INSERT: &str = "INSERT INTO bills \
    (value, issue_date, due_date, user_id, bearer_id, payment_account_id, \
     status_id, penalty_id, loan_id, notice) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id";

const UPDATE_STATUS: &str = "UPDATE bills SET status_id = $1 WHERE id = $2";

const DELETE: &str = "DELETE FROM bills WHERE id = $1";

#[derive(Debug, Clone)]
pub struct NewBill {
    pub value: Decimal,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub user_id: i32,
    pub bearer_id: i32,
    pub payment_account_id: i32,
    pub status: BillStatus,
    pub penalty_id: Option<i32>,
    pub loan_id: Option<i32>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BillRepository {
    executor: TransactionExecutor,
}

impl BillRepository {
    pub fn new(executor: TransactionExecutor) -> Self {
        Self { executor }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Bill>> {
        let stmt = Statement::new(format!("{SELECT} WHERE id = $1"), vec![Param::Int(id)]);
        self.executor.query_single(&stmt).await
    }

    pub async fn find_all(&self) -> AppResult<Vec<Bill>> {
        self.executor.query(&Statement::new(SELECT, vec![])).await
    }

    pub async fn find_by_criteria(&self, criteria: &Criteria<BillField>) -> AppResult<Vec<Bill>> {
        let (sql, params) = criteria.generate_query(SELECT);
        self.executor.query(&Statement::new(sql, params)).await
    }

    pub async fn create(&self, bill: &NewBill) -> AppResult<i32> {
        let stmt = Statement::returning_id(
            INSERT,
            vec![
                Param::Decimal(bill.value),
                Param::Date(bill.issue_date),
                Param::OptDate(bill.due_date),
                Param::Int(bill.user_id),
                Param::Int(bill.bearer_id),
                Param::Int(bill.payment_account_id),
                Param::SmallInt(bill.status.code()),
                Param::OptInt(bill.penalty_id),
                Param::OptInt(bill.loan_id),
                Param::OptText(bill.notice.clone()),
            ],
        );
        let outcome = self.executor.update(&stmt).await?;
        outcome.require_generated_id()
    }

    /// The status transition as an inert statement, for callers that
    /// need it inside a larger atomic batch.
    pub fn update_status_stmt(id: i32, status: BillStatus) -> Statement {
        Statement::new(
            UPDATE_STATUS,
            vec![Param::SmallInt(status.code()), Param::Int(id)],
        )
    }

    pub async fn update_status(&self, id: i32, status: BillStatus) -> AppResult<u64> {
        let stmt = Self::update_status_stmt(id, status);
        Ok(self.executor.update(&stmt).await?.rows_affected())
    }

    /// Deletes are reserved for the hanging-bill cleanup job; closed
    /// bills are part of the payment history and stay.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let stmt = Statement::new(DELETE, vec![Param::Int(id)]);
        Ok(self.executor.update(&stmt).await?.rows_affected())
    }
}
