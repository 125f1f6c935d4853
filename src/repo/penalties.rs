//! Penalty repository

use rust_decimal::Decimal;

use crate::criteria::{Criteria, Param, PenaltyField};
use crate::error::AppResult;
use crate::executor::{Statement, TransactionExecutor};
use crate::model::{Penalty, PenaltyStatus, PenaltyType};

const SELECT: &str = "SELECT * FROM penalties";

const INSERT: &str = "INSERT INTO penalties \
    (value, payment_account_id, type_id, status_id, notice, user_id) \
    VALUES ($1, $2, $3, $4, $5, $6) RETURNING id";

const UPDATE_STATUS: &str = "UPDATE penalties SET status_id = $1 WHERE id = $2";

#[derive(Debug, Clone)]
pub struct NewPenalty {
    pub value: Decimal,
    pub payment_account_id: i32,
    pub penalty_type: PenaltyType,
    pub status: PenaltyStatus,
    pub notice: Option<String>,
    pub user_id: i32,
}

#[derive(Debug, Clone)]
pub struct PenaltyRepository {
    executor: TransactionExecutor,
}

impl PenaltyRepository {
    pub fn new(executor: TransactionExecutor) -> Self {
        Self { executor }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Penalty>> {
        let stmt = Statement::new(format!("{SELECT} WHERE id = $1"), vec![Param::Int(id)]);
        self.executor.query_single(&stmt).await
    }

    pub async fn find_all(&self) -> AppResult<Vec<Penalty>> {
        self.executor.query(&Statement::new(SELECT, vec![])).await
    }

    pub async fn find_by_criteria(
        &self,
        criteria: &Criteria<PenaltyField>,
    ) -> AppResult<Vec<Penalty>> {
        let (sql, params) = criteria.generate_query(SELECT);
        self.executor.query(&Statement::new(sql, params)).await
    }

    pub async fn create(&self, penalty: &NewPenalty) -> AppResult<i32> {
        let stmt = Statement::returning_id(
            INSERT,
            vec![
                Param::Decimal(penalty.value),
                Param::Int(penalty.payment_account_id),
                Param::SmallInt(penalty.penalty_type.code()),
                Param::SmallInt(penalty.status.code()),
                Param::OptText(penalty.notice.clone()),
                Param::Int(penalty.user_id),
            ],
        );
        let outcome = self.executor.update(&stmt).await?;
        outcome.require_generated_id()
    }

    pub async fn update_status(&self, id: i32, status: PenaltyStatus) -> AppResult<u64> {
        let stmt = Statement::new(
            UPDATE_STATUS,
            vec![Param::SmallInt(status.code()), Param::Int(id)],
        );
        Ok(self.executor.update(&stmt).await?.rows_affected())
    }
}
