//! Operation repository
//!
//! Read-only: ledger rows are the audit trail. Inserts happen inside
//! operation command batches, never here.

use crate::criteria::{Criteria, OperationField, Param};
use crate::error::AppResult;
use crate::executor::{Statement, TransactionExecutor};
use crate::model::Operation;

const SELECT: &str = "SELECT * FROM operations";

#[derive(Debug, Clone)]
pub struct OperationRepository {
    executor: TransactionExecutor,
}

impl OperationRepository {
    pub fn new(executor: TransactionExecutor) -> Self {
        Self { executor }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Operation>> {
        let stmt = Statement::new(format!("{SELECT} WHERE id = $1"), vec![Param::Int(id)]);
        self.executor.query_single(&stmt).await
    }

    pub async fn find_all(&self) -> AppResult<Vec<Operation>> {
        self.executor.query(&Statement::new(SELECT, vec![])).await
    }

    pub async fn find_by_criteria(
        &self,
        criteria: &Criteria<OperationField>,
    ) -> AppResult<Vec<Operation>> {
        let (sql, params) = criteria.generate_query(SELECT);
        self.executor.query(&Statement::new(sql, params)).await
    }
}
