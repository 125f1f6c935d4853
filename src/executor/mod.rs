//! Transaction executor
//!
//! The single gateway to persistent storage: reads mapped to entities,
//! single mutating statements, and ordered all-or-nothing batches.
//! Every sqlx failure surfaces as the one storage-error kind; callers
//! never see backend specifics.

mod statement;

pub use statement::Statement;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};

/// Result of a mutating statement or batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Id generated by an INSERT … RETURNING id statement
    GeneratedId(i32),
    /// Rows affected by UPDATE/DELETE statements
    RowsAffected(u64),
}

impl ExecOutcome {
    pub fn generated_id(&self) -> Option<i32> {
        match self {
            ExecOutcome::GeneratedId(id) => Some(*id),
            ExecOutcome::RowsAffected(_) => None,
        }
    }

    pub fn rows_affected(&self) -> u64 {
        match self {
            ExecOutcome::GeneratedId(_) => 1,
            ExecOutcome::RowsAffected(n) => *n,
        }
    }

    /// The generated id of an id-returning insert; an outcome of any
    /// other shape is a caller error, never a fallback id.
    pub fn require_generated_id(&self) -> AppResult<i32> {
        self.generated_id().ok_or_else(|| {
            AppError::Validation("statement did not return a generated id".into())
        })
    }
}

/// Executes statements against the shared pool. Cheap to clone;
/// constructed once at process start and passed to jobs and commands.
#[derive(Debug, Clone)]
pub struct TransactionExecutor {
    pool: PgPool,
}

impl TransactionExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Execute a read, mapping each row to an entity.
    pub async fn query<T>(&self, stmt: &Statement) -> AppResult<Vec<T>>
    where
        T: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        let rows = stmt.as_query_as::<T>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Execute a read expected to yield 0 or 1 rows. More than one row
    /// is not an error: the first row wins, tolerating join fan-out.
    pub async fn query_single<T>(&self, stmt: &Statement) -> AppResult<Option<T>>
    where
        T: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        let row = stmt.as_query_as::<T>().fetch_optional(&self.pool).await?;
        Ok(row)
    }

    /// Execute a single mutating statement.
    pub async fn update(&self, stmt: &Statement) -> AppResult<ExecOutcome> {
        if stmt.returns_id() {
            let row = stmt.as_query().fetch_one(&self.pool).await?;
            let id: i32 = sqlx::Row::try_get(&row, 0)?;
            Ok(ExecOutcome::GeneratedId(id))
        } else {
            let result = stmt.as_query().execute(&self.pool).await?;
            Ok(ExecOutcome::RowsAffected(result.rows_affected()))
        }
    }

    /// Execute an ordered batch of statements in one transaction scope.
    /// If any statement fails the transaction is dropped and rolled
    /// back; no partial application is ever observable. The first
    /// statement's generated id, if any, is the batch's return value.
    pub async fn execute_batch(&self, statements: &[Statement]) -> AppResult<ExecOutcome> {
        if statements.is_empty() {
            return Err(AppError::Validation("empty statement batch".into()));
        }

        let mut tx = self.pool.begin().await?;
        let mut first_id: Option<i32> = None;
        let mut total_rows: u64 = 0;

        for (idx, stmt) in statements.iter().enumerate() {
            if stmt.returns_id() {
                let row = stmt.as_query().fetch_one(&mut *tx).await?;
                let id: i32 = sqlx::Row::try_get(&row, 0)?;
                total_rows += 1;
                if idx == 0 {
                    first_id = Some(id);
                }
            } else {
                let result = stmt.as_query().execute(&mut *tx).await?;
                total_rows += result.rows_affected();
            }
        }

        tx.commit().await?;

        Ok(match first_id {
            Some(id) => ExecOutcome::GeneratedId(id),
            None => ExecOutcome::RowsAffected(total_rows),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let id = ExecOutcome::GeneratedId(42);
        assert_eq!(id.generated_id(), Some(42));
        assert_eq!(id.rows_affected(), 1);

        let rows = ExecOutcome::RowsAffected(3);
        assert_eq!(rows.generated_id(), None);
        assert_eq!(rows.rows_affected(), 3);
    }

    #[test]
    fn test_require_generated_id_never_fabricates() {
        assert_eq!(
            ExecOutcome::GeneratedId(7).require_generated_id().unwrap(),
            7
        );
        let res = ExecOutcome::RowsAffected(1).require_generated_id();
        assert!(matches!(res, Err(AppError::Validation(_))));
    }
}
