//! Account repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::criteria::{AccountField, Criteria, Param};
use crate::error::AppResult;
use crate::executor::{Statement, TransactionExecutor};
use crate::model::{Account, AccountStatus};

const SELECT: &str = "SELECT * FROM accounts";

const INSERT: &str = "INSERT INTO accounts \
    (account_number, balance, yearly_interest_rate, status_id, registration_date) \
    VALUES ($1, $2, $3, $4, $5) RETURNING id";

const UPDATE_STATUS: &str = "UPDATE accounts SET status_id = $1 WHERE id = $2";

const SELECT_OWNERS: &str = "SELECT user_id FROM account_users WHERE account_id = $1";

const SELECT_BY_OWNER: &str = "SELECT a.* FROM accounts a \
    JOIN account_users au ON au.account_id = a.id WHERE au.user_id = $1";

const INSERT_OWNER: &str =
    "INSERT INTO account_users (account_id, user_id) VALUES ($1, $2)";

/// A new account row; the balance starts at whatever the opening
/// deposit was, usually zero.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub account_number: String,
    pub balance: Decimal,
    pub yearly_interest_rate: Decimal,
    pub status: AccountStatus,
    pub registration_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AccountRepository {
    executor: TransactionExecutor,
}

impl AccountRepository {
    pub fn new(executor: TransactionExecutor) -> Self {
        Self { executor }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Account>> {
        let stmt = Statement::new(format!("{SELECT} WHERE id = $1"), vec![Param::Int(id)]);
        self.executor.query_single(&stmt).await
    }

    pub async fn find_by_number(&self, number: &str) -> AppResult<Option<Account>> {
        let stmt = Statement::new(
            format!("{SELECT} WHERE account_number = $1"),
            vec![Param::from(number)],
        );
        self.executor.query_single(&stmt).await
    }

    pub async fn find_all(&self) -> AppResult<Vec<Account>> {
        self.executor.query(&Statement::new(SELECT, vec![])).await
    }

    pub async fn find_by_criteria(
        &self,
        criteria: &Criteria<AccountField>,
    ) -> AppResult<Vec<Account>> {
        let (sql, params) = criteria.generate_query(SELECT);
        self.executor.query(&Statement::new(sql, params)).await
    }

    /// Insert a new account row plus its first owner, atomically.
    pub async fn create(&self, account: &NewAccount, owner_id: i32) -> AppResult<i32> {
        let batch = vec![
            Statement::returning_id(
                INSERT,
                vec![
                    Param::from(account.account_number.clone()),
                    Param::Decimal(account.balance),
                    Param::Decimal(account.yearly_interest_rate),
                    Param::SmallInt(account.status.code()),
                    Param::Timestamp(account.registration_date),
                ],
            ),
            // account_id is assigned by the insert above; currval reads
            // it back inside the same transaction
            Statement::new(
                "INSERT INTO account_users (account_id, user_id) \
                 VALUES (currval(pg_get_serial_sequence('accounts', 'id')), $1)",
                vec![Param::Int(owner_id)],
            ),
        ];
        let outcome = self.executor.execute_batch(&batch).await?;
        outcome.require_generated_id()
    }

    pub async fn update_status(&self, id: i32, status: AccountStatus) -> AppResult<u64> {
        let stmt = Statement::new(
            UPDATE_STATUS,
            vec![Param::SmallInt(status.code()), Param::Int(id)],
        );
        Ok(self.executor.update(&stmt).await?.rows_affected())
    }

    /// Accounts the user owns or co-owns.
    pub async fn find_by_owner(&self, user_id: i32) -> AppResult<Vec<Account>> {
        let stmt = Statement::new(SELECT_BY_OWNER, vec![Param::Int(user_id)]);
        self.executor.query(&stmt).await
    }

    pub async fn owner_ids(&self, account_id: i32) -> AppResult<Vec<i32>> {
        let stmt = Statement::new(SELECT_OWNERS, vec![Param::Int(account_id)]);
        let rows: Vec<(i32,)> = self.executor.query(&stmt).await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn add_owner(&self, account_id: i32, user_id: i32) -> AppResult<u64> {
        let stmt = Statement::new(
            INSERT_OWNER,
            vec![Param::Int(account_id), Param::Int(user_id)],
        );
        Ok(self.executor.update(&stmt).await?.rows_affected())
    }
}
