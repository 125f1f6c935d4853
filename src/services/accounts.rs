//! Account opening
//!
//! A newly requested account starts PENDING until back-office approval
//! unlocks it. The number of pending accounts one user may hold open at
//! a time is capped by configuration.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{AppError, AppResult, Precondition};
use crate::model::{Account, AccountStatus};
use crate::repo::{AccountRepository, NewAccount};

#[derive(Clone)]
pub struct AccountService {
    accounts: AccountRepository,
    max_pending: u32,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(accounts: AccountRepository, config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            max_pending: config.account_requests_max,
            clock,
        }
    }

    /// Request a new account for `owner_id`. Returns the generated
    /// account id; the account stays PENDING until approved.
    pub async fn open_account(&self, owner_id: i32, account_number: &str) -> AppResult<i32> {
        if !Account::is_valid_number(account_number) {
            return Err(AppError::Validation(format!(
                "malformed account number: {account_number}"
            )));
        }
        if self.accounts.find_by_number(account_number).await?.is_some() {
            return Err(AppError::Validation(format!(
                "account number already in use: {account_number}"
            )));
        }

        let pending = self
            .accounts
            .find_by_owner(owner_id)
            .await?
            .into_iter()
            .filter(|a| a.status == AccountStatus::Pending)
            .count();
        if pending >= self.max_pending as usize {
            return Err(Precondition::TooManyAccountRequests.into());
        }

        let account = NewAccount {
            account_number: account_number.to_string(),
            balance: Decimal::ZERO,
            yearly_interest_rate: Decimal::ZERO,
            status: AccountStatus::Pending,
            registration_date: self.clock.now(),
        };
        let account_id = self.accounts.create(&account, owner_id).await?;

        tracing::info!(account_id, owner_id, "account requested");
        Ok(account_id)
    }
}
