//! Transfer orchestration
//!
//! Computes commission, enforces endpoint preconditions and drives the
//! operation engine. Failures here are caller-visible business errors;
//! once the batch is submitted, atomicity is the executor's problem.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{AppError, AppResult, Precondition};
use crate::model::{BillStatus, Card, CardType, OperationType};
use crate::operations::{NewOperation, OperationEngine};
use crate::repo::{AccountRepository, BillRepository, CardRepository};

/// One tracked end of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Account(i32),
    Card(i32),
}

#[derive(Clone)]
pub struct TransferService {
    accounts: AccountRepository,
    cards: CardRepository,
    bills: BillRepository,
    engine: OperationEngine,
    commission_percent: Decimal,
    clock: Arc<dyn Clock>,
}

impl TransferService {
    pub fn new(
        accounts: AccountRepository,
        cards: CardRepository,
        bills: BillRepository,
        engine: OperationEngine,
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            cards,
            bills,
            engine,
            commission_percent: config.transfer_commission_percent,
            clock,
        }
    }

    /// Commission charged on a transfer of `value`, rounded to cents.
    pub fn commission_for(&self, value: Decimal) -> Decimal {
        (value * self.commission_percent / Decimal::ONE_HUNDRED).round_dp(2)
    }

    /// Move `value` between two endpoints, siphoning commission to the
    /// house account. Returns the ledger row id.
    pub async fn transfer(
        &self,
        source: Endpoint,
        target: Endpoint,
        value: Decimal,
    ) -> AppResult<i32> {
        if value <= Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "transfer value must be positive, got {value}"
            )));
        }

        let source = self.resolve_card_endpoint(source).await?;
        let target = self.resolve_card_endpoint(target).await?;
        let commission = self.commission_for(value);

        self.check_source(source, value + commission).await?;
        self.check_target(target).await?;

        let op = self
            .build_operation(OperationType::Transfer, value, source, target)?
            .with_commission(commission)?;

        self.engine.execute(&op).await
    }

    /// Pay a pending bill from an endpoint into the bill's payment
    /// account, then close the bill. The ledger row carries the bill
    /// and penalty linkage. No commission is charged on bill payments.
    pub async fn pay_bill(&self, bill_id: i32, source: Endpoint) -> AppResult<i32> {
        let bill = self
            .bills
            .find_by_id(bill_id)
            .await?
            .ok_or_else(|| AppError::not_found("bill", bill_id))?;

        if bill.status != BillStatus::Pending {
            return Err(Precondition::BillAlreadyClosed.into());
        }

        let source = self.resolve_card_endpoint(source).await?;
        let target = Endpoint::Account(bill.payment_account_id);
        self.check_source(source, bill.value).await?;
        self.check_target(target).await?;

        let mut op = self
            .build_operation(OperationType::BillPayment, bill.value, source, target)?
            .for_bill(bill.id)
            // the close must commit with the payment or not at all
            .then(BillRepository::update_status_stmt(bill.id, BillStatus::Closed));
        if let Some(penalty_id) = bill.penalty_id {
            op = op.for_penalty(penalty_id);
        }

        let operation_id = self.engine.execute(&op).await?;

        tracing::info!(bill_id = bill.id, operation_id, "bill paid and closed");
        Ok(operation_id)
    }

    /// Debit cards spend their linked account's balance; swap them for
    /// the account endpoint so the deltas land where the money lives.
    async fn resolve_card_endpoint(&self, endpoint: Endpoint) -> AppResult<Endpoint> {
        let Endpoint::Card(card_id) = endpoint else {
            return Ok(endpoint);
        };
        let card = self.load_card(card_id).await?;
        match (card.card_type, card.account_id) {
            (CardType::Debit, Some(account_id)) => Ok(Endpoint::Account(account_id)),
            _ => Ok(endpoint),
        }
    }

    async fn load_card(&self, card_id: i32) -> AppResult<Card> {
        self.cards
            .find_by_id(card_id)
            .await?
            .ok_or_else(|| AppError::not_found("card", card_id))
    }

    /// Source must be allowed to send and have `needed` available.
    async fn check_source(&self, source: Endpoint, needed: Decimal) -> AppResult<()> {
        match source {
            Endpoint::Account(id) => {
                let account = self
                    .accounts
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found("account", id))?;
                if !account.status.can_send() {
                    return Err(Precondition::AccountLocked.into());
                }
                if account.balance < needed {
                    return Err(Precondition::InsufficientFunds.into());
                }
            }
            Endpoint::Card(id) => {
                let card = self.load_card(id).await?;
                if !card.status.is_usable() || card.expiration_date < self.clock.today() {
                    return Err(Precondition::CardUnusable.into());
                }
                let available = card.balance.unwrap_or_default() + card.overdraft_headroom();
                if available < needed {
                    return Err(Precondition::InsufficientFunds.into());
                }
            }
        }
        Ok(())
    }

    async fn check_target(&self, target: Endpoint) -> AppResult<()> {
        match target {
            Endpoint::Account(id) => {
                let account = self
                    .accounts
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found("account", id))?;
                if account.status == crate::model::AccountStatus::Pending {
                    return Err(Precondition::TargetAccountPending.into());
                }
                if !account.status.can_receive() {
                    return Err(Precondition::AccountLocked.into());
                }
            }
            Endpoint::Card(id) => {
                let card = self.load_card(id).await?;
                if !card.status.is_usable() {
                    return Err(Precondition::CardUnusable.into());
                }
            }
        }
        Ok(())
    }

    fn build_operation(
        &self,
        op_type: OperationType,
        value: Decimal,
        source: Endpoint,
        target: Endpoint,
    ) -> AppResult<NewOperation> {
        let mut op = NewOperation::new(op_type, value, self.clock.now())?;
        op = match source {
            Endpoint::Account(id) => op.from_account(id),
            Endpoint::Card(id) => op.from_card(id),
        };
        op = match target {
            Endpoint::Account(id) => op.to_account(id),
            Endpoint::Card(id) => op.to_card(id),
        };
        Ok(op)
    }
}
