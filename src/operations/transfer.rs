//! Transfer command variants
//!
//! Tracked source, tracked target. The batch order is fixed: ledger
//! insert, target credit, source debit of value plus commission, house
//! commission credit when there is one.

use rust_decimal::Decimal;

use crate::error::AppResult;
use crate::executor::Statement;

use super::{account_delta, card_delta, ledger_insert, require, NewOperation, OperationCommand};

/// account → account
pub struct AccountToAccount;

impl OperationCommand for AccountToAccount {
    fn build_batch(
        &self,
        op: &NewOperation,
        house_account_id: i32,
    ) -> AppResult<Vec<Statement>> {
        let source = require(op.account_id, "source account id")?;
        let target = require(op.target_account_id, "target account id")?;

        let mut batch = vec![
            ledger_insert(op),
            account_delta(op.value, target),
            account_delta(-(op.value + op.commission), source),
        ];
        if op.commission > Decimal::ZERO {
            batch.push(account_delta(op.commission, house_account_id));
        }
        Ok(batch)
    }
}

/// account → card
pub struct AccountToCard;

impl OperationCommand for AccountToCard {
    fn build_batch(
        &self,
        op: &NewOperation,
        house_account_id: i32,
    ) -> AppResult<Vec<Statement>> {
        let source = require(op.account_id, "source account id")?;
        let target = require(op.target_card_id, "target card id")?;

        let mut batch = vec![
            ledger_insert(op),
            card_delta(op.value, target),
            account_delta(-(op.value + op.commission), source),
        ];
        if op.commission > Decimal::ZERO {
            batch.push(account_delta(op.commission, house_account_id));
        }
        Ok(batch)
    }
}

/// card → account
pub struct CardToAccount;

impl OperationCommand for CardToAccount {
    fn build_batch(
        &self,
        op: &NewOperation,
        house_account_id: i32,
    ) -> AppResult<Vec<Statement>> {
        let source = require(op.card_id, "source card id")?;
        let target = require(op.target_account_id, "target account id")?;

        let mut batch = vec![
            ledger_insert(op),
            account_delta(op.value, target),
            card_delta(-(op.value + op.commission), source),
        ];
        if op.commission > Decimal::ZERO {
            batch.push(account_delta(op.commission, house_account_id));
        }
        Ok(batch)
    }
}

/// card → card
pub struct CardToCard;

impl OperationCommand for CardToCard {
    fn build_batch(
        &self,
        op: &NewOperation,
        house_account_id: i32,
    ) -> AppResult<Vec<Statement>> {
        let source = require(op.card_id, "source card id")?;
        let target = require(op.target_card_id, "target card id")?;

        let mut batch = vec![
            ledger_insert(op),
            card_delta(op.value, target),
            card_delta(-(op.value + op.commission), source),
        ];
        if op.commission > Decimal::ZERO {
            batch.push(account_delta(op.commission, house_account_id));
        }
        Ok(batch)
    }
}
