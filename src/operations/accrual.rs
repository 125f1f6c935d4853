//! Accrual command variants
//!
//! Funds originate outside the tracked ledger: loan disbursement,
//! interest, penalty creation. Only the target balance moves; there is
//! no source debit.

use rust_decimal::Decimal;

use crate::error::AppResult;
use crate::executor::Statement;

use super::{account_delta, card_delta, ledger_insert, require, NewOperation, OperationCommand};

/// accrual → account
pub struct AccrualToAccount;

impl OperationCommand for AccrualToAccount {
    fn build_batch(
        &self,
        op: &NewOperation,
        house_account_id: i32,
    ) -> AppResult<Vec<Statement>> {
        let target = require(op.target_account_id, "target account id")?;

        let mut batch = vec![ledger_insert(op), account_delta(op.value, target)];
        if op.commission > Decimal::ZERO {
            batch.push(account_delta(op.commission, house_account_id));
        }
        Ok(batch)
    }
}

/// accrual → card
pub struct AccrualToCard;

impl OperationCommand for AccrualToCard {
    fn build_batch(
        &self,
        op: &NewOperation,
        house_account_id: i32,
    ) -> AppResult<Vec<Statement>> {
        let target = require(op.target_card_id, "target card id")?;

        let mut batch = vec![ledger_insert(op), card_delta(op.value, target)];
        if op.commission > Decimal::ZERO {
            batch.push(account_delta(op.commission, house_account_id));
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Param;
    use crate::model::OperationType;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_accrual_has_no_source_debit() {
        let op = NewOperation::new(OperationType::InterestAccrual, dec!(12.50), Utc::now())
            .unwrap()
            .accrual()
            .to_account(5);
        let batch = AccrualToAccount.build_batch(&op, 1).unwrap();

        assert_eq!(batch.len(), 2);
        assert!(batch[0].returns_id());
        assert_eq!(
            batch[1].params(),
            &[Param::Decimal(dec!(12.50)), Param::Int(5)]
        );
    }

    #[test]
    fn test_accrual_to_card() {
        let op = NewOperation::new(OperationType::LoanDisbursement, dec!(1000), Utc::now())
            .unwrap()
            .accrual()
            .to_card(9);
        let batch = AccrualToCard.build_batch(&op, 1).unwrap();

        assert_eq!(batch.len(), 2);
        assert!(batch[1].sql().contains("UPDATE cards"));
    }
}
