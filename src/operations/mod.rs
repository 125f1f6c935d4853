//! Operation command set
//!
//! One command variant per (source endpoint kind, target endpoint kind)
//! pair. A variant builds the ordered statement batch for one money
//! movement (ledger insert first, then balance deltas, then the house
//! commission credit) and the engine submits it as a single atomic
//! unit.

mod accrual;
mod transfer;

pub use accrual::{AccrualToAccount, AccrualToCard};
pub use transfer::{AccountToAccount, AccountToCard, CardToAccount, CardToCard};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::criteria::Param;
use crate::error::{AppError, AppResult};
use crate::executor::{ExecOutcome, Statement, TransactionExecutor};
use crate::model::OperationType;

/// Kind of one end of a money movement. Accrual marks funds that
/// originate outside the tracked ledger (loan disbursement, penalty
/// or interest creation): no source balance is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Account,
    Card,
    Accrual,
}

/// Request for one money movement. Value and commission are always
/// non-negative here; the statement builders apply signs.
#[derive(Debug, Clone)]
pub struct NewOperation {
    pub op_type: OperationType,
    pub value: Decimal,
    pub commission: Decimal,
    pub operation_date: DateTime<Utc>,
    pub account_id: Option<i32>,
    pub target_account_id: Option<i32>,
    pub card_id: Option<i32>,
    pub target_card_id: Option<i32>,
    pub bill_id: Option<i32>,
    pub penalty_id: Option<i32>,
    accrual: bool,
    followups: Vec<Statement>,
}

impl NewOperation {
    pub fn new(
        op_type: OperationType,
        value: Decimal,
        operation_date: DateTime<Utc>,
    ) -> AppResult<Self> {
        if value < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "operation value must be non-negative, got {value}"
            )));
        }
        Ok(Self {
            op_type,
            value,
            commission: Decimal::ZERO,
            operation_date,
            account_id: None,
            target_account_id: None,
            card_id: None,
            target_card_id: None,
            bill_id: None,
            penalty_id: None,
            accrual: false,
            followups: Vec::new(),
        })
    }

    pub fn with_commission(mut self, commission: Decimal) -> AppResult<Self> {
        if commission < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "commission must be non-negative, got {commission}"
            )));
        }
        self.commission = commission;
        Ok(self)
    }

    pub fn from_account(mut self, id: i32) -> Self {
        self.account_id = Some(id);
        self
    }

    pub fn to_account(mut self, id: i32) -> Self {
        self.target_account_id = Some(id);
        self
    }

    pub fn from_card(mut self, id: i32) -> Self {
        self.card_id = Some(id);
        self
    }

    pub fn to_card(mut self, id: i32) -> Self {
        self.target_card_id = Some(id);
        self
    }

    /// Funds originate outside the tracked ledger
    pub fn accrual(mut self) -> Self {
        self.accrual = true;
        self
    }

    pub fn for_bill(mut self, id: i32) -> Self {
        self.bill_id = Some(id);
        self
    }

    pub fn for_penalty(mut self, id: i32) -> Self {
        self.penalty_id = Some(id);
        self
    }

    /// Append a statement to run after the money movement, inside the
    /// same transaction. Used for state transitions that must commit
    /// with the payment or not at all, like closing a paid bill.
    pub fn then(mut self, stmt: Statement) -> Self {
        self.followups.push(stmt);
        self
    }

    pub fn source_kind(&self) -> AppResult<EndpointKind> {
        if self.accrual {
            return Ok(EndpointKind::Accrual);
        }
        match (self.account_id, self.card_id) {
            (Some(_), _) => Ok(EndpointKind::Account),
            (None, Some(_)) => Ok(EndpointKind::Card),
            (None, None) => Err(AppError::Validation(
                "operation has no source endpoint".into(),
            )),
        }
    }

    pub fn target_kind(&self) -> AppResult<EndpointKind> {
        match (self.target_account_id, self.target_card_id) {
            (Some(_), _) => Ok(EndpointKind::Account),
            (None, Some(_)) => Ok(EndpointKind::Card),
            (None, None) => Err(AppError::Validation(
                "operation has no target endpoint".into(),
            )),
        }
    }
}

/// A command variant: builds the ordered statement batch for one
/// money-movement event. Object-safe so the factory can hand out the
/// variant for any endpoint pair behind one contract.
pub trait OperationCommand: Send + Sync {
    fn build_batch(&self, op: &NewOperation, house_account_id: i32)
        -> AppResult<Vec<Statement>>;
}

/// Select the command variant for an endpoint pair.
pub fn command_for(
    source: EndpointKind,
    target: EndpointKind,
) -> AppResult<&'static dyn OperationCommand> {
    match (source, target) {
        (EndpointKind::Account, EndpointKind::Account) => Ok(&AccountToAccount),
        (EndpointKind::Account, EndpointKind::Card) => Ok(&AccountToCard),
        (EndpointKind::Card, EndpointKind::Account) => Ok(&CardToAccount),
        (EndpointKind::Card, EndpointKind::Card) => Ok(&CardToCard),
        (EndpointKind::Accrual, EndpointKind::Account) => Ok(&AccrualToAccount),
        (EndpointKind::Accrual, EndpointKind::Card) => Ok(&AccrualToCard),
        (_, EndpointKind::Accrual) => Err(AppError::Validation(
            "an accrual cannot be the target of an operation".into(),
        )),
    }
}

/// Executes operation batches. One engine is constructed at process
/// start and shared by reference.
#[derive(Debug, Clone)]
pub struct OperationEngine {
    executor: TransactionExecutor,
    house_account_id: i32,
}

impl OperationEngine {
    pub fn new(executor: TransactionExecutor, house_account_id: i32) -> Self {
        Self {
            executor,
            house_account_id,
        }
    }

    /// Build and run the batch for one operation. Returns the generated
    /// id of the ledger row.
    pub async fn execute(&self, op: &NewOperation) -> AppResult<i32> {
        let batch = full_batch(op, self.house_account_id)?;

        tracing::debug!(
            op_type = ?op.op_type,
            value = %op.value,
            commission = %op.commission,
            statements = batch.len(),
            "executing operation batch"
        );

        match self.executor.execute_batch(&batch).await? {
            ExecOutcome::GeneratedId(id) => Ok(id),
            ExecOutcome::RowsAffected(_) => Err(AppError::Validation(
                "operation batch must begin with the ledger insert".into(),
            )),
        }
    }
}

/// The complete batch for one operation: the command variant's money
/// movement followed by the caller-supplied trailing statements.
fn full_batch(op: &NewOperation, house_account_id: i32) -> AppResult<Vec<Statement>> {
    let command = command_for(op.source_kind()?, op.target_kind()?)?;
    let mut batch = command.build_batch(op, house_account_id)?;
    batch.extend(op.followups.iter().cloned());
    Ok(batch)
}

const INSERT_OPERATION: &str = "INSERT INTO operations \
    (type_id, value, commission, operation_date, account_id, target_account_id, \
     card_id, target_card_id, bill_id, penalty_id) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id";

const UPDATE_ACCOUNT_BALANCE: &str =
    "UPDATE accounts SET balance = balance + $1 WHERE id = $2";

// A card may carry a NULL balance before its first movement; NULL
// arithmetic would swallow the delta, so coalesce to zero first.
const UPDATE_CARD_BALANCE: &str =
    "UPDATE cards SET balance = COALESCE(balance, 0) + $1 WHERE id = $2";

/// The ledger insert every batch starts with
pub(crate) fn ledger_insert(op: &NewOperation) -> Statement {
    Statement::returning_id(
        INSERT_OPERATION,
        vec![
            Param::SmallInt(op.op_type.code()),
            Param::Decimal(op.value),
            Param::Decimal(op.commission),
            Param::Timestamp(op.operation_date),
            Param::OptInt(op.account_id),
            Param::OptInt(op.target_account_id),
            Param::OptInt(op.card_id),
            Param::OptInt(op.target_card_id),
            Param::OptInt(op.bill_id),
            Param::OptInt(op.penalty_id),
        ],
    )
}

pub(crate) fn account_delta(amount: Decimal, account_id: i32) -> Statement {
    Statement::new(
        UPDATE_ACCOUNT_BALANCE,
        vec![Param::Decimal(amount), Param::Int(account_id)],
    )
}

pub(crate) fn card_delta(amount: Decimal, card_id: i32) -> Statement {
    Statement::new(
        UPDATE_CARD_BALANCE,
        vec![Param::Decimal(amount), Param::Int(card_id)],
    )
}

/// A required endpoint id; absence is a fatal precondition failure
/// caught before any statement is submitted.
pub(crate) fn require(field: Option<i32>, name: &'static str) -> AppResult<i32> {
    field.ok_or_else(|| AppError::Validation(format!("operation is missing {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_value_rejected() {
        let res = NewOperation::new(
            OperationType::Transfer,
            Decimal::NEGATIVE_ONE,
            Utc::now(),
        );
        assert!(matches!(res, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_negative_commission_rejected() {
        let res = NewOperation::new(OperationType::Transfer, Decimal::ONE, Utc::now())
            .unwrap()
            .with_commission(Decimal::NEGATIVE_ONE);
        assert!(matches!(res, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_endpoint_kind_resolution() {
        let op = NewOperation::new(OperationType::Transfer, Decimal::ONE, Utc::now())
            .unwrap()
            .from_account(1)
            .to_card(2);
        assert_eq!(op.source_kind().unwrap(), EndpointKind::Account);
        assert_eq!(op.target_kind().unwrap(), EndpointKind::Card);

        let accrual = NewOperation::new(OperationType::PenaltyCharge, Decimal::ONE, Utc::now())
            .unwrap()
            .accrual()
            .to_account(3);
        assert_eq!(accrual.source_kind().unwrap(), EndpointKind::Accrual);
    }

    #[test]
    fn test_missing_endpoints_are_validation_failures() {
        let op = NewOperation::new(OperationType::Transfer, Decimal::ONE, Utc::now()).unwrap();
        assert!(matches!(op.source_kind(), Err(AppError::Validation(_))));
        assert!(matches!(op.target_kind(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_followups_run_inside_the_batch() {
        let close = Statement::new(
            "UPDATE bills SET status_id = $1 WHERE id = $2",
            vec![Param::SmallInt(2), Param::Int(7)],
        );
        let op = NewOperation::new(OperationType::BillPayment, Decimal::ONE, Utc::now())
            .unwrap()
            .from_account(1)
            .to_account(2)
            .then(close.clone());

        let batch = full_batch(&op, 9).unwrap();
        assert!(batch[0].returns_id());
        assert_eq!(batch.last(), Some(&close));
    }

    #[test]
    fn test_card_credit_tolerates_null_balance() {
        let stmt = card_delta(Decimal::ONE, 4);
        assert!(stmt.sql().contains("COALESCE(balance, 0)"));
    }

    #[test]
    fn test_factory_rejects_accrual_target() {
        let res = command_for(EndpointKind::Account, EndpointKind::Accrual);
        assert!(matches!(res, Err(AppError::Validation(_))));
    }
}
