//! Operation entity: the ledger record
//!
//! One row per money movement. Rows are append-only; normal flow never
//! updates or deletes them, they are the audit trail.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::{decode_code, UnknownCode};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub id: i32,
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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Transfer,
    BillPayment,
    LoanDisbursement,
    PenaltyCharge,
    InterestAccrual,
}

impl OperationType {
    pub fn code(self) -> i16 {
        match self {
            OperationType::Transfer => 1,
            OperationType::BillPayment => 2,
            OperationType::LoanDisbursement => 3,
            OperationType::PenaltyCharge => 4,
            OperationType::InterestAccrual => 5,
        }
    }
}

impl TryFrom<i16> for OperationType {
    type Error = UnknownCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(OperationType::Transfer),
            2 => Ok(OperationType::BillPayment),
            3 => Ok(OperationType::LoanDisbursement),
            4 => Ok(OperationType::PenaltyCharge),
            5 => Ok(OperationType::InterestAccrual),
            other => Err(UnknownCode(other)),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Operation {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            op_type: decode_code(row, "type_id")?,
            value: row.try_get("value")?,
            commission: row.try_get("commission")?,
            operation_date: row.try_get("operation_date")?,
            account_id: row.try_get("account_id")?,
            target_account_id: row.try_get("target_account_id")?,
            card_id: row.try_get("card_id")?,
            target_card_id: row.try_get("target_card_id")?,
            bill_id: row.try_get("bill_id")?,
            penalty_id: row.try_get("penalty_id")?,
        })
    }
}
