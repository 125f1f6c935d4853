//! Bill entity

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::{decode_code, UnknownCode};

/// A payment request assigned to a user. A null `due_date` means the
/// bill has no fixed deadline and is monitored for staleness instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bill {
    pub id: i32,
    pub value: Decimal,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub user_id: i32,
    pub bearer_id: i32,
    pub payment_account_id: i32,
    pub status: BillStatus,
    pub penalty_id: Option<i32>,
    pub loan_id: Option<i32>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    Pending,
    Closed,
}

impl BillStatus {
    pub fn code(self) -> i16 {
        match self {
            BillStatus::Pending => 1,
            BillStatus::Closed => 2,
        }
    }
}

impl TryFrom<i16> for BillStatus {
    type Error = UnknownCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(BillStatus::Pending),
            2 => Ok(BillStatus::Closed),
            other => Err(UnknownCode(other)),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Bill {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            value: row.try_get("value")?,
            issue_date: row.try_get("issue_date")?,
            due_date: row.try_get("due_date")?,
            user_id: row.try_get("user_id")?,
            bearer_id: row.try_get("bearer_id")?,
            payment_account_id: row.try_get("payment_account_id")?,
            status: decode_code(row, "status_id")?,
            penalty_id: row.try_get("penalty_id")?,
            loan_id: row.try_get("loan_id")?,
            notice: row.try_get("notice")?,
        })
    }
}
