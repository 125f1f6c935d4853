//! Loan entity

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::{decode_code, UnknownCode};

/// A loan issued to a user. `total_payment_value` only ever grows
/// (overdue accrual); status transitions run forward only, CLOSED is
/// terminal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    pub id: i32,
    pub single_payment_value: Decimal,
    pub starting_value: Decimal,
    pub total_payment_value: Decimal,
    pub yearly_interest_rate: Decimal,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub user_id: i32,
    /// Disbursement target
    pub account_id: i32,
    pub card_id: Option<i32>,
    pub status: LoanStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Pending,
    Overdue,
    Closed,
}

impl LoanStatus {
    pub fn code(self) -> i16 {
        match self {
            LoanStatus::Pending => 1,
            LoanStatus::Overdue => 2,
            LoanStatus::Closed => 3,
        }
    }
}

impl TryFrom<i16> for LoanStatus {
    type Error = UnknownCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(LoanStatus::Pending),
            2 => Ok(LoanStatus::Overdue),
            3 => Ok(LoanStatus::Closed),
            other => Err(UnknownCode(other)),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Loan {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            single_payment_value: row.try_get("single_payment_value")?,
            starting_value: row.try_get("starting_value")?,
            total_payment_value: row.try_get("total_payment_value")?,
            yearly_interest_rate: row.try_get("yearly_interest_rate")?,
            issue_date: row.try_get("issue_date")?,
            due_date: row.try_get("due_date")?,
            user_id: row.try_get("user_id")?,
            account_id: row.try_get("account_id")?,
            card_id: row.try_get("card_id")?,
            status: decode_code(row, "status_id")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_status_codes() {
        assert_eq!(LoanStatus::try_from(1).unwrap(), LoanStatus::Pending);
        assert_eq!(LoanStatus::try_from(2).unwrap(), LoanStatus::Overdue);
        assert_eq!(LoanStatus::try_from(3).unwrap(), LoanStatus::Closed);
        assert!(LoanStatus::try_from(4).is_err());
    }
}
