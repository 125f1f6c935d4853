//! Penalty entity

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::{decode_code, UnknownCode};

/// A charge imposed on a user, payable to the house account. Created
/// UNASSIGNED by the overdue-accrual step and linked to a follow-up
/// bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Penalty {
    pub id: i32,
    pub value: Decimal,
    pub payment_account_id: i32,
    pub penalty_type: PenaltyType,
    pub status: PenaltyStatus,
    pub notice: Option<String>,
    pub user_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PenaltyType {
    Fee,
}

impl PenaltyType {
    pub fn code(self) -> i16 {
        match self {
            PenaltyType::Fee => 1,
        }
    }
}

impl TryFrom<i16> for PenaltyType {
    type Error = UnknownCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(PenaltyType::Fee),
            other => Err(UnknownCode(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PenaltyStatus {
    Unassigned,
    Assigned,
}

impl PenaltyStatus {
    pub fn code(self) -> i16 {
        match self {
            PenaltyStatus::Unassigned => 1,
            PenaltyStatus::Assigned => 2,
        }
    }
}

impl TryFrom<i16> for PenaltyStatus {
    type Error = UnknownCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(PenaltyStatus::Unassigned),
            2 => Ok(PenaltyStatus::Assigned),
            other => Err(UnknownCode(other)),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Penalty {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            value: row.try_get("value")?,
            payment_account_id: row.try_get("payment_account_id")?,
            penalty_type: decode_code(row, "type_id")?,
            status: decode_code(row, "status_id")?,
            notice: row.try_get("notice")?,
            user_id: row.try_get("user_id")?,
        })
    }
}
