//! Account entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::{decode_code, UnknownCode};

/// A bank account. Balance changes only through operation batches or
/// loan creation/closure; it is never written directly by callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: i32,
    /// Two-letter country code followed by 18 digits
    pub account_number: String,
    pub balance: Decimal,
    pub yearly_interest_rate: Decimal,
    pub status: AccountStatus,
    pub registration_date: DateTime<Utc>,
}

impl Account {
    /// Validate the account number format: 2-letter country code + 18 digits.
    pub fn is_valid_number(number: &str) -> bool {
        let bytes = number.as_bytes();
        bytes.len() == 20
            && bytes[..2].iter().all(|b| b.is_ascii_uppercase())
            && bytes[2..].iter().all(|b| b.is_ascii_digit())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    /// Requested but not yet approved; cannot receive transfers
    Pending,
    Unlocked,
    Suspended,
    Blocked,
}

impl AccountStatus {
    pub fn code(self) -> i16 {
        match self {
            AccountStatus::Pending => 1,
            AccountStatus::Unlocked => 2,
            AccountStatus::Suspended => 3,
            AccountStatus::Blocked => 4,
        }
    }

    /// Whether money may leave this account
    pub fn can_send(self) -> bool {
        matches!(self, AccountStatus::Unlocked)
    }

    /// Whether money may enter this account
    pub fn can_receive(self) -> bool {
        !matches!(self, AccountStatus::Pending | AccountStatus::Blocked)
    }
}

impl TryFrom<i16> for AccountStatus {
    type Error = UnknownCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(AccountStatus::Pending),
            2 => Ok(AccountStatus::Unlocked),
            3 => Ok(AccountStatus::Suspended),
            4 => Ok(AccountStatus::Blocked),
            other => Err(UnknownCode(other)),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Account {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            account_number: row.try_get("account_number")?,
            balance: row.try_get("balance")?,
            yearly_interest_rate: row.try_get("yearly_interest_rate")?,
            status: decode_code(row, "status_id")?,
            registration_date: row.try_get("registration_date")?,
        })
    }
}
