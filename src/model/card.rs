//! Banking card entity

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::{decode_code, UnknownCode};

/// A banking card. Debit cards spend their linked account's balance;
/// credit and overdraft cards carry a balance of their own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: i32,
    pub number: String,
    pub cvc: String,
    pub pin: String,
    pub expiration_date: NaiveDate,
    pub registration_date: NaiveDate,
    pub balance: Option<Decimal>,
    pub overdraft_max: Option<Decimal>,
    pub overdraft_interest_rate: Option<Decimal>,
    pub user_id: i32,
    pub account_id: Option<i32>,
    pub card_type: CardType,
    pub status: CardStatus,
}

impl Card {
    /// Headroom available for spending beyond a zero balance.
    /// Only overdraft cards have any.
    pub fn overdraft_headroom(&self) -> Decimal {
        match self.card_type {
            CardType::Overdraft => self.overdraft_max.unwrap_or_default(),
            _ => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Debit,
    Credit,
    Overdraft,
}

impl CardType {
    pub fn code(self) -> i16 {
        match self {
            CardType::Debit => 1,
            CardType::Credit => 2,
            CardType::Overdraft => 3,
        }
    }
}

impl TryFrom<i16> for CardType {
    type Error = UnknownCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(CardType::Debit),
            2 => Ok(CardType::Credit),
            3 => Ok(CardType::Overdraft),
            other => Err(UnknownCode(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    Pending,
    Unlocked,
    Locked,
    Expired,
}

impl CardStatus {
    pub fn code(self) -> i16 {
        match self {
            CardStatus::Pending => 1,
            CardStatus::Unlocked => 2,
            CardStatus::Locked => 3,
            CardStatus::Expired => 4,
        }
    }

    pub fn is_usable(self) -> bool {
        matches!(self, CardStatus::Unlocked)
    }
}

impl TryFrom<i16> for CardStatus {
    type Error = UnknownCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(CardStatus::Pending),
            2 => Ok(CardStatus::Unlocked),
            3 => Ok(CardStatus::Locked),
            4 => Ok(CardStatus::Expired),
            other => Err(UnknownCode(other)),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Card {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            number: row.try_get("number")?,
            cvc: row.try_get("cvc")?,
            pin: row.try_get("pin")?,
            expiration_date: row.try_get("expiration_date")?,
            registration_date: row.try_get("registration_date")?,
            balance: row.try_get("balance")?,
            overdraft_max: row.try_get("overdraft_max")?,
            overdraft_interest_rate: row.try_get("overdraft_interest_rate")?,
            user_id: row.try_get("user_id")?,
            account_id: row.try_get("account_id")?,
            card_type: decode_code(row, "type_id")?,
            status: decode_code(row, "status_id")?,
        })
    }
}
