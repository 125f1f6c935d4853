//! Parameter and predicate value types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// A bindable query parameter. Bridges dynamically assembled SQL to
/// sqlx's typed bind calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i32),
    OptInt(Option<i32>),
    SmallInt(i16),
    Decimal(Decimal),
    OptDecimal(Option<Decimal>),
    Text(String),
    OptText(Option<String>),
    Date(NaiveDate),
    OptDate(Option<NaiveDate>),
    Timestamp(DateTime<Utc>),
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Param::Int(v)
    }
}

impl From<Option<i32>> for Param {
    fn from(v: Option<i32>) -> Self {
        Param::OptInt(v)
    }
}

impl From<i16> for Param {
    fn from(v: i16) -> Self {
        Param::SmallInt(v)
    }
}

impl From<Decimal> for Param {
    fn from(v: Decimal) -> Self {
        Param::Decimal(v)
    }
}

impl From<Option<Decimal>> for Param {
    fn from(v: Option<Decimal>) -> Self {
        Param::OptDecimal(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

impl From<Option<String>> for Param {
    fn from(v: Option<String>) -> Self {
        Param::OptText(v)
    }
}

impl From<NaiveDate> for Param {
    fn from(v: NaiveDate) -> Self {
        Param::Date(v)
    }
}

impl From<Option<NaiveDate>> for Param {
    fn from(v: Option<NaiveDate>) -> Self {
        Param::OptDate(v)
    }
}

impl From<DateTime<Utc>> for Param {
    fn from(v: DateTime<Utc>) -> Self {
        Param::Timestamp(v)
    }
}

/// Value specification of one predicate: exact match or inclusive range.
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaValue {
    Equals(Param),
    Range(Param, Param),
}

impl CriteriaValue {
    pub fn equals(value: impl Into<Param>) -> Self {
        CriteriaValue::Equals(value.into())
    }

    /// Inclusive on both ends
    pub fn between(lo: impl Into<Param>, hi: impl Into<Param>) -> Self {
        CriteriaValue::Range(lo.into(), hi.into())
    }
}
