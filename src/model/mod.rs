//! Domain model
//!
//! Entities mirror the normalized tables one-to-one. Status and type
//! enums carry stable smallint storage codes; rows holding an unknown
//! code fail decoding rather than admitting an impossible state.

pub mod account;
pub mod bill;
pub mod card;
pub mod loan;
pub mod operation;
pub mod penalty;

pub use account::{Account, AccountStatus};
pub use bill::{Bill, BillStatus};
pub use card::{Card, CardStatus, CardType};
pub use loan::{Loan, LoanStatus};
pub use operation::{Operation, OperationType};
pub use penalty::{Penalty, PenaltyStatus, PenaltyType};

/// A storage code that does not map to any enum variant
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown storage code: {0}")]
pub struct UnknownCode(pub i16);

/// Decode a status/type column, mapping unknown codes to a column
/// decode error so they surface as storage failures.
pub(crate) fn decode_code<T>(
    row: &sqlx::postgres::PgRow,
    column: &'static str,
) -> Result<T, sqlx::Error>
where
    T: TryFrom<i16, Error = UnknownCode>,
{
    use sqlx::Row;

    let code: i16 = row.try_get(column)?;
    T::try_from(code).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
