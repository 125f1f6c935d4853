//! Criteria model and query translator
//!
//! A `Criteria` is a typed filter over one entity kind: an ordered list
//! of (field tag, value) predicates joined by a single top-level
//! boolean operator. `generate_query` turns it into a parameterized
//! WHERE clause appended to a base query template, keeping parameters
//! in insertion order.

mod fields;
mod query;
mod value;

pub use fields::{
    AccountField, BillField, CardField, CriteriaField, LoanField, OperationField, PenaltyField,
};
pub use query::{Criteria, Link};
pub use value::{CriteriaValue, Param};
