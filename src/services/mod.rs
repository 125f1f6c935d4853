//! Domain services
//!
//! Orchestration above the repositories and the operation engine:
//! business preconditions, commission computation, loan origination
//! bounds. Services hold no state of their own; every entity is loaded
//! fresh per call.

pub mod accounts;
pub mod bills;
pub mod loans;
pub mod transfers;

pub use accounts::AccountService;
pub use bills::{BillRequest, BillService};
pub use loans::{LoanRequest, LoanService};
pub use transfers::{Endpoint, TransferService};
