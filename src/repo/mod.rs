//! Repositories
//!
//! One repository per entity kind, built on the transaction executor.
//! Absence is `Ok(None)`, never an error; only storage failures
//! propagate. Balances are deliberately not writable here: they change
//! only through operation batches and loan creation.

pub mod accounts;
pub mod bills;
pub mod cards;
pub mod loans;
pub mod operations;
pub mod penalties;

pub use accounts::{AccountRepository, NewAccount};
pub use bills::{BillRepository, NewBill};
pub use cards::{CardRepository, NewCard};
pub use loans::{LoanRepository, NewLoan};
pub use operations::OperationRepository;
pub use penalties::{NewPenalty, PenaltyRepository};
