// Application layer - the session-facing entry points over the ledger.
// Anything that drives a session (the CLI, a test, an embedding server)
// goes through ExpenseService or SharedExpenseService.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
