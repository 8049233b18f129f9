mod balance;
mod expense;
mod ledger;
mod money;

pub use balance::*;
pub use expense::*;
pub use ledger::*;
pub use money::*;
