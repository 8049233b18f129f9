use serde::{Deserialize, Serialize};

use crate::domain::{Amount, BalanceEntry, Ledger, RoundingMode};

/// Overview of the current session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub expense_count: usize,
    pub participant_count: usize,
    pub total_spent: Amount,
    /// Participant the group owes the most, if anyone is owed
    pub largest_creditor: Option<BalanceEntry>,
    /// Participant who owes the group the most, if anyone owes
    pub largest_debtor: Option<BalanceEntry>,
    pub rounding: RoundingMode,
}

impl SessionSummary {
    /// Build a summary from the ledger and its already rounded balances.
    pub fn build(ledger: &Ledger, balances: &[BalanceEntry], rounding: RoundingMode) -> Self {
        let largest_creditor = balances
            .iter()
            .filter(|e| e.balance > Amount::ZERO)
            .fold(None::<&BalanceEntry>, |best, e| match best {
                Some(b) if b.balance >= e.balance => Some(b),
                _ => Some(e),
            })
            .cloned();

        let largest_debtor = balances
            .iter()
            .filter(|e| e.balance < Amount::ZERO)
            .fold(None::<&BalanceEntry>, |best, e| match best {
                Some(b) if b.balance <= e.balance => Some(b),
                _ => Some(e),
            })
            .cloned();

        Self {
            expense_count: ledger.len(),
            participant_count: balances.len(),
            total_spent: ledger.total_spent(),
            largest_creditor,
            largest_debtor,
            rounding,
        }
    }
}
