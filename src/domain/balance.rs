use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{format_amount, Amount, ExpenseRecord, RoundingMode};

/// Net position of one participant relative to the group.
/// Positive: the group owes them. Zero or negative: they owe the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub participant: String,
    pub balance: Amount,
}

impl BalanceEntry {
    pub fn standing(&self) -> Standing {
        Standing::from_balance(self.balance)
    }
}

impl fmt::Display for BalanceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.participant, self.standing())
    }
}

/// Display classification of a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    /// The group owes this amount to the participant.
    IsOwed(Amount),
    /// The participant owes this amount to the group. A zero balance lands
    /// here and prints as "owes: 0.00".
    Owes(Amount),
}

impl Standing {
    pub fn from_balance(balance: Amount) -> Self {
        if balance > Amount::ZERO {
            Standing::IsOwed(balance)
        } else if balance.is_zero() {
            Standing::Owes(Amount::ZERO)
        } else {
            Standing::Owes(-balance)
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            Standing::IsOwed(amount) | Standing::Owes(amount) => *amount,
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standing::IsOwed(amount) => write!(f, "is owed: {}", format_amount(*amount)),
            Standing::Owes(amount) => write!(f, "owes: {}", format_amount(*amount)),
        }
    }
}

/// Running balances keyed by participant, remembering first-appearance order.
#[derive(Default)]
struct BalanceSheet {
    index: HashMap<String, usize>,
    entries: Vec<BalanceEntry>,
}

impl BalanceSheet {
    fn entry(&mut self, participant: &str) -> &mut Amount {
        let position = match self.index.get(participant) {
            Some(&position) => position,
            None => {
                self.entries.push(BalanceEntry {
                    participant: participant.to_string(),
                    balance: Amount::ZERO,
                });
                let position = self.entries.len() - 1;
                self.index.insert(participant.to_string(), position);
                position
            }
        };
        &mut self.entries[position].balance
    }
}

/// Compute unrounded net balances for every participant in the ledger.
///
/// For each record the payer is credited `amount - share` and every sharer
/// entry is debited `share`, where `share = amount / (sharers + 1)`.
/// Entries come back in first-appearance order.
pub fn compute_raw_balances(records: &[ExpenseRecord]) -> Vec<BalanceEntry> {
    let mut sheet = BalanceSheet::default();

    for record in records {
        let share = record.share();
        *sheet.entry(&record.payer) += record.amount - share;
        for sharer in &record.sharers {
            *sheet.entry(sharer) -= share;
        }
    }

    sheet.entries
}

/// Compute net balances rounded to two decimals with the given rounding mode.
pub fn compute_balances(records: &[ExpenseRecord], rounding: RoundingMode) -> Vec<BalanceEntry> {
    compute_raw_balances(records)
        .into_iter()
        .map(|entry| BalanceEntry {
            balance: rounding.round(entry.balance),
            ..entry
        })
        .collect()
}

/// Money fronted and consumed by one participant across the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantTotals {
    pub participant: String,
    /// Sum of amounts this participant paid for
    pub paid: Amount,
    /// Sum of shares this participant consumed, including their own share
    /// of expenses they paid
    pub consumed: Amount,
}

impl ParticipantTotals {
    /// Unrounded net balance: `paid - consumed`.
    pub fn net(&self) -> Amount {
        self.paid - self.consumed
    }
}

/// Per-participant paid/consumed totals in first-appearance order.
pub fn compute_totals(records: &[ExpenseRecord]) -> Vec<ParticipantTotals> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ParticipantTotals> = Vec::new();

    for record in records {
        let share = record.share();
        for (position, participant) in record.participants().enumerate() {
            let slot = *index.entry(participant).or_insert_with(|| {
                totals.push(ParticipantTotals {
                    participant: participant.to_string(),
                    paid: Amount::ZERO,
                    consumed: Amount::ZERO,
                });
                totals.len() - 1
            });
            if position == 0 {
                totals[slot].paid += record.amount;
            }
            totals[slot].consumed += share;
        }
    }

    totals
}
