use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{format_amount, Amount};

pub type ExpenseId = Uuid;

/// One shared expense: `payer` fronted `amount`, which is split equally
/// between the payer and every entry in `sharers`.
/// Records are immutable - a mistake is corrected by removing the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    /// Free-form label, not required to be unique
    pub description: String,
    /// Always positive
    pub amount: Amount,
    /// Participant who fronted the money
    pub payer: String,
    /// Participants sharing the expense with the payer. A name listed twice
    /// carries two shares.
    pub sharers: Vec<String>,
    /// When the record was added to the ledger
    pub recorded_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Build a record from already validated fields. Use `Ledger::add` to go
    /// through validation.
    pub(crate) fn new(
        description: String,
        amount: Amount,
        payer: String,
        sharers: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            amount,
            payer,
            sharers,
            recorded_at: Utc::now(),
        }
    }

    /// Number of equal portions: the payer plus one per sharer entry.
    pub fn head_count(&self) -> usize {
        self.sharers.len() + 1
    }

    /// The equal per-person portion of this expense.
    pub fn share(&self) -> Amount {
        self.amount / Amount::from(self.head_count())
    }

    /// Every participant referenced by this record, payer first.
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.payer.as_str()).chain(self.sharers.iter().map(String::as_str))
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} paid by {} shared with {}",
            self.description,
            format_amount(self.amount),
            self.payer,
            self.sharers.join(", ")
        )
    }
}

/// The list of sharers as supplied by a caller: one comma-separated string
/// or individual names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharersInput {
    CommaSeparated(String),
    Names(Vec<String>),
}

impl SharersInput {
    /// Trimmed, non-empty names in input order. Duplicates are kept.
    pub fn normalize(&self) -> Vec<String> {
        let names: Vec<&str> = match self {
            SharersInput::CommaSeparated(text) => text.split(',').collect(),
            SharersInput::Names(names) => names.iter().map(String::as_str).collect(),
        };

        names
            .into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl From<&str> for SharersInput {
    fn from(text: &str) -> Self {
        SharersInput::CommaSeparated(text.to_string())
    }
}

impl From<String> for SharersInput {
    fn from(text: String) -> Self {
        SharersInput::CommaSeparated(text)
    }
}

impl From<Vec<String>> for SharersInput {
    fn from(names: Vec<String>) -> Self {
        SharersInput::Names(names)
    }
}

impl From<Vec<&str>> for SharersInput {
    fn from(names: Vec<&str>) -> Self {
        SharersInput::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SharersInput {
    fn from(names: [&str; N]) -> Self {
        SharersInput::Names(names.iter().map(|name| name.to_string()).collect())
    }
}

impl From<&[&str]> for SharersInput {
    fn from(names: &[&str]) -> Self {
        SharersInput::Names(names.iter().map(|name| name.to_string()).collect())
    }
}
