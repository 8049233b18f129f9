use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Amount, AmountInput, ExpenseRecord, SharersInput};

/// Required text field of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Description,
    Payer,
    Sharers,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Description => "description",
            Field::Payer => "payer",
            Field::Sharers => "sharers",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpenseError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Missing required field: {0}")]
    MissingField(Field),

    #[error("Payer {0} cannot also be listed among the sharers")]
    PayerInSharers(String),

    #[error("No expense at index {index} (ledger has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered collection of expense records. Insertion order is preserved and
/// records are addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    records: Vec<ExpenseRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a new expense.
    ///
    /// Checks run in order and the first failure wins:
    /// 1. the amount is a finite, positive number
    /// 2. description, payer and at least one sharer are non-empty once trimmed
    /// 3. the payer is not listed among the sharers
    /// 4. the ledger total stays within the `Decimal` range
    ///
    /// All fields are stored trimmed; empty sharer entries are dropped.
    /// Nothing is appended on failure.
    pub fn add<'a>(
        &mut self,
        description: &str,
        amount: impl Into<AmountInput<'a>>,
        payer: &str,
        sharers: impl Into<SharersInput>,
    ) -> Result<&ExpenseRecord, ExpenseError> {
        let amount = validate_amount(amount.into())?;

        let description = description.trim();
        if description.is_empty() {
            return Err(ExpenseError::MissingField(Field::Description));
        }
        let payer = payer.trim();
        if payer.is_empty() {
            return Err(ExpenseError::MissingField(Field::Payer));
        }
        let sharers = sharers.into().normalize();
        if sharers.is_empty() {
            return Err(ExpenseError::MissingField(Field::Sharers));
        }

        if sharers.iter().any(|name| name == payer) {
            return Err(ExpenseError::PayerInSharers(payer.to_string()));
        }

        // Every balance and total is bounded by the ledger total, so keeping
        // that sum representable keeps the balance engine overflow-free.
        if self.total_spent().checked_add(amount).is_none() {
            return Err(ExpenseError::InvalidAmount(
                "total of all expenses is out of range".to_string(),
            ));
        }

        self.records.push(ExpenseRecord::new(
            description.to_string(),
            amount,
            payer.to_string(),
            sharers,
        ));
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    /// Remove the record at `index`, shifting later records down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<ExpenseRecord, ExpenseError> {
        if index >= self.records.len() {
            return Err(ExpenseError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(index))
    }

    pub fn list(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&ExpenseRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Sum of all recorded amounts.
    pub fn total_spent(&self) -> Amount {
        self.records.iter().map(|record| record.amount).sum()
    }
}

fn validate_amount(input: AmountInput<'_>) -> Result<Amount, ExpenseError> {
    let amount = input
        .resolve()
        .map_err(|e| ExpenseError::InvalidAmount(e.to_string()))?;
    if amount <= Amount::ZERO {
        return Err(ExpenseError::InvalidAmount(
            "Amount must be positive".to_string(),
        ));
    }
    Ok(amount)
}
