use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::domain::{
    compute_balances, compute_totals, AmountInput, BalanceEntry, ExpenseError, ExpenseRecord,
    Ledger, ParticipantTotals, RoundingMode, SharersInput,
};

use super::SessionSummary;

/// Settings that shape how a session reports balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub rounding: RoundingMode,
}

/// Session-scoped expense tracker.
/// This is the interface any presentation layer (CLI, GUI, server) talks to.
#[derive(Debug, Default)]
pub struct ExpenseService {
    ledger: Ledger,
    config: SessionConfig,
}

impl ExpenseService {
    /// Start an empty session with the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            ledger: Ledger::new(),
            config,
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    // ========================
    // Expense operations
    // ========================

    /// Record a new expense from raw caller input.
    ///
    /// `shared_with` is either comma-separated text or a list of names.
    pub fn add_expense<'a>(
        &mut self,
        description: &str,
        amount: impl Into<AmountInput<'a>>,
        payer: &str,
        shared_with: impl Into<SharersInput>,
    ) -> Result<&ExpenseRecord, ExpenseError> {
        match self.ledger.add(description, amount, payer, shared_with) {
            Ok(record) => {
                debug!(
                    id = %record.id,
                    amount = %record.amount,
                    payer = %record.payer,
                    sharers = record.sharers.len(),
                    "expense added"
                );
                Ok(record)
            }
            Err(err) => {
                debug!(error = %err, "expense rejected");
                Err(err)
            }
        }
    }

    /// Remove the expense at `index` (as listed by [`Self::list_expenses`]).
    pub fn remove_expense(&mut self, index: usize) -> Result<ExpenseRecord, ExpenseError> {
        let removed = self.ledger.remove_at(index)?;
        debug!(index, id = %removed.id, "expense removed");
        Ok(removed)
    }

    /// All expenses in insertion order.
    pub fn list_expenses(&self) -> &[ExpenseRecord] {
        self.ledger.list()
    }

    /// Drop every expense, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.ledger.len();
        self.ledger.clear();
        debug!(count, "ledger cleared");
        count
    }

    // ========================
    // Balance operations
    // ========================

    /// Fresh balance snapshot, one entry per participant in first-appearance order.
    pub fn get_balances(&self) -> Vec<BalanceEntry> {
        compute_balances(self.ledger.list(), self.config.rounding)
    }

    /// Paid and consumed totals per participant.
    pub fn participant_totals(&self) -> Vec<ParticipantTotals> {
        compute_totals(self.ledger.list())
    }

    pub fn summary(&self) -> SessionSummary {
        let balances = self.get_balances();
        SessionSummary::build(&self.ledger, &balances, self.config.rounding)
    }
}

/// Cloneable, thread-safe handle to one session.
///
/// Every call holds the lock for the whole operation, so a balance
/// computation never observes a ledger that is being modified.
#[derive(Debug, Clone, Default)]
pub struct SharedExpenseService {
    inner: Arc<Mutex<ExpenseService>>,
}

impl SharedExpenseService {
    pub fn new(config: SessionConfig) -> Self {
        Self::from_service(ExpenseService::new(config))
    }

    pub fn from_service(service: ExpenseService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ExpenseService> {
        // Operations never leave the ledger half-written, so a poisoned
        // lock still guards consistent data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_expense<'a>(
        &self,
        description: &str,
        amount: impl Into<AmountInput<'a>>,
        payer: &str,
        shared_with: impl Into<SharersInput>,
    ) -> Result<ExpenseRecord, ExpenseError> {
        self.lock()
            .add_expense(description, amount, payer, shared_with)
            .cloned()
    }

    pub fn remove_expense(&self, index: usize) -> Result<ExpenseRecord, ExpenseError> {
        self.lock().remove_expense(index)
    }

    pub fn list_expenses(&self) -> Vec<ExpenseRecord> {
        self.lock().list_expenses().to_vec()
    }

    pub fn get_balances(&self) -> Vec<BalanceEntry> {
        self.lock().get_balances()
    }

    pub fn summary(&self) -> SessionSummary {
        self.lock().summary()
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut ExpenseService) -> R) -> R {
        f(&mut self.lock())
    }
}
