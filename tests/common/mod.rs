// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::str::FromStr;

use divvy::application::{ExpenseService, SessionConfig};
use divvy::domain::{Amount, BalanceEntry, RoundingMode};

/// Helper to create an empty session with default settings
pub fn test_service() -> ExpenseService {
    ExpenseService::new(SessionConfig::default())
}

/// Helper to create an empty session with the given rounding mode
pub fn test_service_with(rounding: RoundingMode) -> ExpenseService {
    ExpenseService::new(SessionConfig { rounding })
}

/// Helper to build an exact decimal from a literal
pub fn dec(s: &str) -> Amount {
    Amount::from_str(s).unwrap()
}

/// Look up one participant's balance
pub fn balance_of(balances: &[BalanceEntry], name: &str) -> Option<Amount> {
    balances
        .iter()
        .find(|e| e.participant == name)
        .map(|e| e.balance)
}

/// Test fixture: the dinner-and-taxi evening
pub struct Evening;

impl Evening {
    /// Alice pays 30 for dinner with Bob and Carol
    pub fn dinner(service: &mut ExpenseService) -> anyhow::Result<()> {
        service.add_expense("Dinner", 30, "Alice", ["Bob", "Carol"])?;
        Ok(())
    }

    /// Bob pays 9 for a taxi with Alice
    pub fn taxi(service: &mut ExpenseService) -> anyhow::Result<()> {
        service.add_expense("Taxi", 9, "Bob", ["Alice"])?;
        Ok(())
    }

    pub fn full(service: &mut ExpenseService) -> anyhow::Result<()> {
        Self::dinner(service)?;
        Self::taxi(service)
    }
}
