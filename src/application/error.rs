use thiserror::Error;

use crate::domain::ExpenseError;

/// Failure of a single session command. None of these end the session.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Expense(#[from] ExpenseError),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Export failed: {0}")]
    Export(#[from] anyhow::Error),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// The underlying validation or index error, if that is what failed.
    pub fn as_expense_error(&self) -> Option<&ExpenseError> {
        match self {
            AppError::Expense(err) => Some(err),
            _ => None,
        }
    }
}
