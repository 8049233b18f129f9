use std::io::Write;
use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{ExpenseService, SessionSummary};
use crate::domain::{format_amount, BalanceEntry, ExpenseRecord};

/// What to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Expenses,
    Balances,
    Full,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Expenses => "expenses",
            ExportKind::Balances => "balances",
            ExportKind::Full => "full",
        }
    }
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expenses" => Ok(ExportKind::Expenses),
            "balances" => Ok(ExportKind::Balances),
            "full" => Ok(ExportKind::Full),
            other => Err(format!(
                "Unknown export type '{}'. Valid types: expenses, balances, full",
                other
            )),
        }
    }
}

/// Point-in-time copy of a whole session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub expenses: Vec<ExpenseRecord>,
    pub balances: Vec<BalanceEntry>,
    pub summary: SessionSummary,
}

/// Exporter for writing session data as CSV or JSON.
pub struct Exporter<'a> {
    service: &'a ExpenseService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a ExpenseService) -> Self {
        Self { service }
    }

    /// Export in the given kind's default format; returns the number of rows
    /// (or expenses, for a full snapshot) written.
    pub fn export<W: Write>(&self, kind: ExportKind, writer: W) -> Result<usize> {
        match kind {
            ExportKind::Expenses => self.export_expenses_csv(writer),
            ExportKind::Balances => self.export_balances_csv(writer),
            ExportKind::Full => Ok(self.export_full_json(writer)?.expenses.len()),
        }
    }

    /// Export expenses to CSV format
    pub fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "index",
            "id",
            "recorded_at",
            "description",
            "amount",
            "payer",
            "sharers",
        ])?;

        let mut count = 0;
        for (index, expense) in self.service.list_expenses().iter().enumerate() {
            csv_writer.write_record([
                index.to_string(),
                expense.id.to_string(),
                expense.recorded_at.to_rfc3339(),
                expense.description.clone(),
                expense.amount.to_string(),
                expense.payer.clone(),
                expense.sharers.join(";"),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export balances to CSV format
    pub fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["participant", "balance", "standing"])?;

        let mut count = 0;
        for entry in self.service.get_balances() {
            csv_writer.write_record([
                entry.participant.clone(),
                format_amount(entry.balance),
                entry.standing().to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full session as a JSON snapshot
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<SessionSnapshot> {
        let snapshot = SessionSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            expenses: self.service.list_expenses().to_vec(),
            balances: self.service.get_balances(),
            summary: self.service.summary(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}
