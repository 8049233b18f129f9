use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::application::{AppError, ExpenseService, SessionConfig};
use crate::domain::{format_amount, RoundingMode};
use crate::io::{ExportKind, Exporter};

/// Divvy - shared expense tracker
#[derive(Parser)]
#[command(name = "divvy")]
#[command(about = "Track shared expenses and see who owes whom")]
#[command(version)]
pub struct Cli {
    /// Read session commands from a file instead of stdin
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Rounding applied to balances: half-even or half-up
    #[arg(long, env = "DIVVY_ROUNDING", default_value = "half-even")]
    pub rounding: RoundingMode,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// One line of session input.
#[derive(Parser)]
#[command(name = "divvy", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Record a shared expense
    Add {
        /// What the money was spent on
        description: String,

        /// Amount paid (e.g., "30" or "12.50")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Who paid
        #[arg(short, long = "paid-by")]
        paid_by: String,

        /// Who shares the expense with the payer (comma-separated)
        #[arg(short, long = "shared-with", allow_hyphen_values = true)]
        shared_with: String,
    },

    /// Remove an expense by its index in the expense list
    Remove {
        /// Index as shown by `expenses`
        index: usize,
    },

    /// List recorded expenses
    #[command(alias = "list")]
    Expenses,

    /// Show each participant's net balance
    Balances,

    /// Show a summary of the session
    Summary,

    /// Export session data to CSV or JSON
    Export {
        /// What to export: expenses, balances (CSV) or full (JSON)
        kind: String,

        /// Output file (session output if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove every expense
    Clear,

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// Whether the session keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        crate::init_tracing(self.verbose);

        let config = SessionConfig {
            rounding: self.rounding,
        };
        info!(rounding = %config.rounding, "session started");

        let stdout = io::stdout();
        let mut session = Session::new(ExpenseService::new(config), stdout.lock());

        let processed = match &self.script {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open script: {}", path.display()))?;
                run_session(&mut session, BufReader::new(file))?
            }
            None => run_session(&mut session, io::stdin().lock())?,
        };

        info!(
            lines = processed,
            expenses = session.service().list_expenses().len(),
            "session ended"
        );
        Ok(())
    }
}

/// Feed every input line to the session until input ends or the session exits.
/// Command failures are reported on stderr and do not stop the session.
/// Returns the number of lines read.
pub fn run_session<R: BufRead, W: Write>(session: &mut Session<W>, reader: R) -> Result<usize> {
    let mut processed = 0;

    for line in reader.lines() {
        let line = line.context("Failed to read session input")?;
        processed += 1;

        match session.execute(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => {
                debug!(line = processed, error = %err, "command failed");
                eprintln!("Error: {}", err);
            }
        }
    }

    Ok(processed)
}

/// Interactive expense session: parses command lines and prints results to `out`.
pub struct Session<W: Write> {
    service: ExpenseService,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(service: ExpenseService, out: W) -> Self {
        Self { service, out }
    }

    pub fn service(&self) -> &ExpenseService {
        &self.service
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Execute one command line. Blank lines and `#` comments are ignored.
    pub fn execute(&mut self, line: &str) -> Result<LoopControl, AppError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        let tokens =
            shell_words::split(line).map_err(|e| AppError::InvalidCommand(e.to_string()))?;

        let parsed = match SessionLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed,
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp
                        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                write!(self.out, "{}", err.render())?;
                return Ok(LoopControl::Continue);
            }
            Err(err) => return Err(AppError::InvalidCommand(clap_message(&err))),
        };

        self.dispatch(parsed.command)
    }

    fn dispatch(&mut self, command: SessionCommand) -> Result<LoopControl, AppError> {
        match command {
            SessionCommand::Add {
                description,
                amount,
                paid_by,
                shared_with,
            } => {
                let record =
                    self.service
                        .add_expense(&description, &amount, &paid_by, shared_with)?;
                writeln!(self.out, "Added: {}", record)?;
            }

            SessionCommand::Remove { index } => {
                let removed = self.service.remove_expense(index)?;
                writeln!(self.out, "Removed: {}", removed)?;
            }

            SessionCommand::Expenses => {
                let expenses = self.service.list_expenses();
                if expenses.is_empty() {
                    writeln!(self.out, "No expenses recorded.")?;
                }
                for (index, expense) in expenses.iter().enumerate() {
                    writeln!(self.out, "[{}] {}", index, expense)?;
                }
            }

            SessionCommand::Balances => {
                let balances = self.service.get_balances();
                if balances.is_empty() {
                    writeln!(self.out, "No balances to show.")?;
                }
                for entry in balances {
                    writeln!(self.out, "{}", entry)?;
                }
            }

            SessionCommand::Summary => self.print_summary()?,

            SessionCommand::Export { kind, output } => {
                let kind: ExportKind = kind.parse().map_err(AppError::InvalidCommand)?;
                let exporter = Exporter::new(&self.service);

                match output {
                    Some(path) => {
                        let file = File::create(&path).with_context(|| {
                            format!("Failed to create output file: {}", path.display())
                        })?;
                        let count = exporter.export(kind, file)?;
                        info!(kind = kind.as_str(), count, path = %path.display(), "exported");
                        writeln!(
                            self.out,
                            "Exported {} {} to {}",
                            count,
                            kind.as_str(),
                            path.display()
                        )?;
                    }
                    None => {
                        exporter.export(kind, &mut self.out)?;
                    }
                }
            }

            SessionCommand::Clear => {
                let count = self.service.clear();
                writeln!(self.out, "Cleared {} expense(s).", count)?;
            }

            SessionCommand::Quit => return Ok(LoopControl::Exit),
        }

        Ok(LoopControl::Continue)
    }

    fn print_summary(&mut self) -> Result<(), AppError> {
        let summary = self.service.summary();

        writeln!(self.out, "Expenses:      {}", summary.expense_count)?;
        writeln!(self.out, "Participants:  {}", summary.participant_count)?;
        writeln!(
            self.out,
            "Total spent:   {}",
            format_amount(summary.total_spent)
        )?;
        writeln!(self.out, "Rounding:      {}", summary.rounding)?;
        if let Some(creditor) = &summary.largest_creditor {
            writeln!(
                self.out,
                "Owed the most: {} ({})",
                creditor.participant,
                format_amount(creditor.balance)
            )?;
        }
        if let Some(debtor) = &summary.largest_debtor {
            writeln!(
                self.out,
                "Owes the most: {} ({})",
                debtor.participant,
                format_amount(-debtor.balance)
            )?;
        }
        Ok(())
    }
}

/// First line of a clap error without its "error: " prefix.
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session<Vec<u8>> {
        Session::new(ExpenseService::default(), Vec::new())
    }

    fn output(session: Session<Vec<u8>>) -> String {
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
        SessionLine::command().debug_assert();
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let mut session = session();
        assert_eq!(session.execute("").unwrap(), LoopControl::Continue);
        assert_eq!(session.execute("   ").unwrap(), LoopControl::Continue);
        assert_eq!(session.execute("# add x 1").unwrap(), LoopControl::Continue);
        assert!(output(session).is_empty());
    }

    #[test]
    fn test_add_with_quoted_description() {
        let mut session = session();
        session
            .execute(r#"add "Team dinner" 30 --paid-by Alice --shared-with "Bob, Carol""#)
            .unwrap();

        assert_eq!(
            output(session),
            "Added: Team dinner: 30.00 paid by Alice shared with Bob, Carol\n"
        );
    }

    #[test]
    fn test_validation_error_surfaces() {
        let mut session = session();
        let err = session
            .execute("add x abc --paid-by A --shared-with B")
            .unwrap_err();
        assert!(matches!(
            err.as_expense_error(),
            Some(crate::domain::ExpenseError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_negative_amount_reaches_validation() {
        let mut session = session();
        let err = session
            .execute("add x -5 --paid-by A --shared-with B")
            .unwrap_err();
        assert!(matches!(
            err.as_expense_error(),
            Some(crate::domain::ExpenseError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_unknown_command() {
        let mut session = session();
        let err = session.execute("settle").unwrap_err();
        assert!(matches!(err, AppError::InvalidCommand(_)));
    }

    #[test]
    fn test_unbalanced_quotes() {
        let mut session = session();
        let err = session.execute(r#"add "Dinner 30"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidCommand(_)));
    }

    #[test]
    fn test_unknown_export_kind() {
        let mut session = session();
        let err = session.execute("export wallets").unwrap_err();
        assert!(matches!(err, AppError::InvalidCommand(_)));
    }

    #[test]
    fn test_help_is_printed_not_an_error() {
        let mut session = session();
        assert_eq!(session.execute("help").unwrap(), LoopControl::Continue);
        assert!(output(session).contains("balances"));
    }

    #[test]
    fn test_quit_and_exit() {
        let mut session = session();
        assert_eq!(session.execute("quit").unwrap(), LoopControl::Exit);
        assert_eq!(session.execute("exit").unwrap(), LoopControl::Exit);
    }
}
