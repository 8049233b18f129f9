mod common;

use std::fs;

use anyhow::Result;
use common::test_service;
use divvy::cli::{run_session, Session};
use tempfile::TempDir;

const EVENING: &str = r#"
# dinner and a ride home
add Dinner 30 --paid-by Alice --shared-with "Bob, Carol"
add Taxi 9 -p Bob -s Alice
balances
"#;

fn run(script: &str) -> Result<String> {
    let mut session = Session::new(test_service(), Vec::new());
    run_session(&mut session, script.as_bytes())?;
    Ok(String::from_utf8(session.into_output())?)
}

#[test]
fn test_script_prints_balances() -> Result<()> {
    let output = run(EVENING)?;
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Added: Dinner: 30.00 paid by Alice shared with Bob, Carol",
            "Added: Taxi: 9.00 paid by Bob shared with Alice",
            "Alice is owed: 15.50",
            "Bob owes: 5.50",
            "Carol owes: 10.00",
        ]
    );
    Ok(())
}

#[test]
fn test_errors_do_not_stop_the_session() -> Result<()> {
    let output = run(
        "add Dinner abc --paid-by Alice --shared-with Bob\n\
         remove 3\n\
         add Dinner 30 --paid-by Alice --shared-with Bob\n\
         expenses\n",
    )?;

    assert_eq!(
        output,
        "Added: Dinner: 30.00 paid by Alice shared with Bob\n\
         [0] Dinner: 30.00 paid by Alice shared with Bob\n"
    );
    Ok(())
}

#[test]
fn test_remove_then_list() -> Result<()> {
    let output = run(
        "add a 10 -p A -s B\n\
         add b 20 -p A -s B\n\
         add c 30 -p A -s B\n\
         remove 1\n\
         expenses\n",
    )?;

    assert!(output.contains("Removed: b: 20.00 paid by A shared with B\n"));
    assert!(output.ends_with("[0] a: 10.00 paid by A shared with B\n[1] c: 30.00 paid by A shared with B\n"));
    Ok(())
}

#[test]
fn test_quit_stops_reading() -> Result<()> {
    let mut session = Session::new(test_service(), Vec::new());
    let processed = run_session(&mut session, "expenses\nquit\nexpenses\n".as_bytes())?;

    assert_eq!(processed, 2);
    assert_eq!(
        String::from_utf8(session.into_output())?,
        "No expenses recorded.\n"
    );
    Ok(())
}

#[test]
fn test_summary_and_clear() -> Result<()> {
    let output = run(&format!("{EVENING}summary\nclear\nbalances\n"))?;

    assert!(output.contains("Expenses:      2\n"));
    assert!(output.contains("Participants:  3\n"));
    assert!(output.contains("Total spent:   39.00\n"));
    assert!(output.contains("Rounding:      half-even\n"));
    assert!(output.contains("Owed the most: Alice (15.50)\n"));
    assert!(output.contains("Owes the most: Carol (10.00)\n"));
    assert!(output.contains("Cleared 2 expense(s).\n"));
    assert!(output.ends_with("No balances to show.\n"));
    Ok(())
}

#[test]
fn test_export_to_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let balances_path = temp_dir.path().join("balances.csv");
    let full_path = temp_dir.path().join("session.json");

    let script = format!(
        "{EVENING}export balances --output {}\nexport full -o {}\n",
        balances_path.display(),
        full_path.display()
    );
    let output = run(&script)?;
    assert!(output.contains("Exported 3 balances to "));
    assert!(output.contains("Exported 2 full to "));

    let csv = fs::read_to_string(&balances_path)?;
    assert_eq!(
        csv,
        "participant,balance,standing\n\
         Alice,15.50,is owed: 15.50\n\
         Bob,-5.50,owes: 5.50\n\
         Carol,-10.00,owes: 10.00\n"
    );

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&full_path)?)?;
    assert_eq!(json["expenses"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["summary"]["participant_count"], 3);

    Ok(())
}

#[test]
fn test_export_to_session_output() -> Result<()> {
    let output = run("add Dinner 30 -p Alice -s Bob,Carol\nexport expenses\n")?;
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(
        lines[1],
        "index,id,recorded_at,description,amount,payer,sharers"
    );
    assert!(lines[2].starts_with("0,"));
    assert!(lines[2].ends_with(",Dinner,30,Alice,Bob;Carol"));
    Ok(())
}
