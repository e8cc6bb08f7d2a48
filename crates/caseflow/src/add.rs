//! Interactive single-case entry.
//!
//! Pure I/O glue: prompts build one loose row that goes through the same
//! normalizing append path as every other insert. Required-field validation is
//! deliberately not applied here; blank answers are stored as nulls.

use anyhow::Result;
use caseflow_db::CaseDb;
use caseflow_model::{Cell, Table, CASE_COLUMNS, COURT_CHOICES};
use std::io::{self, BufRead, Write};
use std::path::Path;

const PROMPTS: [(&str, &str); 9] = [
    ("date", "Date (YYYY-MM-DD)"),
    ("complainant", "Complainant"),
    ("accused", "Accused"),
    ("offences", "Offences"),
    ("subject", "Subject"),
    // court_heard_in handled separately as a controlled list
    ("submitted", "Submitted? (yes/no)"),
    ("submitted_documents", "Submitted documents (comma-separated)"),
    ("last_court_date", "Last court date (YYYY-MM-DD)"),
    ("next_court_date", "Next court date (YYYY-MM-DD)"),
];

/// Prompt for one case row on stdin and append it to the database.
pub async fn run(db_path: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let mut answers: Vec<(String, Cell)> = Vec::with_capacity(CASE_COLUMNS.len());
    for (column, label) in PROMPTS {
        let answer = prompt(&mut lines, &format!("{label}: "))?;
        answers.push((column.to_string(), Cell::from_text(&answer)));
    }

    let court = prompt_court(&mut lines)?;
    answers.push(("court_heard_in".to_string(), Cell::from_text(&court)));

    let mut table = Table::new(answers.iter().map(|(c, _)| c.clone()).collect());
    table.push_row(answers.into_iter().map(|(_, cell)| cell).collect());

    let db = CaseDb::open(db_path).await?;
    db.append_cases(&table).await?;
    db.close().await;
    println!("Added case to DB");
    Ok(())
}

/// Controlled list with numbered choices; "Other" (or any free text) escapes it.
fn prompt_court(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<String> {
    println!("Select where the court matter is heard:");
    for (idx, choice) in COURT_CHOICES.iter().enumerate() {
        println!("{}. {}", idx + 1, choice);
    }
    let selection = prompt(lines, "Choose number (or type a custom name): ")?;

    match selection.trim().parse::<usize>() {
        Ok(idx) if (1..=COURT_CHOICES.len()).contains(&idx) => {
            let choice = COURT_CHOICES[idx - 1];
            if choice == "Other" {
                prompt(lines, "Enter court name: ")
            } else {
                Ok(choice.to_string())
            }
        }
        _ => Ok(selection),
    }
}

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    Ok(lines.next().transpose()?.unwrap_or_default())
}
