//! The `examkit grade` command.
//!
//! Scores a saved answers file (question id -> answer value, the same JSON
//! shape the answer store snapshots) against a test definition.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use examkit_core::answers::AnswerValue;
use examkit_core::parser;
use examkit_core::report::AttemptReport;
use examkit_core::scoring::{score_attempt, TestResult};

pub fn execute(
    test_path: PathBuf,
    answers_path: PathBuf,
    time_spent: u64,
    output: Option<PathBuf>,
) -> Result<()> {
    let definition = parser::parse_test(&test_path)?;

    let answers_json = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers from {}", answers_path.display()))?;
    let snapshot: HashMap<String, AnswerValue> =
        serde_json::from_str(&answers_json).context("failed to parse answers JSON")?;

    let result = score_attempt(&definition, &snapshot, time_spent);

    println!("{} (attempt {})", definition.title, result.attempt_id);
    print_summary(&result);

    if let Some(path) = output {
        let report = AttemptReport::new(&definition, result);
        report.save_json(&path)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn print_summary(result: &TestResult) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Part", "Kind", "Correct", "Score"]);

    for part in &result.per_part {
        table.add_row(vec![
            Cell::new(&part.part_id),
            Cell::new(part.kind.to_string()),
            Cell::new(format!("{}/{}", part.correct, part.total)),
            Cell::new(format!("{}%", part.score)),
        ]);
    }
    table.add_row(vec![
        Cell::new("total"),
        Cell::new(""),
        Cell::new(format!("{}/{}", result.correct_count, result.total_count)),
        Cell::new(format!("{}%", result.score)),
    ]);

    println!("{table}");
}
