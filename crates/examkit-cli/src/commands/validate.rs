//! The `examkit validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(test_path: PathBuf) -> Result<()> {
    let tests = if test_path.is_dir() {
        examkit_core::parser::load_test_directory(&test_path)?
    } else {
        vec![examkit_core::parser::parse_test(&test_path)?]
    };

    let mut total_warnings = 0;

    for test in &tests {
        println!(
            "Test: {} ({} parts, {} scored questions)",
            test.title,
            test.parts.len(),
            test.scored_question_count()
        );

        let warnings = examkit_core::parser::validate_test(test);
        for w in &warnings {
            let prefix = w
                .part_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All test definitions valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
