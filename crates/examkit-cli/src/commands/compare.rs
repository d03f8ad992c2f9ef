//! The `examkit compare` command.

use std::path::PathBuf;

use anyhow::Result;

use examkit_core::report::AttemptReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: u8,
    fail_on_drop: bool,
    format: String,
) -> Result<()> {
    let baseline = AttemptReport::load_json(&baseline_path)?;
    let current = AttemptReport::load_json(&current_path)?;

    if baseline.test.id != current.test.id {
        anyhow::bail!(
            "reports are for different tests: {} vs {}",
            baseline.test.id,
            current.test.id
        );
    }

    let progress = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" => println!("{}", progress.to_markdown()),
        "text" => {
            println!(
                "Overall: {}% -> {}% ({:+} points)",
                baseline.result.score, current.result.score, progress.overall_delta
            );
            for g in &progress.gains {
                println!(
                    "  improved {}: {}% -> {}%",
                    g.part_id, g.baseline_score, g.current_score
                );
            }
            for d in &progress.drops {
                println!(
                    "  dropped  {}: {}% -> {}%",
                    d.part_id, d.baseline_score, d.current_score
                );
            }
            println!(
                "  {} unchanged, {} new, {} removed",
                progress.unchanged, progress.new_parts, progress.removed_parts
            );
        }
        other => anyhow::bail!("unknown format: {other}"),
    }

    if fail_on_drop && progress.has_drops() {
        std::process::exit(1);
    }

    Ok(())
}
