//! The `examkit init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create examkit.toml
    if std::path::Path::new("examkit.toml").exists() {
        println!("examkit.toml already exists, skipping.");
    } else {
        std::fs::write("examkit.toml", SAMPLE_CONFIG)?;
        println!("Created examkit.toml");
    }

    // Create example test definition
    std::fs::create_dir_all("tests")?;
    let example_path = std::path::Path::new("tests/sample-test.toml");
    if example_path.exists() {
        println!("tests/sample-test.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_TEST)?;
        println!("Created tests/sample-test.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: examkit validate --test tests/sample-test.toml");
    println!("  2. Author your own tests under tests/");
    println!("  3. Grade saved answers: examkit grade --test <test> --answers <json>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examkit configuration

default_store = "local"

[stores.local]
type = "file"
root = "."

[stores.remote]
type = "http"
base_url = "https://content.example.com/api"
api_token = "${EXAMKIT_API_TOKEN}"
"#;

const EXAMPLE_TEST: &str = r#"[test]
id = "sample-reading"
title = "Sample Reading Practice"
description = "A two-part reading exercise to get started"

[[parts]]
id = "gaps"
kind = "gap-fill"
passage = "The library was [Q1] on Sunday, so we stayed [Q2]."

[[parts.questions]]
id = "q1"
options = [
    { key = "a", text = "closed" },
    { key = "b", text = "purple" },
]
answer = { type = "key", value = "a" }

[[parts.questions]]
id = "q2"
options = [
    { key = "a", text = "home" },
    { key = "b", text = "loudly" },
]
answer = { type = "key", value = "a" }

[[parts]]
id = "order"
kind = "ordering"

[[parts.questions]]
id = "s0"
prompt = "First, we packed our bags."
is_example = true

[[parts.questions]]
id = "s1"
prompt = "Then, we walked to the station."

[[parts.questions]]
id = "s2"
prompt = "After that, we caught the train."

[[parts.questions]]
id = "s3"
prompt = "Finally, we arrived at the coast."
"#;
