//! The `examkit fetch` command.
//!
//! Loads a test definition through a configured content store and prints a
//! summary, which doubles as a connectivity check for remote stores.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examkit_store::{create_store, load_config};

pub async fn execute(
    test_id: String,
    store_name: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path.as_deref())?;

    let name = store_name.unwrap_or_else(|| config.default_store.clone());
    let store_config = config
        .stores
        .get(&name)
        .with_context(|| format!("store '{name}' not found in config"))?;
    let store = create_store(store_config);

    let definition = store
        .load_test(&test_id)
        .await
        .with_context(|| format!("failed to load '{test_id}' from store '{name}'"))?;

    println!("{} ({})", definition.title, definition.id);
    if !definition.description.is_empty() {
        println!("{}", definition.description);
    }
    for part in &definition.parts {
        println!(
            "  {} [{}]: {} question(s), {} example(s)",
            part.id,
            part.kind,
            part.scored_questions().count(),
            part.example_questions().count()
        );
    }

    Ok(())
}
