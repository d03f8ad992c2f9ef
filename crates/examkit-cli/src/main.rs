//! examkit CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "examkit", version, about = "Practice-test authoring and grading toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate test definitions
    Validate {
        /// Path to a .toml test definition or directory
        #[arg(long)]
        test: PathBuf,
    },

    /// Grade a saved answers file against a test definition
    Grade {
        /// Path to the .toml test definition
        #[arg(long)]
        test: PathBuf,

        /// Path to the answers JSON (question id -> answer value)
        #[arg(long)]
        answers: PathBuf,

        /// Seconds the learner spent on the attempt
        #[arg(long, default_value = "0")]
        time_spent: u64,

        /// Write an attempt report JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Compare two attempt reports of the same test
    Compare {
        /// Baseline attempt report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current attempt report JSON
        #[arg(long)]
        current: PathBuf,

        /// Score-point threshold below which a delta counts as unchanged
        #[arg(long, default_value = "5")]
        threshold: u8,

        /// Exit code 1 if any part dropped
        #[arg(long)]
        fail_on_drop: bool,

        /// Output format: text, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Fetch a test definition from a configured store and summarize it
    Fetch {
        /// Test id to fetch
        #[arg(long)]
        test_id: String,

        /// Store name from the config (defaults to the configured default)
        #[arg(long)]
        store: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example test definition
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examkit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { test } => commands::validate::execute(test),
        Commands::Grade {
            test,
            answers,
            time_spent,
            output,
        } => commands::grade::execute(test, answers, time_spent, output),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_drop,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_drop, format),
        Commands::Fetch {
            test_id,
            store,
            config,
        } => commands::fetch::execute(test_id, store, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
