use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fukugyo_data::RateTableLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Validate a rate table file and write it out as TOML.
///
/// Without `--file` the built-in tables are used, so running with no
/// arguments prints a complete template to start editing from.
///
/// The optional bracket CSV should have the following columns:
/// - min_income: exclusive lower bound of the bracket
/// - max_income: inclusive upper bound (empty for unlimited)
/// - rate: the marginal rate as a decimal (e.g., 0.10)
/// - subtracted_amount: amount subtracted from `income * rate`
#[derive(Parser, Debug)]
#[command(name = "fukugyo-rates")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML rate table file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a CSV file replacing the income tax brackets
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Write the merged tables here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let tables = RateTableLoader::load(args.file.as_deref(), args.brackets.as_deref())
        .context("Failed to load rate tables")?;

    info!(
        label = %tables.label,
        brackets = tables.income_tax_brackets.len(),
        "rate tables are valid"
    );

    let text = RateTableLoader::to_toml_string(&tables).context("Failed to render rate tables")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            info!(path = %path.display(), "wrote rate tables");
        }
        None => print!("{text}"),
    }

    Ok(())
}
