use clap::Parser;
use tracing::debug;

use fukugyo_cli::cli::Cli;
use fukugyo_cli::{commands, logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_file.as_deref())?;
    debug!(command = ?cli.command, "starting");

    let output = commands::run(&cli)?;
    print!("{output}");

    Ok(())
}
