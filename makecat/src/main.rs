use anyhow::Result;
use clap::Parser;

mod cli;
mod tracing_init;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_init::init(&cli.global)?;
    cli.run()
}
