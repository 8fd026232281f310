use anyhow::Result;
use clap::{Parser, Subcommand};

mod build;
mod digest;
mod pagehash;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug)]
pub struct GlobalArgs {
    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a security catalogue from a list of files.
    Build(build::BuildArgs),
    /// Print the Authenticode digest of a single PE image.
    Digest(digest::DigestArgs),
    /// Print the page-hash vector of a single PE image.
    PageHash(pagehash::PageHashArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Build(args) => args.run(),
            Commands::Digest(args) => args.run(),
            Commands::PageHash(args) => args.run(),
        }
    }
}
