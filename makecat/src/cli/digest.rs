use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use wincat::authenticode;
use wincat::hash::{Sha1Sink, Sha256Sink};
use wincat::PeView;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Algorithm {
    Sha1,
    Sha256,
}

#[derive(Args, Debug)]
pub struct DigestArgs {
    /// PE image to digest.
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = Algorithm::Sha256)]
    algorithm: Algorithm,
}

impl DigestArgs {
    pub fn run(self) -> Result<()> {
        let data = std::fs::read(&self.file).with_context(|| format!("reading {}", self.file.display()))?;
        let pe = PeView::parse(&data).context("parsing PE image")?;

        let hex = match self.algorithm {
            Algorithm::Sha1 => hex::encode(authenticode::digest::<Sha1Sink>(&pe)?),
            Algorithm::Sha256 => hex::encode(authenticode::digest::<Sha256Sink>(&pe)?),
        };
        println!("{hex}");
        Ok(())
    }
}
