use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use wincat::hash::{Sha1Sink, Sha256Sink};
use wincat::pagehash;
use wincat::PeView;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Algorithm {
    Sha1,
    Sha256,
}

#[derive(Args, Debug)]
pub struct PageHashArgs {
    /// PE image to enumerate page hashes for.
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = Algorithm::Sha256)]
    algorithm: Algorithm,
}

impl PageHashArgs {
    pub fn run(self) -> Result<()> {
        let data = std::fs::read(&self.file).with_context(|| format!("reading {}", self.file.display()))?;
        let pe = PeView::parse(&data).context("parsing PE image")?;

        match self.algorithm {
            Algorithm::Sha1 => {
                for entry in pagehash::page_hashes::<Sha1Sink>(&pe)? {
                    println!("{:#010x} {}", entry.offset, hex::encode(entry.digest));
                }
            }
            Algorithm::Sha256 => {
                for entry in pagehash::page_hashes::<Sha256Sink>(&pe)? {
                    println!("{:#010x} {}", entry.offset, hex::encode(entry.digest));
                }
            }
        }
        Ok(())
    }
}
