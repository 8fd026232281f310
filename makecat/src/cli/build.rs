use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, ValueEnum};
use wincat::catalogue::{Catalogue, Entry, Extension, Identifier};
use wincat::hash::{Sha1Sink, Sha256Sink};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Algorithm {
    Sha1,
    Sha256,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Files to include in the catalogue.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Where to write the catalogue DER bytes.
    #[arg(long, short = 'o')]
    output: PathBuf,

    /// Hash algorithm: sha1 produces a v1 catalogue, sha256 a v2 catalogue.
    #[arg(long, value_enum, default_value_t = Algorithm::Sha256)]
    algorithm: Algorithm,

    /// Compute and embed per-page hashes for PE entries.
    #[arg(long)]
    page_hashes: bool,

    /// 16-byte hex catalogue identifier; a random one is used if omitted.
    #[arg(long)]
    identifier: Option<String>,

    /// Catalogue-level extension, repeatable: NAME=VALUE[:FLAGS] (FLAGS
    /// is hex, defaults to 0).
    #[arg(long = "extension", value_parser = parse_extension)]
    extensions: Vec<Extension>,
}

fn parse_extension(raw: &str) -> Result<Extension, String> {
    let (name, rest) = raw.split_once('=').ok_or_else(|| "expected NAME=VALUE[:FLAGS]".to_string())?;
    let (value, flags) = match rest.rsplit_once(':') {
        Some((value, flags_hex)) => {
            let flags = u32::from_str_radix(flags_hex.trim_start_matches("0x"), 16)
                .map_err(|e| format!("bad flags {flags_hex:?}: {e}"))?;
            (value, flags)
        }
        None => (rest, 0),
    };
    Ok(Extension::new(name, flags, value))
}

impl BuildArgs {
    pub fn run(self) -> Result<()> {
        let identifier = match &self.identifier {
            Some(hex_str) => {
                let bytes = hex::decode(hex_str).context("identifier must be hex")?;
                if bytes.len() != 16 {
                    bail!("identifier must decode to exactly 16 bytes, got {}", bytes.len());
                }
                let mut array = [0u8; 16];
                array.copy_from_slice(&bytes);
                Identifier(array)
            }
            None => Identifier::random(),
        };

        let entries = self.files.iter().cloned().map(Entry::new).collect();
        let catalogue = Catalogue {
            identifier,
            timestamp: Utc::now(),
            entries,
            extensions: self.extensions,
            page_hashes: self.page_hashes,
        };

        let bytes = match self.algorithm {
            Algorithm::Sha1 => wincat::catalogue::build::<Sha1Sink>(&catalogue),
            Algorithm::Sha256 => wincat::catalogue::build::<Sha256Sink>(&catalogue),
        }
        .context("failed to build catalogue")?;

        std::fs::write(&self.output, &bytes)
            .with_context(|| format!("writing {}", self.output.display()))?;
        tracing::info!(path = %self.output.display(), bytes = bytes.len(), "wrote catalogue");
        Ok(())
    }
}
