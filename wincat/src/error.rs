use std::path::PathBuf;

/// Errors produced while reading a PE image, computing an Authenticode
/// digest or page-hash vector, or assembling a catalogue.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("truncated PE image: need at least {needed} bytes, have {have}")]
    TooShort { needed: usize, have: usize },

    #[error("bad DOS signature (expected MZ)")]
    BadDosSignature,

    #[error("bad PE signature (expected PE\\0\\0)")]
    BadPeSignature,

    #[error("unrecognized optional header magic {0:#06x}")]
    BadOptionalMagic(u16),

    #[error("malformed PE image: {0}")]
    MalformedPe(String),

    #[error("section {index} out of bounds: pointer {pointer:#x} size {size:#x} exceeds file length {len:#x}")]
    SectionOutOfBounds {
        index: usize,
        pointer: u32,
        size: u32,
        len: usize,
    },

    #[error("DER encoding failed: {0}")]
    DerEncode(#[from] rasn::error::EncodeError),

    #[error("unsupported: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, Error>;
