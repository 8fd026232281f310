//! Authenticode PE digesting and Microsoft security-catalogue (`.cat`)
//! construction: the two tightly-coupled subsystems behind `makecat`.
//!
//! This crate does not parse CDF files, rewrite INF files, perform file
//! I/O beyond read-only memory mapping, or sign the PKCS#7 envelope it
//! produces — those remain the responsibility of a front-end and a
//! separate signing tool.

pub mod asn1;
pub mod authenticode;
pub mod catalogue;
pub mod error;
pub mod hash;
pub mod pagehash;
pub mod pe;

#[cfg(test)]
mod testutil;

pub use catalogue::{Catalogue, Entry, Extension, Identifier};
pub use error::{Error, Result};
pub use hash::{Algorithm, HashSink, Sha1Sink, Sha256Sink};
pub use pe::PeView;
