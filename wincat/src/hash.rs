//! Hash sink abstraction over the RustCrypto `digest::Digest` trait, so the
//! Authenticode digester and page-hash enumerator can be generic over
//! SHA-1 (v1 catalogues) and SHA-256 (v2 catalogues) without duplicating
//! the traversal logic.

use digest::{Digest, Output};

/// A streaming hash accumulator. Mirrors `digest::Digest` but as a
/// dedicated trait so catalogue code depends only on what it needs.
pub trait HashSink: Default {
    type Digest: AsRef<[u8]> + Clone;

    fn update(&mut self, bytes: &[u8]);
    fn finalize(self) -> Self::Digest;

    /// All-zeros digest of the algorithm's output width — the page-hash
    /// vector terminator, not the digest of an empty input.
    fn zero_digest() -> Self::Digest;

    /// Algorithm identifier used by [`crate::asn1::oids`] to select the
    /// correct `AlgorithmIdentifier` OID.
    const ALGORITHM: Algorithm;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Sha1,
    Sha256,
}

#[derive(Default)]
pub struct Sha1Sink(sha1::Sha1);

impl HashSink for Sha1Sink {
    type Digest = Output<sha1::Sha1>;
    const ALGORITHM: Algorithm = Algorithm::Sha1;

    fn update(&mut self, bytes: &[u8]) {
        Digest::update(&mut self.0, bytes);
    }

    fn finalize(self) -> Self::Digest {
        self.0.finalize()
    }

    fn zero_digest() -> Self::Digest {
        Output::<sha1::Sha1>::default()
    }
}

#[derive(Default)]
pub struct Sha256Sink(sha2::Sha256);

impl HashSink for Sha256Sink {
    type Digest = Output<sha2::Sha256>;
    const ALGORITHM: Algorithm = Algorithm::Sha256;

    fn update(&mut self, bytes: &[u8]) {
        Digest::update(&mut self.0, bytes);
    }

    fn finalize(self) -> Self::Digest {
        self.0.finalize()
    }

    fn zero_digest() -> Self::Digest {
        Output::<sha2::Sha256>::default()
    }
}

/// One-shot convenience: digest a full byte slice with a given sink type.
pub fn digest_all<H: HashSink>(bytes: &[u8]) -> H::Digest {
    let mut sink = H::default();
    sink.update(bytes);
    sink.finalize()
}
