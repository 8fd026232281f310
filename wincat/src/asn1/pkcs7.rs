//! Minimal, encode-only PKCS#7 `ContentInfo`/`SignedData` wrapper.
//!
//! The upstream `pkcs7` crate (vendored by the teacher repo this was
//! grown from) only implements the decode direction for `SignedData` —
//! its `Encode`/`Sequence` impls are commented out upstream. This module
//! models just enough of classic PKCS#7 (the `ANY DEFINED BY contentType`
//! content form, not CMS's `OCTET STRING eContent`) to produce a
//! detached, unsigned `SignedData` envelope around a CTL.

use rasn::types::{Any, ObjectIdentifier, SetOf};
use rasn::{AsnType, Decode, Encode};

use crate::asn1::encode::to_ber;
use crate::asn1::oids;
use crate::error::Result;

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct ContentInfo {
    pub content_type: ObjectIdentifier,
    #[rasn(tag(explicit(0)))]
    pub content: Option<Any>,
}

/// `SignedData` with no signer infos and no certificates: the catalogue
/// itself is unsigned at this layer (§1 — signing is a separate tool's
/// responsibility).
#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct SignedData {
    pub version: u32,
    pub digest_algorithms: SetOf<Any>,
    pub content_info: ContentInfo,
    #[rasn(tag(0))]
    pub certificates: Option<SetOf<Any>>,
    #[rasn(tag(1))]
    pub crls: Option<SetOf<Any>>,
    pub signer_infos: SetOf<Any>,
}

/// Wraps a DER/BER-encoded `MsCtlContent` as a detached, unsigned PKCS#7
/// `SignedData`, itself wrapped in the outer `ContentInfo` whose
/// `contentType` is `signedData` (`1.2.840.113549.1.7.2`).
pub fn wrap_ctl(ctl_bytes: Vec<u8>) -> Result<Vec<u8>> {
    let inner = ContentInfo {
        content_type: oids::MS_CTL.into(),
        content: Some(Any::new(ctl_bytes)),
    };

    let signed_data = SignedData {
        version: 1,
        digest_algorithms: Vec::new(),
        content_info: inner,
        certificates: None,
        crls: None,
        signer_infos: Vec::new(),
    };
    let signed_data_bytes = to_ber(&signed_data)?;

    let outer = ContentInfo {
        content_type: oids::PKCS7_SIGNED_DATA.into(),
        content: Some(Any::new(signed_data_bytes)),
    };

    to_ber(&outer)
}
