//! Catalogue assembly: turns a list of file entries and metadata into a
//! detached, unsigned PKCS#7 `SignedData` envelope around a Microsoft CTL.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rand::RngCore;

use crate::asn1::encode::{bmp_string, null_any, page_hashes_serialized_data, to_ber, v1_hash_string};
use crate::asn1::model::{
    CatAttr, CatMemberInfo, CatMemberInfo2, CatNameValue, CatalogAuthAttr, CatalogInfo,
    CertExtension, MsCtlContent, SpcAttributeTypeAndOptionalValue, SpcDigest,
    SpcIndirectDataContent, SpcLink, SpcPeImageData, SpcSerializedObject, SpcString,
};
use crate::asn1::oids;
use crate::asn1::pkcs7;
use crate::authenticode;
use crate::error::{Error, Result};
use crate::hash::{Algorithm, HashSink, Sha1Sink};
use crate::pagehash::{self, PageHash};
use crate::pe::PeView;

use rasn::types::{Any, BitString, OctetString};

/// Extensions flag bit that suppresses duplication of an entry extension
/// into the SHA-1 compatibility `CatalogInfo` of a v2 catalogue (§9).
const EXTENSION_NO_SHA1_COMPAT: u32 = 0x0100_0000;

/// A single `{name, flags, value}` extension, attached either to an entry
/// or to the catalogue itself.
#[derive(Debug, Clone)]
pub struct Extension {
    pub name: String,
    pub flags: u32,
    pub value: String,
}

impl Extension {
    pub fn new(name: impl Into<String>, flags: u32, value: impl Into<String>) -> Self {
        Self { name: name.into(), flags, value: value.into() }
    }
}

/// One file to be included in the catalogue.
#[derive(Debug, Clone)]
pub struct Entry {
    pub file_path: PathBuf,
    pub extensions: Vec<Extension>,
}

impl Entry {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self { file_path: file_path.into(), extensions: Vec::new() }
    }
}

/// Opaque 16-byte catalogue identifier (§9 — either random or content
/// addressed; the CTL carries it opaquely either way).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier(pub [u8; 16]);

impl Identifier {
    pub fn random() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Deterministic alternative: the low 16 bytes of the SHA-256 digest
    /// of `seed` (e.g. the sorted list of entry paths). Useful for
    /// reproducible builds.
    pub fn content_addressed(seed: &[u8]) -> Self {
        let digest = crate::hash::digest_all::<crate::hash::Sha256Sink>(seed);
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[0..16]);
        Self(bytes)
    }
}

/// Catalogue-wide input: identifier, timestamp, entries, and
/// catalogue-level extensions. The hash algorithm is selected by the
/// `H` type parameter passed to [`build`].
#[derive(Debug, Clone)]
pub struct Catalogue {
    pub identifier: Identifier,
    pub timestamp: DateTime<Utc>,
    pub entries: Vec<Entry>,
    pub extensions: Vec<Extension>,
    pub page_hashes: bool,
}

fn algorithm_oid(algorithm: Algorithm) -> &'static rasn::types::Oid {
    match algorithm {
        Algorithm::Sha1 => oids::SHA1_OID,
        Algorithm::Sha256 => oids::SHA256_OID,
    }
}

fn name_value_attr(ext: &Extension) -> CatalogAuthAttr {
    CatalogAuthAttr {
        attribute_type: oids::CAT_NAMEVALUE_OBJID.into(),
        contents: vec![CatAttr::NameValue(CatNameValue {
            tag: bmp_string(&ext.name),
            flags: ext.flags,
            value: crate::asn1::encode::utf16le_nul_terminated(&ext.value),
        })],
    }
}

fn member_info_v1_attr(is_pe: bool) -> CatalogAuthAttr {
    let guid = if is_pe { oids::MEMBER_INFO_GUID_PE } else { oids::MEMBER_INFO_GUID_FLAT };
    CatalogAuthAttr {
        attribute_type: oids::CAT_MEMBERINFO_OBJID.into(),
        contents: vec![CatAttr::MemberInfo(CatMemberInfo {
            guid: bmp_string(guid),
            cert_version: 512,
        })],
    }
}

fn member_info_v2_attr(is_pe: bool) -> CatalogAuthAttr {
    CatalogAuthAttr {
        attribute_type: oids::CAT_MEMBERINFO2_OBJID.into(),
        contents: vec![CatAttr::MemberInfo2(if is_pe { CatMemberInfo2::Pe } else { CatMemberInfo2::Flat })],
    }
}

/// `flags` bits 0 and 2 set, bit 1 clear — the fixed value Microsoft's
/// encoder uses for `SpcPeImageData.flags`. Built bit-by-bit rather than
/// through a byte-oriented constructor so the string is exactly 3 bits
/// long (5 unused bits trimmed), matching `ASN1_BIT_STRING_set_bit(0, 1)`
/// + `set_bit(2, 1)`'s `03 02 05 A0` encoding rather than a full-width,
/// zero-unused-bits string.
fn pe_image_flags() -> BitString {
    [true, false, true].into_iter().collect()
}

fn encode_page_hashes_blob<D: AsRef<[u8]>>(hashes: &[PageHash<D>]) -> Vec<u8> {
    let mut out = Vec::with_capacity(hashes.len() * 24);
    for entry in hashes {
        out.extend_from_slice(&entry.offset.to_le_bytes());
        out.extend_from_slice(entry.digest.as_ref());
    }
    out
}

fn empty_file_link() -> Result<SpcLink> {
    Ok(SpcLink::File(SpcString::Unicode(bmp_string(""))))
}

fn indirect_data_attr<H: HashSink>(
    is_pe: bool,
    primary_hash: &[u8],
    page_hashes: Option<&[PageHash<H::Digest>]>,
) -> Result<CatalogAuthAttr> {
    let data = if is_pe {
        let file = match page_hashes {
            Some(hashes) => {
                let blob = encode_page_hashes_blob(hashes);
                let oid = match H::ALGORITHM {
                    Algorithm::Sha1 => oids::SPC_PE_IMAGE_PAGE_HASHES_V1,
                    Algorithm::Sha256 => oids::SPC_PE_IMAGE_PAGE_HASHES_V2,
                };
                let serialized_data = page_hashes_serialized_data(oid, blob)?;
                SpcLink::Moniker(SpcSerializedObject {
                    class_id: OctetString::from(oids::PAGE_HASHES_GUID.to_vec()),
                    serialized_data: OctetString::from(serialized_data),
                })
            }
            None => empty_file_link()?,
        };
        let image_data = SpcPeImageData { flags: pe_image_flags(), file: Some(file) };
        SpcAttributeTypeAndOptionalValue {
            attribute_type: oids::SPC_PE_IMAGE_DATA_OBJID.into(),
            value: Some(Any::new(to_ber(&image_data)?)),
        }
    } else {
        let link = empty_file_link()?;
        SpcAttributeTypeAndOptionalValue {
            attribute_type: oids::SPC_CAB_DATA_OBJID.into(),
            value: Some(Any::new(to_ber(&link)?)),
        }
    };

    let digest = SpcDigest {
        algorithm: SpcAttributeTypeAndOptionalValue {
            attribute_type: algorithm_oid(H::ALGORITHM).into(),
            value: Some(null_any()),
        },
        hash: OctetString::from(primary_hash.to_vec()),
    };

    Ok(CatalogAuthAttr {
        attribute_type: oids::SPC_INDIRECT_DATA_OBJID.into(),
        contents: vec![CatAttr::IndirectData(SpcIndirectDataContent { data, digest })],
    })
}

/// Per-file digest results used to build both the primary and (for v2)
/// the SHA-1 compatibility `CatalogInfo`.
struct EntryDigest<H: HashSink> {
    is_pe: bool,
    primary: H::Digest,
    sha1_compat: Option<digest::Output<sha1::Sha1>>,
    page_hashes: Option<Vec<PageHash<H::Digest>>>,
}

fn digest_entry<H: HashSink>(data: &[u8], page_hashes: bool) -> Result<EntryDigest<H>> {
    let is_pe = data.len() >= 2 && &data[0..2] == b"MZ";

    if is_pe {
        let pe = PeView::parse(data)?;
        let primary = authenticode::digest::<H>(&pe)?;
        let sha1_compat = if H::ALGORITHM == Algorithm::Sha256 {
            Some(authenticode::digest::<Sha1Sink>(&pe)?)
        } else {
            None
        };
        let pages = if page_hashes { Some(pagehash::page_hashes::<H>(&pe)?) } else { None };
        Ok(EntryDigest { is_pe: true, primary, sha1_compat, page_hashes: pages })
    } else {
        let primary = crate::hash::digest_all::<H>(data);
        let sha1_compat = if H::ALGORITHM == Algorithm::Sha256 {
            Some(crate::hash::digest_all::<Sha1Sink>(data))
        } else {
            None
        };
        Ok(EntryDigest { is_pe: false, primary, sha1_compat, page_hashes: None })
    }
}

fn primary_catalog_info<H: HashSink>(
    entry: &Entry,
    digests: &EntryDigest<H>,
    version: CatalogVersion,
) -> Result<CatalogInfo> {
    let mut attributes = Vec::with_capacity(entry.extensions.len() + 2);
    for ext in &entry.extensions {
        attributes.push(name_value_attr(ext));
    }
    attributes.push(match version {
        CatalogVersion::V1 => member_info_v1_attr(digests.is_pe),
        CatalogVersion::V2 => member_info_v2_attr(digests.is_pe),
    });
    attributes.push(indirect_data_attr::<H>(
        digests.is_pe,
        digests.primary.as_ref(),
        digests.page_hashes.as_deref(),
    )?);

    let digest = match version {
        CatalogVersion::V1 => v1_hash_string(digests.primary.as_ref()),
        CatalogVersion::V2 => OctetString::from(digests.primary.as_ref().to_vec()),
    };

    Ok(CatalogInfo { digest, attributes })
}

/// The SHA-1 compatibility entry of a v2 catalogue: same extensions
/// (minus any flagged `0x01000000`), `CatMemberInfo2`, no indirect-data
/// attribute (§4.5 step 7, §9).
fn compat_catalog_info<H: HashSink>(entry: &Entry, digests: &EntryDigest<H>) -> CatalogInfo {
    let sha1 = digests.sha1_compat.as_ref().expect("compat entry requires a SHA-1 digest");
    let mut attributes = Vec::new();
    for ext in entry.extensions.iter().filter(|e| e.flags & EXTENSION_NO_SHA1_COMPAT == 0) {
        attributes.push(name_value_attr(ext));
    }
    attributes.push(member_info_v2_attr(digests.is_pe));

    CatalogInfo { digest: OctetString::from(sha1.as_ref().to_vec()), attributes }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatalogVersion {
    V1,
    V2,
}

fn cert_extension(ext: &Extension) -> Result<CertExtension> {
    let name_value = CatNameValue {
        tag: bmp_string(&ext.name),
        flags: ext.flags,
        value: crate::asn1::encode::utf16le_nul_terminated(&ext.value),
    };
    Ok(CertExtension {
        extension_type: oids::CAT_NAMEVALUE_OBJID.into(),
        blob: OctetString::from(to_ber(&name_value)?),
    })
}

fn read_entry(path: &Path) -> Result<memmap2::Mmap> {
    let file = File::open(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    // SAFETY: the mapping is read-only and scoped to this function call's
    // caller; the file is not modified concurrently by this process.
    unsafe { memmap2::Mmap::map(&file) }.map_err(|source| Error::Io { path: path.to_path_buf(), source })
}

/// Builds the typed CTL content for a catalogue, before BER encoding and
/// the PKCS#7 wrap. Exposed separately from [`build`] so callers (and
/// tests) can inspect the assembled attributes directly.
///
/// `H` selects the catalogue version: [`crate::hash::Sha1Sink`] produces a
/// v1 catalogue, [`crate::hash::Sha256Sink`] produces a v2 catalogue with
/// SHA-1 compatibility entries.
pub fn build_ctl<H: HashSink>(catalogue: &Catalogue) -> Result<MsCtlContent> {
    let version = match H::ALGORITHM {
        Algorithm::Sha1 => CatalogVersion::V1,
        Algorithm::Sha256 => CatalogVersion::V2,
    };

    let mut header_attributes = Vec::with_capacity(catalogue.entries.len() * 2);
    for entry in &catalogue.entries {
        tracing::debug!(path = %entry.file_path.display(), "digesting catalogue entry");
        let mapping = read_entry(&entry.file_path)?;
        let digests = digest_entry::<H>(&mapping, catalogue.page_hashes)?;

        header_attributes.push(primary_catalog_info::<H>(entry, &digests, version)?);
        if version == CatalogVersion::V2 {
            header_attributes.push(compat_catalog_info::<H>(entry, &digests));
        }
    }

    // §4.5 global processing step 1: sort by lexicographic byte order of
    // the digest field, regardless of the declared `SEQUENCE OF` type.
    header_attributes.sort_by(|a, b| a.digest.as_ref().cmp(b.digest.as_ref()));

    let extensions = catalogue
        .extensions
        .iter()
        .map(cert_extension)
        .collect::<Result<Vec<_>>>()?;

    let version_oid = match version {
        CatalogVersion::V1 => oids::CATALOG_LIST_MEMBER,
        CatalogVersion::V2 => oids::CATALOG_LIST_MEMBER2,
    };

    Ok(MsCtlContent {
        r#type: SpcAttributeTypeAndOptionalValue { attribute_type: oids::CATALOG_LIST.into(), value: None },
        identifier: OctetString::from(catalogue.identifier.0.to_vec()),
        time: crate::asn1::encode::utc_time(catalogue.timestamp),
        version: SpcAttributeTypeAndOptionalValue {
            attribute_type: version_oid.into(),
            value: Some(null_any()),
        },
        header_attributes,
        extensions,
    })
}

/// Builds a complete catalogue and returns the final PKCS#7 DER/BER bytes.
pub fn build<H: HashSink>(catalogue: &Catalogue) -> Result<Vec<u8>> {
    let ctl = build_ctl::<H>(catalogue)?;
    let ctl_bytes = to_ber(&ctl)?;
    tracing::debug!(bytes = ctl_bytes.len(), "encoded MsCtlContent");
    pkcs7::wrap_ctl(ctl_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{Sha1Sink, Sha256Sink};
    use crate::testutil::minimal_pe64;
    use std::io::Write;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(bytes).unwrap();
        f.flush().unwrap();
        f
    }

    fn sample_catalogue(entries: Vec<Entry>) -> Catalogue {
        Catalogue {
            identifier: Identifier([0x11; 16]),
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            entries,
            extensions: vec![Extension::new("HWID1", 0x1001_0001, "root\\demo")],
            page_hashes: false,
        }
    }

    #[test]
    fn v1_catalogue_builds_one_entry_per_file() {
        let pe = write_temp(&minimal_pe64(b"section bytes"));
        let catalogue = sample_catalogue(vec![Entry::new(pe.path())]);
        let ctl = build_ctl::<Sha1Sink>(&catalogue).unwrap();
        assert_eq!(ctl.header_attributes.len(), 1);
        // v1 digests are UTF-16LE hex, NUL-terminated: 40 hex chars * 2
        // bytes/char + the trailing 16-bit NUL.
        assert_eq!(ctl.header_attributes[0].digest.as_ref().len(), 40 * 2 + 2);

        let bytes = build::<Sha1Sink>(&catalogue).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn v2_catalogue_builds_two_entries_per_file() {
        let pe = write_temp(&minimal_pe64(b"section bytes"));
        let mut catalogue = sample_catalogue(vec![Entry::new(pe.path())]);
        catalogue.page_hashes = true;
        let ctl = build_ctl::<Sha256Sink>(&catalogue).unwrap();
        assert_eq!(ctl.header_attributes.len(), 2);
        let lens: Vec<usize> =
            ctl.header_attributes.iter().map(|info| info.digest.as_ref().len()).collect();
        assert!(lens.contains(&32), "expected a raw 32-byte SHA-256 digest, got {lens:?}");
        assert!(lens.contains(&20), "expected a raw 20-byte SHA-1 compat digest, got {lens:?}");

        let bytes = build::<Sha256Sink>(&catalogue).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn non_pe_entry_is_hashed_flat() {
        let flat = write_temp(b"not a pe file at all");
        let catalogue = sample_catalogue(vec![Entry::new(flat.path())]);
        let ctl = build_ctl::<Sha1Sink>(&catalogue).unwrap();
        assert_eq!(ctl.header_attributes.len(), 1);

        let has_cab_data = ctl.header_attributes[0].attributes.iter().any(|attr| {
            attr.contents.iter().any(|c| match c {
                CatAttr::IndirectData(content) => {
                    content.data.attribute_type == oids::SPC_CAB_DATA_OBJID.into()
                }
                _ => false,
            })
        });
        assert!(has_cab_data, "non-PE entry must use SPC_CAB_DATA_OBJID, not SPC_PE_IMAGE_DATA_OBJID");

        let bytes = build::<Sha1Sink>(&catalogue).unwrap();
        assert!(!bytes.is_empty());
    }
}
