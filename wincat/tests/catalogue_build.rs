//! End-to-end checks against the builder's typed CTL output, covering the
//! seed scenarios a v1 and a v2 catalogue must satisfy.

use std::io::Write;

use chrono::{DateTime, Utc};
use wincat::asn1::model::CatAttr;
use wincat::asn1::{encode, oids};
use wincat::authenticode;
use wincat::catalogue::{build_ctl, Catalogue, Entry, Extension, Identifier};
use wincat::hash::{Sha1Sink, Sha256Sink};
use wincat::pe::PeView;

/// Builds a minimal, well-formed PE32+ image with zero or one `.text`
/// section containing `section_data`.
fn build_pe64(section_data: &[u8]) -> Vec<u8> {
    let e_lfanew: u32 = 0x80;
    let number_of_sections: u16 = if section_data.is_empty() { 0 } else { 1 };
    let size_of_optional_header: u16 = 0xF0;
    let size_of_headers: u32 = 0x200;
    let section_alignment: u32 = 0x1000;
    let file_alignment: u32 = 0x200;
    let pointer_to_raw_data: u32 = size_of_headers;
    let size_of_raw_data: u32 = section_data.len() as u32;

    let mut buf = vec![0u8; e_lfanew as usize];
    buf[0] = b'M';
    buf[1] = b'Z';
    buf[0x3c..0x40].copy_from_slice(&e_lfanew.to_le_bytes());

    buf.extend_from_slice(b"PE\0\0");

    buf.extend_from_slice(&0x8664u16.to_le_bytes());
    buf.extend_from_slice(&number_of_sections.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&size_of_optional_header.to_le_bytes());
    buf.extend_from_slice(&0x0022u16.to_le_bytes());

    buf.extend_from_slice(&0x20bu16.to_le_bytes());
    buf.push(0);
    buf.push(0);
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0x140000000u64.to_le_bytes());
    buf.extend_from_slice(&section_alignment.to_le_bytes());
    buf.extend_from_slice(&file_alignment.to_le_bytes());
    buf.extend_from_slice(&6u16.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&6u16.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&(size_of_headers + size_of_raw_data).to_le_bytes());
    buf.extend_from_slice(&size_of_headers.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&3u16.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&0x100000u64.to_le_bytes());
    buf.extend_from_slice(&0x1000u64.to_le_bytes());
    buf.extend_from_slice(&0x100000u64.to_le_bytes());
    buf.extend_from_slice(&0x1000u64.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&[0u8; 16 * 8]);

    if number_of_sections == 1 {
        let mut name = [0u8; 8];
        name[..5].copy_from_slice(b".text");
        buf.extend_from_slice(&name);
        buf.extend_from_slice(&size_of_raw_data.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&size_of_raw_data.to_le_bytes());
        buf.extend_from_slice(&pointer_to_raw_data.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(&0x6000_0020u32.to_le_bytes());
    }

    buf.resize(size_of_headers as usize, 0);

    if number_of_sections == 1 {
        buf.resize(pointer_to_raw_data as usize, 0);
        buf.extend_from_slice(section_data);
    }

    buf
}

fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}

fn base_catalogue(entries: Vec<Entry>) -> Catalogue {
    Catalogue {
        identifier: Identifier([0x11; 16]),
        timestamp: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        entries,
        extensions: vec![Extension::new("HWID1", 0x1001_0001, "root\\demo")],
        page_hashes: false,
    }
}

/// S1: SHA-1 catalogue over a single minimal PE, one entry, no per-entry
/// extensions. The lone `CatalogInfo.digest` must be the UTF-16LE hex of
/// the SHA-1 Authenticode digest, NUL-terminated.
#[test]
fn s1_v1_catalogue_digest_is_utf16le_hex_sha1() {
    let image = build_pe64(b"some section content");
    let pe = write_temp(&image);
    let expected = {
        let view = PeView::parse(&image).unwrap();
        authenticode::digest::<Sha1Sink>(&view).unwrap()
    };

    let catalogue = base_catalogue(vec![Entry::new(pe.path())]);
    let ctl = build_ctl::<Sha1Sink>(&catalogue).unwrap();

    assert_eq!(ctl.header_attributes.len(), 1);
    let expected_digest_field = encode::v1_hash_string(expected.as_ref());
    assert_eq!(ctl.header_attributes[0].digest, expected_digest_field);
}

/// S2: SHA-256 catalogue over the same PE produces two `CatalogInfo`
/// entries (primary SHA-256 + SHA-1 compatibility), globally sorted by raw
/// digest bytes, and `version.type` is `CATALOG_LIST_MEMBER2`.
#[test]
fn s2_v2_catalogue_has_primary_and_compat_entries() {
    let image = build_pe64(b"some section content");
    let pe = write_temp(&image);
    let (sha256, sha1) = {
        let view = PeView::parse(&image).unwrap();
        (
            authenticode::digest::<Sha256Sink>(&view).unwrap(),
            authenticode::digest::<Sha1Sink>(&view).unwrap(),
        )
    };

    let catalogue = base_catalogue(vec![Entry::new(pe.path())]);
    let ctl = build_ctl::<Sha256Sink>(&catalogue).unwrap();

    assert_eq!(ctl.header_attributes.len(), 2);

    let mut expected: Vec<Vec<u8>> = vec![sha256.as_ref().to_vec(), sha1.as_ref().to_vec()];
    expected.sort();
    let actual: Vec<Vec<u8>> =
        ctl.header_attributes.iter().map(|info| info.digest.as_ref().to_vec()).collect();
    assert_eq!(actual, expected);

    let digest_lens: Vec<usize> =
        ctl.header_attributes.iter().map(|info| info.digest.as_ref().len()).collect();
    assert!(digest_lens.contains(&32));
    assert!(digest_lens.contains(&20));

    let expected_version_oid: rasn::types::ObjectIdentifier = oids::CATALOG_LIST_MEMBER2.into();
    assert_eq!(ctl.version.attribute_type, expected_version_oid);
}

/// S3: a PE with `SectionAlignment = 0x1000` and one `0x2500`-byte section
/// yields a page-hash vector of exactly 5 entries: 1 header + 3 pages
/// (0x1000, 0x1000, 0x500 padded) + 1 terminator.
#[test]
fn s3_page_hash_vector_length_matches_section_layout() {
    let image = build_pe64(&vec![0u8; 0x2500]);
    let pe = PeView::parse(&image).unwrap();
    let hashes = wincat::pagehash::page_hashes::<Sha256Sink>(&pe).unwrap();
    assert_eq!(hashes.len(), 5);
}

/// S4: a non-PE file in a SHA-1 catalogue gets the flat `CatMemberInfo`
/// GUID and an indirect-data attribute tagged `SPC_CAB_DATA_OBJID`.
#[test]
fn s4_non_pe_entry_uses_flat_guid_and_cab_data_oid() {
    let flat = write_temp(b"this is not a PE image");
    let catalogue = base_catalogue(vec![Entry::new(flat.path())]);
    let ctl = build_ctl::<Sha1Sink>(&catalogue).unwrap();

    assert_eq!(ctl.header_attributes.len(), 1);
    let attrs = &ctl.header_attributes[0].attributes;

    let member_info = attrs.iter().find_map(|attr| {
        attr.contents.iter().find_map(|c| match c {
            CatAttr::MemberInfo(info) => Some(info),
            _ => None,
        })
    });
    let member_info = member_info.expect("CatMemberInfo attribute present");
    assert_eq!(member_info.guid, encode::bmp_string(oids::MEMBER_INFO_GUID_FLAT));

    let indirect = attrs.iter().find_map(|attr| {
        attr.contents.iter().find_map(|c| match c {
            CatAttr::IndirectData(content) => Some(content),
            _ => None,
        })
    });
    let indirect = indirect.expect("indirect-data attribute present");
    let expected_oid: rasn::types::ObjectIdentifier = oids::SPC_CAB_DATA_OBJID.into();
    assert_eq!(indirect.data.attribute_type, expected_oid);
}

/// S5: two files with identical contents produce two `CatalogInfo`
/// entries with equal digests, adjacent after the global sort.
#[test]
fn s5_identical_files_produce_adjacent_equal_digest_entries() {
    let image = build_pe64(b"shared content");
    let pe_a = write_temp(&image);
    let pe_b = write_temp(&image);

    let catalogue = base_catalogue(vec![Entry::new(pe_a.path()), Entry::new(pe_b.path())]);
    let ctl = build_ctl::<Sha1Sink>(&catalogue).unwrap();

    assert_eq!(ctl.header_attributes.len(), 2);
    assert_eq!(ctl.header_attributes[0].digest, ctl.header_attributes[1].digest);
}
