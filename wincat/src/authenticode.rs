//! Authenticode PE digest: the bit-exact digest Microsoft's signing tools
//! compute over a PE image, excluding the `CheckSum` field, the
//! certificate data-directory entry, and any embedded certificate table.

use crate::error::{Error, Result};
use crate::hash::HashSink;
use crate::pe::PeView;

/// Hashes everything from the start of the file up to `SizeOfHeaders`,
/// except the four-byte `CheckSum` field and the eight-byte certificate
/// data-directory entry. Returns the size recorded in that entry (0 if
/// the image has no certificate directory), needed by the caller to
/// exclude the embedded certificate table from the trailing-bytes hash.
pub(crate) fn hash_header_and_cert_size<H: HashSink>(pe: &PeView, sink: &mut H) -> Result<u32> {
    let data = pe.data();
    let check_sum_off = pe.check_sum_offset();
    if check_sum_off + 4 > data.len() {
        return Err(Error::TooShort { needed: check_sum_off + 4, have: data.len() });
    }
    sink.update(&data[0..check_sum_off]);
    let after_checksum = check_sum_off + 4;

    let size_of_headers = pe.size_of_headers() as usize;
    if size_of_headers > data.len() {
        return Err(Error::MalformedPe("SizeOfHeaders exceeds file length".to_string()));
    }

    match (pe.certificate_directory_offset, pe.certificate_table()) {
        (Some(off), Some(dir)) => {
            sink.update(&data[after_checksum..off]);
            sink.update(&data[off + 8..size_of_headers]);
            Ok(dir.size)
        }
        _ => {
            sink.update(&data[after_checksum..size_of_headers]);
            Ok(0)
        }
    }
}

/// Computes the full Authenticode digest of a PE image.
///
/// Sections are hashed in order of `PointerToRawData`, defensively
/// re-sorted regardless of the order they appear in the section table —
/// a well-formed image already satisfies this, but callers should not
/// have to trust that invariant of arbitrary input.
pub fn digest<H: HashSink>(pe: &PeView) -> Result<H::Digest> {
    let mut sink = H::default();
    let cert_size = hash_header_and_cert_size(pe, &mut sink)? as usize;
    let data = pe.data();

    let mut sections = pe.sections.clone();
    sections.sort_by_key(|s| s.pointer_to_raw_data);

    let mut bytes_hashed = pe.size_of_headers() as usize;
    for (index, section) in sections.iter().enumerate() {
        if section.size_of_raw_data == 0 {
            continue;
        }
        let start = section.pointer_to_raw_data as usize;
        let end = start
            .checked_add(section.size_of_raw_data as usize)
            .ok_or(Error::SectionOutOfBounds {
                index,
                pointer: section.pointer_to_raw_data,
                size: section.size_of_raw_data,
                len: data.len(),
            })?;
        if end > data.len() {
            return Err(Error::SectionOutOfBounds {
                index,
                pointer: section.pointer_to_raw_data,
                size: section.size_of_raw_data,
                len: data.len(),
            });
        }
        sink.update(&data[start..end]);
        bytes_hashed += section.size_of_raw_data as usize;
    }

    let trailing_end = data.len().saturating_sub(cert_size);
    if trailing_end > bytes_hashed {
        sink.update(&data[bytes_hashed..trailing_end]);
    }

    Ok(sink.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{Sha1Sink, Sha256Sink};
    use crate::testutil::minimal_pe64;

    #[test]
    fn digest_is_deterministic() {
        let image = minimal_pe64(b"hello section data");
        let pe = PeView::parse(&image).unwrap();
        let a = digest::<Sha256Sink>(&pe).unwrap();
        let b = digest::<Sha256Sink>(&pe).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn digest_ignores_checksum_field() {
        let mut image = minimal_pe64(b"section payload");
        let pe = PeView::parse(&image).unwrap();
        let before = digest::<Sha1Sink>(&pe).unwrap();

        let off = pe.check_sum_offset();
        image[off..off + 4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        let pe2 = PeView::parse(&image).unwrap();
        let after = digest::<Sha1Sink>(&pe2).unwrap();

        assert_eq!(before.as_slice(), after.as_slice());
    }

    #[test]
    fn digest_changes_with_section_content() {
        let image_a = minimal_pe64(b"aaaaaaaaaaaaaaaa");
        let image_b = minimal_pe64(b"bbbbbbbbbbbbbbbb");
        let pe_a = PeView::parse(&image_a).unwrap();
        let pe_b = PeView::parse(&image_b).unwrap();
        let da = digest::<Sha256Sink>(&pe_a).unwrap();
        let db = digest::<Sha256Sink>(&pe_b).unwrap();
        assert_ne!(da.as_slice(), db.as_slice());
    }
}
