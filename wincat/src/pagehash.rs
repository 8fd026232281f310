//! Page-hash vector: one digest per `SectionAlignment`-sized page of the
//! image, used by catalogues that opt into per-page Authenticode
//! signatures (`SPC_PE_IMAGE_PAGE_HASHES_V1/V2`).

use crate::authenticode::hash_header_and_cert_size;
use crate::error::Result;
use crate::hash::HashSink;
use crate::pe::PeView;

/// One entry of the page-hash vector: `offset` is the file offset the
/// page starts at, `digest` is the hash of that (zero-padded) page.
#[derive(Debug, Clone)]
pub struct PageHash<D> {
    pub offset: u32,
    pub digest: D,
}

/// Hashes a page of up to `page_size` bytes starting at `data[start..]`,
/// zero-padding the final partial page.
fn hash_page<H: HashSink>(data: &[u8], start: usize, page_size: usize) -> H::Digest {
    let mut sink = H::default();
    let end = (start + page_size).min(data.len());
    if end > start {
        sink.update(&data[start..end]);
    }
    let actual = end.saturating_sub(start);
    if actual < page_size {
        let pad = vec![0u8; page_size - actual];
        sink.update(&pad);
    }
    sink.finalize()
}

/// Computes the page-hash vector for a PE image: a "first hash" covering
/// the headers, one hash per page of each section (in `PointerToRawData`
/// order), and a zero-digest terminator at the end of the last section.
pub fn page_hashes<H: HashSink>(pe: &PeView) -> Result<Vec<PageHash<H::Digest>>> {
    let data = pe.data();
    let page_size = pe.section_alignment() as usize;
    let size_of_headers = pe.size_of_headers() as usize;

    let mut sink = H::default();
    hash_header_and_cert_size(pe, &mut sink)?;
    // hash_header_and_cert_size stops exactly at SizeOfHeaders; pad the
    // first page out to a full page when the headers are smaller than one.
    if size_of_headers < page_size {
        sink.update(&vec![0u8; page_size - size_of_headers]);
    }
    let first_hash = sink.finalize();

    let mut out = vec![PageHash { offset: 0, digest: first_hash }];

    let mut sections = pe.sections.clone();
    sections.sort_by_key(|s| s.pointer_to_raw_data);

    let mut last_end: u32 = size_of_headers as u32;
    for section in &sections {
        if section.size_of_raw_data == 0 {
            continue;
        }
        let start = section.pointer_to_raw_data as usize;
        let size = section.size_of_raw_data as usize;
        let mut offset = 0usize;
        while offset < size {
            let page_offset = (start + offset) as u32;
            let digest = hash_page::<H>(data, start + offset, page_size);
            out.push(PageHash { offset: page_offset, digest });
            offset += page_size;
        }
        last_end = section.pointer_to_raw_data + section.size_of_raw_data;
    }

    out.push(PageHash { offset: last_end, digest: H::zero_digest() });

    Ok(out)
}
