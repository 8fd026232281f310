//! Small encoding helpers that sit below the typed model: BER serialization
//! entry point, string-encoding rules (§4.4), and the OpenSSL-compatible
//! double SET-wrap used for the page-hashes moniker.

use chrono::{DateTime, Utc};
use rasn::types::{Any, BmpString, OctetString, SetOf, UtcTime};
use rasn::Encode;

use crate::error::{Error, Result};

/// Converts a UTC timestamp to the `UtcTime` representation the CTL
/// content model stores (`rasn`'s `UtcTime` is a `chrono::DateTime` with
/// a fixed offset; UTC converts into it directly).
pub fn utc_time(dt: DateTime<Utc>) -> UtcTime {
    dt.into()
}

/// Serializes a value with rasn's BER codec rather than its strict DER
/// codec. Several of the structures here are nominally `SET OF` but
/// Microsoft's own encoder (and this crate's reference implementation,
/// built on OpenSSL's `i2d_*` family) never canonically re-sorts `SET OF`
/// elements by encoding — it preserves insertion order. BER, unlike DER,
/// does not mandate that sort, so it reproduces Microsoft's actual output
/// byte-for-byte; DER would silently reorder attributes we built in a
/// specific, meaningful order.
pub fn to_ber<T: Encode>(value: &T) -> Result<Vec<u8>> {
    rasn::ber::encode(value).map_err(Error::DerEncode)
}

/// `BMPString` payloads are UTF-16BE code units with no trailing NUL.
pub fn bmp_string(s: &str) -> BmpString {
    BmpString::from(s)
}

/// `CatNameValue.value` and the v1 hash string are `OCTET STRING`s
/// holding UTF-16LE text *with* a trailing 16-bit NUL — the opposite
/// convention from `BMPString`.
pub fn utf16le_nul_terminated(s: &str) -> OctetString {
    let mut bytes = Vec::with_capacity(s.len() * 2 + 2);
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes.extend_from_slice(&[0, 0]);
    OctetString::from(bytes)
}

/// v1 `CatalogInfo.digest`: uppercase hex of the raw hash, UTF-16LE,
/// NUL-terminated.
pub fn v1_hash_string(raw_digest: &[u8]) -> OctetString {
    let hex = hex::encode_upper(raw_digest);
    utf16le_nul_terminated(&hex)
}

/// DER/BER-encodes an ASN.1 `NULL`, usable wherever a field is declared
/// `ANY` but must carry the value `NULL` (algorithm parameters, CTL
/// `version.value`).
pub fn null_any() -> Any {
    Any::new(vec![0x05, 0x00])
}

fn der_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        return vec![len as u8];
    }
    let be = len.to_be_bytes();
    let first = be.iter().position(|&b| b != 0).unwrap_or(be.len() - 1);
    let mut out = vec![0x80 | (be.len() - first) as u8];
    out.extend_from_slice(&be[first..]);
    out
}

/// Wraps already-encoded `content` under the given universal tag byte,
/// treating `content` opaquely. Used for the page-hashes moniker wrap,
/// where the thing being nested is a full TLV we built ourselves rather
/// than a typed `rasn` value.
fn wrap_tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 6);
    out.push(tag);
    out.extend(der_length(content.len()));
    out.extend_from_slice(content);
    out
}

const TAG_SET: u8 = 0x31;

/// Builds `SpcSerializedObject.serializedData` for a page-hashes attribute.
///
/// Per §4.4: encode `SpcAttributeTypeAndOptionalValue{type, value = SET {
/// OCTET STRING page_bytes }}`, then wrap *that* encoding, opaquely, inside
/// `SET { <opaque> }`. The inner SEQUENCE's own bytes are reused verbatim
/// as the sole element of the outer SET — this is the "double wrap" the
/// original encoder initially omitted.
pub fn page_hashes_serialized_data(
    page_hashes_oid: &rasn::types::Oid,
    page_bytes: Vec<u8>,
) -> Result<Vec<u8>> {
    use crate::asn1::model::SpcAttributeTypeAndOptionalValue;

    let set_of_octet_string: SetOf<OctetString> = vec![OctetString::from(page_bytes)];
    let value_bytes = to_ber(&set_of_octet_string)?;

    let inner = SpcAttributeTypeAndOptionalValue {
        attribute_type: page_hashes_oid.into(),
        value: Some(Any::new(value_bytes)),
    };
    let inner_bytes = to_ber(&inner)?;

    Ok(wrap_tlv(TAG_SET, &inner_bytes))
}
