//! Object identifiers used by the CTL content model and SPC attributes.

use rasn::types::Oid;

pub const MS_CTL: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 10, 1]);
pub const CATALOG_LIST: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 12, 1, 1]);
pub const CATALOG_LIST_MEMBER: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 12, 1, 2]);
pub const CATALOG_LIST_MEMBER2: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 12, 1, 3]);
pub const CAT_NAMEVALUE_OBJID: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 12, 2, 1]);
pub const CAT_MEMBERINFO_OBJID: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 12, 2, 2]);
pub const CAT_MEMBERINFO2_OBJID: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 12, 2, 3]);
pub const SPC_INDIRECT_DATA_OBJID: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 2, 1, 4]);
pub const SPC_PE_IMAGE_DATA_OBJID: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 2, 1, 15]);
pub const SPC_CAB_DATA_OBJID: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 2, 1, 25]);
pub const SPC_PE_IMAGE_PAGE_HASHES_V1: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 2, 3, 1]);
pub const SPC_PE_IMAGE_PAGE_HASHES_V2: &Oid = Oid::const_new(&[1, 3, 6, 1, 4, 1, 311, 2, 3, 2]);
pub const SHA1_OID: &Oid = Oid::const_new(&[1, 3, 14, 3, 2, 26]);
pub const SHA256_OID: &Oid = Oid::const_new(&[2, 16, 840, 1, 101, 3, 4, 2, 1]);

/// PKCS#7 `signedData` content type, `1.2.840.113549.1.7.2`.
pub const PKCS7_SIGNED_DATA: &Oid = Oid::const_new(&[1, 2, 840, 113_549, 1, 7, 2]);

/// Raw page-hashes class identifier, stored as an `OCTET STRING` in
/// `SpcSerializedObject.classId` (not an OID).
pub const PAGE_HASHES_GUID: [u8; 16] = [
    0xa6, 0xb5, 0x86, 0xd5, 0xb4, 0xa1, 0x24, 0x66, 0xae, 0x05, 0xa2, 0x17, 0xda, 0x8e, 0x60, 0xd6,
];

/// v1 `CatMemberInfo.guid` for PE entries.
pub const MEMBER_INFO_GUID_PE: &str = "{C689AAB8-8E78-11D0-8C47-00C04FC295EE}";
/// v1 `CatMemberInfo.guid` for non-PE entries.
pub const MEMBER_INFO_GUID_FLAT: &str = "{DE351A42-8E59-11D0-8C47-00C04FC295EE}";
