//! Typed ASN.1 model for the CTL content and its SPC attribute payloads.
//!
//! Mirrors the shape of `rasn`'s own Authenticode/SPC model: plain structs
//! for `SEQUENCE`s, `#[rasn(choice)]` enums for `CHOICE`s, explicit/implicit
//! tags spelled out per field. Only the `Encode` direction is exercised by
//! the catalogue builder; `Decode` derives for free and is unused.

use rasn::types::{Any, BitString, BmpString, Ia5String, ObjectIdentifier, OctetString, SequenceOf, SetOf, UtcTime};
use rasn::{AsnType, Decode, Encode};

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct SpcAttributeTypeAndOptionalValue {
    pub attribute_type: ObjectIdentifier,
    pub value: Option<Any>,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct CatNameValue {
    pub tag: BmpString,
    pub flags: u32,
    pub value: OctetString,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct CatMemberInfo {
    pub guid: BmpString,
    pub cert_version: u32,
}

/// `CatMemberInfo2 ::= CHOICE { [0] NULL (pe) | [1] NULL (unknown1) | [2] NULL (flat) }`
#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
#[rasn(choice)]
pub enum CatMemberInfo2 {
    #[rasn(tag(0))]
    Pe,
    #[rasn(tag(1))]
    Unknown1,
    #[rasn(tag(2))]
    Flat,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct SpcDigest {
    pub algorithm: SpcAttributeTypeAndOptionalValue,
    pub hash: OctetString,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct SpcIndirectDataContent {
    pub data: SpcAttributeTypeAndOptionalValue,
    pub digest: SpcDigest,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct SpcSerializedObject {
    pub class_id: OctetString,
    pub serialized_data: OctetString,
}

/// `SpcString ::= CHOICE { [0] BMPString | [1] IA5String }`
#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
#[rasn(choice)]
pub enum SpcString {
    #[rasn(tag(0))]
    Unicode(BmpString),
    #[rasn(tag(1))]
    Ascii(Ia5String),
}

/// `SpcLink ::= CHOICE { [0] IA5String (url) | [1] SpcSerializedObject (moniker) | [2] EXPLICIT SpcString (file) }`
#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
#[rasn(choice)]
pub enum SpcLink {
    #[rasn(tag(0))]
    Url(Ia5String),
    #[rasn(tag(1))]
    Moniker(SpcSerializedObject),
    #[rasn(tag(explicit(2)))]
    File(SpcString),
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct SpcPeImageData {
    pub flags: BitString,
    #[rasn(tag(explicit(0)))]
    pub file: Option<SpcLink>,
}

/// `CatAttr ::= CHOICE { CatNameValue | CatMemberInfo | SpcIndirectDataContent | CatMemberInfo2 }`
///
/// Untagged choice: the variant is distinguished by each alternative's own
/// outer tag (`SEQUENCE` for the first three, the `CatMemberInfo2` inner
/// tag for the last), matching how the original encoder picks whichever
/// `i2d_*` function applies without an extra wrapping tag of its own.
#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
#[rasn(choice)]
pub enum CatAttr {
    NameValue(CatNameValue),
    MemberInfo(CatMemberInfo),
    IndirectData(SpcIndirectDataContent),
    MemberInfo2(CatMemberInfo2),
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct CatalogAuthAttr {
    pub attribute_type: ObjectIdentifier,
    pub contents: SetOf<CatAttr>,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct CatalogInfo {
    pub digest: OctetString,
    pub attributes: SetOf<CatalogAuthAttr>,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct CertExtension {
    pub extension_type: ObjectIdentifier,
    pub blob: OctetString,
}

#[derive(AsnType, Clone, Debug, Decode, Encode, PartialEq, Eq)]
pub struct MsCtlContent {
    pub r#type: SpcAttributeTypeAndOptionalValue,
    pub identifier: OctetString,
    pub time: UtcTime,
    pub version: SpcAttributeTypeAndOptionalValue,
    pub header_attributes: SequenceOf<CatalogInfo>,
    #[rasn(tag(explicit(0)))]
    pub extensions: SequenceOf<CertExtension>,
}
