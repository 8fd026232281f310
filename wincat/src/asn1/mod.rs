//! ASN.1/DER encoding: the typed CTL content model, its supporting
//! encoding helpers, and the PKCS#7 envelope it is wrapped in.

pub mod encode;
pub mod model;
pub mod oids;
pub mod pkcs7;
