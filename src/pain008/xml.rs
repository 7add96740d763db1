//! Generic tree↔XML primitives shared by all schema versions.
//!
//! The variant modules define serde-annotated trees; this module only turns
//! them into XML text and back. Schema-aware logic lives in the builders.

use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::se::Serializer;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::BufRead;
use std::str::FromStr;

use crate::core::PainError;

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// W3C XML Schema instance namespace, bound to the `xsi` prefix on every
/// document root.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Serialize a document tree to indented UTF-8 XML text.
pub(crate) fn marshal<T: Serialize>(tree: &T) -> Result<String, PainError> {
    let mut buf = String::from(XML_DECL);
    let mut ser = Serializer::new(&mut buf);
    ser.indent(' ', 2);
    tree.serialize(ser)
        .map_err(|e| PainError::Xml(format!("marshalling failed: {e}")))?;
    Ok(buf)
}

/// Deserialize a document tree from an XML stream.
pub(crate) fn unmarshal<T: DeserializeOwned>(reader: impl BufRead) -> Result<T, PainError> {
    quick_xml::de::from_reader(reader)
        .map_err(|e| PainError::Xml(format!("unmarshalling failed: {e}")))
}

/// Deserialize a document tree from an XML string.
pub(crate) fn unmarshal_str<T: DeserializeOwned>(xml: &str) -> Result<T, PainError> {
    quick_xml::de::from_str(xml).map_err(|e| PainError::Xml(format!("unmarshalling failed: {e}")))
}

/// Deserialize an optional decimal from bare element text.
///
/// `Decimal`'s own Deserialize goes through `deserialize_any`, which
/// quick-xml answers with a map for element content; routing through the
/// text first keeps `<CtrlSum>10.00</CtrlSum>` parseable. Combine with
/// `#[serde(default)]` so an absent element stays `None`.
pub(crate) fn decimal_from_text<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    Decimal::from_str(text.trim())
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// ISO 8601 date-time without zone offset, as the schemas expect for CreDtTm.
pub(crate) fn format_date_time(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Calendar date only — drops any time component (DtOfSgntr, ReqdColltnDt).
pub(crate) fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}
