//! ISO 20022 pain.008 document generation and parsing.
//!
//! Three schema versions of the customer direct debit initiation message are
//! supported behind one entry point. The version-specific object graphs are
//! deliberately kept apart — field names, cardinalities and enumerations
//! drift between releases, so each version owns its model and its mapping
//! (`pain00800302`, `pain00800102`, `pain00800108`).
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use lastschrift::core::*;
//! use lastschrift::pain008::{self, PainDocumentType};
//! use rust_decimal_macros::dec;
//!
//! let header = GroupHeaderInfo::new(
//!     "MSG-1",
//!     NaiveDate::from_ymd_opt(2025, 5, 20).unwrap().and_hms_opt(10, 0, 0).unwrap(),
//!     "ACME",
//! );
//! let batch = PaymentInfoBuilder::new("PMT-1", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
//!     .creditor(CreditorInfo::new(
//!         "ACME", "DE89370400440532013000", "COBADEFFXXX", "DE98ZZZ09999999999",
//!     ))
//!     .add_transaction(
//!         TransactionBuilder::new("E2E-1", dec!(10.00))
//!             .debtor("J Doe", "DE02100100100006820101", "PBNKDEFF")
//!             .mandate("M1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
//!             .build()
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let xml = pain008::create_document_xml(PainDocumentType::Pain00800108, &header, &[batch])
//!     .unwrap();
//! assert!(xml.contains("<CtrlSum>10.00</CtrlSum>"));
//! ```

pub mod pain00800102;
pub mod pain00800108;
pub mod pain00800302;
pub(crate) mod xml;

use std::io::BufRead;

use crate::core::{
    CollectorPaymentInfoPain, GroupHeaderInfo, PainError, ValidationKind, validate_group_header,
};

pub use xml::XSI_NAMESPACE;

/// Closed registry of supported pain.008 schema versions.
///
/// Each variant carries its textual name, XML namespace, and schema location.
/// Dispatch over this enum is exhaustive; adding a version is a compile-time
/// change, and an out-of-registry selector is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PainDocumentType {
    /// pain.008.003.02 — German DK schema (EBICS era).
    Pain00800302,
    /// pain.008.001.02 — ISO version used alongside the DK schema.
    Pain00800102,
    /// pain.008.001.08 — current ISO version.
    Pain00800108,
}

impl PainDocumentType {
    /// Textual identifier, e.g. `"pain.008.001.08"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pain00800302 => "pain.008.003.02",
            Self::Pain00800102 => "pain.008.001.02",
            Self::Pain00800108 => "pain.008.001.08",
        }
    }

    /// XML namespace URN of the schema version.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Pain00800302 => pain00800302::NAMESPACE,
            Self::Pain00800102 => pain00800102::NAMESPACE,
            Self::Pain00800108 => pain00800108::NAMESPACE,
        }
    }

    /// `xsi:schemaLocation` value — namespace plus xsd filename.
    pub fn schema_location(&self) -> String {
        format!("{} {}.xsd", self.namespace(), self.name())
    }
}

/// How to treat a requested collection date that lies before the message
/// creation date. The banks' submission-timing rules vary, so this is
/// configurable rather than hard-coded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollectionDatePolicy {
    /// Pass the date through unchecked.
    #[default]
    Allow,
    /// Fail the build with a validation error.
    Reject,
}

/// Options applied by [`create_document_xml_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentOptions {
    pub collection_date_policy: CollectionDatePolicy,
}

/// A parsed document tree, tagged with its schema version.
#[derive(Debug, Clone)]
pub enum ParsedDocument {
    Pain00800302(pain00800302::Document),
    Pain00800102(pain00800102::Document),
    Pain00800108(pain00800108::Document),
}

/// Build and serialize a pain.008 document with default options.
///
/// Validates the header and every batch, recomputes all aggregates, maps the
/// inputs into the selected version's tree (batch and transaction order
/// preserved), and marshals it to UTF-8 XML text. Either a fully valid
/// document is returned or an error — never partial output.
pub fn create_document_xml(
    doc_type: PainDocumentType,
    header: &GroupHeaderInfo,
    payment_infos: &[CollectorPaymentInfoPain],
) -> Result<String, PainError> {
    create_document_xml_with(doc_type, header, payment_infos, &DocumentOptions::default())
}

/// Build and serialize a pain.008 document.
pub fn create_document_xml_with(
    doc_type: PainDocumentType,
    header: &GroupHeaderInfo,
    payment_infos: &[CollectorPaymentInfoPain],
    options: &DocumentOptions,
) -> Result<String, PainError> {
    // Header problems outrank date-policy problems in the error reported.
    validate_group_header(header)?;
    check_collection_dates(header, payment_infos, options)?;

    match doc_type {
        PainDocumentType::Pain00800302 => {
            let document = pain00800302::create_document(header, payment_infos)?;
            xml::marshal(&document)
        }
        PainDocumentType::Pain00800102 => {
            let document = pain00800102::create_document(header, payment_infos)?;
            xml::marshal(&document)
        }
        PainDocumentType::Pain00800108 => {
            let document = pain00800108::create_document(header, payment_infos)?;
            xml::marshal(&document)
        }
    }
}

/// Parse a pain.008 XML stream into the raw tree of the selected version.
///
/// The document's `xmlns` must match the selected version; a document of a
/// different version is rejected rather than returned under the wrong tag.
/// Otherwise intentionally asymmetric with building: no domain-model
/// reconstruction is attempted, the caller receives the schema tree as-is.
pub fn parse_document(
    doc_type: PainDocumentType,
    reader: impl BufRead,
) -> Result<ParsedDocument, PainError> {
    let (document, xmlns) = match doc_type {
        PainDocumentType::Pain00800302 => {
            let doc: pain00800302::Document = xml::unmarshal(reader)?;
            let xmlns = doc.xmlns.clone();
            (ParsedDocument::Pain00800302(doc), xmlns)
        }
        PainDocumentType::Pain00800102 => {
            let doc: pain00800102::Document = xml::unmarshal(reader)?;
            let xmlns = doc.xmlns.clone();
            (ParsedDocument::Pain00800102(doc), xmlns)
        }
        PainDocumentType::Pain00800108 => {
            let doc: pain00800108::Document = xml::unmarshal(reader)?;
            let xmlns = doc.xmlns.clone();
            (ParsedDocument::Pain00800108(doc), xmlns)
        }
    };
    if xmlns != doc_type.namespace() {
        return Err(PainError::Xml(format!(
            "namespace mismatch: expected '{}', document declares '{}'",
            doc_type.namespace(),
            xmlns
        )));
    }
    Ok(document)
}

fn check_collection_dates(
    header: &GroupHeaderInfo,
    payment_infos: &[CollectorPaymentInfoPain],
    options: &DocumentOptions,
) -> Result<(), PainError> {
    if options.collection_date_policy == CollectionDatePolicy::Allow {
        return Ok(());
    }
    let creation_date = header.creation_date_time.date();
    for info in payment_infos {
        if info.collection_date < creation_date {
            return Err(PainError::validation(
                ValidationKind::InvalidDate,
                format!(
                    "payment info '{}': collection date {} lies before message creation date {}",
                    info.payment_info_id, info.collection_date, creation_date
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names() {
        assert_eq!(PainDocumentType::Pain00800302.name(), "pain.008.003.02");
        assert_eq!(PainDocumentType::Pain00800102.name(), "pain.008.001.02");
        assert_eq!(PainDocumentType::Pain00800108.name(), "pain.008.001.08");
    }

    #[test]
    fn schema_location_pairs_namespace_and_xsd() {
        assert_eq!(
            PainDocumentType::Pain00800108.schema_location(),
            "urn:iso:std:iso:20022:tech:xsd:pain.008.001.08 pain.008.001.08.xsd"
        );
        assert_eq!(
            PainDocumentType::Pain00800302.schema_location(),
            "urn:iso:std:iso:20022:tech:xsd:pain.008.003.02 pain.008.003.02.xsd"
        );
    }
}
