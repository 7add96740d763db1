//! # lastschrift
//!
//! SEPA direct debit initiation: build ISO 20022 pain.008 XML documents from
//! a flat domain model, and parse existing documents back into their
//! version-specific trees.
//!
//! Three schema versions are supported behind one entry point —
//! pain.008.003.02 (German DK schema), pain.008.001.02, and pain.008.001.08.
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Control sums and transaction counts are always recomputed from the
//! transaction lists; caller-supplied aggregates are never trusted.
//!
//! ## Quick Start
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
//!     .sequence_type(SequenceType::Frst)
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
//! assert!(xml.contains("<NbOfTxs>1</NbOfTxs>"));
//! ```

pub mod core;
pub mod pain008;

// Re-export core types at crate root for convenience
pub use crate::core::*;
