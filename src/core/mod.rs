//! Domain input model, validation, and builders.
//!
//! These are the flat, denormalized inputs a caller assembles before asking
//! [`crate::pain008`] to produce a schema-specific document tree.

mod builder;
mod error;
mod types;
mod validation;

pub use builder::*;
pub use error::*;
pub use types::*;
pub use validation::*;
