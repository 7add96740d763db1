use thiserror::Error;

/// Errors that can occur while building or parsing a pain.008 document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PainError {
    /// A domain input failed structural validation. No document is built.
    #[error("validation failed [{kind}]: {message}")]
    Validation {
        kind: ValidationKind,
        message: String,
    },

    /// A domain value has no mapping in the target schema version, or a
    /// derived aggregate could not be computed consistently.
    #[error("build error: {0}")]
    Build(String),

    /// XML marshalling or unmarshalling failed. Propagated from quick-xml,
    /// never reinterpreted.
    #[error("XML error: {0}")]
    Xml(String),
}

impl PainError {
    /// Shorthand for a [`PainError::Validation`].
    pub fn validation(kind: ValidationKind, message: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            message: message.into(),
        }
    }
}

/// Classification tag carried by every validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// Structural problem not covered by a more specific tag
    /// (e.g. a batch or message with zero transactions).
    General,
    /// A mandatory field is missing or empty.
    MissingField,
    /// Amount is non-positive or its scale exceeds the currency's minor units.
    InvalidAmount,
    /// A value fails its shape rule (IBAN/BIC pattern).
    InvalidFormat,
    /// Requested collection date violates the configured date policy.
    InvalidDate,
}

impl std::fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::General => "GENERAL",
            Self::MissingField => "MISSING_FIELD",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::InvalidDate => "INVALID_DATE",
        };
        f.write_str(s)
    }
}
