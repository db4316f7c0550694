use thiserror::Error;

/// Result alias used by all normalizers.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The locator string could not be parsed at all.
    Malformed,
    /// Region, collection, database or project information is absent and
    /// can not be defaulted.
    MissingField,
    /// The scheme is not handled by the normalizer that was called.
    UnrecognizedScheme,
    /// The path does not match any of the accepted shapes for the backend.
    StructuralMismatch,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid locator '{input}': {reason}")]
    Malformed { input: String, reason: String },

    #[error("locator '{url}' is missing the {field}: {hint}")]
    MissingField {
        field: &'static str,
        url: String,
        hint: String,
    },

    #[error("unknown scheme of docstore: '{scheme}'")]
    UnrecognizedScheme { scheme: String },

    #[error("locator '{url}' has an unexpected shape, expected {expected}")]
    StructuralMismatch { url: String, expected: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed { .. } => ErrorKind::Malformed,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::UnrecognizedScheme { .. } => ErrorKind::UnrecognizedScheme,
            Self::StructuralMismatch { .. } => ErrorKind::StructuralMismatch,
        }
    }

    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: &'static str, url: impl ToString, hint: impl Into<String>) -> Self {
        Self::MissingField {
            field,
            url: url.to_string(),
            hint: hint.into(),
        }
    }

    pub(crate) fn mismatch(url: impl ToString, expected: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            url: url.to_string(),
            expected: expected.into(),
        }
    }
}
