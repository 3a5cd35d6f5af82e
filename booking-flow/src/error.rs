use thiserror::Error;

/// How a submitted value failed validation.
///
/// `Malformed` values cannot be interpreted as the field's type at all (for example a
/// non-numeric age), `Rejected` values parse but fall outside what the form accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Malformed,
    Rejected,
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid request id: {0}")]
    InvalidRequestId(String),

    #[error("Invalid value for '{field}': {message}")]
    InvalidField {
        field: String,
        kind: FieldErrorKind,
        message: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl BookingError {
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            kind: FieldErrorKind::Malformed,
            message: message.into(),
        }
    }

    pub fn rejected(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            kind: FieldErrorKind::Rejected,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
