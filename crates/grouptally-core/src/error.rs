use crate::{config::MapperError, key::KeySpecError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured aggregation error with a stable classification.
/// Every failure aborts the whole aggregation; no partial results escape.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a config-origin conflict.
    pub(crate) fn config_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Conflict, ErrorOrigin::Config, message)
    }

    /// Construct an input-origin unsupported error.
    pub(crate) fn input_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Input, message)
    }

    /// Wrap a mapper failure with the record position and mapped field.
    pub(crate) fn mapper_failed(row: usize, field: &str, err: MapperError) -> Self {
        Self {
            class: ErrorClass::MapperFailed,
            origin: ErrorOrigin::Projection,
            message: format!("mapper for field '{field}' failed on row {row}: {err}"),
            detail: Some(ErrorDetail::Mapper(err)),
        }
    }

    #[must_use]
    pub const fn is_malformed_key(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::KeySpec(KeySpecError::MalformedDescriptor { .. }))
        )
    }

    #[must_use]
    pub const fn is_mapper_failure(&self) -> bool {
        matches!(self.detail, Some(ErrorDetail::Mapper(_)))
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    KeySpec(KeySpecError),
    #[error("{0}")]
    Mapper(MapperError),
}

impl From<KeySpecError> for InternalError {
    fn from(err: KeySpecError) -> Self {
        Self {
            class: ErrorClass::Malformed,
            origin: ErrorOrigin::KeySpec,
            message: err.to_string(),
            detail: Some(ErrorDetail::KeySpec(err)),
        }
    }
}

///
/// ErrorClass
/// Error taxonomy for aggregation failures.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Malformed,
    MapperFailed,
    Conflict,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Malformed => "malformed",
            Self::MapperFailed => "mapper_failed",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Pipeline stage that raised the error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    KeySpec,
    Config,
    Projection,
    Input,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::KeySpec => "key_spec",
            Self::Config => "config",
            Self::Projection => "projection",
            Self::Input => "input",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_class_prefixes_origin_and_class() {
        let err = InternalError::config_conflict("count field collides");

        assert_eq!(
            err.display_with_class(),
            "config:conflict: count field collides"
        );
        assert!(err.detail.is_none());
    }

    #[test]
    fn key_spec_error_converts_with_detail() {
        let err: InternalError = KeySpecError::MalformedDescriptor {
            descriptor: String::new(),
            reason: "empty source field",
        }
        .into();

        assert_eq!(err.class, ErrorClass::Malformed);
        assert_eq!(err.origin, ErrorOrigin::KeySpec);
        assert!(err.is_malformed_key());
        assert!(!err.is_mapper_failure());
    }

    #[test]
    fn mapper_failure_keeps_source_error() {
        let err = InternalError::mapper_failed(3, "day", MapperError::new("bad date"));

        assert_eq!(err.class, ErrorClass::MapperFailed);
        assert_eq!(err.origin, ErrorOrigin::Projection);
        assert_eq!(err.message, "mapper for field 'day' failed on row 3: bad date");
        assert!(err.is_mapper_failure());
    }
}
