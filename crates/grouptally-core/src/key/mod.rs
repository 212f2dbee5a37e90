//! Module: key
//! Responsibility: grouping-key descriptor parsing into (source, output) pairs.
//! Does not own: mapper resolution or field lookup.

use thiserror::Error as ThisError;

/// Literal separator between a source field and its alias.
pub const ALIAS_SEPARATOR: &str = " as ";

///
/// KeySpec
///
/// One parsed grouping key: the record field it reads and the group field it
/// writes. `output` equals `source` when no alias is given.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeySpec {
    pub source: String,
    pub output: String,
}

impl KeySpec {
    #[must_use]
    pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }

    /// Parse one descriptor of the form `"<field>"` or `"<field> as <alias>"`.
    ///
    /// Only the first two `" as "`-separated tokens are read; an empty alias
    /// falls back to the source name. Never fails, see [`Self::validate`].
    #[must_use]
    pub fn parse(descriptor: &str) -> Self {
        let mut tokens = descriptor.split(ALIAS_SEPARATOR);
        let source = tokens.next().unwrap_or_default();
        let output = tokens.next().filter(|alias| !alias.is_empty()).unwrap_or(source);

        Self::new(source, output)
    }

    /// Check that both names are non-empty.
    pub fn validate(&self, descriptor: &str) -> Result<(), KeySpecError> {
        let reason = if self.source.is_empty() {
            "empty source field"
        } else if self.output.is_empty() {
            "empty output field"
        } else {
            return Ok(());
        };

        Err(KeySpecError::MalformedDescriptor {
            descriptor: descriptor.to_string(),
            reason,
        })
    }

    #[must_use]
    pub fn is_aliased(&self) -> bool {
        self.source != self.output
    }
}

/// Parse descriptors in order; duplicates are kept.
#[must_use]
pub fn parse_key_specs<S: AsRef<str>>(descriptors: &[S]) -> Vec<KeySpec> {
    descriptors
        .iter()
        .map(|descriptor| KeySpec::parse(descriptor.as_ref()))
        .collect()
}

///
/// KeySpecError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeySpecError {
    #[error("malformed key descriptor '{descriptor}': {reason}")]
    MalformedDescriptor {
        descriptor: String,
        reason: &'static str,
    },
}

///
/// TESTS
///
