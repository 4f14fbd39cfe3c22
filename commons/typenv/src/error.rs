use thiserror::Error;

use crate::duration::DurationError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error returned by [`crate::parse`].
#[derive(Debug, Error)]
pub enum EnvError {
    /// An option argument was invalid. Never subject to fallback.
    #[error("option error: {0}")]
    Configuration(#[from] OptionError),

    /// The cause is part of the message and is not reported again through
    /// `Error::source`.
    #[error("failed to parse env {name} to {type_name}: {cause}")]
    Parse {
        name: String,
        type_name: &'static str,
        cause: ValueError,
    },

    #[error("unsupported type {type_name} for env var {name}")]
    UnsupportedType {
        name: String,
        type_name: &'static str,
    },

    /// A custom marshaller produced a value of a different type than the one
    /// it was registered for.
    #[error("failed to cast env {name} to {type_name}")]
    TypeMismatch {
        name: String,
        type_name: &'static str,
    },
}

impl EnvError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, EnvError::Configuration(_))
    }

    /// Variable name the error refers to, if any.
    pub fn env_var(&self) -> Option<&str> {
        match self {
            EnvError::Configuration(_) => None,
            EnvError::Parse { name, .. }
            | EnvError::UnsupportedType { name, .. }
            | EnvError::TypeMismatch { name, .. } => Some(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("{option}: separator cannot be empty string")]
    EmptySeparator { option: &'static str },

    #[error("{option}: time layout cannot be empty string")]
    EmptyTimeLayout { option: &'static str },
}

/// Why a raw string could not be turned into a value.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("parsing {kind} {value:?}: invalid syntax")]
    InvalidSyntax { kind: &'static str, value: String },

    #[error("parsing {kind} {value:?}: value out of range")]
    OutOfRange { kind: &'static str, value: String },

    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error("parsing time {value:?} as {layout:?}: {cause}")]
    Time {
        value: String,
        layout: String,
        cause: chrono::ParseError,
    },

    #[error("parsing url {value:?}: {cause}")]
    Url { value: String, cause: url::ParseError },

    #[error("item {value} (pos: {pos}) failed to parse: {cause}")]
    Item {
        pos: usize,
        value: String,
        cause: Box<ValueError>,
    },

    #[error("custom marshaller failed: {0}")]
    Custom(BoxError),

    #[error("value withheld (sensitive)")]
    Redacted,
}

impl ValueError {
    pub(crate) fn invalid_syntax(kind: &'static str, value: &str) -> Self {
        ValueError::InvalidSyntax {
            kind,
            value: value.to_string(),
        }
    }

    pub(crate) fn out_of_range(kind: &'static str, value: &str) -> Self {
        ValueError::OutOfRange {
            kind,
            value: value.to_string(),
        }
    }

    /// Position of the failing element for sequence conversions.
    pub fn position(&self) -> Option<usize> {
        match self {
            ValueError::Item { pos, .. } => Some(*pos),
            _ => None,
        }
    }
}
