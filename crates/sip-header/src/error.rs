use std::fmt;
use std::panic::Location;
use thiserror::Error;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Result of a scanning step that can only fail on grammar
pub type GrammarResult<T> = std::result::Result<T, GrammarError>;

/// Errors that can occur while parsing or accessing structured header values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Wire text violates the required grammar. Always fatal to the parse
    /// that produced it.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// A typed accessor asked for a parameter the value does not carry
    #[error("Missing parameter '{name}' on {component}")]
    MissingParameter {
        /// Component the accessor was called on
        component: &'static str,
        /// Wire name of the missing parameter
        name: &'static str,
    },

    /// Rejected parser configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns the grammar error if this is one.
    pub fn as_grammar(&self) -> Option<&GrammarError> {
        match self {
            Error::Grammar(e) => Some(e),
            _ => None,
        }
    }

    /// True for `Error::Grammar`.
    pub fn is_grammar(&self) -> bool {
        matches!(self, Error::Grammar(_))
    }
}

/// Wire text that does not match the grammar being parsed.
///
/// Carries the human readable message, the component that produced it, the
/// byte offset into the scanned span (when known) and the source location
/// of the check that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    message: String,
    component: &'static str,
    offset: Option<usize>,
    location: &'static Location<'static>,
}

impl GrammarError {
    /// Creates a grammar error attributed to the caller's source location.
    #[track_caller]
    pub fn new(component: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            component,
            offset: None,
            location: Location::caller(),
        }
    }

    /// Creates a grammar error at a byte offset of the scanned span.
    #[track_caller]
    pub fn at(component: &'static str, offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset: Some(offset),
            ..Self::new(component, message)
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Source file and line of the check that rejected the input.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} parse error: {}", self.component, self.message)?;
        if let Some(offset) = self.offset {
            write!(f, " at offset {}", offset)?;
        }
        write!(f, " ({}:{})", self.location.file(), self.location.line())
    }
}

impl std::error::Error for GrammarError {}
