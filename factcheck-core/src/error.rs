//! Error types for factcheck.
//!
//! Every variant here is a *usage* error: a generator or binding that was set
//! up wrongly. Assertion failures inside a test body are not errors of this
//! crate; they are panics and travel to the harness untouched.

use thiserror::Error;

/// Main error type for factcheck.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A generator was bound to a name the test does not declare.
    #[error("no parameter named `{name}` is declared by the test")]
    UnknownParameter { name: String },

    /// A declared parameter ended up with no generator.
    #[error("parameter `{name}` has no generator")]
    MissingGenerator { name: String },

    /// The same parameter name was declared twice.
    #[error("parameter `{name}` is declared more than once")]
    DuplicateParameter { name: String },

    /// A generator produced no values at all, so nothing can be sampled.
    #[error("generator for `{name}` produced no values")]
    EmptyGenerator { name: String },

    /// A value was read back as a different type from the one generated.
    #[error("parameter `{name}` does not hold a value of type `{expected}`")]
    TypeMismatch { name: String, expected: &'static str },

    /// A value was read back after it had already been taken.
    #[error("parameter `{name}` has already been taken")]
    AlreadyTaken { name: String },

    /// `choices` was given nothing to choose from.
    #[error("cannot choose from an empty sequence")]
    EmptyChoices,

    /// Invalid generator construction.
    #[error("invalid generator: {message}")]
    InvalidGenerator { message: String },

    /// `unique` could not find a new key.
    #[error("unique elements exhausted after {attempts} consecutive duplicates")]
    Exhausted { attempts: usize },
}

/// Result type for factcheck operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidGenerator {
            message: message.into(),
        }
    }

    /// Fail loudly with this usage error.
    pub(crate) fn raise(self) -> ! {
        panic!("{self}")
    }
}
