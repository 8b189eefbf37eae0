//! Errors raised while reconciling imports

use jrewrite_core::EditError;
use jrewrite_syntax::ParseError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The package or import header cannot be read
    #[error("Malformed import header at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error(transparent)]
    Edit(#[from] EditError),
}

impl From<ParseError> for ImportError {
    fn from(error: ParseError) -> Self {
        ImportError::Syntax {
            offset: error.offset,
            message: error.message,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
