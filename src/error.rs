use serde::Deserialize;
use thiserror::Error;

/// Raised by the parser. Parsing aborts at the first one, no partial
/// expression is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("syntax error at offset {offset}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>, offset: usize) -> Self {
        Self { message: message.into(), offset }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("no binding found for `{0}`")]
    UnboundName(String),

    #[error("`{callee}` expects {expected} argument(s), got {found}")]
    ArityMismatch { callee: String, expected: String, found: usize },

    #[error("cannot apply non-function `{0}`")]
    NotCallable(String),

    #[error("`{operation}` expects {expected}, got {found}")]
    TypeMismatch { operation: String, expected: &'static str, found: &'static str },

    #[error("index {index} is out of bounds for an array of length {length}")]
    IndexOutOfBounds { index: f64, length: usize },

    #[error("malformed `{form}`: {message}")]
    MalformedForm { form: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EggError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Flat tag for an [`EggError`], for callers that only care which kind of
/// failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ErrorKind {
    SyntaxError,
    UnboundName,
    ArityMismatch,
    NotCallable,
    TypeMismatch,
    IndexOutOfBounds,
    MalformedForm,
}

impl EggError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax(_) => ErrorKind::SyntaxError,
            Self::Runtime(error) => match error {
                RuntimeError::UnboundName(_) => ErrorKind::UnboundName,
                RuntimeError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
                RuntimeError::NotCallable(_) => ErrorKind::NotCallable,
                RuntimeError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
                RuntimeError::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
                RuntimeError::MalformedForm { .. } => ErrorKind::MalformedForm,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        let syntax: EggError = SyntaxError::new("expected ')'", 3).into();
        assert_eq!(syntax.kind(), ErrorKind::SyntaxError);

        let unbound: EggError = RuntimeError::UnboundName("bar".to_owned()).into();
        assert_eq!(unbound.kind(), ErrorKind::UnboundName);
        assert_eq!(unbound.to_string(), "no binding found for `bar`");
    }
}
