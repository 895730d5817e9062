use std::fmt::{Display, Formatter};
use thiserror::Error;
use crate::interpreter::lexer::TokenPos;

/// The pipeline stage an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Runtime,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Lex => write!(f, "lex"),
            Stage::Parse => write!(f, "parse"),
            Stage::Runtime => write!(f, "runtime"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ErrorKind {
    // Lexer
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("Unterminated string")]
    UnterminatedString,
    #[error("Unexpected character '{0}'; expected \"{0}{0}\"")]
    IncompleteOperator(char),

    // Parser
    #[error("{expected}, got {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
    },
    #[error("Constant '{0}' requires an initializer")]
    ConstantWithoutInitializer(String),
    #[error("Invalid assignment target; expected an identifier")]
    InvalidAssignmentTarget,
    #[error("Failed to parse number literal '{0}'")]
    InvalidNumber(String),
    #[error("Switch case value must be a number or string literal, got {0}")]
    InvalidCaseValue(String),

    // Runtime
    #[error("Variable '{0}' already exists")]
    Redeclaration(String),
    #[error("Constant '{0}' cannot be reassigned")]
    ConstantAssignment(String),
    #[error("Variable '{0}' could not be resolved")]
    Unresolved(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Operator '{operator}' is not supported for {left} and {right}")]
    UnsupportedOperator {
        operator: String,
        left: &'static str,
        right: &'static str,
    },
    #[error("Value of type {0} is not callable")]
    NotCallable(&'static str),
    #[error("Condition must evaluate to a bool, got {0}")]
    NonBooleanCondition(&'static str),
    #[error("Cannot compare switch value of type {value} with case of type {case}")]
    SwitchTypeMismatch {
        value: &'static str,
        case: &'static str,
    },
    #[error("Cannot access a property of a value of type {0}")]
    NotAnObject(&'static str),
    #[error("Property key must be a string or a number, got {0}")]
    InvalidPropertyKey(&'static str),
    #[error("Maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
}

impl ErrorKind {
    pub fn stage(&self) -> Stage {
        match self {
            ErrorKind::UnexpectedCharacter(_)
            | ErrorKind::UnterminatedString
            | ErrorKind::IncompleteOperator(_) => Stage::Lex,

            ErrorKind::UnexpectedToken { .. }
            | ErrorKind::ConstantWithoutInitializer(_)
            | ErrorKind::InvalidAssignmentTarget
            | ErrorKind::InvalidNumber(_)
            | ErrorKind::InvalidCaseValue(_) => Stage::Parse,

            _ => Stage::Runtime,
        }
    }
}

/// An error from any stage of the pipeline.
///
/// `trace` starts at the innermost position and gains one entry for every
/// enclosing parse or evaluation frame the error passes through.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{kind}")]
pub struct Error {
    kind: ErrorKind,
    trace: Vec<TokenPos>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Error {
        Error { kind, trace: Vec::new() }
    }

    pub fn at(kind: ErrorKind, pos: TokenPos) -> Error {
        Error { kind, trace: vec![pos] }
    }

    pub fn with_trace(mut self, pos: TokenPos) -> Error {
        self.trace.push(pos);
        self
    }

    pub fn kind(&self) -> &ErrorKind { &self.kind }
    pub fn trace(&self) -> &[TokenPos] { &self.trace }
    pub fn stage(&self) -> Stage { self.kind.stage() }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

pub type LangResult<T> = Result<T, Error>;
