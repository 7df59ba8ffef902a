use thiserror::Error;

use crate::model::EntityKind;

/// Failures that abort a single query.
///
/// Unresolvable names are not errors; they surface as `None`. Everything here is a
/// caller/wiring mistake and is reported to whoever issued the query.
#[derive(Error, Debug)]
pub enum SemanticError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Wrong entity kind: expected {expected}, found {found:?}")]
    WrongEntityKind {
        expected: &'static str,
        found: EntityKind,
    },
    #[error("Invalid type syntax: {0}")]
    InvalidTypeSyntax(String),
    #[error("Overload resolution requires at least one candidate method")]
    EmptyCandidates,
    #[error("Module lock poisoned by a failed writer")]
    Poisoned,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SemanticError {
    pub fn wrong_kind(expected: &'static str, found: EntityKind) -> Self {
        SemanticError::WrongEntityKind { expected, found }
    }
}

pub type Result<T> = std::result::Result<T, SemanticError>;
