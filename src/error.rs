use std::path::PathBuf;

use thiserror::Error;

use crate::visit::SqlObjectKind;

#[derive(Debug, Error)]
pub enum SqlObjectError {
    #[error("Unsupported operator {token}")]
    UnsupportedOperator { token: String },

    #[error("Expected {expected}, found {found:?}")]
    KindMismatch {
        expected: &'static str,
        found: SqlObjectKind,
    },

    #[error("{kind:?} must have at least one entry")]
    EmptyList { kind: SqlObjectKind },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SqlObjectError {
    pub fn unsupported_operator(token: impl Into<String>) -> Self {
        Self::UnsupportedOperator { token: token.into() }
    }

    pub fn kind_mismatch(expected: &'static str, found: SqlObjectKind) -> Self {
        Self::KindMismatch { expected, found }
    }

    pub fn empty_list(kind: SqlObjectKind) -> Self {
        Self::EmptyList { kind }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }
}
