use thiserror::Error;

/// Errors produced when constructing identifiers and amounts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },

    #[error("{kind} must not contain whitespace: {value:?}")]
    Whitespace { kind: &'static str, value: String },

    #[error("{kind} exceeds {max} bytes")]
    TooLong { kind: &'static str, max: usize },

    #[error("amount must be a positive integer, got {0}")]
    InvalidAmount(String),
}
