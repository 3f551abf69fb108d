//! Foundation types for the receipt token service.
//!
//! Ledger identifiers cross the HTTP boundary as strings. This crate keeps
//! them opaque: an [`AccountId`] or [`TokenId`] is only checked to be a
//! non-blank token without whitespace. Interpreting the text as a ledger
//! entity is the ledger client's job.
//!
//! # Key Types
//!
//! - [`AccountId`]: ledger account identifier
//! - [`TokenId`]: ledger token identifier
//! - [`TransactionRef`]: opaque reference the ledger returns for a submission
//! - [`Amount`]: positive integer quantity of token units

pub mod amount;
pub mod error;
pub mod id;

pub use amount::Amount;
pub use error::TypeError;
pub use id::{AccountId, TokenId, TransactionRef, MAX_ID_LEN};
