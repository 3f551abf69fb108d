//! Ledger client contract for the receipt token service.
//!
//! This crate provides:
//! - Entity and transaction identifiers in the network's text forms
//! - Transaction builders (token create, token transfer, token associate)
//!   with the freeze → sign → submit → receipt flow
//! - The [`LedgerClient`] trait boundary and account balance queries
//! - [`SandboxLedger`], an in-process network for tests and offline runs

pub mod client;
pub mod entity;
pub mod error;
pub mod hbar;
pub mod operator;
pub mod sandbox;
pub mod transaction;

pub use client::{
    AccountBalance, AccountBalanceQuery, LedgerClient, TransactionReceipt, TransactionResponse,
};
pub use entity::{EntityId, TransactionId};
pub use error::{LedgerError, Status};
pub use hbar::Hbar;
pub use operator::Operator;
pub use sandbox::{SandboxLedger, TokenInfo};
pub use transaction::{
    FrozenTransaction, SignaturePair, SignedBody, TokenAssociateTransaction,
    TokenCreateTransaction, TokenSupplyType, TokenTransfer, TransactionBody, TransferTransaction,
};
