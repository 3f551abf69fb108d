//! Cryptographic primitives for the receipt token service.
//!
//! Provides Ed25519 operator keys (parsed from the raw or DER hex forms
//! ledger portals hand out), signing and verification, and domain-separated
//! BLAKE3 hashing of submitted transactions.
//!
//! All operations wrap `ed25519-dalek` and `blake3`.

pub mod hasher;
pub mod signer;

pub use hasher::{ContentHasher, HasherError, TransactionHash};
pub use signer::{KeyError, Signature, SignatureError, SigningKey, VerifyingKey};
