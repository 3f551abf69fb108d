//! Ed25519 operator keys.
//!
//! Ledger portals hand out private keys either as 32 raw bytes or as a
//! PKCS#8 DER blob, both hex encoded. Only Ed25519 is accepted. ECDSA
//! secp256k1 keys, which portals also export, are recognised by their DER
//! prefix and refused with [`KeyError::UnsupportedAlgorithm`]; an operator
//! account must be created with an Ed25519 key (`receipts keygen`).

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signer, Verifier};
use serde::{Deserialize, Serialize};

const ED25519_PRIVATE_DER_PREFIX: &str = "302e020100300506032b657004220420";
const ED25519_PUBLIC_DER_PREFIX: &str = "302a300506032b6570032100";
const ECDSA_PRIVATE_DER_PREFIX: &str = "3030020100300706052b8104000a04220420";

/// Private key of an account. Never printed.
pub struct SigningKey(ed25519_dalek::SigningKey);

/// Public key as registered on a ledger account. Serialized as hex.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerifyingKey(ed25519_dalek::VerifyingKey);

/// Signature over a frozen transaction body. Serialized as hex.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature(ed25519_dalek::Signature);

impl SigningKey {
    pub fn generate() -> Self {
        Self(ed25519_dalek::SigningKey::generate(&mut rand::thread_rng()))
    }

    pub fn from_bytes(secret: [u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&secret))
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }

    pub fn sign(&self, payload: &[u8]) -> Signature {
        Signature(self.0.sign(payload))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// PKCS#8 DER hex, the form portals export and [`SigningKey::parse`] reads.
    pub fn to_der_hex(&self) -> String {
        format!("{ED25519_PRIVATE_DER_PREFIX}{}", hex::encode(self.0.as_bytes()))
    }

    /// Accepts raw or DER hex, any case, with an optional `0x`.
    pub fn parse(input: &str) -> Result<Self, KeyError> {
        let lower = input.trim().to_ascii_lowercase();
        let lower = lower.strip_prefix("0x").unwrap_or(&lower);
        if lower.starts_with(ECDSA_PRIVATE_DER_PREFIX) {
            return Err(KeyError::UnsupportedAlgorithm("ECDSA secp256k1".into()));
        }
        let secret = lower.strip_prefix(ED25519_PRIVATE_DER_PREFIX).unwrap_or(lower);
        Ok(Self::from_bytes(decode_hex(secret)?))
    }
}

impl FromStr for SigningKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl VerifyingKey {
    pub fn verify(&self, payload: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        self.0
            .verify(payload, &signature.0)
            .map_err(|_| SignatureError::InvalidSignature)
    }

    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignatureError> {
        ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map(Self)
            .map_err(|_| SignatureError::InvalidKey)
    }

    /// SubjectPublicKeyInfo DER hex.
    pub fn to_der_hex(&self) -> String {
        format!("{ED25519_PUBLIC_DER_PREFIX}{}", hex::encode(self.0.to_bytes()))
    }
}

impl TryFrom<String> for VerifyingKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_bytes(decode_hex(&value)?).map_err(|_| KeyError::InvalidHex(value))
    }
}

impl From<VerifyingKey> for String {
    fn from(key: VerifyingKey) -> Self {
        hex::encode(key.0.to_bytes())
    }
}

impl TryFrom<String> for Signature {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let bytes: [u8; 64] = decode_hex(&value)?;
        Ok(Self(ed25519_dalek::Signature::from_bytes(&bytes)))
    }
}

impl From<Signature> for String {
    fn from(signature: Signature) -> Self {
        hex::encode(signature.0.to_bytes())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerifyingKey({})", self.to_der_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_bytes();
        write!(f, "Signature({}..)", hex::encode(&bytes[..6]))
    }
}

fn decode_hex<const N: usize>(input: &str) -> Result<[u8; N], KeyError> {
    let bytes = hex::decode(input).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| KeyError::InvalidLength {
        expected: N,
        actual,
    })
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature does not match the payload")]
    InvalidSignature,
    #[error("bytes are not a valid Ed25519 public key")]
    InvalidKey,
}

/// Key material that could not be read.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("key is not valid hex: {0}")]
    InvalidHex(String),

    #[error("key must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("{0} keys are not supported, use an Ed25519 key")]
    UnsupportedAlgorithm(String),
}
