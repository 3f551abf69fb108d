//! Transaction construction: build, freeze with an operator, sign, submit.
//!
//! Freezing assigns a [`TransactionId`] and fixes the body bytes. Signatures
//! are taken over exactly those bytes, so a frozen transaction can no longer
//! be edited.

use serde::{Deserialize, Serialize};

use rcpt_crypto::{ContentHasher, Signature, SigningKey, TransactionHash, VerifyingKey};

use crate::client::{LedgerClient, TransactionResponse};
use crate::entity::{EntityId, TransactionId};
use crate::error::LedgerError;
use crate::operator::Operator;

/// Supply model of a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenSupplyType {
    #[default]
    Infinite,
    Finite { max_supply: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreateBody {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub initial_supply: u64,
    pub treasury: EntityId,
    pub supply_type: TokenSupplyType,
}

/// One leg of a token transfer. Negative amounts debit, positive credit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub token_id: EntityId,
    pub account_id: EntityId,
    pub amount: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoTransferBody {
    pub token_transfers: Vec<TokenTransfer>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAssociateBody {
    pub account_id: EntityId,
    pub token_ids: Vec<EntityId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionBody {
    TokenCreate(TokenCreateBody),
    CryptoTransfer(CryptoTransferBody),
    TokenAssociate(TokenAssociateBody),
}

impl TransactionBody {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TokenCreate(_) => "TokenCreate",
            Self::CryptoTransfer(_) => "CryptoTransfer",
            Self::TokenAssociate(_) => "TokenAssociate",
        }
    }
}

/// What gets serialized into the signed bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBody {
    pub transaction_id: TransactionId,
    pub body: TransactionBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub public_key: VerifyingKey,
    pub signature: Signature,
}

/// A transaction whose id and body are fixed; ready to sign and submit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenTransaction {
    transaction_id: TransactionId,
    body_bytes: Vec<u8>,
    signatures: Vec<SignaturePair>,
}

impl FrozenTransaction {
    fn freeze(body: TransactionBody, operator: &Operator) -> Result<Self, LedgerError> {
        let transaction_id = TransactionId::generate(operator.account_id());
        let body_bytes = serde_json::to_vec(&SignedBody {
            transaction_id,
            body,
        })
        .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        Ok(Self {
            transaction_id,
            body_bytes,
            signatures: Vec::new(),
        })
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body_bytes
    }

    pub fn signatures(&self) -> &[SignaturePair] {
        &self.signatures
    }

    /// Decode the signed body.
    pub fn body(&self) -> Result<SignedBody, LedgerError> {
        serde_json::from_slice(&self.body_bytes)
            .map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Add a signature. Signing twice with the same key replaces the first.
    pub fn sign(mut self, key: &SigningKey) -> Self {
        let public_key = key.verifying_key();
        let signature = key.sign(&self.body_bytes);
        self.signatures.retain(|p| p.public_key != public_key);
        self.signatures.push(SignaturePair {
            public_key,
            signature,
        });
        self
    }

    pub fn sign_with_operator(self, operator: &Operator) -> Self {
        self.sign(operator.key())
    }

    /// Hash of body bytes plus signatures.
    pub fn hash(&self) -> Result<TransactionHash, LedgerError> {
        ContentHasher::TRANSACTION
            .hash_json(self)
            .map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    pub async fn execute(&self, client: &dyn LedgerClient) -> Result<TransactionResponse, LedgerError> {
        client.submit(self).await
    }
}

/// Builds a fungible token creation.
#[derive(Clone, Debug, Default)]
pub struct TokenCreateTransaction {
    name: String,
    symbol: String,
    decimals: u32,
    initial_supply: u64,
    treasury: Option<EntityId>,
    supply_type: TokenSupplyType,
}

impl TokenCreateTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn token_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn initial_supply(mut self, supply: u64) -> Self {
        self.initial_supply = supply;
        self
    }

    pub fn treasury_account_id(mut self, account: EntityId) -> Self {
        self.treasury = Some(account);
        self
    }

    pub fn supply_type(mut self, supply_type: TokenSupplyType) -> Self {
        self.supply_type = supply_type;
        self
    }

    pub fn freeze_with(self, operator: &Operator) -> Result<FrozenTransaction, LedgerError> {
        let treasury = self
            .treasury
            .ok_or_else(|| LedgerError::Builder("treasury account is required".into()))?;
        FrozenTransaction::freeze(
            TransactionBody::TokenCreate(TokenCreateBody {
                name: self.name,
                symbol: self.symbol,
                decimals: self.decimals,
                initial_supply: self.initial_supply,
                treasury,
                supply_type: self.supply_type,
            }),
            operator,
        )
    }
}

/// Builds a multi-party token transfer.
#[derive(Clone, Debug, Default)]
pub struct TransferTransaction {
    transfers: Vec<TokenTransfer>,
}

impl TransferTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leg. Legs are kept as given; the ledger rejects a repeated
    /// token and account pair.
    pub fn add_token_transfer(mut self, token_id: EntityId, account_id: EntityId, amount: i64) -> Self {
        self.transfers.push(TokenTransfer {
            token_id,
            account_id,
            amount,
        });
        self
    }

    pub fn transfers(&self) -> &[TokenTransfer] {
        &self.transfers
    }

    pub fn freeze_with(self, operator: &Operator) -> Result<FrozenTransaction, LedgerError> {
        FrozenTransaction::freeze(
            TransactionBody::CryptoTransfer(CryptoTransferBody {
                token_transfers: self.transfers,
            }),
            operator,
        )
    }
}

/// Builds an association of tokens with an account.
#[derive(Clone, Debug, Default)]
pub struct TokenAssociateTransaction {
    account_id: Option<EntityId>,
    token_ids: Vec<EntityId>,
}

impl TokenAssociateTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_id(mut self, account: EntityId) -> Self {
        self.account_id = Some(account);
        self
    }

    pub fn token_ids(mut self, tokens: impl IntoIterator<Item = EntityId>) -> Self {
        self.token_ids = tokens.into_iter().collect();
        self
    }

    pub fn freeze_with(self, operator: &Operator) -> Result<FrozenTransaction, LedgerError> {
        let account_id = self
            .account_id
            .ok_or_else(|| LedgerError::Builder("account id is required".into()))?;
        FrozenTransaction::freeze(
            TransactionBody::TokenAssociate(TokenAssociateBody {
                account_id,
                token_ids: self.token_ids,
            }),
            operator,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator() -> Operator {
        Operator::new(EntityId::new(0, 0, 2), SigningKey::from_bytes([3; 32]))
    }

    #[test]
    fn freeze_assigns_operator_as_payer() {
        let op = operator();
        let frozen = TokenAssociateTransaction::new()
            .account_id(EntityId::new(0, 0, 1001))
            .token_ids([EntityId::new(0, 0, 500)])
            .freeze_with(&op)
            .unwrap();
        assert_eq!(frozen.transaction_id().account_id, op.account_id());
        let body = frozen.body().unwrap();
        assert_eq!(body.transaction_id, frozen.transaction_id());
        assert!(matches!(body.body, TransactionBody::TokenAssociate(_)));
    }

    #[test]
    fn token_create_requires_treasury() {
        let err = TokenCreateTransaction::new()
            .token_name("Receipt-Buy")
            .freeze_with(&operator())
            .unwrap_err();
        assert!(matches!(err, LedgerError::Builder(_)));
    }

    #[test]
    fn associate_requires_account() {
        let err = TokenAssociateTransaction::new()
            .token_ids([EntityId::new(0, 0, 500)])
            .freeze_with(&operator())
            .unwrap_err();
        assert!(matches!(err, LedgerError::Builder(_)));
    }

    #[test]
    fn transfer_legs_are_kept_as_given() {
        let token = EntityId::new(0, 0, 500);
        let a = EntityId::new(0, 0, 2);
        let tx = TransferTransaction::new()
            .add_token_transfer(token, a, -1)
            .add_token_transfer(token, a, 1);
        let amounts: Vec<i64> = tx.transfers().iter().map(|t| t.amount).collect();
        assert_eq!(amounts, [-1, 1]);
        assert!(tx.transfers().iter().all(|t| t.account_id == a));
    }

    #[test]
    fn signatures_cover_body_bytes() {
        let op = operator();
        let frozen = TransferTransaction::new()
            .add_token_transfer(EntityId::new(0, 0, 500), op.account_id(), -1)
            .add_token_transfer(EntityId::new(0, 0, 500), EntityId::new(0, 0, 1002), 1)
            .freeze_with(&op)
            .unwrap()
            .sign_with_operator(&op);
        let pair = &frozen.signatures()[0];
        assert_eq!(pair.public_key, op.public_key());
        assert!(pair.public_key.verify(frozen.body_bytes(), &pair.signature).is_ok());
    }

    #[test]
    fn signing_twice_with_same_key_keeps_one_signature() {
        let op = operator();
        let other = SigningKey::from_bytes([9; 32]);
        let frozen = TokenAssociateTransaction::new()
            .account_id(EntityId::new(0, 0, 1001))
            .freeze_with(&op)
            .unwrap()
            .sign_with_operator(&op)
            .sign_with_operator(&op)
            .sign(&other);
        assert_eq!(frozen.signatures().len(), 2);
    }

    #[test]
    fn hash_changes_with_signatures() {
        let op = operator();
        let frozen = TokenAssociateTransaction::new()
            .account_id(EntityId::new(0, 0, 1001))
            .freeze_with(&op)
            .unwrap();
        let unsigned = frozen.hash().unwrap();
        let signed = frozen.sign_with_operator(&op).hash().unwrap();
        assert_ne!(unsigned, signed);
    }
}
