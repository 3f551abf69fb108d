use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use rcpt_crypto::VerifyingKey;

use crate::client::{
    AccountBalance, AccountBalanceQuery, LedgerClient, TransactionReceipt, TransactionResponse,
};
use crate::entity::{EntityId, TransactionId};
use crate::error::{LedgerError, Status};
use crate::hbar::Hbar;
use crate::transaction::{
    CryptoTransferBody, FrozenTransaction, TokenAssociateBody, TokenCreateBody, TokenSupplyType,
    TransactionBody,
};

/// Longest token symbol the sandbox accepts, in bytes.
const MAX_SYMBOL_LEN: usize = 100;

/// First entity number handed out to new tokens and accounts.
const FIRST_ENTITY_NUM: u64 = 1000;

/// In-process ledger network for tests, local demos, and offline runs.
///
/// Applies the network's rules for the transactions this service submits:
/// signature checks over the frozen body, token creation with treasury
/// auto-association, explicit association, and zero-sum token transfers.
/// Execution is serialized under a single lock, so every transaction is
/// applied atomically or not at all.
pub struct SandboxLedger {
    shard: u64,
    realm: u64,
    inner: RwLock<NetworkState>,
}

#[derive(Default)]
struct NetworkState {
    accounts: HashMap<EntityId, AccountState>,
    tokens: HashMap<EntityId, TokenInfo>,
    receipts: HashMap<TransactionId, TransactionReceipt>,
    next_num: u64,
}

struct AccountState {
    key: VerifyingKey,
    hbars: Hbar,
    /// Associated tokens and their balances.
    relationships: BTreeMap<EntityId, u64>,
}

/// Public view of a token created on the sandbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenInfo {
    pub token_id: EntityId,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub treasury: EntityId,
    pub total_supply: u64,
    pub supply_type: TokenSupplyType,
}

impl SandboxLedger {
    pub fn new() -> Self {
        Self {
            shard: 0,
            realm: 0,
            inner: RwLock::new(NetworkState {
                next_num: FIRST_ENTITY_NUM,
                ..NetworkState::default()
            }),
        }
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, NetworkState>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::Network("sandbox state write lock poisoned".into()))
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, NetworkState>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Network("sandbox state read lock poisoned".into()))
    }

    /// Create an account with the next free entity number.
    pub fn create_account(&self, key: VerifyingKey, balance: Hbar) -> Result<EntityId, LedgerError> {
        let mut state = self.write_state()?;
        let id = EntityId::new(self.shard, self.realm, state.next_num);
        state.next_num += 1;
        state.accounts.insert(
            id,
            AccountState {
                key,
                hbars: balance,
                relationships: BTreeMap::new(),
            },
        );
        Ok(id)
    }

    /// Seed an account at a fixed id. Returns `false` if it already exists.
    pub fn create_account_with_id(
        &self,
        id: EntityId,
        key: VerifyingKey,
        balance: Hbar,
    ) -> Result<bool, LedgerError> {
        let mut state = self.write_state()?;
        if state.accounts.contains_key(&id) {
            return Ok(false);
        }
        state.accounts.insert(
            id,
            AccountState {
                key,
                hbars: balance,
                relationships: BTreeMap::new(),
            },
        );
        if id.shard == self.shard && id.realm == self.realm && id.num >= state.next_num {
            state.next_num = id.num + 1;
        }
        Ok(true)
    }

    pub fn token_info(&self, token_id: EntityId) -> Result<Option<TokenInfo>, LedgerError> {
        Ok(self.read_state()?.tokens.get(&token_id).cloned())
    }

    pub fn transaction_count(&self) -> Result<usize, LedgerError> {
        Ok(self.read_state()?.receipts.len())
    }
}

impl Default for SandboxLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for SandboxLedger {
    async fn submit(
        &self,
        transaction: &FrozenTransaction,
    ) -> Result<TransactionResponse, LedgerError> {
        let transaction_id = transaction.transaction_id();
        let precheck = |status| LedgerError::Precheck {
            status,
            transaction_id,
        };

        let signed = transaction
            .body()
            .map_err(|_| precheck(Status::InvalidTransactionBody))?;
        if signed.transaction_id != transaction_id {
            return Err(precheck(Status::InvalidTransactionBody));
        }

        let mut signers = HashSet::new();
        for pair in transaction.signatures() {
            pair.public_key
                .verify(transaction.body_bytes(), &pair.signature)
                .map_err(|_| precheck(Status::InvalidSignature))?;
            signers.insert(pair.public_key.as_bytes());
        }

        let transaction_hash = transaction.hash()?;
        let mut state = self.write_state()?;
        if state.receipts.contains_key(&transaction_id) {
            return Err(precheck(Status::DuplicateTransaction));
        }
        let payer = state
            .accounts
            .get(&transaction_id.account_id)
            .ok_or_else(|| precheck(Status::PayerAccountNotFound))?;
        if !signers.contains(&payer.key.as_bytes()) {
            return Err(precheck(Status::InvalidSignature));
        }

        let outcome = match &signed.body {
            TransactionBody::TokenCreate(body) => {
                state.create_token(self.shard, self.realm, body, &signers).map(Some)
            }
            TransactionBody::CryptoTransfer(body) => state.transfer(body, &signers).map(|()| None),
            TransactionBody::TokenAssociate(body) => {
                state.associate(body, &signers).map(|()| None)
            }
        };
        let receipt = match outcome {
            Ok(token_id) => TransactionReceipt {
                transaction_id,
                status: Status::Success,
                token_id,
            },
            Err(status) => TransactionReceipt {
                transaction_id,
                status,
                token_id: None,
            },
        };
        tracing::debug!(
            tx = %transaction_id,
            kind = signed.body.name(),
            status = %receipt.status,
            hash = %transaction_hash.short_hex(),
            "sandbox executed transaction"
        );
        state.receipts.insert(transaction_id, receipt);

        Ok(TransactionResponse {
            transaction_id,
            transaction_hash,
        })
    }

    async fn receipt(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<TransactionReceipt, LedgerError> {
        let state = self.read_state()?;
        let receipt = state
            .receipts
            .get(transaction_id)
            .cloned()
            .ok_or(LedgerError::Receipt {
                status: Status::ReceiptNotFound,
                transaction_id: *transaction_id,
            })?;
        receipt.into_result()
    }

    async fn account_balance(
        &self,
        query: &AccountBalanceQuery,
    ) -> Result<AccountBalance, LedgerError> {
        let state = self.read_state()?;
        let account_id = query.account_id();
        let account = state.accounts.get(&account_id).ok_or_else(|| LedgerError::Query {
            status: Status::InvalidAccountId,
            account: account_id.to_string(),
        })?;
        Ok(AccountBalance {
            account_id,
            hbars: account.hbars,
            tokens: account.relationships.clone(),
        })
    }
}

impl NetworkState {
    fn has_signed(&self, account: EntityId, signers: &HashSet<[u8; 32]>) -> bool {
        self.accounts
            .get(&account)
            .is_some_and(|a| signers.contains(&a.key.as_bytes()))
    }

    fn create_token(
        &mut self,
        shard: u64,
        realm: u64,
        body: &TokenCreateBody,
        signers: &HashSet<[u8; 32]>,
    ) -> Result<EntityId, Status> {
        if body.name.trim().is_empty() {
            return Err(Status::MissingTokenName);
        }
        if body.symbol.trim().is_empty() || body.symbol.len() > MAX_SYMBOL_LEN {
            return Err(Status::InvalidTokenSymbol);
        }
        if let TokenSupplyType::Finite { max_supply } = body.supply_type {
            if body.initial_supply > max_supply {
                return Err(Status::InvalidTransactionBody);
            }
        }
        if !self.accounts.contains_key(&body.treasury) {
            return Err(Status::InvalidTreasuryAccountForToken);
        }
        if !self.has_signed(body.treasury, signers) {
            return Err(Status::InvalidSignature);
        }

        let token_id = EntityId::new(shard, realm, self.next_num);
        self.next_num += 1;
        self.tokens.insert(
            token_id,
            TokenInfo {
                token_id,
                name: body.name.clone(),
                symbol: body.symbol.clone(),
                decimals: body.decimals,
                treasury: body.treasury,
                total_supply: body.initial_supply,
                supply_type: body.supply_type,
            },
        );
        if let Some(treasury) = self.accounts.get_mut(&body.treasury) {
            treasury.relationships.insert(token_id, body.initial_supply);
        }
        Ok(token_id)
    }

    fn associate(
        &mut self,
        body: &TokenAssociateBody,
        signers: &HashSet<[u8; 32]>,
    ) -> Result<(), Status> {
        let account = self
            .accounts
            .get(&body.account_id)
            .ok_or(Status::InvalidAccountId)?;
        if !signers.contains(&account.key.as_bytes()) {
            return Err(Status::InvalidSignature);
        }
        let mut seen = HashSet::new();
        for token in &body.token_ids {
            if !seen.insert(*token) {
                return Err(Status::TokenIdRepeatedInTokenList);
            }
            if !self.tokens.contains_key(token) {
                return Err(Status::InvalidTokenId);
            }
            if account.relationships.contains_key(token) {
                return Err(Status::TokenAlreadyAssociatedToAccount);
            }
        }
        if let Some(account) = self.accounts.get_mut(&body.account_id) {
            for token in &body.token_ids {
                account.relationships.insert(*token, 0);
            }
        }
        Ok(())
    }

    fn transfer(
        &mut self,
        body: &CryptoTransferBody,
        signers: &HashSet<[u8; 32]>,
    ) -> Result<(), Status> {
        if body.token_transfers.is_empty() {
            return Err(Status::EmptyTokenTransferBody);
        }

        let mut seen = HashSet::new();
        let mut sums: BTreeMap<EntityId, i128> = BTreeMap::new();
        for leg in &body.token_transfers {
            if !seen.insert((leg.token_id, leg.account_id)) {
                return Err(Status::AccountRepeatedInAccountAmounts);
            }
            if !self.tokens.contains_key(&leg.token_id) {
                return Err(Status::InvalidTokenId);
            }
            *sums.entry(leg.token_id).or_default() += i128::from(leg.amount);
        }
        if sums.values().any(|sum| *sum != 0) {
            return Err(Status::TransfersNotZeroSumForToken);
        }

        for leg in &body.token_transfers {
            let account = self
                .accounts
                .get(&leg.account_id)
                .ok_or(Status::InvalidAccountId)?;
            let balance = account
                .relationships
                .get(&leg.token_id)
                .ok_or(Status::TokenNotAssociatedToAccount)?;
            if leg.amount < 0 {
                if !signers.contains(&account.key.as_bytes()) {
                    return Err(Status::InvalidSignature);
                }
                if *balance < leg.amount.unsigned_abs() {
                    return Err(Status::InsufficientTokenBalance);
                }
            }
        }

        for leg in &body.token_transfers {
            if let Some(balance) = self
                .accounts
                .get_mut(&leg.account_id)
                .and_then(|a| a.relationships.get_mut(&leg.token_id))
            {
                *balance = if leg.amount < 0 {
                    *balance - leg.amount.unsigned_abs()
                } else {
                    balance.saturating_add(leg.amount.unsigned_abs())
                };
            }
        }
        Ok(())
    }
}
