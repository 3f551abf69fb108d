use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use rcpt_crypto::SigningKey;
use rcpt_ledger::Operator;
use rcpt_types::AccountId;

use crate::error::{ServerError, ServerResult};

pub const ENV_ACCOUNT_ID: &str = "HEDERA_ACCOUNT_ID";
pub const ENV_PRIVATE_KEY: &str = "HEDERA_PRIVATE_KEY";
pub const ENV_PORT: &str = "PORT";
pub const ENV_BIND: &str = "RECEIPTS_BIND";

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// On-disk configuration. Every field is optional; environment variables
/// and command-line flags fill in or override.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub bind_addr: Option<SocketAddr>,
    pub port: Option<u16>,
    pub operator: FileOperator,
    pub sandbox: SandboxConfig,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileOperator {
    pub account_id: Option<String>,
    pub private_key: Option<String>,
}

impl std::fmt::Debug for FileOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileOperator")
            .field("account_id", &self.account_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Seeding of the in-process sandbox ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SandboxConfig {
    /// Starting native balance of the operator account, in whole hbar.
    pub operator_balance_hbar: i64,
    /// Extra accounts to create, keyed with the operator key.
    pub accounts: Vec<String>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            operator_balance_hbar: 10_000,
            accounts: Vec::new(),
        }
    }
}

impl FileConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(format!("invalid config file: {e}")))
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }
}

/// Fully resolved server configuration.
#[derive(Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub operator: Operator,
    pub sandbox: SandboxConfig,
}

impl ServerConfig {
    /// Merge the file with the environment (environment wins).
    ///
    /// A missing or malformed operator account id or key is an error: the
    /// service cannot sign anything without them.
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> ServerResult<Self> {
        let lookup = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let account = lookup(ENV_ACCOUNT_ID)
            .or(file.operator.account_id)
            .ok_or_else(|| ServerError::Config(format!("{ENV_ACCOUNT_ID} is not set")))?;
        let key = lookup(ENV_PRIVATE_KEY)
            .or(file.operator.private_key)
            .ok_or_else(|| ServerError::Config(format!("{ENV_PRIVATE_KEY} is not set")))?;

        let account = AccountId::parse(&account)
            .map_err(|e| ServerError::Config(format!("{ENV_ACCOUNT_ID}: {e}")))?;
        let key = SigningKey::parse(&key)
            .map_err(|e| ServerError::Config(format!("{ENV_PRIVATE_KEY}: {e}")))?;
        let operator = Operator::from_account(&account, key)
            .map_err(|e| ServerError::Config(format!("{ENV_ACCOUNT_ID}: {e}")))?;

        let mut bind_addr = match lookup(ENV_BIND) {
            Some(addr) => addr
                .trim()
                .parse()
                .map_err(|e| ServerError::Config(format!("{ENV_BIND}: {e}")))?,
            None => match file.bind_addr {
                Some(addr) => addr,
                None => DEFAULT_BIND
                    .parse()
                    .map_err(|e| ServerError::Config(format!("default bind address: {e}")))?,
            },
        };
        let port = match lookup(ENV_PORT) {
            Some(port) => Some(
                port.trim()
                    .parse::<u16>()
                    .map_err(|e| ServerError::Config(format!("{ENV_PORT}: {e}")))?,
            ),
            None => file.port,
        };
        if let Some(port) = port {
            bind_addr.set_port(port);
        }

        Ok(Self {
            bind_addr,
            operator,
            sandbox: file.sandbox,
        })
    }

    /// Resolve against the process environment.
    pub fn from_env(file: FileConfig) -> ServerResult<Self> {
        Self::resolve(file, |name| std::env::var(name).ok())
    }

    pub fn operator_id(&self) -> String {
        self.operator.account_id().to_string()
    }
}
