/// HTTP endpoint paths.
pub mod endpoints {
    pub const MINT_RECEIPT: &str = "/api/mint-receipt";
    pub const TRANSFER_RECEIPT: &str = "/api/transfer-receipt";
    pub const ASSOCIATE_TOKEN: &str = "/api/associate-token";
    /// Route pattern; the account id is the final path segment.
    pub const BALANCE: &str = "/api/balance/:account_id";
    pub const LOGS: &str = "/api/logs";
    pub const HEALTH: &str = "/api/health";
    pub const UI: &str = "/";

    /// Concrete balance path for one account.
    pub fn balance(account_id: &str) -> String {
        format!("/api/balance/{account_id}")
    }
}
