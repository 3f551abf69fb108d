//! HTTP wire types for the receipt token service.
//!
//! Shared by the server and the command-line client so both sides agree on
//! paths and JSON shapes. Request fields are all optional at this layer:
//! presence and shape are checked by the handlers, which report every
//! missing field at once.

pub mod endpoint;
pub mod request;
pub mod response;

pub use endpoint::endpoints;
pub use request::{AssociateTokenRequest, MintReceiptRequest, TransferReceiptRequest};
pub use response::{
    BalanceResponse, ErrorBody, HealthResponse, LogsResponse, MintReceiptResponse,
    OperationResponse,
};
