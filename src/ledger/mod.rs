/// Ledger gateway
///
/// Every interaction with the chain goes through the [`Ledger`] trait:
/// read-only contract calls, gas estimation, raw-transaction submission and
/// receipt lookup. Protocol clients hold an `Arc<dyn Ledger>`, so the same
/// trading code runs against the HTTP JSON-RPC implementation in production
/// and against an in-memory mock in tests.
pub mod client;
pub mod tx;
pub mod types;

pub use client::HttpLedger;
pub use tx::Eip1559Transaction;
pub use types::{CallRequest, FeeEstimate, Receipt, TransactionDraft};

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;

use crate::error::Error;

/// Read and submit operations against one chain.
///
/// Implementations are expected to surface contract reverts as
/// [`Error::Revert`] with the reason string intact; the fee-tier search and
/// the slippage classifier both key off it.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Chain ID used for EIP-155 replay protection.
    fn chain_id(&self) -> u64;

    /// Execute a read-only contract call and return the raw return data.
    async fn call(&self, request: CallRequest) -> Result<Vec<u8>, Error>;

    /// Estimate gas for a transaction draft.
    async fn estimate_gas(&self, draft: &TransactionDraft) -> Result<u64, Error>;

    /// Current EIP-1559 fee suggestion.
    async fn fee_data(&self) -> Result<FeeEstimate, Error>;

    /// Pending-inclusive nonce for an address.
    async fn transaction_count(&self, address: Address) -> Result<u64, Error>;

    /// Native-asset balance of an address, in wei.
    async fn native_balance(&self, address: Address) -> Result<U256, Error>;

    /// Submit a signed raw transaction; returns its hash.
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, Error>;

    /// Look up a transaction receipt; `None` while still pending.
    async fn transaction_receipt(&self, hash: B256) -> Result<Option<Receipt>, Error>;
}
