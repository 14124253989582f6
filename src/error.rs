/// Error types for the Uniswap trader SDK
///
/// A single crate-wide error enum. Trade-level failures carry enough context
/// for a caller to decide what to do next: retry with a wider slippage
/// tolerance, top up a balance, or give up on the pair entirely. On-chain
/// revert reasons are always carried unmodified alongside the typed
/// classification.
use alloy_primitives::{B256, U256};

/// Revert-reason fragments that indicate the realized price moved past the
/// submitted slippage bound. "STF" is the SwapRouter's safe-transfer failure
/// string; the rest are the routers' canonical bound-violation messages.
const SLIPPAGE_REVERT_PATTERNS: &[&str] = &[
    "STF",
    "Too little received",
    "Too much requested",
    "INSUFFICIENT_OUTPUT_AMOUNT",
    "EXCESSIVE_INPUT_AMOUNT",
];

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error (bad address, missing network profile, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wallet error (key derivation, signing)
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// A signing wallet is required for this operation but none was supplied
    #[error("No wallet configured for signing transactions")]
    WalletNotConfigured,

    /// Transport or node-side RPC failure
    #[error("RPC error: {0}")]
    Rpc(String),

    /// ABI encoding/decoding error
    #[error("ABI error: {0}")]
    Abi(String),

    /// Gas estimation failed for a reason other than a contract revert
    #[error("Gas estimation failed: {0}")]
    GasEstimation(String),

    /// A contract call or simulation reverted; carries the raw reason
    #[error("Execution reverted: {0}")]
    Revert(String),

    /// The trade intent is malformed; rejected before any ledger call
    #[error("Invalid trade intent: {0}")]
    InvalidIntent(String),

    /// The caller does not hold enough of the input (or native) asset
    #[error("Insufficient balance: had {had}, needed {needed}")]
    InsufficientBalance { had: U256, needed: U256 },

    /// Every candidate fee tier lacked liquidity for the requested path
    #[error("No liquidity path after trying {attempts} fee tier(s): {reason}")]
    NoLiquidityPath { attempts: usize, reason: String },

    /// On-chain revert indicating the price moved past the submitted bound
    #[error("Slippage exceeded: {0}")]
    SlippageExceeded(String),

    /// The approval transaction was mined but reported failure
    #[error("Approval transaction {0} failed on-chain")]
    ApprovalFailed(B256),

    /// The swap transaction was mined but reported failure
    #[error("Swap transaction {0} failed on-chain")]
    TransactionFailed(B256),
}

impl Error {
    /// Classify a raw RPC failure message from `eth_call`/`eth_estimateGas`.
    ///
    /// Node implementations surface contract reverts as JSON-RPC errors whose
    /// message embeds the reason string; anything else stays a transport
    /// error.
    pub(crate) fn from_rpc_failure(message: String) -> Self {
        if message.to_lowercase().contains("revert") {
            Error::Revert(message)
        } else {
            Error::Rpc(message)
        }
    }

    /// Promote a generic revert into `SlippageExceeded` when the reason
    /// matches one of the routers' bound-violation strings. Other errors pass
    /// through untouched.
    pub(crate) fn classify_revert(self) -> Self {
        match self {
            Error::Revert(reason) => {
                if SLIPPAGE_REVERT_PATTERNS.iter().any(|p| reason.contains(p)) {
                    Error::SlippageExceeded(reason)
                } else {
                    Error::Revert(reason)
                }
            }
            other => other,
        }
    }

    /// Whether this error is a contract revert. The fee-tier search treats a
    /// revert during quoting as "this tier's pool lacks liquidity" and moves
    /// on to the next tier; transport failures are not retried.
    pub fn is_revert(&self) -> bool {
        matches!(self, Error::Revert(_))
    }
}
