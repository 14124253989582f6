/// Request and receipt types crossing the ledger gateway
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A read-only contract call (`eth_call`).
#[derive(Debug, Clone)]
pub struct CallRequest {
    /// Target contract address
    pub to: Address,
    /// Encoded function call
    pub data: Vec<u8>,
}

impl CallRequest {
    pub fn new(to: Address, data: Vec<u8>) -> Self {
        Self { to, data }
    }
}

/// The caller-controlled parts of a transaction, before nonce, fees and gas
/// are filled in. Used both for gas estimation and as the seed of the signed
/// payload.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    /// Sender address; estimation needs it for balance and allowance checks
    pub from: Address,
    /// Target contract
    pub to: Address,
    /// Native value attached to the call, in wei
    pub value: U256,
    /// Encoded function call
    pub data: Vec<u8>,
}

impl TransactionDraft {
    pub fn new(from: Address, to: Address, value: U256, data: Vec<u8>) -> Self {
        Self {
            from,
            to,
            value,
            data,
        }
    }
}

/// EIP-1559 fee suggestion: the latest base fee and a median priority tip.
#[derive(Debug, Clone, Copy)]
pub struct FeeEstimate {
    pub base_fee: U256,
    pub priority_fee: U256,
}

impl FeeEstimate {
    /// Fee cap for submission: twice the base fee plus the tip, so the
    /// transaction survives a few blocks of base-fee growth.
    pub fn max_fee_per_gas(&self) -> U256 {
        self.base_fee * U256::from(2) + self.priority_fee
    }
}

/// A confirmed transaction outcome. Terminal: once observed, the transaction
/// is either committed or the caller must start over with a fresh intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: B256,
    /// Whether the transaction's execution succeeded on-chain
    pub success: bool,
    pub gas_used: Option<u64>,
    pub block_number: Option<u64>,
}

impl Receipt {
    /// Convert a failed receipt into a typed error, for callers that prefer
    /// `?` over inspecting the flag.
    pub fn ensure_success(self) -> Result<Self, Error> {
        if self.success {
            Ok(self)
        } else {
            Err(Error::TransactionFailed(self.transaction_hash))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_cap_covers_base_fee_growth() {
        let estimate = FeeEstimate {
            base_fee: U256::from(100),
            priority_fee: U256::from(7),
        };
        assert_eq!(estimate.max_fee_per_gas(), U256::from(207));
    }

    #[test]
    fn failed_receipts_become_typed_errors() {
        let hash = B256::repeat_byte(0xaa);
        let receipt = Receipt {
            transaction_hash: hash,
            success: false,
            gas_used: None,
            block_number: None,
        };
        match receipt.ensure_success() {
            Err(Error::TransactionFailed(h)) => assert_eq!(h, hash),
            other => panic!("expected TransactionFailed, got {other:?}"),
        }
    }
}
