/// HTTP JSON-RPC implementation of the ledger gateway
use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_types_eth::{BlockNumberOrTag, TransactionRequest};
use alloy_transport_http::{Client, Http};
use async_trait::async_trait;
use tracing::debug;

use crate::error::Error;
use crate::ledger::types::{CallRequest, FeeEstimate, Receipt, TransactionDraft};
use crate::ledger::Ledger;

/// Ledger gateway over an HTTP JSON-RPC endpoint.
#[derive(Clone)]
pub struct HttpLedger {
    /// Alloy provider for RPC communication
    provider: RootProvider<Http<Client>>,
    /// Chain ID for transaction signing
    chain_id: u64,
}

impl HttpLedger {
    /// Connect to the given RPC endpoint. The chain id is pinned by the
    /// caller's network profile rather than queried, so a misconfigured
    /// endpoint fails EIP-155 signing instead of silently switching chains.
    pub fn connect(rpc_url: &str, chain_id: u64) -> Result<Self, Error> {
        let url = reqwest::Url::parse(rpc_url)
            .map_err(|e| Error::Config(format!("Invalid RPC URL: {}", e)))?;
        let provider = ProviderBuilder::new().on_http(url);

        Ok(Self { provider, chain_id })
    }
}

#[async_trait]
impl Ledger for HttpLedger {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn call(&self, request: CallRequest) -> Result<Vec<u8>, Error> {
        let tx_request = TransactionRequest {
            to: Some(TxKind::Call(request.to)),
            input: Bytes::from(request.data).into(),
            ..Default::default()
        };

        let result = self
            .provider
            .call(&tx_request)
            .await
            .map_err(|e| Error::from_rpc_failure(e.to_string()))?;

        Ok(result.to_vec())
    }

    async fn estimate_gas(&self, draft: &TransactionDraft) -> Result<u64, Error> {
        let tx_request = TransactionRequest {
            from: Some(draft.from),
            to: Some(TxKind::Call(draft.to)),
            value: Some(draft.value),
            input: Bytes::from(draft.data.clone()).into(),
            ..Default::default()
        };

        let gas = self
            .provider
            .estimate_gas(&tx_request)
            .await
            .map_err(|e| match Error::from_rpc_failure(e.to_string()) {
                // Reverts keep their reason so callers can classify them;
                // anything else is an estimation failure.
                revert @ Error::Revert(_) => revert,
                Error::Rpc(message) => Error::GasEstimation(message),
                other => other,
            })?;

        Ok(gas.try_into().unwrap_or(u64::MAX))
    }

    async fn fee_data(&self) -> Result<FeeEstimate, Error> {
        // Fee history for the last block, median reward percentile.
        let fee_history = self
            .provider
            .get_fee_history(1, BlockNumberOrTag::Latest, &[50.0])
            .await
            .map_err(|e| Error::Rpc(e.to_string()))?;

        if let (Some(base_fee), Some(reward)) = (
            fee_history.base_fee_per_gas.last(),
            fee_history
                .reward
                .as_ref()
                .and_then(|r| r.last())
                .and_then(|r| r.first()),
        ) {
            Ok(FeeEstimate {
                base_fee: U256::from(*base_fee),
                priority_fee: U256::from(*reward),
            })
        } else {
            // Nodes without fee history: fall back to the legacy gas price.
            let gas_price = self
                .provider
                .get_gas_price()
                .await
                .map_err(|e| Error::Rpc(e.to_string()))?;
            debug!("fee history unavailable, using legacy gas price");
            Ok(FeeEstimate {
                base_fee: U256::from(gas_price),
                priority_fee: U256::from(gas_price) / U256::from(10),
            })
        }
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, Error> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| Error::Rpc(e.to_string()))
    }

    async fn native_balance(&self, address: Address) -> Result<U256, Error> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| Error::Rpc(e.to_string()))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, Error> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| Error::from_rpc_failure(e.to_string()))?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<Receipt>, Error> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| Error::Rpc(e.to_string()))?;

        Ok(receipt.map(|r| Receipt {
            transaction_hash: r.transaction_hash,
            success: r.status(),
            gas_used: r.gas_used.try_into().ok(),
            block_number: r.block_number,
        }))
    }
}
