// Allow deprecated Signature for compatibility with the alloy-consensus ecosystem
#![allow(deprecated)]

/// EIP-1559 transaction construction and signing
///
/// A thin builder over `alloy_consensus::TxEip1559`: the swap pipeline fills
/// in nonce, fees, gas and calldata, hashes for signing, then encodes the
/// signed payload for `eth_sendRawTransaction`. The value exists only for the
/// duration of one submission.
use alloy_consensus::{SignableTransaction, Signed, TxEip1559};
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, Bytes, Signature, TxKind, B256, U256};

/// Builder for one EIP-1559 transaction.
#[derive(Clone, Debug)]
pub struct Eip1559Transaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl Eip1559Transaction {
    /// Start a transaction to `to` with zeroed value, data and fees.
    pub fn new(chain_id: u64, nonce: u64, to: Address) -> Self {
        Self {
            chain_id,
            nonce,
            gas_limit: 21_000,
            max_fee_per_gas: 0,
            max_priority_fee_per_gas: 0,
            to,
            value: U256::ZERO,
            data: Bytes::new(),
        }
    }

    /// Set the value (in wei) to transfer.
    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Set the calldata payload.
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the gas limit.
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Set the EIP-1559 fee cap and tip (wei per gas).
    pub fn fees(mut self, max_fee_per_gas: u128, max_priority_fee_per_gas: u128) -> Self {
        self.max_fee_per_gas = max_fee_per_gas;
        self.max_priority_fee_per_gas = max_priority_fee_per_gas;
        self
    }

    fn to_alloy(&self) -> TxEip1559 {
        TxEip1559 {
            chain_id: self.chain_id,
            nonce: self.nonce,
            gas_limit: self.gas_limit,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            to: TxKind::Call(self.to),
            value: self.value,
            access_list: AccessList::default(),
            input: self.data.clone(),
        }
    }

    /// The keccak-256 digest the wallet signs.
    pub fn signature_hash(&self) -> B256 {
        self.to_alloy().signature_hash()
    }

    /// Encode the signed transaction into raw bytes suitable for submission.
    pub fn encode_signed(&self, signature: &Signature) -> Bytes {
        let tx = self.to_alloy();
        let mut buf = Vec::with_capacity(tx.encoded_len_with_signature(signature, false));
        tx.encode_with_signature(signature, &mut buf, false);
        Bytes::from(buf)
    }

    /// Consume the builder and combine with a signature, yielding the signed
    /// transaction with its hash.
    pub fn into_signed(self, signature: Signature) -> Signed<TxEip1559> {
        self.to_alloy().into_signed(signature)
    }
}
