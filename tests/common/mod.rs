/// In-memory ledger gateway for integration tests
///
/// Answers contract reads the way the deployed router/quoter/token contracts
/// would, records every gas estimation and raw submission, and mints
/// receipts on demand, so the full quote/approve/swap/receipt flow runs
/// without a node.
use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;

use uniswap_trader_sdk::contracts::{IUniswapV2Router02, IQuoter, ISwapRouter, IERC20};
use uniswap_trader_sdk::ledger::{CallRequest, FeeEstimate, Receipt, TransactionDraft};
use uniswap_trader_sdk::{Error, Ledger, NetworkProfile, PackedPath};

pub struct MockLedger {
    chain_id: u64,
    pub weth: Address,
    v2_router: Address,
    v3_router: Address,
    v3_quoter: Address,

    /// Response for getAmountsOut / getAmountsIn; `None` reverts.
    v2_amounts: Mutex<Option<Vec<U256>>>,
    /// Quoter responses keyed by fee tier; missing tiers revert.
    v3_quotes: Mutex<HashMap<u32, U256>>,
    /// Fee tiers probed on the quoter, in call order.
    pub quoter_probes: Mutex<Vec<u32>>,
    /// Packed path bytes seen by multi-hop quoter calls.
    pub quoted_paths: Mutex<Vec<Vec<u8>>>,

    native_balances: Mutex<HashMap<Address, U256>>,
    token_balances: Mutex<HashMap<(Address, Address), U256>>,
    allowances: Mutex<HashMap<(Address, Address), U256>>,

    /// Every draft passed to estimate_gas, i.e. every would-be transaction
    /// with its target, value and calldata still decodable.
    pub estimates: Mutex<Vec<TransactionDraft>>,
    /// Raw signed payloads accepted for submission.
    pub submitted: Mutex<Vec<Vec<u8>>>,

    /// When set, estimate_gas fails with this revert reason.
    estimate_revert: Mutex<Option<String>>,
    /// Status flag for minted receipts.
    receipt_success: Mutex<bool>,
}

impl MockLedger {
    pub fn new(profile: &NetworkProfile, weth: Address) -> Self {
        Self {
            chain_id: profile.chain_id,
            weth,
            v2_router: profile.v2_router_address().unwrap(),
            v3_router: profile.v3_router_address().unwrap(),
            v3_quoter: profile.v3_quoter_address().unwrap(),
            v2_amounts: Mutex::new(None),
            v3_quotes: Mutex::new(HashMap::new()),
            quoter_probes: Mutex::new(Vec::new()),
            quoted_paths: Mutex::new(Vec::new()),
            native_balances: Mutex::new(HashMap::new()),
            token_balances: Mutex::new(HashMap::new()),
            allowances: Mutex::new(HashMap::new()),
            estimates: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            estimate_revert: Mutex::new(None),
            receipt_success: Mutex::new(true),
        }
    }

    pub fn set_native_balance(&self, owner: Address, amount: U256) {
        self.native_balances.lock().unwrap().insert(owner, amount);
    }

    pub fn set_token_balance(&self, token: Address, owner: Address, amount: U256) {
        self.token_balances
            .lock()
            .unwrap()
            .insert((token, owner), amount);
    }

    pub fn set_allowance(&self, token: Address, owner: Address, amount: U256) {
        self.allowances.lock().unwrap().insert((token, owner), amount);
    }

    /// Configure the amounts the constant-product router reports along the
    /// path.
    pub fn set_v2_amounts(&self, amounts: Vec<U256>) {
        *self.v2_amounts.lock().unwrap() = Some(amounts);
    }

    /// Give one fee tier liquidity: the quoter answers `amount` for it.
    pub fn set_v3_quote(&self, fee: u32, amount: U256) {
        self.v3_quotes.lock().unwrap().insert(fee, amount);
    }

    pub fn set_receipt_success(&self, success: bool) {
        *self.receipt_success.lock().unwrap() = success;
    }

    pub fn fail_estimates_with(&self, reason: &str) {
        *self.estimate_revert.lock().unwrap() = Some(reason.to_string());
    }

    fn quote_at(&self, fee: u32) -> Result<Vec<u8>, Error> {
        self.quoter_probes.lock().unwrap().push(fee);
        match self.v3_quotes.lock().unwrap().get(&fee) {
            Some(amount) => Ok(amount.abi_encode()),
            None => Err(Error::Revert("execution reverted".to_string())),
        }
    }

    fn v2_amounts_response(&self) -> Result<Vec<u8>, Error> {
        match self.v2_amounts.lock().unwrap().clone() {
            Some(amounts) => Ok(amounts.abi_encode()),
            None => Err(Error::Revert(
                "execution reverted: UniswapV2Library: INSUFFICIENT_LIQUIDITY".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Ledger for MockLedger {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn call(&self, request: CallRequest) -> Result<Vec<u8>, Error> {
        let data = request.data.as_slice();
        let selector: [u8; 4] = data[..4].try_into().unwrap();

        if request.to == self.v2_router {
            if selector == IUniswapV2Router02::WETHCall::SELECTOR {
                return Ok(self.weth.abi_encode());
            }
            if selector == IUniswapV2Router02::getAmountsOutCall::SELECTOR
                || selector == IUniswapV2Router02::getAmountsInCall::SELECTOR
            {
                return self.v2_amounts_response();
            }
        } else if request.to == self.v3_router {
            if selector == ISwapRouter::WETH9Call::SELECTOR {
                return Ok(self.weth.abi_encode());
            }
        } else if request.to == self.v3_quoter {
            if let Ok(call) = IQuoter::quoteExactInputSingleCall::abi_decode(data, false) {
                return self.quote_at(call.fee.to::<u32>());
            }
            if let Ok(call) = IQuoter::quoteExactOutputSingleCall::abi_decode(data, false) {
                return self.quote_at(call.fee.to::<u32>());
            }
            if let Ok(call) = IQuoter::quoteExactInputCall::abi_decode(data, false) {
                self.quoted_paths.lock().unwrap().push(call.path.to_vec());
                let path = PackedPath::decode(&call.path).unwrap();
                return self.quote_at(path.fees()[0].as_u32());
            }
            if let Ok(call) = IQuoter::quoteExactOutputCall::abi_decode(data, false) {
                self.quoted_paths.lock().unwrap().push(call.path.to_vec());
                let path = PackedPath::decode(&call.path).unwrap();
                return self.quote_at(path.fees()[0].as_u32());
            }
        } else {
            // Anything else is treated as an ERC-20 token contract.
            if let Ok(call) = IERC20::balanceOfCall::abi_decode(data, false) {
                let balance = self
                    .token_balances
                    .lock()
                    .unwrap()
                    .get(&(request.to, call.account))
                    .copied()
                    .unwrap_or(U256::ZERO);
                return Ok(balance.abi_encode());
            }
            if let Ok(call) = IERC20::allowanceCall::abi_decode(data, false) {
                let allowance = self
                    .allowances
                    .lock()
                    .unwrap()
                    .get(&(request.to, call.owner))
                    .copied()
                    .unwrap_or(U256::ZERO);
                return Ok(allowance.abi_encode());
            }
            if selector == IERC20::decimalsCall::SELECTOR {
                return Ok(U256::from(18u8).abi_encode());
            }
        }
        Err(Error::Rpc(format!(
            "mock ledger: unexpected call to {} with selector 0x{}",
            request.to,
            hex::encode(selector)
        )))
    }

    async fn estimate_gas(&self, draft: &TransactionDraft) -> Result<u64, Error> {
        if let Some(reason) = self.estimate_revert.lock().unwrap().clone() {
            return Err(Error::Revert(reason));
        }
        self.estimates.lock().unwrap().push(draft.clone());
        Ok(100_000)
    }

    async fn fee_data(&self) -> Result<FeeEstimate, Error> {
        Ok(FeeEstimate {
            base_fee: U256::from(20_000_000_000u64),
            priority_fee: U256::from(1_000_000_000u64),
        })
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64, Error> {
        Ok(self.submitted.lock().unwrap().len() as u64)
    }

    async fn native_balance(&self, address: Address) -> Result<U256, Error> {
        Ok(self
            .native_balances
            .lock()
            .unwrap()
            .get(&address)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, Error> {
        let hash = keccak256(raw);
        self.submitted.lock().unwrap().push(raw.to_vec());
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<Receipt>, Error> {
        Ok(Some(Receipt {
            transaction_hash: hash,
            success: *self.receipt_success.lock().unwrap(),
            gas_used: Some(90_000),
            block_number: Some(1),
        }))
    }
}
