/// ERC-20 token contract helper
///
/// Allowance and balance reads plus approval calldata, against any ledger
/// gateway implementation.
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};

use crate::error::Error;
use crate::ledger::{CallRequest, Ledger};

sol! {
    #[derive(Debug)]
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);

        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }
}

/// ERC-20 token helper
#[derive(Clone)]
pub struct Erc20 {
    ledger: Arc<dyn Ledger>,
    address: Address,
}

impl Erc20 {
    /// Create a helper for the token deployed at `address`.
    pub fn new(ledger: Arc<dyn Ledger>, address: Address) -> Self {
        Self { ledger, address }
    }

    /// The token contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Balance of an account, in the token's smallest unit.
    pub async fn balance_of(&self, account: Address) -> Result<U256, Error> {
        let call = IERC20::balanceOfCall { account };
        let data = self
            .ledger
            .call(CallRequest::new(self.address, call.abi_encode()))
            .await?;
        let decoded = IERC20::balanceOfCall::abi_decode_returns(&data, false)
            .map_err(|e| Error::Abi(format!("balanceOf: {e}")))?;
        Ok(decoded._0)
    }

    /// How much of `owner`'s balance `spender` may move.
    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, Error> {
        let call = IERC20::allowanceCall { owner, spender };
        let data = self
            .ledger
            .call(CallRequest::new(self.address, call.abi_encode()))
            .await?;
        let decoded = IERC20::allowanceCall::abi_decode_returns(&data, false)
            .map_err(|e| Error::Abi(format!("allowance: {e}")))?;
        Ok(decoded._0)
    }

    /// Token decimals.
    pub async fn decimals(&self) -> Result<u8, Error> {
        let call = IERC20::decimalsCall {};
        let data = self
            .ledger
            .call(CallRequest::new(self.address, call.abi_encode()))
            .await?;
        let decoded = IERC20::decimalsCall::abi_decode_returns(&data, false)
            .map_err(|e| Error::Abi(format!("decimals: {e}")))?;
        Ok(decoded._0)
    }

    /// Token symbol.
    pub async fn symbol(&self) -> Result<String, Error> {
        let call = IERC20::symbolCall {};
        let data = self
            .ledger
            .call(CallRequest::new(self.address, call.abi_encode()))
            .await?;
        let decoded = IERC20::symbolCall::abi_decode_returns(&data, false)
            .map_err(|e| Error::Abi(format!("symbol: {e}")))?;
        Ok(decoded._0)
    }

    /// Encode approval calldata for use in a transaction.
    pub fn approve_calldata(spender: Address, amount: U256) -> Vec<u8> {
        IERC20::approveCall { spender, amount }.abi_encode()
    }
}
