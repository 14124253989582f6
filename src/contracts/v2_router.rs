/// Constant-product router binding
///
/// Quotes run along the full hop path and return one amount per path element;
/// the six swap entry points split by direction and by which side, if any, is
/// native value.
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};

use crate::error::Error;
use crate::ledger::{CallRequest, Ledger};

sol! {
    #[derive(Debug)]
    interface IUniswapV2Router02 {
        function WETH() external view returns (address);
        function factory() external view returns (address);

        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts);
        function getAmountsIn(uint256 amountOut, address[] calldata path) external view returns (uint256[] memory amounts);

        function swapExactETHForTokens(uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external payable returns (uint256[] memory amounts);
        function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
        function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);

        function swapETHForExactTokens(uint256 amountOut, address[] calldata path, address to, uint256 deadline) external payable returns (uint256[] memory amounts);
        function swapTokensForExactETH(uint256 amountOut, uint256 amountInMax, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
        function swapTokensForExactTokens(uint256 amountOut, uint256 amountInMax, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
    }
}

/// Read-side helper for the constant-product router.
#[derive(Clone)]
pub struct V2Router {
    ledger: Arc<dyn Ledger>,
    address: Address,
}

impl V2Router {
    pub fn new(ledger: Arc<dyn Ledger>, address: Address) -> Self {
        Self { ledger, address }
    }

    /// The router contract address (also the approval spender).
    pub fn address(&self) -> Address {
        self.address
    }

    /// The wrapped-native token this router bridges through.
    pub async fn weth(&self) -> Result<Address, Error> {
        let data = self
            .ledger
            .call(CallRequest::new(
                self.address,
                IUniswapV2Router02::WETHCall {}.abi_encode(),
            ))
            .await?;
        let decoded = IUniswapV2Router02::WETHCall::abi_decode_returns(&data, false)
            .map_err(|e| Error::Abi(format!("WETH: {e}")))?;
        Ok(decoded._0)
    }

    /// Amounts resulting along `path` for a fixed input: one value per path
    /// element, the last being the output amount.
    pub async fn amounts_out(
        &self,
        amount_in: U256,
        path: Vec<Address>,
    ) -> Result<Vec<U256>, Error> {
        let call = IUniswapV2Router02::getAmountsOutCall {
            amountIn: amount_in,
            path,
        };
        let data = self
            .ledger
            .call(CallRequest::new(self.address, call.abi_encode()))
            .await?;
        let decoded = IUniswapV2Router02::getAmountsOutCall::abi_decode_returns(&data, false)
            .map_err(|e| Error::Abi(format!("getAmountsOut: {e}")))?;
        Ok(decoded.amounts)
    }

    /// Amounts required along `path` for a fixed output: one value per path
    /// element, the first being the input amount.
    pub async fn amounts_in(
        &self,
        amount_out: U256,
        path: Vec<Address>,
    ) -> Result<Vec<U256>, Error> {
        let call = IUniswapV2Router02::getAmountsInCall {
            amountOut: amount_out,
            path,
        };
        let data = self
            .ledger
            .call(CallRequest::new(self.address, call.abi_encode()))
            .await?;
        let decoded = IUniswapV2Router02::getAmountsInCall::abi_decode_returns(&data, false)
            .map_err(|e| Error::Abi(format!("getAmountsIn: {e}")))?;
        Ok(decoded.amounts)
    }
}
