/// Concentrated-liquidity router and quoter bindings
///
/// Each call targets one fee tier; a tier whose pool cannot serve the request
/// reverts at the ledger, which is what the fee-tier search keys off.
/// Multi-hop variants take the packed path encoding from
/// [`crate::trade::path`].
use std::sync::Arc;

use alloy_primitives::aliases::{U160, U24};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use crate::error::Error;
use crate::ledger::{CallRequest, Ledger};

sol! {
    #[derive(Debug)]
    interface ISwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        struct ExactInputParams {
            bytes path;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
        }

        struct ExactOutputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountOut;
            uint256 amountInMaximum;
            uint160 sqrtPriceLimitX96;
        }

        struct ExactOutputParams {
            bytes path;
            address recipient;
            uint256 deadline;
            uint256 amountOut;
            uint256 amountInMaximum;
        }

        function WETH9() external view returns (address);
        function exactInputSingle(ExactInputSingleParams calldata params) external payable returns (uint256 amountOut);
        function exactInput(ExactInputParams calldata params) external payable returns (uint256 amountOut);
        function exactOutputSingle(ExactOutputSingleParams calldata params) external payable returns (uint256 amountIn);
        function exactOutput(ExactOutputParams calldata params) external payable returns (uint256 amountIn);
    }

    #[derive(Debug)]
    interface IQuoter {
        function WETH9() external view returns (address);
        function quoteExactInputSingle(address tokenIn, address tokenOut, uint24 fee, uint256 amountIn, uint160 sqrtPriceLimitX96) external returns (uint256 amountOut);
        function quoteExactInput(bytes memory path, uint256 amountIn) external returns (uint256 amountOut);
        function quoteExactOutputSingle(address tokenIn, address tokenOut, uint24 fee, uint256 amountOut, uint160 sqrtPriceLimitX96) external returns (uint256 amountIn);
        function quoteExactOutput(bytes memory path, uint256 amountOut) external returns (uint256 amountIn);
    }
}

/// Read-side helper for the concentrated-liquidity router.
#[derive(Clone)]
pub struct V3Router {
    ledger: Arc<dyn Ledger>,
    address: Address,
}

impl V3Router {
    pub fn new(ledger: Arc<dyn Ledger>, address: Address) -> Self {
        Self { ledger, address }
    }

    /// The router contract address (also the approval spender).
    pub fn address(&self) -> Address {
        self.address
    }

    /// The wrapped-native token this router bridges through.
    pub async fn weth9(&self) -> Result<Address, Error> {
        let data = self
            .ledger
            .call(CallRequest::new(
                self.address,
                ISwapRouter::WETH9Call {}.abi_encode(),
            ))
            .await?;
        let decoded = ISwapRouter::WETH9Call::abi_decode_returns(&data, false)
            .map_err(|e| Error::Abi(format!("WETH9: {e}")))?;
        Ok(decoded._0)
    }
}

/// Quoter helper. The quoter simulates the swap, so these are read-only calls
/// even though the functions are not marked `view`.
#[derive(Clone)]
pub struct V3Quoter {
    ledger: Arc<dyn Ledger>,
    address: Address,
}

impl V3Quoter {
    pub fn new(ledger: Arc<dyn Ledger>, address: Address) -> Self {
        Self { ledger, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn quote_exact_input_single(
        &self,
        token_in: Address,
        token_out: Address,
        fee: U24,
        amount_in: U256,
    ) -> Result<U256, Error> {
        let call = IQuoter::quoteExactInputSingleCall {
            tokenIn: token_in,
            tokenOut: token_out,
            fee,
            amountIn: amount_in,
            sqrtPriceLimitX96: U160::ZERO,
        };
        self.quote(call.abi_encode(), "quoteExactInputSingle").await
    }

    pub async fn quote_exact_input(&self, path: Bytes, amount_in: U256) -> Result<U256, Error> {
        let call = IQuoter::quoteExactInputCall {
            path,
            amountIn: amount_in,
        };
        self.quote(call.abi_encode(), "quoteExactInput").await
    }

    pub async fn quote_exact_output_single(
        &self,
        token_in: Address,
        token_out: Address,
        fee: U24,
        amount_out: U256,
    ) -> Result<U256, Error> {
        let call = IQuoter::quoteExactOutputSingleCall {
            tokenIn: token_in,
            tokenOut: token_out,
            fee,
            amountOut: amount_out,
            sqrtPriceLimitX96: U160::ZERO,
        };
        self.quote(call.abi_encode(), "quoteExactOutputSingle").await
    }

    pub async fn quote_exact_output(&self, path: Bytes, amount_out: U256) -> Result<U256, Error> {
        let call = IQuoter::quoteExactOutputCall {
            path,
            amountOut: amount_out,
        };
        self.quote(call.abi_encode(), "quoteExactOutput").await
    }

    /// All quoter variants return a single uint256.
    async fn quote(&self, calldata: Vec<u8>, what: &str) -> Result<U256, Error> {
        let data = self
            .ledger
            .call(CallRequest::new(self.address, calldata))
            .await?;
        if data.len() < 32 {
            return Err(Error::Abi(format!("{what}: short return data")));
        }
        Ok(U256::from_be_slice(&data[0..32]))
    }
}
