/// Constant-product protocol client
///
/// Quotes run along the resolved route in one router call; there are no fee
/// tiers to retry across, so a hop without a pool or with thin reserves
/// simply propagates the ledger's revert. Swaps pick the router entry point
/// from the trade direction and which side is native value.
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use tracing::{debug, info};

use crate::contracts::{IUniswapV2Router02, V2Router};
use crate::error::Error;
use crate::ledger::Receipt;
use crate::protocols::manager::ContractManager;
use crate::trade::route::{resolve_route, Route};
use crate::trade::{Quote, TradeDirection, TradeIntent};

/// Client for the constant-product router.
#[derive(Clone)]
pub struct UniswapV2Client {
    manager: ContractManager,
    router: V2Router,
    weth: Address,
}

impl UniswapV2Client {
    /// Connect to the router at `router_address`. The bridge (wrapped-native)
    /// address is taken from `weth_override` or fetched from the router once
    /// here; route resolution afterwards is pure.
    pub async fn connect(
        manager: ContractManager,
        router_address: Address,
        weth_override: Option<Address>,
    ) -> Result<Self, Error> {
        let router = V2Router::new(manager.ledger().clone(), router_address);
        let weth = match weth_override {
            Some(weth) => weth,
            None => router.weth().await?,
        };
        debug!(%router_address, %weth, "constant-product client ready");
        Ok(Self {
            manager,
            router,
            weth,
        })
    }

    /// The bridge asset address.
    pub fn weth(&self) -> Address {
        self.weth
    }

    /// Resolve the hop path for a pair.
    pub fn route(&self, token_in: Address, token_out: Address) -> Route {
        resolve_route(token_in, token_out, self.weth)
    }

    /// Price a fixed input amount. The router returns one amount per path
    /// element; the trade-relevant value is the last.
    pub async fn quote_exact_in(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<Quote, Error> {
        let route = self.route(token_in, token_out);
        let amounts = self.router.amounts_out(amount_in, route.path).await?;
        let amount = *amounts
            .last()
            .ok_or_else(|| Error::Abi("getAmountsOut returned no amounts".to_string()))?;
        Ok(Quote { amount, fee: None })
    }

    /// Price a fixed output amount; the trade-relevant value is the first
    /// element of the returned amounts.
    pub async fn quote_exact_out(
        &self,
        token_in: Address,
        token_out: Address,
        amount_out: U256,
    ) -> Result<Quote, Error> {
        let route = self.route(token_in, token_out);
        let amounts = self.router.amounts_in(amount_out, route.path).await?;
        let amount = *amounts
            .first()
            .ok_or_else(|| Error::Abi("getAmountsIn returned no amounts".to_string()))?;
        Ok(Quote { amount, fee: None })
    }

    /// Execute a swap against a previously obtained quote.
    pub async fn swap(&self, intent: &TradeIntent, quote: &Quote) -> Result<Receipt, Error> {
        match intent.direction {
            TradeDirection::ExactIn => self.swap_exact_in(intent, quote).await,
            TradeDirection::ExactOut => self.swap_exact_out(intent, quote).await,
        }
    }

    /// Exact-in swap: the input amount is fixed, the output is bounded below
    /// by `floor((1 - slippage) * quote)`.
    pub async fn swap_exact_in(
        &self,
        intent: &TradeIntent,
        quote: &Quote,
    ) -> Result<Receipt, Error> {
        intent.validate(self.weth)?;
        let to = self.manager.sender()?;
        let route = self.route(intent.token_in, intent.token_out);
        let min_amount_out = intent.slippage.min_amount_out(quote.amount);
        let deadline = self.manager.deadline();

        let (value, calldata) = if intent.native_in() {
            (
                intent.amount,
                IUniswapV2Router02::swapExactETHForTokensCall {
                    amountOutMin: min_amount_out,
                    path: route.path,
                    to,
                    deadline,
                }
                .abi_encode(),
            )
        } else if intent.native_out() {
            (
                U256::ZERO,
                IUniswapV2Router02::swapExactTokensForETHCall {
                    amountIn: intent.amount,
                    amountOutMin: min_amount_out,
                    path: route.path,
                    to,
                    deadline,
                }
                .abi_encode(),
            )
        } else {
            (
                U256::ZERO,
                IUniswapV2Router02::swapExactTokensForTokensCall {
                    amountIn: intent.amount,
                    amountOutMin: min_amount_out,
                    path: route.path,
                    to,
                    deadline,
                }
                .abi_encode(),
            )
        };

        info!(
            token_in = %intent.token_in,
            token_out = %intent.token_out,
            amount_in = %intent.amount,
            %min_amount_out,
            "executing exact-in swap"
        );
        self.execute(intent, intent.amount, value, calldata).await
    }

    /// Exact-out swap: the output amount is fixed, the input is bounded above
    /// by `ceil((1 + slippage) * quote)`.
    pub async fn swap_exact_out(
        &self,
        intent: &TradeIntent,
        quote: &Quote,
    ) -> Result<Receipt, Error> {
        intent.validate(self.weth)?;
        let to = self.manager.sender()?;
        let route = self.route(intent.token_in, intent.token_out);
        let max_amount_in = intent.slippage.max_amount_in(quote.amount);
        let deadline = self.manager.deadline();

        let (value, calldata) = if intent.native_in() {
            // The router refunds whatever part of the attached value it does
            // not spend.
            (
                max_amount_in,
                IUniswapV2Router02::swapETHForExactTokensCall {
                    amountOut: intent.amount,
                    path: route.path,
                    to,
                    deadline,
                }
                .abi_encode(),
            )
        } else if intent.native_out() {
            (
                U256::ZERO,
                IUniswapV2Router02::swapTokensForExactETHCall {
                    amountOut: intent.amount,
                    amountInMax: max_amount_in,
                    path: route.path,
                    to,
                    deadline,
                }
                .abi_encode(),
            )
        } else {
            (
                U256::ZERO,
                IUniswapV2Router02::swapTokensForExactTokensCall {
                    amountOut: intent.amount,
                    amountInMax: max_amount_in,
                    path: route.path,
                    to,
                    deadline,
                }
                .abi_encode(),
            )
        };

        info!(
            token_in = %intent.token_in,
            token_out = %intent.token_out,
            amount_out = %intent.amount,
            %max_amount_in,
            "executing exact-out swap"
        );
        self.execute(intent, max_amount_in, value, calldata).await
    }

    /// Common tail: balance check, approval, submission, receipt.
    async fn execute(
        &self,
        intent: &TradeIntent,
        spend: U256,
        value: U256,
        calldata: Vec<u8>,
    ) -> Result<Receipt, Error> {
        self.manager.require_balance(intent.token_in, spend).await?;
        if !intent.native_in() {
            self.manager
                .ensure_approved(intent.token_in, self.router.address())
                .await?;
        }
        let hash = self
            .manager
            .send_transaction(self.router.address(), value, calldata)
            .await?;
        self.manager.wait_for_receipt(hash).await
    }
}
