/// Concentrated-liquidity protocol client
///
/// Every quote and swap targets one fee tier. When the caller does not pin a
/// tier, the quote runs the fee-tier search in the configured priority order;
/// the tier discovered at quote time travels inside the returned [`Quote`]
/// and execution reuses it, so quoting and execution price against the same
/// pool. Pairs that include the bridge asset use the single-hop entry points;
/// anything else goes through a packed two-leg path that reuses the same fee
/// tier on both legs, which is a simplification rather than a protocol
/// requirement.
use alloy_primitives::{Address, Bytes, U256};
use alloy_primitives::aliases::U160;
use alloy_sol_types::SolCall;
use tracing::{debug, info};

use crate::contracts::{ISwapRouter, V3Quoter, V3Router};
use crate::error::Error;
use crate::ledger::Receipt;
use crate::protocols::manager::ContractManager;
use crate::trade::fees::{with_fee_search, FeeTier};
use crate::trade::path::PackedPath;
use crate::trade::route::normalize;
use crate::trade::{Quote, TradeDirection, TradeIntent};

/// Client for the concentrated-liquidity router and quoter.
#[derive(Clone)]
pub struct UniswapV3Client {
    manager: ContractManager,
    router: V3Router,
    quoter: V3Quoter,
    weth: Address,
}

impl UniswapV3Client {
    /// Connect to the router/quoter pair. The bridge (wrapped-native)
    /// address is taken from `weth_override` or fetched from the router once
    /// here.
    pub async fn connect(
        manager: ContractManager,
        router_address: Address,
        quoter_address: Address,
        weth_override: Option<Address>,
    ) -> Result<Self, Error> {
        let router = V3Router::new(manager.ledger().clone(), router_address);
        let quoter = V3Quoter::new(manager.ledger().clone(), quoter_address);
        let weth = match weth_override {
            Some(weth) => weth,
            None => router.weth9().await?,
        };
        debug!(%router_address, %quoter_address, %weth, "concentrated-liquidity client ready");
        Ok(Self {
            manager,
            router,
            quoter,
            weth,
        })
    }

    /// The bridge asset address.
    pub fn weth(&self) -> Address {
        self.weth
    }

    /// Whether the pair trades against a single pool (one endpoint is the
    /// bridge asset, native sentinel included).
    fn is_single_hop(&self, token_in: Address, token_out: Address) -> bool {
        normalize(token_in, self.weth) == self.weth || normalize(token_out, self.weth) == self.weth
    }

    /// The packed two-leg path for a bridged pair, in exact-in hop order.
    fn bridged_path(&self, token_in: Address, token_out: Address, fee: FeeTier) -> PackedPath {
        PackedPath::bridged(
            normalize(token_in, self.weth),
            fee,
            self.weth,
            fee,
            normalize(token_out, self.weth),
        )
    }

    /// One quote attempt against one fee tier. Reverts when the tier's pool
    /// cannot serve the amount; the callers below decide whether that ends
    /// the trade or moves the search along.
    async fn quote_once(
        &self,
        token_in: Address,
        token_out: Address,
        fee: FeeTier,
        amount: U256,
        direction: TradeDirection,
    ) -> Result<U256, Error> {
        let a = normalize(token_in, self.weth);
        let b = normalize(token_out, self.weth);
        if self.is_single_hop(token_in, token_out) {
            match direction {
                TradeDirection::ExactIn => {
                    self.quoter
                        .quote_exact_input_single(a, b, fee.as_u24(), amount)
                        .await
                }
                TradeDirection::ExactOut => {
                    self.quoter
                        .quote_exact_output_single(a, b, fee.as_u24(), amount)
                        .await
                }
            }
        } else {
            let path = self.bridged_path(token_in, token_out, fee);
            match direction {
                TradeDirection::ExactIn => {
                    self.quoter
                        .quote_exact_input(Bytes::from(path.encode()), amount)
                        .await
                }
                // Exact-output paths are encoded in reverse hop order.
                TradeDirection::ExactOut => {
                    self.quoter
                        .quote_exact_output(Bytes::from(path.reversed().encode()), amount)
                        .await
                }
            }
        }
    }

    /// Quote a fixed input amount. An explicit `fee` pins the tier with no
    /// fallback; `None` searches the configured tier order.
    pub async fn quote_exact_in(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        fee: Option<FeeTier>,
    ) -> Result<Quote, Error> {
        self.quote(token_in, token_out, amount_in, TradeDirection::ExactIn, fee)
            .await
    }

    /// Quote a fixed output amount; see [`Self::quote_exact_in`] for tier
    /// handling.
    pub async fn quote_exact_out(
        &self,
        token_in: Address,
        token_out: Address,
        amount_out: U256,
        fee: Option<FeeTier>,
    ) -> Result<Quote, Error> {
        self.quote(
            token_in,
            token_out,
            amount_out,
            TradeDirection::ExactOut,
            fee,
        )
        .await
    }

    async fn quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount: U256,
        direction: TradeDirection,
        fee: Option<FeeTier>,
    ) -> Result<Quote, Error> {
        match fee {
            Some(fee) => {
                let quoted = self
                    .quote_once(token_in, token_out, fee, amount, direction)
                    .await?;
                Ok(Quote {
                    amount: quoted,
                    fee: Some(fee),
                })
            }
            None => {
                let (quoted, fee) = with_fee_search(&self.manager.settings().fee_order, |fee| {
                    self.quote_once(token_in, token_out, fee, amount, direction)
                })
                .await?;
                Ok(Quote {
                    amount: quoted,
                    fee: Some(fee),
                })
            }
        }
    }

    /// Execute a swap against a previously obtained quote, at the tier the
    /// quote was obtained at.
    pub async fn swap(&self, intent: &TradeIntent, quote: &Quote) -> Result<Receipt, Error> {
        match intent.direction {
            TradeDirection::ExactIn => self.swap_exact_in(intent, quote).await,
            TradeDirection::ExactOut => self.swap_exact_out(intent, quote).await,
        }
    }

    /// Exact-in swap: output bounded below by `floor((1 - slippage) * quote)`.
    pub async fn swap_exact_in(
        &self,
        intent: &TradeIntent,
        quote: &Quote,
    ) -> Result<Receipt, Error> {
        intent.validate(self.weth)?;
        let fee = quote_tier(quote)?;
        let recipient = self.manager.sender()?;
        let min_amount_out = intent.slippage.min_amount_out(quote.amount);
        let deadline = self.manager.deadline();

        let calldata = if self.is_single_hop(intent.token_in, intent.token_out) {
            ISwapRouter::exactInputSingleCall {
                params: ISwapRouter::ExactInputSingleParams {
                    tokenIn: normalize(intent.token_in, self.weth),
                    tokenOut: normalize(intent.token_out, self.weth),
                    fee: fee.as_u24(),
                    recipient,
                    deadline,
                    amountIn: intent.amount,
                    amountOutMinimum: min_amount_out,
                    sqrtPriceLimitX96: U160::ZERO,
                },
            }
            .abi_encode()
        } else {
            ISwapRouter::exactInputCall {
                params: ISwapRouter::ExactInputParams {
                    path: Bytes::from(
                        self.bridged_path(intent.token_in, intent.token_out, fee).encode(),
                    ),
                    recipient,
                    deadline,
                    amountIn: intent.amount,
                    amountOutMinimum: min_amount_out,
                },
            }
            .abi_encode()
        };

        let value = if intent.native_in() {
            intent.amount
        } else {
            U256::ZERO
        };
        info!(
            token_in = %intent.token_in,
            token_out = %intent.token_out,
            amount_in = %intent.amount,
            %min_amount_out,
            %fee,
            "executing exact-in swap"
        );
        self.execute(intent, intent.amount, value, calldata).await
    }

    /// Exact-out swap: input bounded above by `ceil((1 + slippage) * quote)`.
    pub async fn swap_exact_out(
        &self,
        intent: &TradeIntent,
        quote: &Quote,
    ) -> Result<Receipt, Error> {
        intent.validate(self.weth)?;
        let fee = quote_tier(quote)?;
        let recipient = self.manager.sender()?;
        let max_amount_in = intent.slippage.max_amount_in(quote.amount);
        let deadline = self.manager.deadline();

        let calldata = if self.is_single_hop(intent.token_in, intent.token_out) {
            ISwapRouter::exactOutputSingleCall {
                params: ISwapRouter::ExactOutputSingleParams {
                    tokenIn: normalize(intent.token_in, self.weth),
                    tokenOut: normalize(intent.token_out, self.weth),
                    fee: fee.as_u24(),
                    recipient,
                    deadline,
                    amountOut: intent.amount,
                    amountInMaximum: max_amount_in,
                    sqrtPriceLimitX96: U160::ZERO,
                },
            }
            .abi_encode()
        } else {
            // Exact-output paths are encoded in reverse hop order.
            ISwapRouter::exactOutputCall {
                params: ISwapRouter::ExactOutputParams {
                    path: Bytes::from(
                        self.bridged_path(intent.token_in, intent.token_out, fee)
                            .reversed()
                            .encode(),
                    ),
                    recipient,
                    deadline,
                    amountOut: intent.amount,
                    amountInMaximum: max_amount_in,
                },
            }
            .abi_encode()
        };

        let value = if intent.native_in() {
            max_amount_in
        } else {
            U256::ZERO
        };
        info!(
            token_in = %intent.token_in,
            token_out = %intent.token_out,
            amount_out = %intent.amount,
            %max_amount_in,
            %fee,
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

/// Execution needs the tier the quote was found at; a tier-less quote cannot
/// have come from this protocol.
fn quote_tier(quote: &Quote) -> Result<FeeTier, Error> {
    quote.fee.ok_or_else(|| {
        Error::InvalidIntent(
            "concentrated-liquidity swaps need the fee tier discovered at quote time".to_string(),
        )
    })
}
