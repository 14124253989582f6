/// Unified trading client
///
/// The main entry point: composes one quote-and-swap client per pool
/// generation over a shared ledger gateway and wallet. Constructed once per
/// process from an explicit [`TraderConfig`]; there is no global connection
/// state anywhere in the crate.
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::config::TraderConfig;
use crate::error::Error;
use crate::ledger::{HttpLedger, Ledger, Receipt};
use crate::protocols::{ContractManager, Generation, UniswapV2Client, UniswapV3Client};
use crate::trade::fees::FeeTier;
use crate::trade::{Quote, Slippage, TradeIntent};
use crate::wallet::EvmWallet;

/// Client over both pool generations.
pub struct UniswapClient {
    config: TraderConfig,
    ledger: Arc<dyn Ledger>,
    v2: UniswapV2Client,
    v3: UniswapV3Client,
}

/// Builder for [`UniswapClient`].
#[derive(Default)]
pub struct UniswapClientBuilder {
    config: Option<TraderConfig>,
    wallet: Option<Arc<EvmWallet>>,
    ledger: Option<Arc<dyn Ledger>>,
}

impl UniswapClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: TraderConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Attach a signing wallet. Without one the client can quote but not
    /// trade.
    pub fn wallet(mut self, wallet: EvmWallet) -> Self {
        self.wallet = Some(Arc::new(wallet));
        self
    }

    /// Supply a ledger gateway directly instead of connecting over HTTP.
    /// Alternate transports and test doubles plug in here.
    pub fn ledger(mut self, ledger: Arc<dyn Ledger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub async fn build(self) -> Result<UniswapClient, Error> {
        let config = self
            .config
            .ok_or_else(|| Error::Config("no trader configuration supplied".to_string()))?;
        config.validate()?;

        let ledger: Arc<dyn Ledger> = match self.ledger {
            Some(ledger) => ledger,
            None => Arc::new(HttpLedger::connect(
                &config.network.rpc_url,
                config.network.chain_id,
            )?),
        };

        let manager = ContractManager::new(ledger.clone(), self.wallet, config.settings.clone());
        let weth_override = config.network.weth_address()?;
        let (v2, v3) = futures::try_join!(
            UniswapV2Client::connect(
                manager.clone(),
                config.network.v2_router_address()?,
                weth_override,
            ),
            UniswapV3Client::connect(
                manager.clone(),
                config.network.v3_router_address()?,
                config.network.v3_quoter_address()?,
                weth_override,
            ),
        )?;

        info!(
            network = %config.network.name,
            chain_id = config.network.chain_id,
            "trading client ready"
        );
        Ok(UniswapClient {
            config,
            ledger,
            v2,
            v3,
        })
    }
}

impl UniswapClient {
    pub fn builder() -> UniswapClientBuilder {
        UniswapClientBuilder::new()
    }

    pub fn config(&self) -> &TraderConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    /// The constant-product client.
    pub fn v2(&self) -> &UniswapV2Client {
        &self.v2
    }

    /// The concentrated-liquidity client.
    pub fn v3(&self) -> &UniswapV3Client {
        &self.v3
    }

    /// Price a fixed input amount on one generation. `fee` pins the
    /// concentrated-liquidity tier and is ignored by the constant-product
    /// protocol.
    pub async fn quote_input(
        &self,
        generation: Generation,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        fee: Option<FeeTier>,
    ) -> Result<Quote, Error> {
        match generation {
            Generation::V2 => {
                if fee.is_some() {
                    debug!("fee tier ignored for constant-product quotes");
                }
                self.v2.quote_exact_in(token_in, token_out, amount_in).await
            }
            Generation::V3 => {
                self.v3
                    .quote_exact_in(token_in, token_out, amount_in, fee)
                    .await
            }
        }
    }

    /// Price a fixed output amount on one generation.
    pub async fn quote_output(
        &self,
        generation: Generation,
        token_in: Address,
        token_out: Address,
        amount_out: U256,
        fee: Option<FeeTier>,
    ) -> Result<Quote, Error> {
        match generation {
            Generation::V2 => {
                if fee.is_some() {
                    debug!("fee tier ignored for constant-product quotes");
                }
                self.v2
                    .quote_exact_out(token_in, token_out, amount_out)
                    .await
            }
            Generation::V3 => {
                self.v3
                    .quote_exact_out(token_in, token_out, amount_out, fee)
                    .await
            }
        }
    }

    /// Quote both generations concurrently and keep the better price: the
    /// larger output for a fixed input. A generation without a liquidity
    /// path is skipped; only when both fail does the failure propagate.
    pub async fn best_quote_input(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<(Generation, Quote), Error> {
        let (v2, v3) = futures::join!(
            self.v2.quote_exact_in(token_in, token_out, amount_in),
            self.v3.quote_exact_in(token_in, token_out, amount_in, None),
        );
        pick_best(v2, v3, |v2, v3| v3.amount >= v2.amount)
    }

    /// Quote both generations concurrently and keep the better price: the
    /// smaller input for a fixed output.
    pub async fn best_quote_output(
        &self,
        token_in: Address,
        token_out: Address,
        amount_out: U256,
    ) -> Result<(Generation, Quote), Error> {
        let (v2, v3) = futures::join!(
            self.v2.quote_exact_out(token_in, token_out, amount_out),
            self.v3.quote_exact_out(token_in, token_out, amount_out, None),
        );
        pick_best(v2, v3, |v2, v3| v3.amount <= v2.amount)
    }

    /// Quote and execute an exact-in trade on the requested generation.
    ///
    /// The quote obtained here is converted to a minimum-out bound with the
    /// given (or default) slippage tolerance; for concentrated liquidity the
    /// swap reuses the tier the quote was found at. Returns the receipt;
    /// `success: false` is a reported outcome, not an error.
    pub async fn trade_input(
        &self,
        generation: Generation,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        slippage: Option<Slippage>,
        fee: Option<FeeTier>,
    ) -> Result<Receipt, Error> {
        let slippage = slippage.unwrap_or(self.config.settings.default_slippage);
        let intent = TradeIntent::exact_in(token_in, token_out, amount_in, slippage);
        match generation {
            Generation::V2 => {
                intent.validate(self.v2.weth())?;
                let quote = self.v2.quote_exact_in(token_in, token_out, amount_in).await?;
                self.v2.swap_exact_in(&intent, &quote).await
            }
            Generation::V3 => {
                intent.validate(self.v3.weth())?;
                let quote = self
                    .v3
                    .quote_exact_in(token_in, token_out, amount_in, fee)
                    .await?;
                self.v3.swap_exact_in(&intent, &quote).await
            }
        }
    }

    /// Quote and execute an exact-out trade on the requested generation.
    pub async fn trade_output(
        &self,
        generation: Generation,
        token_in: Address,
        token_out: Address,
        amount_out: U256,
        slippage: Option<Slippage>,
        fee: Option<FeeTier>,
    ) -> Result<Receipt, Error> {
        let slippage = slippage.unwrap_or(self.config.settings.default_slippage);
        let intent = TradeIntent::exact_out(token_in, token_out, amount_out, slippage);
        match generation {
            Generation::V2 => {
                intent.validate(self.v2.weth())?;
                let quote = self
                    .v2
                    .quote_exact_out(token_in, token_out, amount_out)
                    .await?;
                self.v2.swap_exact_out(&intent, &quote).await
            }
            Generation::V3 => {
                intent.validate(self.v3.weth())?;
                let quote = self
                    .v3
                    .quote_exact_out(token_in, token_out, amount_out, fee)
                    .await?;
                self.v3.swap_exact_out(&intent, &quote).await
            }
        }
    }
}

/// Keep whichever generation quoted, preferring `prefer_v3` when both did.
/// Note concurrent trades on the same pair can still race between this
/// comparison and execution; that window is inherent to quoting against a
/// live ledger.
fn pick_best(
    v2: Result<Quote, Error>,
    v3: Result<Quote, Error>,
    prefer_v3: impl Fn(&Quote, &Quote) -> bool,
) -> Result<(Generation, Quote), Error> {
    match (v2, v3) {
        (Ok(v2), Ok(v3)) => {
            if prefer_v3(&v2, &v3) {
                Ok((Generation::V3, v3))
            } else {
                Ok((Generation::V2, v2))
            }
        }
        (Ok(v2), Err(e)) => {
            debug!(error = %e, "concentrated-liquidity quote unavailable");
            Ok((Generation::V2, v2))
        }
        (Err(e), Ok(v3)) => {
            debug!(error = %e, "constant-product quote unavailable");
            Ok((Generation::V3, v3))
        }
        (Err(v2_err), Err(v3_err)) => {
            warn!(%v2_err, "no quote from either generation");
            Err(v3_err)
        }
    }
}
