/// Trade domain types shared by both protocol generations
///
/// Everything here is pure: intents, slippage bounds, routes, fee tiers and
/// the packed path codec make no ledger calls, so economic-correctness
/// properties (bound math, path byte layout, tier ordering) are unit-testable
/// without a node.
pub mod fees;
pub mod path;
pub mod route;
pub mod units;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::trade::fees::FeeTier;

/// Sentinel address for the native chain asset ("ETH"). Routing substitutes
/// the wrapped-native bridge asset for it; swap execution picks the payable
/// router entry points instead of requiring an approval.
pub const NATIVE_TOKEN: Address = Address::ZERO;

/// Trade direction: which side of the pair is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    /// The input amount is exact; the output is bounded from below.
    ExactIn,
    /// The output amount is exact; the input is bounded from above.
    ExactOut,
}

/// Caller-accepted fractional price deviation between quote and execution.
///
/// Stored in parts-per-million so the execution bounds are exact integer
/// arithmetic: `min_amount_out = floor((1 - s) * quote)` and
/// `max_amount_in = ceil((1 + s) * quote)`. The bound, not the quote, is what
/// goes on-chain; it has to absorb price movement between quote time and
/// confirmation time or the transaction reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slippage(u32);

const PPM_DENOMINATOR: u64 = 1_000_000;

impl Slippage {
    /// Build from a fraction, e.g. `0.005` for 0.5%. Must satisfy 0 <= s < 1.
    pub fn from_fraction(fraction: f64) -> Result<Self, Error> {
        if !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
            return Err(Error::InvalidIntent(format!(
                "slippage tolerance must be a fraction in [0, 1), got {fraction}"
            )));
        }
        Ok(Self((fraction * PPM_DENOMINATOR as f64).round() as u32))
    }

    /// Build from basis points, e.g. `50` for 0.5%.
    pub fn from_bps(bps: u32) -> Result<Self, Error> {
        if bps >= 10_000 {
            return Err(Error::InvalidIntent(format!(
                "slippage tolerance must be below 10000 bps, got {bps}"
            )));
        }
        Ok(Self(bps * 100))
    }

    /// The tolerance in parts-per-million.
    pub fn ppm(&self) -> u32 {
        self.0
    }

    /// Exact-in execution bound: `floor((1 - s) * quoted_out)`.
    pub fn min_amount_out(&self, quoted_out: U256) -> U256 {
        quoted_out * U256::from(PPM_DENOMINATOR - u64::from(self.0))
            / U256::from(PPM_DENOMINATOR)
    }

    /// Exact-out execution bound: `ceil((1 + s) * quoted_in)`.
    pub fn max_amount_in(&self, quoted_in: U256) -> U256 {
        let numerator = quoted_in * U256::from(PPM_DENOMINATOR + u64::from(self.0))
            + U256::from(PPM_DENOMINATOR - 1);
        numerator / U256::from(PPM_DENOMINATOR)
    }
}

/// One requested trade. Flows through quote and execution as an immutable
/// value; nothing is persisted across trades.
#[derive(Debug, Clone)]
pub struct TradeIntent {
    /// Input token; `NATIVE_TOKEN` for the native asset.
    pub token_in: Address,
    /// Output token; `NATIVE_TOKEN` for the native asset.
    pub token_out: Address,
    /// The exact amount, in the smallest unit of the fixed-side token.
    pub amount: U256,
    /// Which side `amount` fixes.
    pub direction: TradeDirection,
    /// Accepted price deviation between quote and execution.
    pub slippage: Slippage,
}

impl TradeIntent {
    pub fn exact_in(
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        slippage: Slippage,
    ) -> Self {
        Self {
            token_in,
            token_out,
            amount: amount_in,
            direction: TradeDirection::ExactIn,
            slippage,
        }
    }

    pub fn exact_out(
        token_in: Address,
        token_out: Address,
        amount_out: U256,
        slippage: Slippage,
    ) -> Self {
        Self {
            token_in,
            token_out,
            amount: amount_out,
            direction: TradeDirection::ExactOut,
            slippage,
        }
    }

    /// Fail-fast validation; no ledger round-trip. `bridge` is the wrapped
    /// native asset, needed to reject native-vs-wrapped "swaps" that would
    /// resolve to a single-token route.
    pub fn validate(&self, bridge: Address) -> Result<(), Error> {
        if self.amount.is_zero() {
            return Err(Error::InvalidIntent(
                "trade amount must be positive".to_string(),
            ));
        }
        if self.token_in == self.token_out {
            return Err(Error::InvalidIntent(
                "input and output tokens are identical".to_string(),
            ));
        }
        let norm_in = route::normalize(self.token_in, bridge);
        let norm_out = route::normalize(self.token_out, bridge);
        if norm_in == norm_out {
            return Err(Error::InvalidIntent(
                "native and wrapped-native are the same asset; wrap/unwrap is not a swap"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the input side is the native asset (paid as transaction value,
    /// no approval needed).
    pub fn native_in(&self) -> bool {
        self.token_in == NATIVE_TOKEN
    }

    /// Whether the output side is the native asset.
    pub fn native_out(&self) -> bool {
        self.token_out == NATIVE_TOKEN
    }
}

/// A point-in-time price. Never cached: every quote re-queries the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Amount out for exact-in quotes, amount in for exact-out quotes, in the
    /// counter-asset's smallest unit.
    pub amount: U256,
    /// The fee tier the quote was obtained at (concentrated-liquidity only).
    /// Execution must reuse this tier rather than re-searching, so the swap
    /// prices at the tier that produced the quote.
    pub fee: Option<FeeTier>,
}
