/// Fee tiers and the retry-across-tiers search
///
/// Concentrated-liquidity pools are parameterized by a fee: distinct tiers
/// are distinct pools, and a quote or swap targeting a tier with no pool (or
/// too little liquidity) reverts at the ledger. The search below turns that
/// revert into "try the next tier" without swallowing a final failure.
use std::fmt;
use std::future::Future;

use alloy_primitives::aliases::U24;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// The fixed set of fee tiers, in hundredths of a basis point as the pools
/// encode them on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
    /// 0.05%
    Lowest,
    /// 0.30%
    Medium,
    /// 1.00%
    Highest,
}

impl FeeTier {
    /// Tier priority order used when the caller does not pin a tier:
    /// cheapest first.
    pub const DEFAULT_ORDER: [FeeTier; 3] = [FeeTier::Lowest, FeeTier::Medium, FeeTier::Highest];

    /// The pool-encoded fee value (500, 3000 or 10000).
    pub const fn as_u32(self) -> u32 {
        match self {
            FeeTier::Lowest => 500,
            FeeTier::Medium => 3000,
            FeeTier::Highest => 10_000,
        }
    }

    /// The uint24 form used in contract calls and packed paths.
    pub fn as_u24(self) -> U24 {
        U24::from(self.as_u32())
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Error> {
        match value {
            500 => Ok(FeeTier::Lowest),
            3000 => Ok(FeeTier::Medium),
            10_000 => Ok(FeeTier::Highest),
            other => Err(Error::Config(format!("unknown fee tier: {other}"))),
        }
    }
}

impl From<FeeTier> for u32 {
    fn from(tier: FeeTier) -> u32 {
        tier.as_u32()
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.as_u32() as f64 / 10_000.0)
    }
}

/// Run `op` against each tier in the caller-declared priority order.
///
/// A revert means the tier's pool cannot serve the request; the next tier is
/// tried. The first success returns `(result, tier)` so execution can reuse
/// the tier the quote was obtained at. When the last tier also fails, the
/// failure is reported as `NoLiquidityPath` carrying the final revert reason
/// so exhaustion is never silent. Transport errors abort the search
/// immediately: an unreachable node says nothing about liquidity.
pub async fn with_fee_search<T, F, Fut>(tiers: &[FeeTier], mut op: F) -> Result<(T, FeeTier), Error>
where
    F: FnMut(FeeTier) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    if tiers.is_empty() {
        return Err(Error::Config("fee tier search over an empty tier list".to_string()));
    }
    let mut attempts = 0usize;
    let mut last_reason = String::new();
    for &tier in tiers {
        attempts += 1;
        match op(tier).await {
            Ok(result) => return Ok((result, tier)),
            Err(err) if err.is_revert() => {
                debug!(%tier, %err, "fee tier lacks liquidity, trying next");
                last_reason = err.to_string();
            }
            Err(err) => return Err(err),
        }
    }
    Err(Error::NoLiquidityPath {
        attempts,
        reason: last_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[tokio::test]
    async fn search_stops_at_the_first_liquid_tier() {
        let calls = RefCell::new(Vec::new());
        let (value, tier) = with_fee_search(&FeeTier::DEFAULT_ORDER, |tier| {
            calls.borrow_mut().push(tier);
            let liquid = tier == FeeTier::Highest;
            async move {
                if liquid {
                    Ok(42u64)
                } else {
                    Err(Error::Revert("execution reverted".to_string()))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(tier, FeeTier::Highest);
        // All three tiers probed, in declared order.
        assert_eq!(
            *calls.borrow(),
            vec![FeeTier::Lowest, FeeTier::Medium, FeeTier::Highest]
        );
    }

    #[tokio::test]
    async fn search_does_not_probe_past_a_success() {
        let calls = RefCell::new(0usize);
        let (_, tier) = with_fee_search(&FeeTier::DEFAULT_ORDER, |_| {
            *calls.borrow_mut() += 1;
            async move { Ok(()) }
        })
        .await
        .unwrap();

        assert_eq!(tier, FeeTier::Lowest);
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn exhaustion_reports_after_exactly_len_attempts() {
        let calls = RefCell::new(0usize);
        let err = with_fee_search(&FeeTier::DEFAULT_ORDER, |_| {
            *calls.borrow_mut() += 1;
            async move { Err::<(), _>(Error::Revert("no pool".to_string())) }
        })
        .await
        .unwrap_err();

        assert_eq!(*calls.borrow(), 3);
        match err {
            Error::NoLiquidityPath { attempts, reason } => {
                assert_eq!(attempts, 3);
                assert!(reason.contains("no pool"));
            }
            other => panic!("expected NoLiquidityPath, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_errors_abort_the_search() {
        let calls = RefCell::new(0usize);
        let err = with_fee_search(&FeeTier::DEFAULT_ORDER, |_| {
            *calls.borrow_mut() += 1;
            async move { Err::<(), _>(Error::Rpc("connection refused".to_string())) }
        })
        .await
        .unwrap_err();

        assert_eq!(*calls.borrow(), 1);
        assert!(matches!(err, Error::Rpc(_)));
    }

    #[test]
    fn tier_wire_values_round_trip() {
        for tier in FeeTier::DEFAULT_ORDER {
            assert_eq!(FeeTier::try_from(tier.as_u32()).unwrap(), tier);
        }
        assert!(FeeTier::try_from(123).is_err());
    }
}
