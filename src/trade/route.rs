/// Route resolution through the wrapped-native bridge asset
///
/// Trades are always routed via the bridge: a pair that includes the bridge
/// trades directly, anything else hops through it. Resolution is pure: the
/// bridge address is fetched once per session from the router contract and
/// passed in.
use alloy_primitives::Address;

use crate::trade::NATIVE_TOKEN;

/// Shape of a resolved route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// The input token is the bridge asset: `[bridge, token_out]`.
    BridgeIn,
    /// The output token is the bridge asset: `[token_in, bridge]`.
    BridgeOut,
    /// Neither endpoint is the bridge: `[token_in, bridge, token_out]`.
    Bridged,
}

/// An ordered hop path of two or three token addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: Vec<Address>,
    pub kind: RouteKind,
}

impl Route {
    /// Number of pool hops the path crosses.
    pub fn hops(&self) -> usize {
        self.path.len() - 1
    }

    /// Whether the route trades against a single pool.
    pub fn is_direct(&self) -> bool {
        self.kind != RouteKind::Bridged
    }
}

/// Substitute the bridge asset for the native sentinel. Comparisons against
/// the bridge must happen on normalized addresses so a native endpoint takes
/// the direct route.
pub fn normalize(token: Address, bridge: Address) -> Address {
    if token == NATIVE_TOKEN {
        bridge
    } else {
        token
    }
}

/// Resolve the hop sequence for a pair. The native sentinel is treated as the
/// bridge asset; for any other pair the bridge only ever appears in the
/// middle position.
pub fn resolve_route(token_in: Address, token_out: Address, bridge: Address) -> Route {
    let a = normalize(token_in, bridge);
    let b = normalize(token_out, bridge);
    if a == bridge {
        Route {
            path: vec![bridge, b],
            kind: RouteKind::BridgeIn,
        }
    } else if b == bridge {
        Route {
            path: vec![a, bridge],
            kind: RouteKind::BridgeOut,
        }
    } else {
        Route {
            path: vec![a, bridge, b],
            kind: RouteKind::Bridged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
    const DAI: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");
    const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

    #[test]
    fn bridge_in_routes_directly() {
        let route = resolve_route(WETH, DAI, WETH);
        assert_eq!(route.kind, RouteKind::BridgeIn);
        assert_eq!(route.path, vec![WETH, DAI]);
        assert_eq!(route.hops(), 1);
    }

    #[test]
    fn bridge_out_routes_directly() {
        let route = resolve_route(DAI, WETH, WETH);
        assert_eq!(route.kind, RouteKind::BridgeOut);
        assert_eq!(route.path, vec![DAI, WETH]);
    }

    #[test]
    fn unrelated_pair_hops_through_the_bridge() {
        let route = resolve_route(DAI, USDC, WETH);
        assert_eq!(route.kind, RouteKind::Bridged);
        assert_eq!(route.path, vec![DAI, WETH, USDC]);
        assert_eq!(route.hops(), 2);
        assert!(!route.is_direct());
    }

    #[test]
    fn native_sentinel_counts_as_the_bridge() {
        let route = resolve_route(NATIVE_TOKEN, DAI, WETH);
        assert_eq!(route.kind, RouteKind::BridgeIn);
        assert_eq!(route.path, vec![WETH, DAI]);

        let route = resolve_route(DAI, NATIVE_TOKEN, WETH);
        assert_eq!(route.kind, RouteKind::BridgeOut);
        assert_eq!(route.path, vec![DAI, WETH]);
    }

    #[test]
    fn endpoints_are_preserved_for_token_pairs() {
        // First and last path elements must equal the (normalized) endpoints;
        // the bridge is only ever substituted in the middle.
        for (a, b) in [(DAI, USDC), (USDC, DAI), (DAI, WETH), (WETH, USDC)] {
            let route = resolve_route(a, b, WETH);
            assert_eq!(*route.path.first().unwrap(), a);
            assert_eq!(*route.path.last().unwrap(), b);
        }
    }
}
