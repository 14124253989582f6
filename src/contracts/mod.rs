/// Typed contract interfaces
///
/// `sol!`-generated bindings for the contracts the trader talks to, plus thin
/// helper structs that encode calls, run them through the ledger gateway and
/// decode the results.
///
/// # Available contracts
///
/// - **ERC-20**: allowance/balance queries and approval calldata
/// - **V2 router**: constant-product quotes and the six swap entry points
/// - **V3 router + quoter**: concentrated-liquidity quotes and swaps,
///   single-hop and packed-path variants
pub mod erc20;
pub mod v2_router;
pub mod v3;

pub use erc20::{Erc20, IERC20};
pub use v2_router::{IUniswapV2Router02, V2Router};
pub use v3::{IQuoter, ISwapRouter, V3Quoter, V3Router};
