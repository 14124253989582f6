/// Protocol clients, one per pool generation
///
/// Both generations compose the same [`manager::ContractManager`] capability
/// set; the generation-specific code is only quoting and swap-instruction
/// construction.
pub mod manager;
pub mod v2;
pub mod v3;

pub use manager::ContractManager;
pub use v2::UniswapV2Client;
pub use v3::UniswapV3Client;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which pool generation a quote or swap targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    /// Constant-product pools
    V2,
    /// Concentrated-liquidity pools
    V3,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generation::V2 => write!(f, "v2"),
            Generation::V3 => write!(f, "v3"),
        }
    }
}
