/// Network and trader configuration
///
/// A `TraderConfig` is constructed once per process (from code, a TOML file
/// or environment variables) and passed explicitly to the client builder.
/// Nothing here is a global: the same process can hold two clients pointed at
/// two networks.
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::Address;
use config::{Config as ConfigLoader, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;
use crate::trade::fees::FeeTier;
use crate::trade::Slippage;

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "UNISWAP";

/// Canonical Ethereum mainnet deployments.
pub const MAINNET_V2_ROUTER: &str = "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D";
pub const MAINNET_V3_ROUTER: &str = "0xE592427A0AEce92De3Edee1F18E0157C05861564";
pub const MAINNET_V3_QUOTER: &str = "0xb27308f9F90D607463bb33eA1BeBb41C27CE5AB6";

/// Well-known network names by chain id, for logging and for keying
/// file-based contract tables on multi-network setups.
const NETWORK_NAMES: &[(u64, &str)] = &[
    (1, "mainnet"),
    (10, "optimism"),
    (56, "binance"),
    (97, "binance_testnet"),
    (100, "xdai"),
    (137, "polygon"),
    (250, "fantom"),
    (42161, "arbitrum"),
    (11155111, "sepolia"),
];

/// Look up the conventional name for a chain id.
pub fn network_name(chain_id: u64) -> Option<&'static str> {
    NETWORK_NAMES
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| *name)
}

/// Where one deployment of the protocol lives: RPC endpoint plus the contract
/// addresses the trader talks to. The wrapped-native (bridge) address is
/// optional; when absent it is fetched from the routers at connect time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// Network name, e.g. "mainnet"
    pub name: String,
    /// Chain ID for EIP-155 transaction signing
    pub chain_id: u64,
    /// HTTP JSON-RPC endpoint
    pub rpc_url: String,
    /// Constant-product router contract
    pub v2_router: String,
    /// Concentrated-liquidity router contract
    pub v3_router: String,
    /// Concentrated-liquidity quoter contract
    pub v3_quoter: String,
    /// Wrapped-native token contract; fetched from the routers when not set
    pub weth: Option<String>,
}

impl NetworkProfile {
    /// Ethereum mainnet with the canonical deployment addresses. The caller
    /// still has to supply an RPC endpoint.
    pub fn mainnet(rpc_url: impl Into<String>) -> Self {
        Self {
            name: "mainnet".to_string(),
            chain_id: 1,
            rpc_url: rpc_url.into(),
            v2_router: MAINNET_V2_ROUTER.to_string(),
            v3_router: MAINNET_V3_ROUTER.to_string(),
            v3_quoter: MAINNET_V3_QUOTER.to_string(),
            weth: None,
        }
    }

    /// Validate the endpoint URL and every configured address.
    pub fn validate(&self) -> Result<(), Error> {
        Url::parse(&self.rpc_url)
            .map_err(|e| Error::Config(format!("invalid RPC URL '{}': {e}", self.rpc_url)))?;
        self.v2_router_address()?;
        self.v3_router_address()?;
        self.v3_quoter_address()?;
        if let Some(weth) = &self.weth {
            parse_address("weth", weth)?;
        }
        Ok(())
    }

    pub fn v2_router_address(&self) -> Result<Address, Error> {
        parse_address("v2_router", &self.v2_router)
    }

    pub fn v3_router_address(&self) -> Result<Address, Error> {
        parse_address("v3_router", &self.v3_router)
    }

    pub fn v3_quoter_address(&self) -> Result<Address, Error> {
        parse_address("v3_quoter", &self.v3_quoter)
    }

    pub fn weth_address(&self) -> Result<Option<Address>, Error> {
        self.weth
            .as_deref()
            .map(|w| parse_address("weth", w))
            .transpose()
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, Error> {
    Address::from_str(value)
        .map_err(|e| Error::Config(format!("invalid {field} address '{value}': {e}")))
}

/// Tunables for quote and execution behavior. Defaults mirror the deployed
/// contracts' conventions: cheapest-tier-first search, a ten minute deadline
/// and a 20% gas-estimate margin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraderSettings {
    /// Fee tier priority order for the concentrated-liquidity search
    pub fee_order: Vec<FeeTier>,
    /// Slippage tolerance applied when an intent does not carry its own
    pub default_slippage: Slippage,
    /// On-chain deadline window, seconds from submission time
    pub deadline_secs: u64,
    /// Percentage added on top of the node's gas estimate
    pub gas_margin_percent: u64,
    /// Receipt polling cadence, seconds
    pub receipt_poll_secs: u64,
}

impl Default for TraderSettings {
    fn default() -> Self {
        Self {
            fee_order: FeeTier::DEFAULT_ORDER.to_vec(),
            default_slippage: Slippage::from_bps(50).expect("50 bps is a valid tolerance"),
            deadline_secs: 10 * 60,
            gas_margin_percent: 20,
            receipt_poll_secs: 2,
        }
    }
}

impl TraderSettings {
    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_secs(self.receipt_poll_secs)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.fee_order.is_empty() {
            return Err(Error::Config(
                "fee_order must list at least one tier".to_string(),
            ));
        }
        if self.deadline_secs == 0 {
            return Err(Error::Config("deadline_secs must be positive".to_string()));
        }
        Ok(())
    }
}

/// Complete client configuration: one network profile plus trader tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderConfig {
    pub network: NetworkProfile,
    #[serde(default)]
    pub settings: TraderSettings,
}

impl TraderConfig {
    pub fn new(network: NetworkProfile) -> Self {
        Self {
            network,
            settings: TraderSettings::default(),
        }
    }

    /// Load from the environment (`.env` honored). `UNISWAP_RPC_URL` is
    /// required; contract addresses default to the mainnet deployments and
    /// can be overridden with `UNISWAP_V2_ROUTER`, `UNISWAP_V3_ROUTER`,
    /// `UNISWAP_V3_QUOTER`, `UNISWAP_WETH`, `UNISWAP_CHAIN_ID` and
    /// `UNISWAP_NETWORK`.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let var = |key: &str| std::env::var(format!("{ENV_PREFIX}_{key}")).ok();

        let rpc_url = var("RPC_URL")
            .ok_or_else(|| Error::Config(format!("{ENV_PREFIX}_RPC_URL is not set")))?;
        let chain_id = match var("CHAIN_ID") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| Error::Config(format!("invalid {ENV_PREFIX}_CHAIN_ID: {e}")))?,
            None => 1,
        };

        let mut network = NetworkProfile::mainnet(rpc_url);
        network.chain_id = chain_id;
        network.name = var("NETWORK")
            .or_else(|| network_name(chain_id).map(str::to_string))
            .unwrap_or_else(|| chain_id.to_string());
        if let Some(v2) = var("V2_ROUTER") {
            network.v2_router = v2;
        }
        if let Some(v3) = var("V3_ROUTER") {
            network.v3_router = v3;
        }
        if let Some(quoter) = var("V3_QUOTER") {
            network.v3_quoter = quoter;
        }
        network.weth = var("WETH");

        let config = Self::new(network);
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, with `UNISWAP_*` environment variables layered
    /// on top.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let loaded = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| Error::Config(format!("failed to load configuration: {e}")))?;

        let config: TraderConfig = loaded
            .try_deserialize()
            .map_err(|e| Error::Config(format!("failed to parse configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.network.validate()?;
        self.settings.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mainnet_profile_is_valid() {
        let config = TraderConfig::new(NetworkProfile::mainnet("https://eth.example.org"));
        config.validate().unwrap();
        assert_eq!(config.network.chain_id, 1);
        assert_eq!(config.settings.fee_order, FeeTier::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn bad_addresses_are_rejected() {
        let mut profile = NetworkProfile::mainnet("https://eth.example.org");
        profile.v2_router = "not-an-address".to_string();
        assert!(matches!(profile.validate(), Err(Error::Config(_))));

        let mut profile = NetworkProfile::mainnet("https://eth.example.org");
        profile.rpc_url = "".to_string();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn chain_ids_map_to_names() {
        assert_eq!(network_name(1), Some("mainnet"));
        assert_eq!(network_name(42161), Some("arbitrum"));
        assert_eq!(network_name(424242), None);
    }

    #[test]
    fn config_loads_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[network]
name = "mainnet"
chain_id = 1
rpc_url = "https://eth.example.org"
v2_router = "{MAINNET_V2_ROUTER}"
v3_router = "{MAINNET_V3_ROUTER}"
v3_quoter = "{MAINNET_V3_QUOTER}"

[settings]
fee_order = [3000, 500, 10000]
deadline_secs = 300
"#
        )
        .unwrap();

        let config = TraderConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config.settings.fee_order,
            vec![FeeTier::Medium, FeeTier::Lowest, FeeTier::Highest]
        );
        assert_eq!(config.settings.deadline_secs, 300);
        // Unspecified settings keep their defaults.
        assert_eq!(config.settings.gas_margin_percent, 20);
    }
}
