pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod ledger;
pub mod protocols;
pub mod trade;
pub mod wallet;

// Main client exports
pub use client::{UniswapClient, UniswapClientBuilder};
pub use config::{NetworkProfile, TraderConfig, TraderSettings};
pub use error::Error;
pub use wallet::EvmWallet;

// Ledger gateway exports
pub use ledger::{CallRequest, HttpLedger, Ledger, Receipt, TransactionDraft};

// Protocol exports
pub use protocols::{ContractManager, Generation, UniswapV2Client, UniswapV3Client};

// Trade domain exports
pub use trade::fees::{with_fee_search, FeeTier};
pub use trade::path::PackedPath;
pub use trade::route::{resolve_route, Route, RouteKind};
pub use trade::{Quote, Slippage, TradeDirection, TradeIntent, NATIVE_TOKEN};
