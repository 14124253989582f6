/// Shared contract-manager capabilities
///
/// One capability set (quantity conversion, balance lookup, approvals and
/// the transaction pipeline) implemented once and composed into both
/// protocol-generation clients. Holds no per-trade state: every trade flows
/// through as fresh values.
use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::TraderSettings;
use crate::contracts::Erc20;
use crate::error::Error;
use crate::ledger::{Eip1559Transaction, Ledger, Receipt, TransactionDraft};
use crate::trade::units;
use crate::trade::NATIVE_TOKEN;
use crate::wallet::EvmWallet;

/// The allowance value submitted on approval: effectively unlimited.
pub const MAX_ALLOWANCE: U256 = U256::MAX;

/// High-water mark below which an allowance counts as "not approved".
///
/// Approval is threshold-based, not exact-amount tracking: one maximal
/// approval transaction is amortized across every future trade on the pair,
/// at the cost of granting the router unbounded spending power over this
/// token. Revoking that trust requires an explicit zero-allowance
/// transaction, which this component never issues.
pub fn approval_threshold() -> U256 {
    // 2^196 - 1: 49 f's in a 64-digit hex word.
    U256::MAX >> 60usize
}

/// Ledger access, signing and token plumbing shared by both protocol
/// generations.
#[derive(Clone)]
pub struct ContractManager {
    ledger: Arc<dyn Ledger>,
    wallet: Option<Arc<EvmWallet>>,
    settings: TraderSettings,
}

impl ContractManager {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        wallet: Option<Arc<EvmWallet>>,
        settings: TraderSettings,
    ) -> Self {
        Self {
            ledger,
            wallet,
            settings,
        }
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    pub fn settings(&self) -> &TraderSettings {
        &self.settings
    }

    /// The signing wallet, or `WalletNotConfigured` for quote-only setups.
    pub fn wallet(&self) -> Result<&EvmWallet, Error> {
        self.wallet.as_deref().ok_or(Error::WalletNotConfigured)
    }

    /// The transaction sender address.
    pub fn sender(&self) -> Result<Address, Error> {
        Ok(self.wallet()?.address())
    }

    /// On-chain deadline: now plus the configured window. The ledger rejects
    /// the transaction after this timestamp even if it is still sitting in a
    /// mempool.
    pub fn deadline(&self) -> U256 {
        U256::from(Utc::now().timestamp() as u64 + self.settings.deadline_secs)
    }

    /// Balance of `owner` in `token`; the native sentinel reads the chain
    /// balance.
    pub async fn balance_of(&self, owner: Address, token: Address) -> Result<U256, Error> {
        if token == NATIVE_TOKEN {
            self.ledger.native_balance(owner).await
        } else {
            Erc20::new(self.ledger.clone(), token)
                .balance_of(owner)
                .await
        }
    }

    /// Fail with `InsufficientBalance` before any submission when the sender
    /// cannot cover `needed` of `token`.
    pub async fn require_balance(&self, token: Address, needed: U256) -> Result<(), Error> {
        let owner = self.sender()?;
        let had = self.balance_of(owner, token).await?;
        if had < needed {
            return Err(Error::InsufficientBalance { had, needed });
        }
        Ok(())
    }

    /// Decimals for a token; the native asset has 18.
    pub async fn token_decimals(&self, token: Address) -> Result<u8, Error> {
        if token == NATIVE_TOKEN {
            return Ok(18);
        }
        Erc20::new(self.ledger.clone(), token).decimals().await
    }

    /// Convert a human-readable amount of `token` into its smallest unit,
    /// looking the decimals up on-chain.
    pub async fn quantity(&self, token: Address, amount: &str) -> Result<U256, Error> {
        let decimals = self.token_decimals(token).await?;
        units::to_base_units(amount, decimals)
    }

    /// Render a smallest-unit amount of `token` as a decimal string.
    pub async fn display_amount(&self, token: Address, amount: U256) -> Result<String, Error> {
        let decimals = self.token_decimals(token).await?;
        Ok(units::from_base_units(amount, decimals))
    }

    /// Make sure `spender` may move the sender's `token` balance before a
    /// swap touches it.
    ///
    /// Native value needs no approval. An existing allowance at or above the
    /// high-water mark is sufficient; otherwise one maximal approval is
    /// submitted and awaited. A failed approval receipt is terminal for the
    /// pending trade: the swap must not be attempted. The await also
    /// serializes approval against the following swap submission for this
    /// (owner, token) pair, since the approval changes state the swap
    /// depends on.
    pub async fn ensure_approved(&self, token: Address, spender: Address) -> Result<(), Error> {
        if token == NATIVE_TOKEN {
            return Ok(());
        }
        let owner = self.sender()?;
        let erc20 = Erc20::new(self.ledger.clone(), token);
        let allowance = erc20.allowance(owner, spender).await?;
        if allowance >= approval_threshold() {
            debug!(%token, %spender, "allowance already sufficient");
            return Ok(());
        }

        info!(%token, %spender, "submitting maximal approval");
        let calldata = Erc20::approve_calldata(spender, MAX_ALLOWANCE);
        let hash = self.send_transaction(token, U256::ZERO, calldata).await?;
        let receipt = self.wait_for_receipt(hash).await?;
        if !receipt.success {
            return Err(Error::ApprovalFailed(hash));
        }
        Ok(())
    }

    /// Build, sign and submit one transaction: fetch the nonce and fee data,
    /// estimate gas and inflate the estimate by the configured margin, then
    /// sign and send. Returns the transaction hash.
    pub async fn send_transaction(
        &self,
        to: Address,
        value: U256,
        data: Vec<u8>,
    ) -> Result<B256, Error> {
        let wallet = self.wallet()?;
        let from = wallet.address();

        let nonce = self.ledger.transaction_count(from).await?;
        let fees = self.ledger.fee_data().await?;

        let draft = TransactionDraft::new(from, to, value, data.clone());
        let estimate = self
            .ledger
            .estimate_gas(&draft)
            .await
            .map_err(Error::classify_revert)?;
        let gas_limit = estimate + estimate * self.settings.gas_margin_percent / 100;

        let tx = Eip1559Transaction::new(self.ledger.chain_id(), nonce, to)
            .value(value)
            .data(data)
            .gas_limit(gas_limit)
            .fees(
                fees.max_fee_per_gas().to::<u128>(),
                fees.priority_fee.to::<u128>(),
            );
        let signature = wallet.sign_hash(&tx.signature_hash())?;
        let raw = tx.encode_signed(&signature);

        let hash = self.ledger.send_raw_transaction(&raw).await?;
        debug!(%hash, gas_limit, "transaction submitted");
        Ok(hash)
    }

    /// Block until the transaction's receipt is observed. No client-side
    /// timeout beyond the transaction's own on-chain deadline; integrators
    /// wanting one should wrap this call.
    pub async fn wait_for_receipt(&self, hash: B256) -> Result<Receipt, Error> {
        info!(%hash, "awaiting receipt");
        loop {
            if let Some(receipt) = self.ledger.transaction_receipt(hash).await? {
                if !receipt.success {
                    warn!(%hash, "transaction mined but failed");
                }
                return Ok(receipt);
            }
            tokio::time::sleep(self.settings.receipt_poll_interval()).await;
        }
    }
}
