// Allow deprecated Signature for compatibility with the alloy-consensus ecosystem
#![allow(deprecated)]

/// Signing wallet for EVM transactions
///
/// Holds either a raw secp256k1 private key or a BIP-39 mnemonic with an
/// account index on the Ethereum derivation path. Key material is kept as the
/// zeroized source secret and the signing key is recreated on demand.
use std::str::FromStr;

use alloy_primitives::{Address, Signature, B256};
use bip32::{DerivationPath, Seed, XPrv};
use bip39::Mnemonic;
use k256::ecdsa::SigningKey;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::Error;

/// HD path for Ethereum chains (BIP-44)
const ETHEREUM_HD_PATH: &str = "m/44'/60'/0'/0/";

enum Secret {
    /// Mnemonic phrase plus account index, re-derived per signature
    Mnemonic {
        phrase: Zeroizing<String>,
        index: u32,
    },
    /// Hex-encoded raw private key
    PrivateKey(Zeroizing<String>),
}

/// An EVM signing wallet.
pub struct EvmWallet {
    secret: Secret,
    address: Address,
}

impl EvmWallet {
    /// Create a wallet from a BIP-39 mnemonic and account index.
    pub fn from_mnemonic(mnemonic: &str, account_index: u32) -> Result<Self, Error> {
        // Validate up front so a typo fails at construction, not at signing.
        let _ = Mnemonic::from_str(mnemonic)
            .map_err(|e| Error::Wallet(format!("Invalid mnemonic: {}", e)))?;

        let secret = Secret::Mnemonic {
            phrase: Zeroizing::new(mnemonic.to_string()),
            index: account_index,
        };
        let address = derive_address(&signing_key_from(&secret)?)?;
        Ok(Self { secret, address })
    }

    /// Create a wallet from a hex-encoded private key ("0x" prefix optional).
    pub fn from_private_key(private_key: &str) -> Result<Self, Error> {
        let secret = Secret::PrivateKey(Zeroizing::new(private_key.to_string()));
        let address = derive_address(&signing_key_from(&secret)?)?;
        Ok(Self { secret, address })
    }

    /// Generate a fresh wallet from 16 bytes of OS entropy (12-word
    /// mnemonic, account index 0). Returns the wallet and its phrase; the
    /// caller is responsible for backing the phrase up.
    pub fn generate() -> Result<(Self, String), Error> {
        let mut entropy = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut entropy);
        let mnemonic = Mnemonic::from_entropy(&entropy)
            .map_err(|e| Error::Wallet(format!("Failed to generate mnemonic: {}", e)))?;
        let phrase = mnemonic.to_string();
        let wallet = Self::from_mnemonic(&phrase, 0)?;
        Ok((wallet, phrase))
    }

    /// The wallet's Ethereum address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a 32-byte hash (typically an EIP-1559 signature hash), returning
    /// a recoverable signature ready for transaction encoding.
    pub fn sign_hash(&self, hash: &B256) -> Result<Signature, Error> {
        let key = signing_key_from(&self.secret)?;
        let (signature, recovery_id) = key
            .sign_prehash_recoverable(hash.as_slice())
            .map_err(|e| Error::Wallet(format!("Signing error: {}", e)))?;
        Signature::from_signature_and_parity(signature, recovery_id.is_y_odd())
            .map_err(|e| Error::Wallet(format!("Invalid signature parity: {}", e)))
    }
}

impl std::fmt::Debug for EvmWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material through Debug.
        f.debug_struct("EvmWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Recreate the signing key from the stored secret.
fn signing_key_from(secret: &Secret) -> Result<SigningKey, Error> {
    match secret {
        Secret::Mnemonic { phrase, index } => {
            let mnemonic = Mnemonic::from_str(phrase)
                .map_err(|e| Error::Wallet(format!("Invalid stored mnemonic: {}", e)))?;
            let seed = Seed::new(mnemonic.to_seed(""));

            let path = format!("{}{}", ETHEREUM_HD_PATH, index);
            let path = DerivationPath::from_str(&path)
                .map_err(|e| Error::Wallet(format!("Invalid derivation path: {}", e)))?;

            let derived = XPrv::derive_from_path(seed.as_bytes(), &path)
                .map_err(|e| Error::Wallet(format!("Key derivation error: {}", e)))?;

            SigningKey::from_slice(&derived.to_bytes())
                .map_err(|e| Error::Wallet(format!("Failed to create signing key: {}", e)))
        }
        Secret::PrivateKey(hex_key) => {
            let bytes = hex::decode(hex_key.trim_start_matches("0x"))
                .map_err(|e| Error::Wallet(format!("Invalid private key hex: {}", e)))?;
            SigningKey::from_slice(&bytes)
                .map_err(|e| Error::Wallet(format!("Failed to create signing key: {}", e)))
        }
    }
}

/// Derive the Ethereum address: keccak-256 of the uncompressed public key
/// (without the 0x04 prefix), last 20 bytes.
fn derive_address(key: &SigningKey) -> Result<Address, Error> {
    use k256::elliptic_curve::sec1::ToEncodedPoint;
    use tiny_keccak::{Hasher, Keccak};

    let point = key.verifying_key().to_encoded_point(false);
    let pubkey_bytes = point.as_bytes();
    if pubkey_bytes.len() != 65 || pubkey_bytes[0] != 0x04 {
        return Err(Error::Wallet(
            "Invalid public key format for address derivation".to_string(),
        ));
    }

    let mut hasher = Keccak::v256();
    hasher.update(&pubkey_bytes[1..65]);
    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);

    Ok(Address::from_slice(&hash[12..]))
}
