/// Packed path codec for concentrated-liquidity multi-hop calls
///
/// The router and quoter take multi-hop routes as a packed byte string:
/// `address ‖ uint24 fee ‖ address ‖ uint24 fee ‖ address`, fees big-endian,
/// no padding or length prefix. The layout must match the deployed contracts
/// bit-for-bit. Exact-output paths are encoded in reverse hop order (output
/// token first) per the pools' convention.
use alloy_primitives::Address;

use crate::error::Error;
use crate::trade::fees::FeeTier;

const ADDRESS_LEN: usize = 20;
const FEE_LEN: usize = 3;

/// A hop path of `n` tokens joined by `n - 1` fee tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPath {
    tokens: Vec<Address>,
    fees: Vec<FeeTier>,
}

impl PackedPath {
    pub fn new(tokens: Vec<Address>, fees: Vec<FeeTier>) -> Result<Self, Error> {
        if tokens.len() < 2 || fees.len() + 1 != tokens.len() {
            return Err(Error::Abi(format!(
                "packed path needs n tokens and n-1 fees, got {} and {}",
                tokens.len(),
                fees.len()
            )));
        }
        Ok(Self { tokens, fees })
    }

    /// The standard bridged shape: `token_in -fee- bridge -fee- token_out`.
    pub fn bridged(
        token_in: Address,
        fee_in: FeeTier,
        bridge: Address,
        fee_out: FeeTier,
        token_out: Address,
    ) -> Self {
        Self {
            tokens: vec![token_in, bridge, token_out],
            fees: vec![fee_in, fee_out],
        }
    }

    pub fn tokens(&self) -> &[Address] {
        &self.tokens
    }

    pub fn fees(&self) -> &[FeeTier] {
        &self.fees
    }

    /// Hop order flipped, for exact-output calls.
    pub fn reversed(&self) -> Self {
        let mut tokens = self.tokens.clone();
        let mut fees = self.fees.clone();
        tokens.reverse();
        fees.reverse();
        Self { tokens, fees }
    }

    /// Serialize to the contract wire layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(self.tokens.len() * ADDRESS_LEN + self.fees.len() * FEE_LEN);
        for (i, token) in self.tokens.iter().enumerate() {
            out.extend_from_slice(token.as_slice());
            if let Some(fee) = self.fees.get(i) {
                // uint24, big-endian: the low three bytes of the u32 value.
                out.extend_from_slice(&fee.as_u32().to_be_bytes()[1..4]);
            }
        }
        out
    }

    /// Parse the wire layout back. Rejects byte strings whose length does not
    /// match `n * 20 + (n - 1) * 3` for some `n >= 2`, and fee values outside
    /// the enumerated tier set.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < 2 * ADDRESS_LEN + FEE_LEN
            || (bytes.len() - ADDRESS_LEN) % (ADDRESS_LEN + FEE_LEN) != 0
        {
            return Err(Error::Abi(format!(
                "packed path has invalid length {}",
                bytes.len()
            )));
        }
        let hops = (bytes.len() - ADDRESS_LEN) / (ADDRESS_LEN + FEE_LEN);
        let mut tokens = Vec::with_capacity(hops + 1);
        let mut fees = Vec::with_capacity(hops);
        let mut offset = 0;
        tokens.push(Address::from_slice(&bytes[offset..offset + ADDRESS_LEN]));
        offset += ADDRESS_LEN;
        for _ in 0..hops {
            let fee =
                u32::from_be_bytes([0, bytes[offset], bytes[offset + 1], bytes[offset + 2]]);
            fees.push(FeeTier::try_from(fee).map_err(|_| {
                Error::Abi(format!("packed path has unknown fee tier {fee}"))
            })?);
            offset += FEE_LEN;
            tokens.push(Address::from_slice(&bytes[offset..offset + ADDRESS_LEN]));
            offset += ADDRESS_LEN;
        }
        Self::new(tokens, fees)
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
    fn bridged_path_encodes_to_46_bytes() {
        let path = PackedPath::bridged(DAI, FeeTier::Medium, WETH, FeeTier::Lowest, USDC);
        let encoded = path.encode();
        assert_eq!(encoded.len(), 46);

        // token_in, then the 3000 tier big-endian (0x000bb8).
        assert_eq!(&encoded[0..20], DAI.as_slice());
        assert_eq!(&encoded[20..23], &[0x00, 0x0b, 0xb8]);
        assert_eq!(&encoded[23..43], WETH.as_slice());
        assert_eq!(&encoded[43..46], &[0x00, 0x01, 0xf4]);
    }

    #[test]
    fn encode_decode_round_trips() {
        let path = PackedPath::bridged(DAI, FeeTier::Medium, WETH, FeeTier::Lowest, USDC);
        let decoded = PackedPath::decode(&path.encode()).unwrap();
        assert_eq!(decoded, path);

        let single = PackedPath::new(vec![WETH, DAI], vec![FeeTier::Highest]).unwrap();
        assert_eq!(PackedPath::decode(&single.encode()).unwrap(), single);
    }

    #[test]
    fn reversed_flips_hop_order() {
        let path = PackedPath::bridged(DAI, FeeTier::Medium, WETH, FeeTier::Lowest, USDC);
        let reversed = path.reversed();
        assert_eq!(reversed.tokens(), &[USDC, WETH, DAI]);
        assert_eq!(reversed.fees(), &[FeeTier::Lowest, FeeTier::Medium]);
        assert_eq!(reversed.reversed(), path);
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert!(PackedPath::decode(&[0u8; 45]).is_err());
        assert!(PackedPath::decode(&[0u8; 20]).is_err());

        // Right length, bogus fee value.
        let mut bytes = PackedPath::new(vec![WETH, DAI], vec![FeeTier::Lowest])
            .unwrap()
            .encode();
        bytes[21] = 0xff;
        assert!(PackedPath::decode(&bytes).is_err());
    }

    #[test]
    fn path_shape_is_validated() {
        assert!(PackedPath::new(vec![WETH], vec![]).is_err());
        assert!(PackedPath::new(vec![WETH, DAI], vec![]).is_err());
        assert!(PackedPath::new(vec![WETH, DAI], vec![FeeTier::Lowest, FeeTier::Medium]).is_err());
    }
}
