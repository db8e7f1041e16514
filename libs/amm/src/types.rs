//! Identifiers and numeric types shared by every pool component
//!
//! Amounts are `u128` raw ledger units. Products of two amounts can exceed
//! 128 bits, so every intermediate product in pricing and share math is
//! widened to [`U256`] before multiplying.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer for overflow-free intermediate products.
    pub struct U256(4);
}

/// Raw ledger amount of either asset, or a share count.
pub type Amount = u128;

/// 20-byte account address, rendered as `0x`-prefixed hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

/// Address parsing failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AddressParseError {
    #[error("Invalid hex in address '{input}': {reason}")]
    InvalidHex { input: String, reason: String },

    #[error("Address must be 20 bytes, got {got}")]
    WrongLength { got: usize },
}

impl Address {
    /// The all-zero address, never a valid pool or token address
    pub const ZERO: Self = Self([0u8; 20]);

    /// Build an address whose last byte is `tag`; convenient for fixtures
    pub const fn from_low_byte(tag: u8) -> Self {
        let mut bytes = [0u8; 20];
        bytes[19] = tag;
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| AddressParseError::InvalidHex {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let array: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressParseError::WrongLength { got: bytes.len() })?;
        Ok(Self(array))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An asset the ledger tracks balances for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    /// Native asset, attached by value to pool calls
    Base,
    /// Token asset identified by its contract address; pulls need an allowance
    Token(Address),
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Base => f.write_str("base"),
            Asset::Token(addr) => write!(f, "token:{}", addr),
        }
    }
}
