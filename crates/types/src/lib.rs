//! Shared types for the checkpoint bridge
//!
//! Fixed-length identifiers that every other crate in the workspace speaks:
//! - `Address`: 20-byte validator / proposer address
//! - `Hash32`: 32-byte block, state and transaction hashes
//!
//! Both serialize to `0x`-prefixed lower hex in JSON and to raw bytes in borsh.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of an address in bytes
pub const ADDRESS_LEN: usize = 20;

/// Length of a hash in bytes
pub const HASH_LEN: usize = 32;

/// Errors raised while parsing fixed-length byte values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

fn decode_hex(s: &str) -> Result<Vec<u8>, ParseError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).map_err(|e| ParseError::InvalidHex(e.to_string()))
}

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize,
        )]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Build from a slice, failing if the length is wrong
            pub fn try_from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
                let arr: [u8; $len] = bytes.try_into().map_err(|_| ParseError::InvalidLength {
                    expected: $len,
                    actual: bytes.len(),
                })?;
                Ok(Self(arr))
            }

            /// Raw bytes
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_from_slice(&decode_hex(s)?)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// Validator / proposer address
    Address,
    ADDRESS_LEN
);

fixed_bytes!(
    /// Block, state root or mainchain transaction hash
    Hash32,
    HASH_LEN
);

/// Decode a hex string of any length (optional `0x` prefix).
///
/// Used by the boundary for hash fields whose length is checked later by the
/// checkpoint builders rather than at parse time.
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, ParseError> {
    decode_hex(s.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse_and_display() {
        let addr: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        assert_eq!(addr.0[19], 0xaa);
        assert_eq!(addr.to_string(), "0x00000000000000000000000000000000000000aa");

        let bare: Address = "00000000000000000000000000000000000000aa".parse().unwrap();
        assert_eq!(addr, bare);
    }

    #[test]
    fn test_address_wrong_length() {
        let err = "0xdeadbeef".parse::<Address>().unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidLength {
                expected: ADDRESS_LEN,
                actual: 4
            }
        );
        assert!(matches!(
            "0xzz".parse::<Address>(),
            Err(ParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_hash_zero() {
        assert!(Hash32::default().is_zero());
        assert!(!Hash32([1u8; HASH_LEN]).is_zero());
    }

    #[test]
    fn test_json_is_hex_string() {
        let hash = Hash32([0xab; HASH_LEN]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(HASH_LEN)));

        let back: Hash32 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }

    #[test]
    fn test_address_ordering_is_bytewise() {
        let low = Address([0u8; ADDRESS_LEN]);
        let mut high_bytes = [0u8; ADDRESS_LEN];
        high_bytes[0] = 1;
        assert!(low < Address(high_bytes));
    }

    #[test]
    fn test_parse_hex_bytes_any_length() {
        assert_eq!(parse_hex_bytes("0x0102").unwrap(), vec![1, 2]);
        assert!(parse_hex_bytes("").unwrap().is_empty());
    }
}
