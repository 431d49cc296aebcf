//! Shared domain types: identifiers, collections, and drops.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute name → allowed values.
pub type Attributes = BTreeMap<String, Vec<String>>;

// ============================================================================
// Identifiers
// ============================================================================

/// On-chain object identifier (`0x` + up to 64 hex digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Wrap a string without validation (values reported by the chain).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse and validate a user- or configuration-supplied identifier.
    pub fn parse(id: &str) -> Result<Self, String> {
        validate_hex_id(id)?;
        Ok(Self(id.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account address. Same textual shape as [`ObjectId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn parse(address: &str) -> Result<Self, String> {
        validate_hex_id(address)?;
        Ok(Self(address.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 32-byte big-endian form, left-padded as Move addresses are.
    pub fn to_bytes(&self) -> Result<[u8; 32], String> {
        let digits = self.0.strip_prefix("0x").unwrap_or(&self.0);
        if digits.is_empty() || digits.len() > 64 {
            return Err(format!(
                "'{}' must have between 1 and 64 hex digits, got {}",
                self.0,
                digits.len()
            ));
        }
        let padded = format!("{:0>64}", digits);
        let bytes = hex::decode(&padded).map_err(|e| format!("invalid address hex: {}", e))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(out)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction digest as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxDigest(String);

impl TxDigest {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_hex_id(value: &str) -> Result<(), String> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| format!("'{}' must start with 0x", value))?;

    if digits.is_empty() || digits.len() > 64 {
        return Err(format!(
            "'{}' must have between 1 and 64 hex digits, got {}",
            value,
            digits.len()
        ));
    }

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("'{}' contains non-hex characters", value));
    }

    Ok(())
}

// ============================================================================
// Collection
// ============================================================================

/// A named, attribute-typed series with a bounded supply and minting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Assigned by the chain; `None` until creation succeeds.
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Attributes,
    pub flags: u16,
    pub max_supply: u64,
    /// Milliseconds since the Unix epoch.
    pub mint_start_time: u64,
    /// Milliseconds since the Unix epoch.
    pub mint_stop_time: u64,
}

impl Collection {
    /// Whether `timestamp_ms` falls inside the minting window (inclusive).
    pub fn is_minting_open(&self, timestamp_ms: u64) -> bool {
        (self.mint_start_time..=self.mint_stop_time).contains(&timestamp_ms)
    }
}

// ============================================================================
// Drop
// ============================================================================

/// A single minted collectible belonging to a [`Collection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drop {
    pub id: ObjectId,
    pub collection_id: ObjectId,
    /// Assigned by the chain program, strictly increasing per collection.
    pub sequence_number: u64,
    pub mint_timestamp: u64,
    pub randomness: Option<u64>,
    pub attributes: Attributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_accepts_short_and_full_forms() {
        assert!(ObjectId::parse("0x6").is_ok());
        assert!(ObjectId::parse(&format!("0x{}", "aB".repeat(32))).is_ok());
    }

    #[test]
    fn object_id_rejects_malformed_values() {
        assert!(ObjectId::parse("").is_err());
        assert!(ObjectId::parse("0x").is_err());
        assert!(ObjectId::parse("deadbeef").is_err());
        assert!(ObjectId::parse("0xnothex").is_err());
        assert!(ObjectId::parse(&format!("0x{}", "a".repeat(65))).is_err());
    }

    #[test]
    fn object_id_is_normalized_to_lowercase() {
        let id = ObjectId::parse("0xABCDEF").unwrap();
        assert_eq!(id.as_str(), "0xabcdef");
    }

    #[test]
    fn address_bytes_are_left_padded() {
        let bytes = Address::parse("0x2").unwrap().to_bytes().unwrap();
        assert_eq!(bytes[31], 2);
        assert!(bytes[..31].iter().all(|b| *b == 0));
    }

    #[test]
    fn oversized_unvalidated_address_is_an_error() {
        let address = Address::new(format!("0x{}", "1".repeat(66)));
        assert!(address.to_bytes().is_err());
        assert!(Address::new("0x").to_bytes().is_err());
        assert!(Address::new("0xzz").to_bytes().is_err());
    }

    #[test]
    fn minting_window_is_inclusive() {
        let collection = Collection {
            id: None,
            name: "Harbor".to_string(),
            description: String::new(),
            image: String::new(),
            attributes: Attributes::new(),
            flags: 0,
            max_supply: 10,
            mint_start_time: 100,
            mint_stop_time: 200,
        };

        assert!(!collection.is_minting_open(99));
        assert!(collection.is_minting_open(100));
        assert!(collection.is_minting_open(200));
        assert!(!collection.is_minting_open(201));
    }
}
