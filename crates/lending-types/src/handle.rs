//! Hex handles for Sui objects and accounts.
//!
//! Object ids, package ids and account addresses share one representation on
//! Sui: a fixed-length byte string written as hex. Legacy devnet deployments
//! used 20-byte ids, current networks use 32 bytes. Parsing is the only way to
//! obtain a handle, so holding one means the source string was well formed.

use crate::utils::without_0x_prefix;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing a handle from hex.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
	#[error("Empty hex string")]
	Empty,
	#[error("Invalid hex format: {0}")]
	InvalidHex(String),
	#[error("Invalid handle length: expected 20 or 32 bytes, got {0}")]
	InvalidLength(usize),
}

/// Validated on-chain object id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(Vec<u8>);

/// Sui account addresses use the object id encoding.
pub type SuiAddress = ObjectId;

impl ObjectId {
	/// Byte length of ids on legacy devnet deployments.
	pub const LEGACY_LENGTH: usize = 20;
	/// Byte length of ids on current networks.
	pub const LENGTH: usize = 32;

	/// Parses a handle from a hex string with an optional `0x` prefix.
	pub fn from_hex(hex_str: &str) -> Result<Self, HandleError> {
		let digits = without_0x_prefix(hex_str.trim());
		if digits.is_empty() {
			return Err(HandleError::Empty);
		}
		let bytes = hex::decode(digits).map_err(|e| HandleError::InvalidHex(e.to_string()))?;
		Self::from_bytes(&bytes)
	}

	/// Builds a handle from raw bytes.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, HandleError> {
		match bytes.len() {
			Self::LEGACY_LENGTH | Self::LENGTH => Ok(Self(bytes.to_vec())),
			other => Err(HandleError::InvalidLength(other)),
		}
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Lowercase hex with `0x` prefix.
	pub fn to_hex(&self) -> String {
		format!("0x{}", hex::encode(&self.0))
	}
}

impl fmt::Display for ObjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl FromStr for ObjectId {
	type Err = HandleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_hex(s)
	}
}

impl Serialize for ObjectId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_hex())
	}
}

impl<'de> Deserialize<'de> for ObjectId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		Self::from_hex(&s).map_err(serde::de::Error::custom)
	}
}
