//! Serializes big integers as decimal strings.
//!
//! JSON consumers lose precision past 2^53, so every `U256` leaving the crate
//! is written as a base-10 string. Use with `#[serde(with = "decimal")]` or
//! `#[serde(with = "decimal::option")]`.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serializer};

/// Parses a base-10 literal; radix prefixes and `_` separators are rejected.
pub fn parse(text: &str) -> Result<U256, String> {
	if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
		return Err(format!("'{}' is not a decimal integer", text));
	}
	U256::from_str_radix(text, 10).map_err(|e| format!("'{}': {}", text, e))
}

pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
	let s = String::deserialize(deserializer)?;
	parse(&s).map_err(serde::de::Error::custom)
}

pub mod option {
	use super::*;

	pub fn serialize<S: Serializer>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error> {
		match value {
			Some(v) => serializer.serialize_some(&v.to_string()),
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<Option<U256>, D::Error> {
		Option::<String>::deserialize(deserializer)?
			.map(|s| parse(&s).map_err(serde::de::Error::custom))
			.transpose()
	}
}
