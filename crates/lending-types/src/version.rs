//! Protocol schema versions.
//!
//! The lending contracts have been redeployed several times while the Sui SDK
//! moved its types around. Each deployment generation fixes the entry point
//! signatures, the amount encoding and the shape of emitted events.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment generation of the lending protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVersion {
	/// Devnet contracts with 20-byte ids, `moveEvent.fields` envelopes and
	/// numeric amounts. Queries are keyed by coin type name and Sui address.
	Legacy,
	/// Contracts keyed by dola pool id and dola user id, flat `parsedJson`
	/// events and decimal-string amounts.
	#[default]
	Current,
}

impl ProtocolVersion {
	pub fn as_str(&self) -> &'static str {
		match self {
			ProtocolVersion::Legacy => "legacy",
			ProtocolVersion::Current => "current",
		}
	}
}

impl fmt::Display for ProtocolVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ProtocolVersion {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"legacy" | "v1" => Ok(ProtocolVersion::Legacy),
			"current" | "v2" => Ok(ProtocolVersion::Current),
			other => Err(format!("Unknown protocol version '{}'", other)),
		}
	}
}
