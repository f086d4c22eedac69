//! Versioned decoders for query result events.
//!
//! Each interface function emits one event whose body carries the query's
//! return value. The body's envelope and the JSON encoding of its integers
//! changed between deployment generations, so decoding goes through an
//! [`EventDecoder`] picked by protocol version. Decoders are stateless; the
//! same payload always decodes to the same value.

use lending_types::{
	CollateralItem, DolaTokenPrice, DolaUserAddress, PoolInfo, ProtocolVersion, ReserveInfo,
	UserLendingInfo, U256,
};
use lending_types::utils::decimal;
use serde_json::{Map, Value};
use thiserror::Error;

mod current;
mod legacy;

pub use current::CurrentDecoder;
pub use legacy::LegacyDecoder;

/// Errors produced while decoding an event body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
	#[error("missing field '{0}'")]
	MissingField(String),
	#[error("field '{field}' is not {expected}")]
	InvalidType {
		field: String,
		expected: &'static str,
	},
	#[error("field '{field}' has an invalid value: {reason}")]
	InvalidValue { field: String, reason: String },
	#[error("{0} events cannot be decoded by this protocol version")]
	Unsupported(&'static str),
}

/// Outcome of an allowed-borrow query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedBorrow {
	Amount(U256),
	/// Zero amount with the protocol's explanation.
	Rejected(String),
}

impl AllowedBorrow {
	pub(crate) fn from_parts(amount: U256, reason: Option<&str>) -> Self {
		match reason {
			Some(reason) if amount.is_zero() && !reason.is_empty() => {
				AllowedBorrow::Rejected(reason.to_string())
			},
			_ => AllowedBorrow::Amount(amount),
		}
	}
}

/// Decodes the bodies of query result events.
///
/// Every method receives the body already taken out of its envelope by
/// [`EventDecoder::body`]. Queries a version never answers keep the default
/// implementation, which reports the event as unsupported.
pub trait EventDecoder: Send + Sync {
	fn version(&self) -> ProtocolVersion;

	/// Field name wrapping the body, as a JSON path.
	fn envelope(&self) -> &'static [&'static str];

	/// Takes the body out of its envelope.
	///
	/// Objects without the envelope are returned unchanged, so canned bodies
	/// decode the same as node responses.
	fn body<'a>(&self, event: &'a Value) -> &'a Value {
		let mut current = event;
		for key in self.envelope() {
			match current.get(key) {
				Some(inner) => current = inner,
				None => return event,
			}
		}
		current
	}

	fn dola_token_liquidity(&self, body: &Value) -> Result<U256, DecodeError>;

	fn app_token_liquidity(&self, body: &Value) -> Result<U256, DecodeError>;

	fn pool_liquidity(&self, _body: &Value) -> Result<U256, DecodeError> {
		Err(DecodeError::Unsupported("pool liquidity"))
	}

	fn all_pool_liquidity(&self, _body: &Value) -> Result<Vec<PoolInfo>, DecodeError> {
		Err(DecodeError::Unsupported("all pool liquidity"))
	}

	/// Debt amount and value.
	fn user_token_debt(&self, body: &Value) -> Result<(U256, U256), DecodeError>;

	fn user_collateral(&self, body: &Value) -> Result<CollateralItem, DecodeError>;

	fn reserve_info(&self, body: &Value) -> Result<ReserveInfo, DecodeError>;

	fn all_reserve_info(&self, _body: &Value) -> Result<Vec<ReserveInfo>, DecodeError> {
		Err(DecodeError::Unsupported("all reserve info"))
	}

	fn user_allowed_borrow(&self, body: &Value) -> Result<AllowedBorrow, DecodeError>;

	fn user_lending_info(&self, body: &Value) -> Result<UserLendingInfo, DecodeError>;

	fn oracle_price(&self, _body: &Value) -> Result<DolaTokenPrice, DecodeError> {
		Err(DecodeError::Unsupported("oracle price"))
	}

	fn all_oracle_price(&self, _body: &Value) -> Result<Vec<DolaTokenPrice>, DecodeError> {
		Err(DecodeError::Unsupported("all oracle price"))
	}

	fn dola_user_id(&self, _body: &Value) -> Result<String, DecodeError> {
		Err(DecodeError::Unsupported("dola user id"))
	}

	fn dola_user_addresses(&self, _body: &Value) -> Result<Vec<DolaUserAddress>, DecodeError> {
		Err(DecodeError::Unsupported("dola user addresses"))
	}

	fn user_health_factor(&self, _body: &Value) -> Result<U256, DecodeError> {
		Err(DecodeError::Unsupported("health factor"))
	}
}

static LEGACY: LegacyDecoder = LegacyDecoder;
static CURRENT: CurrentDecoder = CurrentDecoder;

/// The decoder for a protocol version.
pub fn decoder(version: ProtocolVersion) -> &'static dyn EventDecoder {
	match version {
		ProtocolVersion::Legacy => &LEGACY,
		ProtocolVersion::Current => &CURRENT,
	}
}

/// Renders a pool or user address from its bytes.
///
/// Chains 0 and 1 store addresses as UTF-8 text, which may itself carry a
/// `0x` prefix; text that is not valid UTF-8 is an error. Every other chain
/// stores raw bytes, rendered as hex.
pub fn decode_dola_address(dola_chain_id: u16, bytes: &[u8]) -> Result<String, DecodeError> {
	match dola_chain_id {
		0 | 1 => {
			let text = std::str::from_utf8(bytes).map_err(|e| DecodeError::InvalidValue {
				field: "dola_address".to_string(),
				reason: e.to_string(),
			})?;
			Ok(format!("0x{}", text.strip_prefix("0x").unwrap_or(text)))
		},
		_ => Ok(format!("0x{}", hex::encode(bytes))),
	}
}

/// Largest integer a JSON double holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Typed access to the fields of one JSON object.
///
/// Accessors name the field in every error so a schema mismatch points at
/// the offending key.
#[derive(Clone, Copy)]
pub(crate) struct Fields<'a> {
	map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
	pub(crate) fn new(value: &'a Value, what: &str) -> Result<Self, DecodeError> {
		value
			.as_object()
			.map(|map| Self { map })
			.ok_or_else(|| DecodeError::InvalidType {
				field: what.to_string(),
				expected: "an object",
			})
	}

	pub(crate) fn get(&self, name: &str) -> Result<&'a Value, DecodeError> {
		self.map
			.get(name)
			.ok_or_else(|| DecodeError::MissingField(name.to_string()))
	}

	pub(crate) fn opt(&self, name: &str) -> Option<&'a Value> {
		self.map.get(name).filter(|v| !v.is_null())
	}

	pub(crate) fn object(&self, name: &str) -> Result<Fields<'a>, DecodeError> {
		Fields::new(self.get(name)?, name)
	}

	pub(crate) fn str(&self, name: &str) -> Result<&'a str, DecodeError> {
		self.get(name)?.as_str().ok_or_else(|| invalid_type(name, "a string"))
	}

	/// A string that may be absent or null.
	pub(crate) fn opt_str(&self, name: &str) -> Result<Option<&'a str>, DecodeError> {
		self.opt(name)
			.map(|v| v.as_str().ok_or_else(|| invalid_type(name, "a string")))
			.transpose()
	}

	pub(crate) fn bool(&self, name: &str) -> Result<bool, DecodeError> {
		self.get(name)?.as_bool().ok_or_else(|| invalid_type(name, "a boolean"))
	}

	/// Integer carried as a JSON number.
	pub(crate) fn u64_number(&self, name: &str) -> Result<u64, DecodeError> {
		number_to_u64(self.get(name)?).ok_or_else(|| invalid_type(name, "a non-negative integer"))
	}

	pub(crate) fn u16_number(&self, name: &str) -> Result<u16, DecodeError> {
		let value = self.u64_number(name)?;
		u16::try_from(value).map_err(|_| out_of_range(name, value))
	}

	pub(crate) fn u8_number(&self, name: &str) -> Result<u8, DecodeError> {
		let value = self.u64_number(name)?;
		u8::try_from(value).map_err(|_| out_of_range(name, value))
	}

	pub(crate) fn u256_number(&self, name: &str) -> Result<U256, DecodeError> {
		self.u64_number(name).map(U256::from)
	}

	/// Integer carried as a decimal string.
	pub(crate) fn u256_string(&self, name: &str) -> Result<U256, DecodeError> {
		parse_u256(name, self.str(name)?)
	}

	pub(crate) fn u64_string(&self, name: &str) -> Result<u64, DecodeError> {
		let text = self.str(name)?;
		text.parse::<u64>().map_err(|e| DecodeError::InvalidValue {
			field: name.to_string(),
			reason: format!("'{}': {}", text, e),
		})
	}

	pub(crate) fn list(&self, name: &str) -> Result<&'a [Value], DecodeError> {
		self.get(name)?
			.as_array()
			.map(Vec::as_slice)
			.ok_or_else(|| invalid_type(name, "a list"))
	}

	/// A list the contract writes as `""` when it is empty.
	pub(crate) fn list_or_blank(&self, name: &str) -> Result<&'a [Value], DecodeError> {
		match self.get(name)? {
			Value::String(s) if s.is_empty() => Ok(&[]),
			_ => self.list(name),
		}
	}

	/// `vector<u8>` carried as a list of numbers.
	pub(crate) fn bytes(&self, name: &str) -> Result<Vec<u8>, DecodeError> {
		self.list(name)?
			.iter()
			.map(|item| {
				number_to_u64(item)
					.and_then(|n| u8::try_from(n).ok())
					.ok_or_else(|| invalid_type(name, "a list of bytes"))
			})
			.collect()
	}
}

fn number_to_u64(value: &Value) -> Option<u64> {
	if let Some(n) = value.as_u64() {
		return Some(n);
	}
	let f = value.as_f64()?;
	if f.fract() == 0.0 && (0.0..=MAX_SAFE_INTEGER).contains(&f) {
		Some(f as u64)
	} else {
		None
	}
}

/// Parses a plain decimal literal. Radix prefixes, signs and separators are
/// rejected.
pub(crate) fn parse_u256(name: &str, text: &str) -> Result<U256, DecodeError> {
	decimal::parse(text).map_err(|reason| DecodeError::InvalidValue {
		field: name.to_string(),
		reason,
	})
}

fn invalid_type(name: &str, expected: &'static str) -> DecodeError {
	DecodeError::InvalidType {
		field: name.to_string(),
		expected,
	}
}

fn out_of_range(name: &str, value: u64) -> DecodeError {
	DecodeError::InvalidValue {
		field: name.to_string(),
		reason: format!("{} is out of range", value),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_dola_address_text_and_binary() {
		let bytes = [0x30, 0x78, 0x31, 0x32, 0x33];
		assert_eq!(decode_dola_address(0, &bytes).unwrap(), "0x123");
		assert_eq!(decode_dola_address(1, b"abc").unwrap(), "0xabc");
		assert_eq!(decode_dola_address(2, &bytes).unwrap(), "0x3078313233");
		assert_eq!(decode_dola_address(2, &[]).unwrap(), "0x");
	}

	#[test]
	fn test_dola_address_rejects_invalid_text() {
		let bytes = [0x30, 0x78, 0xff, 0xfe];
		assert!(matches!(
			decode_dola_address(0, &bytes),
			Err(DecodeError::InvalidValue { .. })
		));
		// Binary chains take any bytes.
		assert_eq!(decode_dola_address(5, &bytes).unwrap(), "0x3078fffe");
	}

	#[test]
	fn test_number_accessors() {
		let body = json!({
			"int": 5,
			"float": 1.0,
			"fraction": 1.5,
			"negative": -1,
			"huge": 1e300,
			"wide": 70000
		});
		let fields = Fields::new(&body, "body").unwrap();
		assert_eq!(fields.u64_number("int").unwrap(), 5);
		assert_eq!(fields.u16_number("float").unwrap(), 1);
		assert!(fields.u64_number("fraction").is_err());
		assert!(fields.u64_number("negative").is_err());
		assert!(fields.u64_number("huge").is_err());
		assert!(matches!(
			fields.u16_number("wide"),
			Err(DecodeError::InvalidValue { .. })
		));
		assert_eq!(
			fields.u64_number("absent"),
			Err(DecodeError::MissingField("absent".to_string()))
		);
	}

	#[test]
	fn test_string_accessors() {
		let body = json!({
			"amount": "115792089237316195423570985008687907853269984665640564039457584007913129639935",
			"bad": "12a",
			"number": 12
		});
		let fields = Fields::new(&body, "body").unwrap();
		assert_eq!(fields.u256_string("amount").unwrap(), U256::MAX);
		assert!(matches!(
			fields.u256_string("bad"),
			Err(DecodeError::InvalidValue { .. })
		));
		assert!(matches!(
			fields.u256_string("number"),
			Err(DecodeError::InvalidType { .. })
		));
	}

	#[test]
	fn test_decimal_strings_only() {
		let body = json!({
			"hex": "0x10",
			"bin": "0b11",
			"oct": "0o7",
			"under": "1_000",
			"signed": "+5",
			"empty": "",
			"overflow": "115792089237316195423570985008687907853269984665640564039457584007913129639936"
		});
		let fields = Fields::new(&body, "body").unwrap();
		for name in ["hex", "bin", "oct", "under", "signed", "empty", "overflow"] {
			assert!(
				matches!(fields.u256_string(name), Err(DecodeError::InvalidValue { .. })),
				"{name} should be rejected"
			);
		}
		assert_eq!(parse_u256("zeros", "007").unwrap(), U256::from(7u64));
	}

	#[test]
	fn test_blank_list_and_bytes() {
		let body = json!({ "blank": "", "items": [1, 2], "raw": [0, 255], "big": [256] });
		let fields = Fields::new(&body, "body").unwrap();
		assert!(fields.list_or_blank("blank").unwrap().is_empty());
		assert_eq!(fields.list_or_blank("items").unwrap().len(), 2);
		assert_eq!(fields.bytes("raw").unwrap(), vec![0, 255]);
		assert!(fields.bytes("big").is_err());
		assert!(Fields::new(&json!([1]), "body").is_err());
	}

	#[test]
	fn test_allowed_borrow_rejection() {
		assert_eq!(
			AllowedBorrow::from_parts(U256::ZERO, Some("not enough collateral")),
			AllowedBorrow::Rejected("not enough collateral".to_string())
		);
		assert_eq!(
			AllowedBorrow::from_parts(U256::ZERO, Some("")),
			AllowedBorrow::Amount(U256::ZERO)
		);
		assert_eq!(
			AllowedBorrow::from_parts(U256::from(5u64), Some("ignored")),
			AllowedBorrow::Amount(U256::from(5u64))
		);
	}

	#[test]
	fn test_body_envelopes() {
		let legacy = json!({ "moveEvent": { "fields": { "a": 1 } } });
		let current = json!({ "parsedJson": { "a": 1 } });
		let bare = json!({ "a": 1 });

		for version in [ProtocolVersion::Legacy, ProtocolVersion::Current] {
			assert_eq!(decoder(version).version(), version);
		}

		assert_eq!(decoder(ProtocolVersion::Legacy).body(&legacy), &json!({ "a": 1 }));
		assert_eq!(decoder(ProtocolVersion::Current).body(&current), &json!({ "a": 1 }));
		assert_eq!(decoder(ProtocolVersion::Current).body(&bare), &bare);
		// A partial envelope is treated as a bare body.
		let partial = json!({ "moveEvent": { "a": 1 } });
		assert_eq!(decoder(ProtocolVersion::Legacy).body(&partial), &partial);
	}
}
