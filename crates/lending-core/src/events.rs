//! Parsers for the events lending transactions emit.
//!
//! These are the events an indexer sees for committed transactions, in the
//! node's `SuiEvent` layout with the body under `parsedJson`. `u64` fields
//! arrive as decimal strings, smaller integers as numbers and byte vectors as
//! lists of numbers.

use crate::decoder::{parse_u256, DecodeError, Fields};
use lending_types::utils::decimal;
use lending_types::U256;
use serde::Serialize;
use serde_json::Value;

/// Lending action recorded in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
	Supply = 0,
	Withdraw = 1,
	Borrow = 2,
	Repay = 3,
	Liquidate = 4,
	Binding = 5,
	Unbinding = 6,
}

impl TryFrom<u64> for CallType {
	type Error = DecodeError;

	fn try_from(value: u64) -> Result<Self, Self::Error> {
		Ok(match value {
			0 => CallType::Supply,
			1 => CallType::Withdraw,
			2 => CallType::Borrow,
			3 => CallType::Repay,
			4 => CallType::Liquidate,
			5 => CallType::Binding,
			6 => CallType::Unbinding,
			other => {
				return Err(DecodeError::InvalidValue {
					field: "call_type".to_string(),
					reason: format!("unknown call type {}", other),
				})
			},
		})
	}
}

/// Envelope fields shared by every Move event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveEventHeader {
	pub tx_digest: String,
	pub event_seq: u64,
	pub package_id: String,
	pub transaction_module: String,
	pub sender: String,
	pub event_type: String,
	pub bcs: Option<String>,
	/// Missing on events from simulated transactions.
	pub timestamp_ms: Option<u64>,
}

/// Integer the node writes either as a number or a decimal string.
fn flexible_u64(fields: &Fields<'_>, name: &str) -> Result<u64, DecodeError> {
	match fields.get(name)? {
		Value::String(_) => fields.u64_string(name),
		_ => fields.u64_number(name),
	}
}

impl MoveEventHeader {
	pub fn parse(event: &Value) -> Result<Self, DecodeError> {
		let fields = Fields::new(event, "event")?;
		let id = fields.object("id")?;
		Ok(Self {
			tx_digest: id.str("txDigest")?.to_string(),
			event_seq: flexible_u64(&id, "eventSeq")?,
			package_id: fields.str("packageId")?.to_string(),
			transaction_module: fields.str("transactionModule")?.to_string(),
			sender: fields.str("sender")?.to_string(),
			event_type: fields.str("type")?.to_string(),
			bcs: fields.opt_str("bcs")?.map(str::to_string),
			timestamp_ms: match fields.opt("timestampMs") {
				Some(_) => Some(flexible_u64(&fields, "timestampMs")?),
				None => None,
			},
		})
	}
}

/// Splits an event into its header and body fields.
fn split(event: &Value) -> Result<(MoveEventHeader, Fields<'_>), DecodeError> {
	let header = MoveEventHeader::parse(event)?;
	let body = Fields::new(event, "event")?.object("parsedJson")?;
	Ok((header, body))
}

fn call_type(fields: &Fields<'_>) -> Result<CallType, DecodeError> {
	CallType::try_from(fields.u64_number("call_type")?)
}

/// Supply, withdraw, borrow or repay settled on Sui itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalLendingEvent {
	pub header: MoveEventHeader,
	pub nonce: u64,
	pub sender: String,
	pub dola_pool_address: Vec<u8>,
	pub amount: u64,
	pub call_type: CallType,
}

impl LocalLendingEvent {
	pub fn parse(event: &Value) -> Result<Self, DecodeError> {
		let (header, fields) = split(event)?;
		Ok(Self {
			header,
			nonce: fields.u64_string("nonce")?,
			sender: fields.str("sender")?.to_string(),
			dola_pool_address: fields.bytes("dola_pool_address")?,
			amount: fields.u64_string("amount")?,
			call_type: call_type(&fields)?,
		})
	}
}

/// Remote withdraw or borrow requested from Sui.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LendingPortalEvent {
	pub header: MoveEventHeader,
	pub nonce: u64,
	pub sender: String,
	pub dola_pool_address: Vec<u8>,
	pub source_chain_id: u16,
	pub dst_chain_id: u16,
	pub receiver: Vec<u8>,
	pub amount: u64,
	pub call_type: CallType,
}

impl LendingPortalEvent {
	pub fn parse(event: &Value) -> Result<Self, DecodeError> {
		let (header, fields) = split(event)?;
		Ok(Self {
			header,
			nonce: fields.u64_string("nonce")?,
			sender: fields.str("sender")?.to_string(),
			dola_pool_address: fields.bytes("dola_pool_address")?,
			source_chain_id: fields.u16_number("source_chain_id")?,
			dst_chain_id: fields.u16_number("dst_chain_id")?,
			receiver: fields.bytes("receiver")?,
			amount: fields.u64_string("amount")?,
			call_type: call_type(&fields)?,
		})
	}
}

/// Lending message relayed to the core from another chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LendingCoreEvent {
	pub header: MoveEventHeader,
	pub nonce: u64,
	pub sender_user_id: u64,
	pub source_chain_id: u16,
	pub dst_chain_id: u16,
	pub dola_pool_id: u16,
	pub receiver: Vec<u8>,
	pub amount: u64,
	pub liquidate_user_id: u64,
	pub call_type: CallType,
}

impl LendingCoreEvent {
	pub fn parse(event: &Value) -> Result<Self, DecodeError> {
		let (header, fields) = split(event)?;
		Ok(Self {
			header,
			nonce: fields.u64_string("nonce")?,
			sender_user_id: fields.u64_string("sender_user_id")?,
			source_chain_id: fields.u16_number("source_chain_id")?,
			dst_chain_id: fields.u16_number("dst_chain_id")?,
			dola_pool_id: fields.u16_number("dola_pool_id")?,
			receiver: fields.bytes("receiver")?,
			amount: fields.u64_string("amount")?,
			liquidate_user_id: fields.u64_string("liquidate_user_id")?,
			call_type: call_type(&fields)?,
		})
	}
}

/// Core-side execution of a lending action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LendingCoreExecuteEvent {
	pub header: MoveEventHeader,
	pub user_id: u64,
	/// The core computes in u256.
	#[serde(with = "decimal")]
	pub amount: U256,
	pub pool_id: u16,
	pub violator_id: u64,
	pub call_type: CallType,
}

impl LendingCoreExecuteEvent {
	pub fn parse(event: &Value) -> Result<Self, DecodeError> {
		let (header, fields) = split(event)?;
		Ok(Self {
			header,
			user_id: fields.u64_string("user_id")?,
			amount: parse_u256("amount", fields.str("amount")?)?,
			pool_id: fields.u16_number("pool_id")?,
			violator_id: fields.u64_string("violator_id")?,
			call_type: call_type(&fields)?,
		})
	}
}
