//! Decoder for legacy devnet deployments.
//!
//! Bodies sit under `moveEvent.fields`. Most integers are JSON numbers, a few
//! large ones are decimal strings, and token names are base64 text. List
//! entries are Move structs wrapped as `{ "type": ..., "fields": {...} }`.

use super::{AllowedBorrow, DecodeError, EventDecoder, Fields};
use base64::Engine;
use lending_types::{CollateralItem, DebtItem, ProtocolVersion, ReserveInfo, UserLendingInfo, U256};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDecoder;

fn base64_text(fields: &Fields<'_>, name: &str) -> Result<String, DecodeError> {
	let encoded = fields.str(name)?;
	let bytes = base64::engine::general_purpose::STANDARD
		.decode(encoded)
		.map_err(|e| DecodeError::InvalidValue {
			field: name.to_string(),
			reason: e.to_string(),
		})?;
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Splits a wrapped Move struct into its type tag and fields.
fn wrapped(item: &Value) -> Result<(String, Fields<'_>), DecodeError> {
	let outer = Fields::new(item, "list item")?;
	Ok((outer.str("type")?.to_string(), outer.object("fields")?))
}

fn collateral_item(item: &Value) -> Result<CollateralItem, DecodeError> {
	let (coin_type, fields) = wrapped(item)?;
	Ok(CollateralItem {
		collateral_amount: fields.u256_number("collateral_amount")?,
		collateral_value: fields.u256_number("collateral_value")?,
		coin_type: Some(coin_type),
		token_name: Some(base64_text(&fields, "token_name")?),
		..Default::default()
	})
}

fn debt_item(item: &Value) -> Result<DebtItem, DecodeError> {
	let (coin_type, fields) = wrapped(item)?;
	Ok(DebtItem {
		debt_amount: fields.u256_number("debt_amount")?,
		debt_value: fields.u256_number("debt_value")?,
		coin_type: Some(coin_type),
		token_name: Some(base64_text(&fields, "token_name")?),
		..Default::default()
	})
}

impl EventDecoder for LegacyDecoder {
	fn version(&self) -> ProtocolVersion {
		ProtocolVersion::Legacy
	}

	fn envelope(&self) -> &'static [&'static str] {
		&["moveEvent", "fields"]
	}

	fn dola_token_liquidity(&self, body: &Value) -> Result<U256, DecodeError> {
		Fields::new(body, "event")?.u256_number("token_liquidity")
	}

	fn app_token_liquidity(&self, body: &Value) -> Result<U256, DecodeError> {
		Fields::new(body, "event")?.u256_string("token_liquidity")
	}

	fn user_token_debt(&self, body: &Value) -> Result<(U256, U256), DecodeError> {
		let fields = Fields::new(body, "event")?;
		Ok((
			fields.u256_number("debt_amount")?,
			fields.u256_number("debt_value")?,
		))
	}

	fn user_collateral(&self, body: &Value) -> Result<CollateralItem, DecodeError> {
		let fields = Fields::new(body, "event")?;
		Ok(CollateralItem {
			collateral_amount: fields.u256_number("collateral_amount")?,
			collateral_value: fields.u256_number("collateral_value")?,
			..Default::default()
		})
	}

	fn reserve_info(&self, body: &Value) -> Result<ReserveInfo, DecodeError> {
		let fields = Fields::new(body, "event")?;
		Ok(ReserveInfo {
			borrow_apy: fields.u64_number("borrow_apy")?,
			debt: fields.u256_string("debt")?,
			reserve: fields.u256_string("reserve")?,
			supply_apy: fields.u64_number("supply_apy")?,
			utilization_rate: fields.u64_number("utilization_rate")?,
			token_name: Some(format!("0x{}", base64_text(&fields, "token_name")?)),
			..Default::default()
		})
	}

	fn user_allowed_borrow(&self, body: &Value) -> Result<AllowedBorrow, DecodeError> {
		let fields = Fields::new(body, "event")?;
		let amount = fields.u256_number("borrow_amount")?;
		Ok(AllowedBorrow::from_parts(amount, fields.opt_str("reason")?))
	}

	fn user_lending_info(&self, body: &Value) -> Result<UserLendingInfo, DecodeError> {
		let fields = Fields::new(body, "event")?;
		Ok(UserLendingInfo {
			total_collateral_value: fields.u256_number("total_collateral_value")?,
			total_debt_value: fields.u256_number("total_debt_value")?,
			collateral_infos: fields
				.list_or_blank("collateral_infos")?
				.iter()
				.map(collateral_item)
				.collect::<Result<_, _>>()?,
			debt_infos: fields
				.list_or_blank("debt_infos")?
				.iter()
				.map(debt_item)
				.collect::<Result<_, _>>()?,
			..Default::default()
		})
	}
}
