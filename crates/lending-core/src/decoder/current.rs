//! Decoder for current deployments.
//!
//! Bodies are the flat `parsedJson` object. Amounts, values, rates and
//! coefficients are decimal strings; pool ids, chain ids and decimals are JSON
//! numbers.

use super::{decode_dola_address, AllowedBorrow, DecodeError, EventDecoder, Fields};
use lending_types::{
	CollateralItem, DebtItem, DolaTokenPrice, DolaUserAddress, PoolInfo, ProtocolVersion,
	ReserveInfo, UserLendingInfo, U256,
};
use serde_json::Value;

/// Chain id used to render user addresses, which are always raw bytes.
const BINARY_ADDRESS_CHAIN: u16 = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentDecoder;

fn apy(fields: &Fields<'_>, name: &str) -> Result<u64, DecodeError> {
	fields.u64_string(name)
}

fn pool_info(item: &Value) -> Result<PoolInfo, DecodeError> {
	let fields = Fields::new(item, "pool info")?;
	let address = fields.object("pool_address")?;
	let dola_chain_id = address.u16_number("dola_chain_id")?;
	Ok(PoolInfo {
		pool_liquidity: fields.u256_string("pool_liquidity")?,
		dola_chain_id,
		dola_address: decode_dola_address(dola_chain_id, &address.bytes("dola_address")?)?,
		// Each read from its own key; older clients had fee and weight crossed.
		pool_equilibrium_fee: fields.u256_string("pool_equilibrium_fee")?,
		pool_weight: fields.u256_string("pool_weight")?,
	})
}

fn reserve_info(item: &Value) -> Result<ReserveInfo, DecodeError> {
	let fields = Fields::new(item, "reserve info")?;
	let optional = |name: &str| -> Result<Option<U256>, DecodeError> {
		match fields.opt(name) {
			Some(_) => fields.u256_string(name).map(Some),
			None => Ok(None),
		}
	};
	let pools = match fields.opt("pools") {
		Some(_) => collect(fields.list("pools")?, pool_info)?,
		None => Vec::new(),
	};

	Ok(ReserveInfo {
		borrow_apy: apy(&fields, "borrow_apy")?,
		borrow_coefficient: optional("borrow_coefficient")?,
		collateral_coefficient: optional("collateral_coefficient")?,
		debt: fields.u256_string("debt")?,
		reserve: fields.u256_string("reserve")?,
		supply_apy: apy(&fields, "supply_apy")?,
		utilization_rate: apy(&fields, "utilization_rate")?,
		dola_pool_id: Some(fields.u16_number("dola_pool_id")?),
		token_name: None,
		pools,
	})
}

fn collateral_item(item: &Value) -> Result<CollateralItem, DecodeError> {
	let fields = Fields::new(item, "collateral item")?;
	Ok(CollateralItem {
		collateral_amount: fields.u256_string("collateral_amount")?,
		collateral_value: fields.u256_string("collateral_value")?,
		dola_pool_id: Some(fields.u16_number("dola_pool_id")?),
		borrow_apy: Some(apy(&fields, "borrow_apy")?),
		supply_apy: Some(apy(&fields, "supply_apy")?),
		coin_type: None,
		token_name: None,
	})
}

fn debt_item(item: &Value) -> Result<DebtItem, DecodeError> {
	let fields = Fields::new(item, "debt item")?;
	Ok(DebtItem {
		debt_amount: fields.u256_string("debt_amount")?,
		debt_value: fields.u256_string("debt_value")?,
		dola_pool_id: Some(fields.u16_number("dola_pool_id")?),
		borrow_apy: Some(apy(&fields, "borrow_apy")?),
		supply_apy: Some(apy(&fields, "supply_apy")?),
		coin_type: None,
		token_name: None,
	})
}

fn token_price(item: &Value) -> Result<DolaTokenPrice, DecodeError> {
	let fields = Fields::new(item, "token price")?;
	Ok(DolaTokenPrice {
		decimal: fields.u8_number("decimal")?,
		dola_pool_id: fields.u16_number("dola_pool_id")?,
		price: fields.u256_string("price")?,
	})
}

fn user_address(item: &Value) -> Result<DolaUserAddress, DecodeError> {
	let fields = Fields::new(item, "user address")?;
	Ok(DolaUserAddress {
		dola_chain_id: fields.u16_number("dola_chain_id")?,
		dola_address: decode_dola_address(BINARY_ADDRESS_CHAIN, &fields.bytes("dola_address")?)?,
	})
}

fn collect<T>(
	items: &[Value],
	decode: fn(&Value) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
	items.iter().map(decode).collect()
}

impl EventDecoder for CurrentDecoder {
	fn version(&self) -> ProtocolVersion {
		ProtocolVersion::Current
	}

	fn envelope(&self) -> &'static [&'static str] {
		&["parsedJson"]
	}

	fn dola_token_liquidity(&self, body: &Value) -> Result<U256, DecodeError> {
		Fields::new(body, "event")?.u256_string("token_liquidity")
	}

	fn app_token_liquidity(&self, body: &Value) -> Result<U256, DecodeError> {
		Fields::new(body, "event")?.u256_string("token_liquidity")
	}

	fn pool_liquidity(&self, body: &Value) -> Result<U256, DecodeError> {
		Fields::new(body, "event")?.u256_string("pool_liquidity")
	}

	fn all_pool_liquidity(&self, body: &Value) -> Result<Vec<PoolInfo>, DecodeError> {
		collect(Fields::new(body, "event")?.list("pool_infos")?, pool_info)
	}

	fn user_token_debt(&self, body: &Value) -> Result<(U256, U256), DecodeError> {
		let fields = Fields::new(body, "event")?;
		Ok((
			fields.u256_string("debt_amount")?,
			fields.u256_string("debt_value")?,
		))
	}

	fn user_collateral(&self, body: &Value) -> Result<CollateralItem, DecodeError> {
		collateral_item(body)
	}

	fn reserve_info(&self, body: &Value) -> Result<ReserveInfo, DecodeError> {
		reserve_info(body)
	}

	fn all_reserve_info(&self, body: &Value) -> Result<Vec<ReserveInfo>, DecodeError> {
		collect(Fields::new(body, "event")?.list("reserve_infos")?, reserve_info)
	}

	fn user_allowed_borrow(&self, body: &Value) -> Result<AllowedBorrow, DecodeError> {
		let fields = Fields::new(body, "event")?;
		let amount = fields.u256_string("borrow_amount")?;
		Ok(AllowedBorrow::from_parts(amount, fields.opt_str("reason")?))
	}

	fn user_lending_info(&self, body: &Value) -> Result<UserLendingInfo, DecodeError> {
		let fields = Fields::new(body, "event")?;
		let net_apy = i64::try_from(fields.u64_string("net_apy")?).map_err(|_| {
			DecodeError::InvalidValue {
				field: "net_apy".to_string(),
				reason: "out of range".to_string(),
			}
		})?;
		let net_apy = if fields.bool("profit_state")? {
			net_apy
		} else {
			-net_apy
		};

		Ok(UserLendingInfo {
			total_collateral_value: fields.u256_string("total_collateral_value")?,
			total_debt_value: fields.u256_string("total_debt_value")?,
			health_factor: Some(fields.u256_string("health_factor")?),
			net_apy: Some(net_apy),
			total_borrow_apy: Some(apy(&fields, "total_borrow_apy")?),
			total_supply_apy: Some(apy(&fields, "total_supply_apy")?),
			collateral_infos: collect(fields.list_or_blank("collateral_infos")?, collateral_item)?,
			debt_infos: collect(fields.list_or_blank("debt_infos")?, debt_item)?,
		})
	}

	fn oracle_price(&self, body: &Value) -> Result<DolaTokenPrice, DecodeError> {
		token_price(body)
	}

	fn all_oracle_price(&self, body: &Value) -> Result<Vec<DolaTokenPrice>, DecodeError> {
		collect(Fields::new(body, "event")?.list("token_prices")?, token_price)
	}

	fn dola_user_id(&self, body: &Value) -> Result<String, DecodeError> {
		Ok(Fields::new(body, "event")?.str("dola_user_id")?.to_string())
	}

	fn dola_user_addresses(&self, body: &Value) -> Result<Vec<DolaUserAddress>, DecodeError> {
		collect(
			Fields::new(body, "event")?.list("dola_user_addresses")?,
			user_address,
		)
	}

	fn user_health_factor(&self, body: &Value) -> Result<U256, DecodeError> {
		Fields::new(body, "event")?.u256_string("health_factor")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn parsed(body: Value) -> Value {
		json!({ "parsedJson": body })
	}

	fn lending_info(net_apy: &str, profit_state: bool) -> Value {
		parsed(json!({
			"total_collateral_value": "5000",
			"total_debt_value": "1000",
			"health_factor": "5000000000",
			"profit_state": profit_state,
			"net_apy": net_apy,
			"total_borrow_apy": "300",
			"total_supply_apy": "120",
			"collateral_infos": [{
				"borrow_apy": "300",
				"collateral_amount": "10",
				"collateral_value": "5000",
				"dola_pool_id": 1,
				"supply_apy": "120"
			}],
			"debt_infos": ""
		}))
	}

	#[test]
	fn test_net_apy_sign() {
		let decoder = CurrentDecoder;
		let losing = lending_info("150", false);
		let info = decoder.user_lending_info(decoder.body(&losing)).unwrap();
		assert_eq!(info.net_apy, Some(-150));

		let profitable = lending_info("150", true);
		let info = decoder.user_lending_info(decoder.body(&profitable)).unwrap();
		assert_eq!(info.net_apy, Some(150));
		assert_eq!(info.health_factor, Some(U256::from(5_000_000_000u64)));
		assert_eq!(info.collateral_infos[0].dola_pool_id, Some(1));
		assert!(info.debt_infos.is_empty());
	}

	#[test]
	fn test_decoding_is_repeatable() {
		let decoder = CurrentDecoder;
		let raw = lending_info("150", false);
		let first = decoder.user_lending_info(decoder.body(&raw)).unwrap();
		let second = decoder.user_lending_info(decoder.body(&raw)).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn test_reserve_info_with_pools() {
		let decoder = CurrentDecoder;
		let raw = parsed(json!({
			"borrow_apy": "200",
			"borrow_coefficient": "1000",
			"collateral_coefficient": "800",
			"debt": "100000000",
			"reserve": "100000000",
			"supply_apy": "100",
			"utilization_rate": "100",
			"dola_pool_id": 1,
			"pools": [
				{
					"pool_liquidity": "7",
					"pool_address": {
						"dola_chain_id": 0,
						"dola_address": [0x30, 0x78, 0x31, 0x32, 0x33]
					},
					"pool_equilibrium_fee": "5",
					"pool_weight": "9"
				},
				{
					"pool_liquidity": "8",
					"pool_address": {
						"dola_chain_id": 2,
						"dola_address": [0x30, 0x78, 0x31, 0x32, 0x33]
					},
					"pool_equilibrium_fee": "0",
					"pool_weight": "1"
				}
			]
		}));
		let info = decoder.reserve_info(decoder.body(&raw)).unwrap();
		assert_eq!(info.borrow_coefficient, Some(U256::from(1000u64)));
		assert_eq!(info.collateral_coefficient, Some(U256::from(800u64)));
		assert_eq!(info.pools.len(), 2);
		assert_eq!(info.pools[0].dola_address, "0x123");
		assert_eq!(info.pools[0].pool_equilibrium_fee, U256::from(5u64));
		assert_eq!(info.pools[0].pool_weight, U256::from(9u64));
		assert_eq!(info.pools[1].dola_address, "0x3078313233");
	}

	#[test]
	fn test_reserve_info_minimal() {
		let decoder = CurrentDecoder;
		let raw = parsed(json!({
			"borrow_apy": "200",
			"debt": "100000000",
			"reserve": "100000000",
			"supply_apy": "100",
			"utilization_rate": "100",
			"dola_pool_id": 1.0
		}));
		let info = decoder.reserve_info(decoder.body(&raw)).unwrap();
		assert_eq!(
			info,
			ReserveInfo {
				borrow_apy: 200,
				debt: U256::from(100_000_000u64),
				reserve: U256::from(100_000_000u64),
				supply_apy: 100,
				utilization_rate: 100,
				dola_pool_id: Some(1),
				..Default::default()
			}
		);
	}

	#[test]
	fn test_user_addresses_always_binary() {
		let decoder = CurrentDecoder;
		let raw = parsed(json!({
			"dola_user_addresses": [
				{ "dola_chain_id": 0, "dola_address": [0x30, 0x78, 0x31, 0x32, 0x33] }
			]
		}));
		let addresses = decoder.dola_user_addresses(decoder.body(&raw)).unwrap();
		assert_eq!(
			addresses,
			vec![DolaUserAddress {
				dola_chain_id: 0,
				dola_address: "0x3078313233".to_string()
			}]
		);
	}

	#[test]
	fn test_prices_and_ids() {
		let decoder = CurrentDecoder;
		let raw = parsed(json!({
			"token_prices": [
				{ "decimal": 8, "dola_pool_id": 0, "price": "2500000000000" },
				{ "decimal": 8, "dola_pool_id": 1, "price": "100000000" }
			]
		}));
		let prices = decoder.all_oracle_price(decoder.body(&raw)).unwrap();
		assert_eq!(prices.len(), 2);
		assert_eq!(prices[0].price, U256::from(2_500_000_000_000u64));
		assert_eq!(prices[1].decimal, 8);

		let raw = parsed(json!({ "dola_user_id": "17" }));
		assert_eq!(decoder.dola_user_id(decoder.body(&raw)).unwrap(), "17");
	}

	#[test]
	fn test_numeric_amount_rejected() {
		let decoder = CurrentDecoder;
		let raw = parsed(json!({ "token_liquidity": 5 }));
		assert_eq!(
			decoder.dola_token_liquidity(decoder.body(&raw)),
			Err(DecodeError::InvalidType {
				field: "token_liquidity".to_string(),
				expected: "a string"
			})
		);
	}
}
