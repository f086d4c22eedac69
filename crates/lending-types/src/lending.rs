//! Lending results decoded from query events.
//!
//! Values keep the protocol's fixed-point conventions: rates are basis points
//! (`200` is 2%), amounts and values are raw integers in the pool's decimals.
//! Fields only emitted by one schema version are optional.

use crate::utils::decimal;
use crate::U256;
use serde::Serialize;

/// Reserve state of one dola pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReserveInfo {
	/// 200 -> 200/10000 = 2.0%
	pub borrow_apy: u64,
	#[serde(with = "decimal::option")]
	pub borrow_coefficient: Option<U256>,
	#[serde(with = "decimal::option")]
	pub collateral_coefficient: Option<U256>,
	#[serde(with = "decimal")]
	pub debt: U256,
	#[serde(with = "decimal")]
	pub reserve: U256,
	pub supply_apy: u64,
	pub utilization_rate: u64,
	/// Current deployments only.
	pub dola_pool_id: Option<u16>,
	/// `0x`-prefixed coin type name. Legacy deployments only.
	pub token_name: Option<String>,
	/// Per-chain pools backing the reserve.
	pub pools: Vec<PoolInfo>,
}

/// Liquidity of a pool on one chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolInfo {
	#[serde(with = "decimal")]
	pub pool_liquidity: U256,
	pub dola_chain_id: u16,
	/// `0x`-prefixed pool address.
	pub dola_address: String,
	#[serde(with = "decimal")]
	pub pool_equilibrium_fee: U256,
	#[serde(with = "decimal")]
	pub pool_weight: U256,
}

/// A user's collateral in one pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollateralItem {
	#[serde(with = "decimal")]
	pub collateral_amount: U256,
	#[serde(with = "decimal")]
	pub collateral_value: U256,
	pub dola_pool_id: Option<u16>,
	pub borrow_apy: Option<u64>,
	pub supply_apy: Option<u64>,
	/// Move type of the entry. Legacy deployments only.
	pub coin_type: Option<String>,
	/// Legacy deployments only.
	pub token_name: Option<String>,
}

/// A user's debt in one pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DebtItem {
	#[serde(with = "decimal")]
	pub debt_amount: U256,
	#[serde(with = "decimal")]
	pub debt_value: U256,
	pub dola_pool_id: Option<u16>,
	pub borrow_apy: Option<u64>,
	pub supply_apy: Option<u64>,
	pub coin_type: Option<String>,
	pub token_name: Option<String>,
}

/// Summary of a user's lending position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserLendingInfo {
	#[serde(with = "decimal")]
	pub total_collateral_value: U256,
	#[serde(with = "decimal")]
	pub total_debt_value: U256,
	#[serde(with = "decimal::option")]
	pub health_factor: Option<U256>,
	/// Negative when the position is not profitable.
	pub net_apy: Option<i64>,
	pub total_borrow_apy: Option<u64>,
	pub total_supply_apy: Option<u64>,
	pub collateral_infos: Vec<CollateralItem>,
	pub debt_infos: Vec<DebtItem>,
}

/// Oracle price of a dola pool's token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DolaTokenPrice {
	/// Number of decimals in `price`.
	pub decimal: u8,
	pub dola_pool_id: u16,
	#[serde(with = "decimal")]
	pub price: U256,
}

/// One address bound to a dola user id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DolaUserAddress {
	pub dola_chain_id: u16,
	/// `0x`-prefixed hex.
	pub dola_address: String,
}
