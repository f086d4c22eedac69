//! Caller-supplied arguments for lending operations and queries.
//!
//! Amounts are big integers; the builder decides per protocol version whether
//! they travel as JSON numbers or as decimal strings.

use crate::{ObjectId, SuiAddress, U256};
use std::fmt;

/// Deposit into a local pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyArgs {
	pub pool: ObjectId,
	/// `vector<Coin<CoinType>>` merged into the deposit.
	pub deposit_coins: Vec<ObjectId>,
	pub deposit_amount: U256,
	/// `vector<Coin<SUI>>` paying the wormhole message fee. Legacy only.
	pub bridge_fee_coins: Vec<ObjectId>,
	pub bridge_fee_amount: U256,
}

/// Withdraw to the signer on Sui.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawLocalArgs {
	pub pool: ObjectId,
	pub amount: U256,
}

/// Withdraw to a receiver on another chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawRemoteArgs {
	pub pool: ObjectId,
	/// Receiver address bytes on the destination chain.
	pub receiver: Vec<u8>,
	pub dst_chain: u16,
	pub amount: U256,
	pub bridge_fee_coins: Vec<ObjectId>,
	pub bridge_fee_amount: U256,
}

/// Borrow to the signer on Sui.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowLocalArgs {
	pub pool: ObjectId,
	pub amount: U256,
}

/// Borrow to a receiver on another chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowRemoteArgs {
	pub pool: ObjectId,
	pub receiver: Vec<u8>,
	pub dst_chain: u16,
	pub amount: U256,
	pub bridge_fee_coins: Vec<ObjectId>,
	pub bridge_fee_amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepayArgs {
	pub pool: ObjectId,
	pub repay_coins: Vec<ObjectId>,
	pub repay_amount: U256,
	/// Legacy only.
	pub bridge_fee_coins: Vec<ObjectId>,
	pub bridge_fee_amount: U256,
}

/// Bind an address on another chain to the signer's dola user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingArgs {
	pub bridge_fee_coins: Vec<ObjectId>,
	pub bridge_fee_amount: U256,
	pub dola_chain_id: u16,
	pub bind_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbindingArgs {
	pub bridge_fee_coins: Vec<ObjectId>,
	pub bridge_fee_amount: U256,
	pub dola_chain_id: u16,
	pub unbind_address: String,
}

/// Identifies a lending pool in a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolKey {
	/// Coin type name such as `0x2::sui::SUI`. Legacy deployments.
	Token(String),
	/// Protocol-wide pool id. Current deployments.
	Dola(u16),
}

impl fmt::Display for PoolKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PoolKey::Token(name) => write!(f, "token {}", name),
			PoolKey::Dola(id) => write!(f, "dola pool {}", id),
		}
	}
}

/// Identifies the user a query is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKey {
	/// Sui address of the user. Legacy deployments.
	Address(SuiAddress),
	/// Protocol-wide user id, a decimal string. Current deployments.
	DolaUserId(String),
}

impl fmt::Display for UserKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			UserKey::Address(address) => write!(f, "address {}", address),
			UserKey::DolaUserId(id) => write!(f, "dola user {}", id),
		}
	}
}
