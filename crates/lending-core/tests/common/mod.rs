#![allow(dead_code)]

use lending_config::ContractConfig;
use lending_core::Contract;
use lending_transport::MockTransport;
use lending_types::{CallArg, CallOptions, ObjectId, ProtocolVersion};
use std::sync::Arc;

pub const LENDING_PORTAL_PACKAGE: u8 = 1;
pub const EXTERNAL_INTERFACES_PACKAGE: u8 = 2;
pub const BRIDGE_POOL_PACKAGE: u8 = 3;
pub const POOL_MANAGER_INFO: u8 = 4;
pub const POOL_STATE: u8 = 5;
pub const PRICE_ORACLE: u8 = 6;
pub const STORAGE: u8 = 7;
pub const WORMHOLE_STATE: u8 = 8;
pub const USER_MANAGER_INFO: u8 = 9;
pub const CORE_STATE: u8 = 10;
pub const CLOCK: u8 = 11;
pub const APPROVAL: u8 = 12;
pub const LENDING_PORTAL: u8 = 13;
pub const POOL: u8 = 20;
pub const COIN_A: u8 = 21;
pub const COIN_B: u8 = 22;
pub const FEE_COIN: u8 = 23;
pub const SIGNER: u8 = 30;

fn id_len(version: ProtocolVersion) -> usize {
	match version {
		ProtocolVersion::Legacy => ObjectId::LEGACY_LENGTH,
		ProtocolVersion::Current => ObjectId::LENGTH,
	}
}

/// Hex id made of one repeated byte.
pub fn hex_id(version: ProtocolVersion, n: u8) -> String {
	format!("0x{}", format!("{:02x}", n).repeat(id_len(version)))
}

pub fn id(version: ProtocolVersion, n: u8) -> ObjectId {
	ObjectId::from_hex(&hex_id(version, n)).unwrap()
}

pub fn obj(version: ProtocolVersion, n: u8) -> CallArg {
	CallArg::Object(id(version, n))
}

pub fn config(version: ProtocolVersion) -> ContractConfig {
	let h = |n| hex_id(version, n);
	let mut config = ContractConfig {
		lending_portal_package_id: h(LENDING_PORTAL_PACKAGE),
		external_interfaces_package_id: h(EXTERNAL_INTERFACES_PACKAGE),
		bridge_pool_package_id: h(BRIDGE_POOL_PACKAGE),
		pool_manager_info: h(POOL_MANAGER_INFO),
		pool_state: h(POOL_STATE),
		price_oracle: h(PRICE_ORACLE),
		storage: h(STORAGE),
		wormhole_state: h(WORMHOLE_STATE),
		..Default::default()
	};
	if version == ProtocolVersion::Current {
		config.user_manager_info = h(USER_MANAGER_INFO);
		config.core_state = h(CORE_STATE);
		config.clock = h(CLOCK);
		config.approval = h(APPROVAL);
		config.lending_portal = h(LENDING_PORTAL);
	}
	config
}

pub fn contract(version: ProtocolVersion) -> (Contract, MockTransport) {
	let mock = MockTransport::new();
	let contract = Contract::new(Arc::new(mock.clone()), &config(version), version).unwrap();
	(contract, mock)
}

pub fn options() -> CallOptions {
	CallOptions::new(None, 10_000)
}
