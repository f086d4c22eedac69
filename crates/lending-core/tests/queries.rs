mod common;

use common::*;
use lending_core::LendingError;
use lending_transport::TransportError;
use lending_types::{
	CallArg, DryRunResponse, PoolInfo, PoolKey, ProtocolVersion, ReserveInfo, UserKey, U256,
};
use serde_json::{json, Value};

const LEGACY: ProtocolVersion = ProtocolVersion::Legacy;
const CURRENT: ProtocolVersion = ProtocolVersion::Current;

fn parsed(body: Value) -> Value {
	json!({ "parsedJson": body })
}

fn move_event(fields: Value) -> Value {
	json!({ "moveEvent": { "fields": fields } })
}

#[tokio::test]
async fn test_reserve_info_end_to_end() {
	let (contract, mock) = contract(CURRENT);
	let v = CURRENT;
	mock.push_dry_run(Ok(DryRunResponse::success(vec![parsed(json!({
		"borrow_apy": "200",
		"debt": "100000000",
		"reserve": "100000000",
		"supply_apy": "100",
		"utilization_rate": "100",
		"dola_pool_id": 1.0,
		"pools": []
	}))])))
	.await;

	let info = contract
		.get_reserve_info(&id(v, SIGNER), &PoolKey::Dola(1), &options())
		.await
		.unwrap();
	assert_eq!(
		info,
		ReserveInfo {
			borrow_apy: 200,
			borrow_coefficient: None,
			collateral_coefficient: None,
			debt: U256::from(100_000_000u64),
			reserve: U256::from(100_000_000u64),
			supply_apy: 100,
			utilization_rate: 100,
			dola_pool_id: Some(1),
			token_name: None,
			pools: vec![],
		}
	);

	let request = mock.last_request().await.unwrap();
	assert_eq!(request.package, id(v, EXTERNAL_INTERFACES_PACKAGE));
	assert_eq!(request.module, "interfaces");
	assert_eq!(request.function, "get_reserve_info");
	assert_eq!(
		request.arguments,
		vec![obj(v, POOL_MANAGER_INFO), obj(v, STORAGE), CallArg::U16(1)]
	);
	assert_eq!(mock.dry_runs().await.len(), 1);
}

#[tokio::test]
async fn test_legacy_reserve_info_strips_token_prefix() {
	let (contract, mock) = contract(LEGACY);
	let v = LEGACY;
	mock.push_dry_run(Ok(DryRunResponse::success(vec![move_event(json!({
		"borrow_apy": 200,
		"debt": "1",
		"reserve": "2",
		"supply_apy": 100,
		"utilization_rate": 33,
		"token_name": "Mjo6c3VpOjpTVUk="
	}))])))
	.await;

	let info = contract
		.get_reserve_info(
			&id(v, SIGNER),
			&PoolKey::Token("0x2::sui::SUI".to_string()),
			&options(),
		)
		.await
		.unwrap();
	assert_eq!(info.token_name.as_deref(), Some("0x2::sui::SUI"));
	assert_eq!(info.dola_pool_id, None);

	let request = mock.last_request().await.unwrap();
	assert_eq!(
		request.arguments[2],
		CallArg::Str("2::sui::SUI".to_string())
	);
}

#[tokio::test]
async fn test_simulation_failure_is_verbatim() {
	let (contract, mock) = contract(CURRENT);
	let v = CURRENT;
	mock.push_dry_run(Ok(DryRunResponse::failure("insufficient balance")))
		.await;

	let err = contract
		.get_user_health_factor(
			&id(v, SIGNER),
			&UserKey::DolaUserId("1".to_string()),
			&options(),
		)
		.await
		.unwrap_err();
	assert!(matches!(err, LendingError::Simulation(_)));
	assert_eq!(err.to_string(), "insufficient balance");
}

#[tokio::test]
async fn test_success_without_events() {
	let (contract, mock) = contract(CURRENT);
	let v = CURRENT;
	mock.push_dry_run(Ok(DryRunResponse::success(vec![]))).await;

	let err = contract
		.get_all_oracle_price(&id(v, SIGNER), &options())
		.await
		.unwrap_err();
	assert!(matches!(err, LendingError::InvalidEvents));
	assert_eq!(err.to_string(), "invalid events");
}

#[tokio::test]
async fn test_dry_run_transport_error() {
	let (contract, mock) = contract(CURRENT);
	let v = CURRENT;
	mock.push_dry_run(Err(TransportError::Network("connection reset".to_string())))
		.await;

	let err = contract
		.get_all_reserve_info(&id(v, SIGNER), &options())
		.await
		.unwrap_err();
	assert!(matches!(err, LendingError::Transport(_)));
	assert_eq!(err.to_string(), "Network error: connection reset");
}

#[tokio::test]
async fn test_all_pool_liquidity_addresses() {
	let (contract, mock) = contract(CURRENT);
	let v = CURRENT;
	let pool = |chain: u64| {
		json!({
			"pool_liquidity": "7",
			"pool_address": { "dola_chain_id": chain, "dola_address": [0x30, 0x78, 0x31, 0x32, 0x33] },
			"pool_equilibrium_fee": "5",
			"pool_weight": "9"
		})
	};
	mock.push_dry_run(Ok(DryRunResponse::success(vec![
		json!({ "parsedJson": { "unrelated": true } }),
		parsed(json!({ "pool_infos": [pool(0), pool(2)] })),
	])))
	.await;

	let pools = contract
		.get_all_pool_liquidity(&id(v, SIGNER), &PoolKey::Dola(1), &options())
		.await
		.unwrap();
	assert_eq!(
		pools,
		vec![
			PoolInfo {
				pool_liquidity: U256::from(7u64),
				dola_chain_id: 0,
				dola_address: "0x123".to_string(),
				pool_equilibrium_fee: U256::from(5u64),
				pool_weight: U256::from(9u64),
			},
			PoolInfo {
				pool_liquidity: U256::from(7u64),
				dola_chain_id: 2,
				dola_address: "0x3078313233".to_string(),
				pool_equilibrium_fee: U256::from(5u64),
				pool_weight: U256::from(9u64),
			},
		]
	);
}

#[tokio::test]
async fn test_allowed_borrow_rejected() {
	let (contract, mock) = contract(CURRENT);
	let v = CURRENT;
	mock.push_dry_run(Ok(DryRunResponse::success(vec![parsed(json!({
		"borrow_amount": "0",
		"reason": "not enough collateral"
	}))])))
	.await;

	let err = contract
		.get_user_allowed_borrow(
			&id(v, SIGNER),
			&UserKey::DolaUserId("3".to_string()),
			&PoolKey::Dola(2),
			&options(),
		)
		.await
		.unwrap_err();
	assert!(matches!(err, LendingError::Rejected(_)));
	assert_eq!(err.to_string(), "not enough collateral");

	let request = mock.last_request().await.unwrap();
	assert_eq!(
		request.arguments,
		vec![
			obj(v, POOL_MANAGER_INFO),
			obj(v, STORAGE),
			obj(v, PRICE_ORACLE),
			CallArg::Str("3".to_string()),
			CallArg::U16(2),
		]
	);
}

#[tokio::test]
async fn test_legacy_allowed_borrow_order() {
	let (contract, mock) = contract(LEGACY);
	let v = LEGACY;
	mock.push_dry_run(Ok(DryRunResponse::success(vec![move_event(json!({
		"borrow_amount": 42,
		"reason": null
	}))])))
	.await;

	let user = id(v, SIGNER);
	let amount = contract
		.get_user_allowed_borrow(
			&user,
			&UserKey::Address(user.clone()),
			&PoolKey::Token("0x2::sui::SUI".to_string()),
			&options(),
		)
		.await
		.unwrap();
	assert_eq!(amount, U256::from(42u64));

	let request = mock.last_request().await.unwrap();
	assert_eq!(
		request.arguments[3..],
		[
			CallArg::Str("2::sui::SUI".to_string()),
			CallArg::Str(user.to_string()),
		]
	);
}

#[tokio::test]
async fn test_legacy_unsupported_queries_skip_transport() {
	let (contract, mock) = contract(LEGACY);
	let v = LEGACY;
	let signer = id(v, SIGNER);

	let err = contract
		.get_all_reserve_info(&signer, &options())
		.await
		.unwrap_err();
	assert_eq!(
		err.to_string(),
		"get_all_reserve_info is not supported by the legacy protocol"
	);
	assert!(contract
		.get_oracle_price(&signer, &PoolKey::Token("0x2::sui::SUI".to_string()), &options())
		.await
		.is_err());
	assert!(contract
		.get_dola_user_id(&signer, 0, "0x1234", &options())
		.await
		.is_err());
	assert!(contract
		.get_pool_liquidity(&signer, 0, "0x1234", &options())
		.await
		.is_err());

	assert!(mock.requests().await.is_empty());
	assert!(mock.dry_runs().await.is_empty());
}

#[tokio::test]
async fn test_key_kind_must_match_version() {
	let (current, mock) = contract(CURRENT);
	let err = current
		.get_reserve_info(
			&id(CURRENT, SIGNER),
			&PoolKey::Token("0x2::sui::SUI".to_string()),
			&options(),
		)
		.await
		.unwrap_err();
	assert!(matches!(err, LendingError::InvalidArgument(_)));
	assert!(mock.requests().await.is_empty());

	let (legacy, _) = contract(LEGACY);
	let err = legacy
		.get_user_lending_info(
			&id(LEGACY, SIGNER),
			&UserKey::DolaUserId("1".to_string()),
			&options(),
		)
		.await
		.unwrap_err();
	assert!(matches!(err, LendingError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_decode_failure_reports_field() {
	let (contract, mock) = contract(CURRENT);
	let v = CURRENT;
	mock.push_dry_run(Ok(DryRunResponse::success(vec![parsed(json!({
		"dola_user_id": 7
	}))])))
	.await;

	let err = contract
		.get_dola_user_id(&id(v, SIGNER), 5, "0xabcd", &options())
		.await
		.unwrap_err();
	assert!(matches!(err, LendingError::EventParse(_)));
	assert!(err.to_string().starts_with("event parse failed: "));

	let request = mock.last_request().await.unwrap();
	assert_eq!(
		request.arguments,
		vec![
			obj(v, USER_MANAGER_INFO),
			CallArg::U16(5),
			CallArg::Str("0xabcd".to_string()),
		]
	);
}

#[tokio::test]
async fn test_concurrent_queries_share_binding() {
	let (contract, mock) = contract(CURRENT);
	let v = CURRENT;
	for n in ["10", "20"] {
		mock.push_dry_run(Ok(DryRunResponse::success(vec![parsed(json!({
			"token_liquidity": n
		}))])))
		.await;
	}

	let signer = id(v, SIGNER);
	let a = contract.clone();
	let b = contract.clone();
	let opts = options();
	let (first, second) = tokio::join!(
		a.get_dola_token_liquidity(&signer, &PoolKey::Dola(1), &opts),
		b.get_dola_token_liquidity(&signer, &PoolKey::Dola(2), &opts),
	);
	let mut total = vec![first.unwrap(), second.unwrap()];
	total.sort();
	assert_eq!(total, vec![U256::from(10u64), U256::from(20u64)]);
	assert_eq!(mock.requests().await.len(), 2);
}
