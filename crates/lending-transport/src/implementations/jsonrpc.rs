//! Sui full node JSON-RPC transport.
//!
//! Method names and response layouts changed between node releases. Legacy
//! nodes expose `sui_moveCall` and `sui_dryRunTransaction`, whose result is
//! the effects object itself. Current nodes expose `unsafe_moveCall` and
//! `sui_dryRunTransactionBlock`, which nest the status under `effects` and list
//! events beside it.

use crate::{TransportError, TransportInterface};
use async_trait::async_trait;
use lending_config::NetworkConfig;
use lending_types::{
	DryRunResponse, ExecutionStatus, MoveCallRequest, ProtocolVersion, TransactionBytes,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// JSON-RPC client for one Sui full node.
pub struct SuiJsonRpcTransport {
	client: reqwest::Client,
	url: String,
	version: ProtocolVersion,
	next_id: AtomicU64,
}

#[derive(Deserialize)]
struct RpcResponse {
	#[serde(default)]
	result: Option<Value>,
	#[serde(default)]
	error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
	code: i64,
	#[serde(default)]
	message: String,
}

impl SuiJsonRpcTransport {
	pub fn new(
		url: impl Into<String>,
		timeout: Duration,
		version: ProtocolVersion,
	) -> Result<Self, TransportError> {
		let client = reqwest::Client::builder()
			.pool_idle_timeout(Duration::from_secs(90))
			.timeout(timeout)
			.build()
			.map_err(|e| TransportError::Network(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			url: url.into(),
			version,
			next_id: AtomicU64::new(1),
		})
	}

	fn move_call_method(&self) -> &'static str {
		match self.version {
			ProtocolVersion::Legacy => "sui_moveCall",
			ProtocolVersion::Current => "unsafe_moveCall",
		}
	}

	fn dry_run_method(&self) -> &'static str {
		match self.version {
			ProtocolVersion::Legacy => "sui_dryRunTransaction",
			ProtocolVersion::Current => "sui_dryRunTransactionBlock",
		}
	}

	async fn call(&self, method: &str, params: Value) -> Result<Value, TransportError> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let body = json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params,
		});

		tracing::trace!(method, id, "Sending JSON-RPC request");

		let response = self
			.client
			.post(&self.url)
			.json(&body)
			.send()
			.await
			.map_err(|e| TransportError::Network(format!("{} request failed: {}", method, e)))?;

		let status = response.status();
		if !status.is_success() {
			return Err(TransportError::Network(format!(
				"{} returned HTTP {}",
				method, status
			)));
		}

		let payload: RpcResponse = response
			.json()
			.await
			.map_err(|e| TransportError::InvalidResponse(format!("{}: {}", method, e)))?;

		unwrap_rpc_response(method, payload)
	}
}

fn unwrap_rpc_response(method: &str, payload: RpcResponse) -> Result<Value, TransportError> {
	if let Some(error) = payload.error {
		return Err(TransportError::Rpc {
			code: error.code,
			message: error.message,
		});
	}
	payload
		.result
		.ok_or_else(|| TransportError::InvalidResponse(format!("{}: missing result", method)))
}

/// Positional parameters of a move call request.
fn move_call_params(version: ProtocolVersion, request: &MoveCallRequest) -> Value {
	// Newer nodes take u64 values as strings.
	let gas_budget = match version {
		ProtocolVersion::Legacy => json!(request.gas_budget),
		ProtocolVersion::Current => json!(request.gas_budget.to_string()),
	};
	json!([
		request.signer,
		request.package,
		request.module,
		request.function,
		request.type_arguments,
		request.arguments,
		request.gas,
		gas_budget,
	])
}

/// Extracts status and events from a dry-run result.
fn parse_dry_run(version: ProtocolVersion, result: Value) -> Result<DryRunResponse, TransportError> {
	let status = match version {
		ProtocolVersion::Legacy => result.get("status"),
		ProtocolVersion::Current => result.get("effects").and_then(|e| e.get("status")),
	}
	.cloned()
	.ok_or_else(|| TransportError::InvalidResponse("dry run result has no status".to_string()))?;

	let status: ExecutionStatus = serde_json::from_value(status)
		.map_err(|e| TransportError::InvalidResponse(format!("dry run status: {}", e)))?;

	let events = match result.get("events") {
		None | Some(Value::Null) => Vec::new(),
		Some(Value::Array(events)) => events.clone(),
		Some(_) => {
			return Err(TransportError::InvalidResponse(
				"dry run events is not a list".to_string(),
			))
		},
	};

	Ok(DryRunResponse { status, events })
}

#[async_trait]
impl TransportInterface for SuiJsonRpcTransport {
	async fn move_call(&self, request: MoveCallRequest) -> Result<TransactionBytes, TransportError> {
		let method = self.move_call_method();
		let result = self
			.call(method, move_call_params(self.version, &request))
			.await?;
		serde_json::from_value(result)
			.map_err(|e| TransportError::InvalidResponse(format!("{}: {}", method, e)))
	}

	async fn dry_run(&self, tx: &TransactionBytes) -> Result<DryRunResponse, TransportError> {
		let result = self
			.call(self.dry_run_method(), json!([tx.tx_bytes]))
			.await?;
		parse_dry_run(self.version, result)
	}
}

/// Builds the JSON-RPC transport described by the network configuration.
pub fn create_transport(
	network: &NetworkConfig,
	version: ProtocolVersion,
) -> Result<Arc<dyn TransportInterface>, TransportError> {
	let transport = SuiJsonRpcTransport::new(
		network.rpc_url.clone(),
		Duration::from_secs(network.request_timeout_seconds),
		version,
	)?;
	tracing::debug!(url = %network.rpc_url, %version, "Created JSON-RPC transport");
	Ok(Arc::new(transport))
}

#[cfg(test)]
mod tests {
	use super::*;
	use lending_types::{CallArg, ObjectId};

	fn request() -> MoveCallRequest {
		let id = ObjectId::from_hex("0x6f68637e8f8f98ac62d7a08efaeacebbcd620ce9").unwrap();
		MoveCallRequest {
			signer: id.clone(),
			package: id.clone(),
			module: "lending".to_string(),
			function: "supply".to_string(),
			type_arguments: vec!["0x2::sui::SUI".to_string()],
			arguments: vec![CallArg::from(&id), CallArg::U64(7)],
			gas: None,
			gas_budget: 3000,
		}
	}

	#[test]
	fn test_method_names() {
		let legacy =
			SuiJsonRpcTransport::new("http://localhost:9000", Duration::from_secs(1), ProtocolVersion::Legacy)
				.unwrap();
		assert_eq!(legacy.move_call_method(), "sui_moveCall");
		assert_eq!(legacy.dry_run_method(), "sui_dryRunTransaction");

		let current =
			SuiJsonRpcTransport::new("http://localhost:9000", Duration::from_secs(1), ProtocolVersion::Current)
				.unwrap();
		assert_eq!(current.move_call_method(), "unsafe_moveCall");
		assert_eq!(current.dry_run_method(), "sui_dryRunTransactionBlock");
	}

	#[test]
	fn test_move_call_params() {
		let id = "0x6f68637e8f8f98ac62d7a08efaeacebbcd620ce9";
		let params = move_call_params(ProtocolVersion::Legacy, &request());
		assert_eq!(
			params,
			json!([id, id, "lending", "supply", ["0x2::sui::SUI"], [id, 7], null, 3000])
		);

		let params = move_call_params(ProtocolVersion::Current, &request());
		assert_eq!(params[7], json!("3000"));
	}

	#[test]
	fn test_parse_legacy_dry_run() {
		let result = json!({
			"status": { "status": "success" },
			"events": [{ "moveEvent": { "fields": { "token_liquidity": 5 } } }]
		});
		let response = parse_dry_run(ProtocolVersion::Legacy, result).unwrap();
		assert!(response.status.is_success());
		assert_eq!(response.events.len(), 1);
	}

	#[test]
	fn test_parse_current_dry_run_failure() {
		let result = json!({
			"effects": { "status": { "status": "failure", "error": "insufficient balance" } },
			"events": []
		});
		let response = parse_dry_run(ProtocolVersion::Current, result).unwrap();
		assert_eq!(
			response.status,
			ExecutionStatus::Failure {
				error: "insufficient balance".to_string()
			}
		);

		// The legacy layout is not accepted by a current transport.
		let legacy_shape = json!({ "status": { "status": "success" } });
		assert!(parse_dry_run(ProtocolVersion::Current, legacy_shape).is_err());
	}

	#[test]
	fn test_rpc_error_object() {
		let payload: RpcResponse = serde_json::from_value(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"error": { "code": -32602, "message": "Invalid params" }
		}))
		.unwrap();
		assert_eq!(
			unwrap_rpc_response("sui_moveCall", payload).unwrap_err(),
			TransportError::Rpc {
				code: -32602,
				message: "Invalid params".to_string()
			}
		);
	}
}
