//! Transport layer for the Dola lending client.
//!
//! The binding never talks to a node directly. It hands move calls to a
//! transport, which turns them into unsigned transactions and simulates them.
//! The JSON-RPC implementation talks to a Sui full node; the mock records calls
//! and replays canned results for tests and offline tooling.

use async_trait::async_trait;
use lending_types::{DryRunResponse, MoveCallRequest, TransactionBytes};
use thiserror::Error;

pub mod implementations {
	pub mod jsonrpc;
	pub mod mock;
}

pub use implementations::jsonrpc::{create_transport, SuiJsonRpcTransport};
pub use implementations::mock::MockTransport;

/// Errors that can occur while talking to a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
	/// Connection, timeout or HTTP status failure.
	#[error("Network error: {0}")]
	Network(String),
	/// Error object returned by the node.
	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },
	/// The node answered with something that is not the expected shape.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
}

/// Trait implemented by anything that can build and simulate move calls.
#[async_trait]
pub trait TransportInterface: Send + Sync {
	/// Builds an unsigned transaction for a move call.
	async fn move_call(&self, request: MoveCallRequest) -> Result<TransactionBytes, TransportError>;

	/// Simulates a transaction without committing it.
	async fn dry_run(&self, tx: &TransactionBytes) -> Result<DryRunResponse, TransportError>;
}
