//! In-memory transport.
//!
//! Every move call is recorded. Results come from queues filled by the caller;
//! an unqueued move call gets a numbered placeholder transaction, an unqueued
//! dry run is an error.

use crate::{TransportError, TransportInterface};
use async_trait::async_trait;
use lending_types::{DryRunResponse, MoveCallRequest, TransactionBytes};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct MockState {
	move_calls: Vec<MoveCallRequest>,
	dry_runs: Vec<TransactionBytes>,
	move_call_results: VecDeque<Result<TransactionBytes, TransportError>>,
	dry_run_results: VecDeque<Result<DryRunResponse, TransportError>>,
}

/// Recording transport with queued replies.
///
/// Clones share state, so a test can keep one handle while the binding owns
/// another.
#[derive(Clone, Default)]
pub struct MockTransport {
	state: Arc<Mutex<MockState>>,
}

impl MockTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues the result of the next move call.
	pub async fn push_move_call(&self, result: Result<TransactionBytes, TransportError>) {
		self.state.lock().await.move_call_results.push_back(result);
	}

	/// Queues the result of the next dry run.
	pub async fn push_dry_run(&self, result: Result<DryRunResponse, TransportError>) {
		self.state.lock().await.dry_run_results.push_back(result);
	}

	/// Move calls received so far, oldest first.
	pub async fn requests(&self) -> Vec<MoveCallRequest> {
		self.state.lock().await.move_calls.clone()
	}

	/// The most recent move call, if any.
	pub async fn last_request(&self) -> Option<MoveCallRequest> {
		self.state.lock().await.move_calls.last().cloned()
	}

	/// Transactions passed to `dry_run` so far.
	pub async fn dry_runs(&self) -> Vec<TransactionBytes> {
		self.state.lock().await.dry_runs.clone()
	}
}

#[async_trait]
impl TransportInterface for MockTransport {
	async fn move_call(&self, request: MoveCallRequest) -> Result<TransactionBytes, TransportError> {
		let mut state = self.state.lock().await;
		state.move_calls.push(request);
		let index = state.move_calls.len();
		state.move_call_results.pop_front().unwrap_or_else(|| {
			Ok(TransactionBytes {
				tx_bytes: format!("mock-tx-{}", index),
				gas: Vec::new(),
			})
		})
	}

	async fn dry_run(&self, tx: &TransactionBytes) -> Result<DryRunResponse, TransportError> {
		let mut state = self.state.lock().await;
		state.dry_runs.push(tx.clone());
		state.dry_run_results.pop_front().unwrap_or_else(|| {
			Err(TransportError::InvalidResponse(
				"no dry run response queued".to_string(),
			))
		})
	}
}
