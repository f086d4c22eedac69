//! Dry-run results.
//!
//! Read-only entry points report their answer by emitting an event, so a query
//! is a simulated transaction whose events are inspected and then discarded.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Execution status reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
	Success,
	Failure {
		#[serde(default)]
		error: String,
	},
}

impl ExecutionStatus {
	pub fn is_success(&self) -> bool {
		matches!(self, ExecutionStatus::Success)
	}
}

/// Outcome of simulating a transaction.
///
/// Events are kept as raw JSON because their envelope differs between
/// protocol versions; decoding is left to the version's event decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryRunResponse {
	pub status: ExecutionStatus,
	#[serde(default)]
	pub events: Vec<Value>,
}

impl DryRunResponse {
	pub fn success(events: Vec<Value>) -> Self {
		Self {
			status: ExecutionStatus::Success,
			events,
		}
	}

	pub fn failure(error: impl Into<String>) -> Self {
		Self {
			status: ExecutionStatus::Failure {
				error: error.into(),
			},
			events: Vec::new(),
		}
	}

	/// The authoritative result event.
	///
	/// Entry points may emit auxiliary events before their result, so the
	/// last event wins.
	pub fn last_event(&self) -> Option<&Value> {
		self.events.last()
	}
}
