//! Move call types.
//!
//! A move call names a function inside a published package and carries its
//! arguments in declaration order. The transport turns it into an unsigned
//! transaction which callers sign and submit themselves.

use crate::{ObjectId, SuiAddress};
use serde::{Deserialize, Serialize};

/// One argument of a move call, serialized the way the Sui JSON-RPC expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CallArg {
	/// Shared or owned object, passed by id.
	Object(ObjectId),
	/// `vector<Coin<T>>` and other object vectors.
	ObjectVec(Vec<ObjectId>),
	U16(u16),
	U64(u64),
	/// Strings, and integers carried as decimal strings.
	Str(String),
	/// `vector<u8>`.
	Bytes(Vec<u8>),
}

impl From<&ObjectId> for CallArg {
	fn from(id: &ObjectId) -> Self {
		CallArg::Object(id.clone())
	}
}

/// Per-call gas parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
	/// Gas coin to pay with; the node picks one when absent.
	pub gas: Option<ObjectId>,
	pub gas_budget: u64,
}

impl CallOptions {
	pub fn new(gas: Option<ObjectId>, gas_budget: u64) -> Self {
		Self { gas, gas_budget }
	}
}

/// Everything the transport needs to build an unsigned move call transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCallRequest {
	pub signer: SuiAddress,
	pub package: ObjectId,
	pub module: String,
	pub function: String,
	pub type_arguments: Vec<String>,
	pub arguments: Vec<CallArg>,
	pub gas: Option<ObjectId>,
	pub gas_budget: u64,
}

impl MoveCallRequest {
	pub fn new(signer: &SuiAddress, package: &ObjectId, module: &str, function: &str) -> Self {
		Self {
			signer: signer.clone(),
			package: package.clone(),
			module: module.to_string(),
			function: function.to_string(),
			type_arguments: Vec::new(),
			arguments: Vec::new(),
			gas: None,
			gas_budget: 0,
		}
	}

	pub fn with_type_arguments(mut self, type_arguments: Vec<String>) -> Self {
		self.type_arguments = type_arguments;
		self
	}

	pub fn with_arguments(mut self, arguments: Vec<CallArg>) -> Self {
		self.arguments = arguments;
		self
	}

	pub fn with_options(mut self, options: &CallOptions) -> Self {
		self.gas = options.gas.clone();
		self.gas_budget = options.gas_budget;
		self
	}

	/// Fully qualified `package::module::function` name, for logs.
	pub fn target(&self) -> String {
		format!("{}::{}::{}", self.package, self.module, self.function)
	}
}

/// Reference to an object version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
	pub object_id: ObjectId,
	pub version: u64,
	pub digest: String,
}

/// Unsigned transaction returned by the node for a move call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBytes {
	/// BCS transaction data, base64 encoded.
	pub tx_bytes: String,
	#[serde(default)]
	pub gas: Vec<ObjectRef>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_call_arg_json_shapes() {
		let id = ObjectId::from_hex("0x6f68637e8f8f98ac62d7a08efaeacebbcd620ce9").unwrap();
		let args = vec![
			CallArg::from(&id),
			CallArg::ObjectVec(vec![id.clone()]),
			CallArg::U16(1),
			CallArg::U64(200),
			CallArg::Str("100000000".to_string()),
			CallArg::Bytes(vec![0x30, 0x78]),
		];

		assert_eq!(
			serde_json::to_value(&args).unwrap(),
			json!([
				"0x6f68637e8f8f98ac62d7a08efaeacebbcd620ce9",
				["0x6f68637e8f8f98ac62d7a08efaeacebbcd620ce9"],
				1,
				200,
				"100000000",
				[48, 120]
			])
		);
	}

	#[test]
	fn test_transaction_bytes_without_gas() {
		let tx: TransactionBytes = serde_json::from_value(json!({ "txBytes": "AAAB" })).unwrap();
		assert_eq!(tx.tx_bytes, "AAAB");
		assert!(tx.gas.is_empty());
	}
}
