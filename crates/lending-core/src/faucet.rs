//! Devnet faucet handing out test tokens.

use crate::LendingError;
use lending_config::FaucetConfig;
use lending_transport::TransportInterface;
use lending_types::{CallArg, CallOptions, MoveCallRequest, ObjectId, SuiAddress, TransactionBytes};
use std::sync::Arc;

/// Binding to a deployed faucet object.
#[derive(Clone)]
pub struct Faucet {
	transport: Arc<dyn TransportInterface>,
	package_id: ObjectId,
	faucet_id: ObjectId,
}

impl Faucet {
	pub fn new(
		transport: Arc<dyn TransportInterface>,
		package_id: &str,
		faucet_id: &str,
	) -> Result<Self, LendingError> {
		let package_id = ObjectId::from_hex(package_id).map_err(|source| LendingError::Config {
			field: "faucet.package_id",
			source,
		})?;
		let faucet_id = ObjectId::from_hex(faucet_id).map_err(|source| LendingError::Config {
			field: "faucet.faucet_id",
			source,
		})?;
		Ok(Self {
			transport,
			package_id,
			faucet_id,
		})
	}

	pub fn from_config(
		transport: Arc<dyn TransportInterface>,
		config: &FaucetConfig,
	) -> Result<Self, LendingError> {
		Self::new(transport, &config.package_id, &config.faucet_id)
	}

	/// Builds a claim of the coin named by `type_args`.
	pub async fn claim(
		&self,
		signer: &SuiAddress,
		type_args: Vec<String>,
		options: &CallOptions,
	) -> Result<TransactionBytes, LendingError> {
		let request = MoveCallRequest::new(signer, &self.package_id, "faucet", "claim")
			.with_type_arguments(type_args)
			.with_arguments(vec![CallArg::from(&self.faucet_id)])
			.with_options(options);
		tracing::debug!(target_fn = %request.target(), "Building faucet claim");
		Ok(self.transport.move_call(request).await?)
	}
}
