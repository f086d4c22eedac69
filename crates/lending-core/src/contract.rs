//! Binding construction and the mutating lending entry points.

use crate::LendingError;
use lending_config::ContractConfig;
use lending_transport::TransportInterface;
use lending_types::{
	BorrowLocalArgs, BorrowRemoteArgs, CallArg, CallOptions, MoveCallRequest, ObjectId,
	ProtocolVersion, RepayArgs, SuiAddress, SupplyArgs, TransactionBytes, WithdrawLocalArgs,
	WithdrawRemoteArgs, U256,
};
use std::sync::Arc;

/// Handles every deployment has.
#[derive(Debug, Clone)]
pub(crate) struct Handles {
	pub lending_portal_package: ObjectId,
	pub external_interfaces_package: ObjectId,
	pub bridge_pool_package: ObjectId,
	pub pool_manager_info: ObjectId,
	pub pool_state: ObjectId,
	pub price_oracle: ObjectId,
	pub storage: ObjectId,
	pub wormhole_state: ObjectId,
	/// Present exactly when the protocol version is current.
	pub current: Option<CurrentHandles>,
}

/// Handles introduced with the current deployments.
#[derive(Debug, Clone)]
pub(crate) struct CurrentHandles {
	pub user_manager_info: ObjectId,
	pub core_state: ObjectId,
	pub clock: ObjectId,
	pub approval: ObjectId,
	pub lending_portal: ObjectId,
}

/// Binding to one deployment of the lending protocol.
///
/// Holds validated handles and a shared transport, so it is cheap to clone
/// and safe to use from many tasks at once.
#[derive(Clone)]
pub struct Contract {
	pub(crate) transport: Arc<dyn TransportInterface>,
	pub(crate) version: ProtocolVersion,
	pub(crate) handles: Handles,
}

fn parse_handle(field: &'static str, value: &str) -> Result<ObjectId, LendingError> {
	ObjectId::from_hex(value).map_err(|source| LendingError::Config { field, source })
}

impl Contract {
	/// Validates every handle the protocol version needs.
	///
	/// Handles are checked in a fixed order and the first invalid one is
	/// reported by field name. Nothing is built unless all of them parse.
	pub fn new(
		transport: Arc<dyn TransportInterface>,
		config: &ContractConfig,
		version: ProtocolVersion,
	) -> Result<Self, LendingError> {
		let lending_portal_package =
			parse_handle("lending_portal_package_id", &config.lending_portal_package_id)?;
		let external_interfaces_package = parse_handle(
			"external_interfaces_package_id",
			&config.external_interfaces_package_id,
		)?;
		let bridge_pool_package =
			parse_handle("bridge_pool_package_id", &config.bridge_pool_package_id)?;
		let pool_manager_info = parse_handle("pool_manager_info", &config.pool_manager_info)?;
		let pool_state = parse_handle("pool_state", &config.pool_state)?;
		let price_oracle = parse_handle("price_oracle", &config.price_oracle)?;
		let storage = parse_handle("storage", &config.storage)?;
		let wormhole_state = parse_handle("wormhole_state", &config.wormhole_state)?;

		let current = match version {
			ProtocolVersion::Legacy => None,
			ProtocolVersion::Current => Some(CurrentHandles {
				user_manager_info: parse_handle("user_manager_info", &config.user_manager_info)?,
				core_state: parse_handle("core_state", &config.core_state)?,
				clock: parse_handle("clock", &config.clock)?,
				approval: parse_handle("approval", &config.approval)?,
				lending_portal: parse_handle("lending_portal", &config.lending_portal)?,
			}),
		};

		tracing::info!(
			%version,
			lending_portal = %lending_portal_package,
			external_interfaces = %external_interfaces_package,
			"Initialized lending contract binding"
		);

		Ok(Self {
			transport,
			version,
			handles: Handles {
				lending_portal_package,
				external_interfaces_package,
				bridge_pool_package,
				pool_manager_info,
				pool_state,
				price_oracle,
				storage,
				wormhole_state,
				current,
			},
		})
	}

	pub fn version(&self) -> ProtocolVersion {
		self.version
	}

	pub(crate) fn unsupported(&self, operation: &'static str) -> LendingError {
		LendingError::Unsupported {
			operation,
			version: self.version,
		}
	}

	/// Handles of a current deployment, or `Unsupported` on legacy ones.
	pub(crate) fn current(&self, operation: &'static str) -> Result<&CurrentHandles, LendingError> {
		self.handles
			.current
			.as_ref()
			.ok_or_else(|| self.unsupported(operation))
	}

	/// Encodes an amount the way the deployment's entry points take it.
	pub(crate) fn amount_arg(&self, name: &str, value: U256) -> Result<CallArg, LendingError> {
		match self.version {
			ProtocolVersion::Legacy => u64::try_from(value).map(CallArg::U64).map_err(|_| {
				LendingError::InvalidArgument(format!(
					"{} {} does not fit in u64",
					name, value
				))
			}),
			ProtocolVersion::Current => Ok(CallArg::Str(value.to_string())),
		}
	}

	/// Encodes a destination chain id.
	pub(crate) fn chain_arg(&self, dst_chain: u16) -> CallArg {
		match self.version {
			ProtocolVersion::Legacy => CallArg::U64(u64::from(dst_chain)),
			ProtocolVersion::Current => CallArg::U16(dst_chain),
		}
	}

	pub(crate) async fn submit(
		&self,
		request: MoveCallRequest,
	) -> Result<TransactionBytes, LendingError> {
		tracing::debug!(
			target_fn = %request.target(),
			args = request.arguments.len(),
			"Building move call"
		);
		Ok(self.transport.move_call(request).await?)
	}

	fn portal_call(&self, signer: &SuiAddress, function: &str) -> MoveCallRequest {
		let module = match self.version {
			ProtocolVersion::Legacy => "lending",
			ProtocolVersion::Current => "lending_portal",
		};
		MoveCallRequest::new(signer, &self.handles.lending_portal_package, module, function)
	}

	/// Deposits coins into a pool.
	pub async fn supply(
		&self,
		signer: &SuiAddress,
		type_args: Vec<String>,
		args: &SupplyArgs,
		options: &CallOptions,
	) -> Result<TransactionBytes, LendingError> {
		let h = &self.handles;
		let arguments = match &h.current {
			None => vec![
				CallArg::from(&h.pool_state),
				CallArg::from(&h.wormhole_state),
				CallArg::ObjectVec(args.bridge_fee_coins.clone()),
				self.amount_arg("bridge_fee_amount", args.bridge_fee_amount)?,
				CallArg::from(&args.pool),
				CallArg::ObjectVec(args.deposit_coins.clone()),
				self.amount_arg("deposit_amount", args.deposit_amount)?,
			],
			Some(c) => vec![
				CallArg::from(&h.storage),
				CallArg::from(&h.price_oracle),
				CallArg::from(&c.clock),
				CallArg::from(&c.lending_portal),
				CallArg::from(&c.user_manager_info),
				CallArg::from(&h.pool_manager_info),
				CallArg::from(&args.pool),
				CallArg::ObjectVec(args.deposit_coins.clone()),
				self.amount_arg("deposit_amount", args.deposit_amount)?,
			],
		};
		self.submit(
			self.portal_call(signer, "supply")
				.with_type_arguments(type_args)
				.with_arguments(arguments)
				.with_options(options),
		)
		.await
	}

	/// Withdraws to the signer on Sui.
	pub async fn withdraw_local(
		&self,
		signer: &SuiAddress,
		type_args: Vec<String>,
		args: &WithdrawLocalArgs,
		options: &CallOptions,
	) -> Result<TransactionBytes, LendingError> {
		let arguments = self.local_arguments("withdraw_local", &args.pool, args.amount)?;
		self.submit(
			self.portal_call(signer, "withdraw_local")
				.with_type_arguments(type_args)
				.with_arguments(arguments)
				.with_options(options),
		)
		.await
	}

	/// Withdraws to a receiver on another chain.
	pub async fn withdraw_remote(
		&self,
		signer: &SuiAddress,
		type_args: Vec<String>,
		args: &WithdrawRemoteArgs,
		options: &CallOptions,
	) -> Result<TransactionBytes, LendingError> {
		let remote = RemoteCall {
			pool: &args.pool,
			receiver: &args.receiver,
			dst_chain: args.dst_chain,
			amount: args.amount,
			bridge_fee_coins: &args.bridge_fee_coins,
			bridge_fee_amount: args.bridge_fee_amount,
		};
		let (function, arguments) = match self.version {
			ProtocolVersion::Legacy => ("withdraw", self.legacy_remote_arguments(&remote)?),
			ProtocolVersion::Current => (
				"withdraw_remote",
				self.current_remote_arguments("withdraw_remote", &remote)?,
			),
		};
		self.submit(
			self.portal_call(signer, function)
				.with_type_arguments(type_args)
				.with_arguments(arguments)
				.with_options(options),
		)
		.await
	}

	/// Borrows to the signer on Sui.
	pub async fn borrow_local(
		&self,
		signer: &SuiAddress,
		type_args: Vec<String>,
		args: &BorrowLocalArgs,
		options: &CallOptions,
	) -> Result<TransactionBytes, LendingError> {
		let arguments = self.local_arguments("borrow_local", &args.pool, args.amount)?;
		self.submit(
			self.portal_call(signer, "borrow_local")
				.with_type_arguments(type_args)
				.with_arguments(arguments)
				.with_options(options),
		)
		.await
	}

	/// Borrows to a receiver on another chain.
	pub async fn borrow_remote(
		&self,
		signer: &SuiAddress,
		type_args: Vec<String>,
		args: &BorrowRemoteArgs,
		options: &CallOptions,
	) -> Result<TransactionBytes, LendingError> {
		let remote = RemoteCall {
			pool: &args.pool,
			receiver: &args.receiver,
			dst_chain: args.dst_chain,
			amount: args.amount,
			bridge_fee_coins: &args.bridge_fee_coins,
			bridge_fee_amount: args.bridge_fee_amount,
		};
		let (function, arguments) = match self.version {
			ProtocolVersion::Legacy => ("borrow", self.legacy_remote_arguments(&remote)?),
			ProtocolVersion::Current => (
				"borrow_remote",
				self.current_remote_arguments("borrow_remote", &remote)?,
			),
		};
		self.submit(
			self.portal_call(signer, function)
				.with_type_arguments(type_args)
				.with_arguments(arguments)
				.with_options(options),
		)
		.await
	}

	/// Repays debt with the given coins.
	pub async fn repay(
		&self,
		signer: &SuiAddress,
		type_args: Vec<String>,
		args: &RepayArgs,
		options: &CallOptions,
	) -> Result<TransactionBytes, LendingError> {
		let h = &self.handles;
		let arguments = match &h.current {
			None => vec![
				CallArg::from(&args.pool),
				CallArg::from(&h.pool_state),
				CallArg::from(&h.wormhole_state),
				CallArg::ObjectVec(args.bridge_fee_coins.clone()),
				self.amount_arg("bridge_fee_amount", args.bridge_fee_amount)?,
				CallArg::ObjectVec(args.repay_coins.clone()),
				self.amount_arg("repay_amount", args.repay_amount)?,
			],
			Some(c) => vec![
				CallArg::from(&c.approval),
				CallArg::from(&h.storage),
				CallArg::from(&h.price_oracle),
				CallArg::from(&c.clock),
				CallArg::from(&c.lending_portal),
				CallArg::from(&c.user_manager_info),
				CallArg::from(&h.pool_manager_info),
				CallArg::from(&args.pool),
				CallArg::ObjectVec(args.repay_coins.clone()),
				self.amount_arg("repay_amount", args.repay_amount)?,
			],
		};
		self.submit(
			self.portal_call(signer, "repay")
				.with_type_arguments(type_args)
				.with_arguments(arguments)
				.with_options(options),
		)
		.await
	}

	/// Arguments shared by `withdraw_local` and `borrow_local`.
	fn local_arguments(
		&self,
		operation: &'static str,
		pool: &ObjectId,
		amount: U256,
	) -> Result<Vec<CallArg>, LendingError> {
		let h = &self.handles;
		let c = self.current(operation)?;
		Ok(vec![
			CallArg::from(&c.approval),
			CallArg::from(&h.storage),
			CallArg::from(&h.price_oracle),
			CallArg::from(&c.clock),
			CallArg::from(&c.lending_portal),
			CallArg::from(&h.pool_manager_info),
			CallArg::from(&c.user_manager_info),
			CallArg::from(pool),
			self.amount_arg("amount", amount)?,
		])
	}

	fn legacy_remote_arguments(&self, call: &RemoteCall<'_>) -> Result<Vec<CallArg>, LendingError> {
		let h = &self.handles;
		Ok(vec![
			CallArg::from(call.pool),
			CallArg::from(&h.pool_state),
			CallArg::from(&h.wormhole_state),
			CallArg::Bytes(call.receiver.to_vec()),
			self.chain_arg(call.dst_chain),
			CallArg::ObjectVec(call.bridge_fee_coins.to_vec()),
			self.amount_arg("bridge_fee_amount", call.bridge_fee_amount)?,
			self.amount_arg("amount", call.amount)?,
		])
	}

	fn current_remote_arguments(
		&self,
		operation: &'static str,
		call: &RemoteCall<'_>,
	) -> Result<Vec<CallArg>, LendingError> {
		let h = &self.handles;
		let c = self.current(operation)?;
		Ok(vec![
			CallArg::from(&c.approval),
			CallArg::from(&h.storage),
			CallArg::from(&h.price_oracle),
			CallArg::from(&c.clock),
			CallArg::from(&c.lending_portal),
			CallArg::from(&h.wormhole_state),
			CallArg::from(&c.core_state),
			CallArg::from(&h.pool_manager_info),
			CallArg::from(&c.user_manager_info),
			CallArg::from(call.pool),
			CallArg::Bytes(call.receiver.to_vec()),
			self.chain_arg(call.dst_chain),
			self.amount_arg("amount", call.amount)?,
			CallArg::ObjectVec(call.bridge_fee_coins.to_vec()),
			self.amount_arg("bridge_fee_amount", call.bridge_fee_amount)?,
		])
	}
}

/// Fields common to remote withdraw and remote borrow.
struct RemoteCall<'a> {
	pool: &'a ObjectId,
	receiver: &'a [u8],
	dst_chain: u16,
	amount: U256,
	bridge_fee_coins: &'a [ObjectId],
	bridge_fee_amount: U256,
}
