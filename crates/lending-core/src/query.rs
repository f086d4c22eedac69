//! Read-only queries.
//!
//! The protocol's interface functions answer by emitting an event. A query
//! builds the call, dry-runs it and decodes the last event of the simulation;
//! nothing is ever committed.

use crate::decoder::{decoder, AllowedBorrow, EventDecoder};
use crate::{Contract, LendingError};
use lending_types::{
	CallArg, CallOptions, CollateralItem, DolaTokenPrice, DolaUserAddress, DryRunResponse,
	ExecutionStatus, MoveCallRequest, PoolInfo, PoolKey, ProtocolVersion, ReserveInfo,
	SuiAddress, UserKey, UserLendingInfo, U256,
};
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::instrument;

const MODULE: &str = "interfaces";

/// Turns a dry-run result into a decoded value.
///
/// A failed simulation yields the node's error message unchanged. A successful
/// one must carry at least one event; the last event is the result and earlier
/// ones are informational. Its body is taken out of the version's envelope and
/// handed to `decode`. A panic while decoding becomes
/// [`LendingError::EventParsePanic`].
pub fn parse_last_event<T>(
	response: &DryRunResponse,
	decoder: &dyn EventDecoder,
	decode: impl FnOnce(&Value) -> Result<T, LendingError>,
) -> Result<T, LendingError> {
	if let ExecutionStatus::Failure { error } = &response.status {
		tracing::warn!(error = %error, "Dry run failed");
		return Err(LendingError::Simulation(error.clone()));
	}

	let event = response.last_event().ok_or(LendingError::InvalidEvents)?;
	tracing::debug!(
		events = response.events.len(),
		version = %decoder.version(),
		"Decoding last event"
	);
	let body = decoder.body(event);

	catch_unwind(AssertUnwindSafe(|| decode(body))).unwrap_or_else(|_| {
		tracing::warn!("Event decoder panicked");
		Err(LendingError::EventParsePanic)
	})
}

impl Contract {
	pub fn decoder(&self) -> &'static dyn EventDecoder {
		decoder(self.version)
	}

	/// Encodes a pool key for the deployment's interface functions.
	fn pool_arg(&self, pool: &PoolKey) -> Result<CallArg, LendingError> {
		match (self.version, pool) {
			(ProtocolVersion::Legacy, PoolKey::Token(name)) => {
				Ok(CallArg::Str(name.strip_prefix("0x").unwrap_or(name).to_string()))
			},
			(ProtocolVersion::Current, PoolKey::Dola(id)) => Ok(CallArg::U16(*id)),
			(version, key) => Err(LendingError::InvalidArgument(format!(
				"{} queries cannot take {}",
				version, key
			))),
		}
	}

	fn user_arg(&self, user: &UserKey) -> Result<CallArg, LendingError> {
		match (self.version, user) {
			(ProtocolVersion::Legacy, UserKey::Address(address)) => Ok(CallArg::Str(address.to_string())),
			(ProtocolVersion::Current, UserKey::DolaUserId(id)) => Ok(CallArg::Str(id.clone())),
			(version, key) => Err(LendingError::InvalidArgument(format!(
				"{} queries cannot take {}",
				version, key
			))),
		}
	}

	#[instrument(skip_all, fields(function = function, version = %self.version))]
	async fn query<T>(
		&self,
		signer: &SuiAddress,
		function: &'static str,
		arguments: Vec<CallArg>,
		options: &CallOptions,
		decode: impl FnOnce(&dyn EventDecoder, &Value) -> Result<T, LendingError>,
	) -> Result<T, LendingError> {
		let request = MoveCallRequest::new(
			signer,
			&self.handles.external_interfaces_package,
			MODULE,
			function,
		)
		.with_arguments(arguments)
		.with_options(options);

		let tx = self.submit(request).await?;
		let response = self.transport.dry_run(&tx).await?;
		let decoder = self.decoder();
		parse_last_event(&response, decoder, |body| decode(decoder, body))
	}

	/// Total liquidity of a pool across chains.
	pub async fn get_dola_token_liquidity(
		&self,
		signer: &SuiAddress,
		pool: &PoolKey,
		options: &CallOptions,
	) -> Result<U256, LendingError> {
		let arguments = vec![
			CallArg::from(&self.handles.pool_manager_info),
			self.pool_arg(pool)?,
		];
		self.query(signer, "get_dola_token_liquidity", arguments, options, |d, body| {
			Ok(d.dola_token_liquidity(body)?)
		})
		.await
	}

	/// Liquidity of a pool reserved for one application.
	pub async fn get_app_token_liquidity(
		&self,
		signer: &SuiAddress,
		app_id: u16,
		pool: &PoolKey,
		options: &CallOptions,
	) -> Result<U256, LendingError> {
		let arguments = vec![
			CallArg::from(&self.handles.pool_manager_info),
			CallArg::U16(app_id),
			self.pool_arg(pool)?,
		];
		self.query(signer, "get_app_token_liquidity", arguments, options, |d, body| {
			Ok(d.app_token_liquidity(body)?)
		})
		.await
	}

	/// Liquidity of the pool at `pool_address` on one chain.
	pub async fn get_pool_liquidity(
		&self,
		signer: &SuiAddress,
		dola_chain_id: u16,
		pool_address: &str,
		options: &CallOptions,
	) -> Result<U256, LendingError> {
		self.current("get_pool_liquidity")?;
		let arguments = vec![
			CallArg::from(&self.handles.pool_manager_info),
			CallArg::U16(dola_chain_id),
			CallArg::Str(pool_address.to_string()),
		];
		self.query(signer, "get_pool_liquidity", arguments, options, |d, body| {
			Ok(d.pool_liquidity(body)?)
		})
		.await
	}

	/// Liquidity of a dola pool on every chain.
	pub async fn get_all_pool_liquidity(
		&self,
		signer: &SuiAddress,
		pool: &PoolKey,
		options: &CallOptions,
	) -> Result<Vec<PoolInfo>, LendingError> {
		self.current("get_all_pool_liquidity")?;
		let arguments = vec![
			CallArg::from(&self.handles.pool_manager_info),
			self.pool_arg(pool)?,
		];
		self.query(signer, "get_all_pool_liquidity", arguments, options, |d, body| {
			Ok(d.all_pool_liquidity(body)?)
		})
		.await
	}

	/// A user's debt in one pool, as (amount, value).
	pub async fn get_user_token_debt(
		&self,
		signer: &SuiAddress,
		user: &UserKey,
		pool: &PoolKey,
		options: &CallOptions,
	) -> Result<(U256, U256), LendingError> {
		let arguments = vec![
			CallArg::from(&self.handles.storage),
			CallArg::from(&self.handles.price_oracle),
			self.user_arg(user)?,
			self.pool_arg(pool)?,
		];
		self.query(signer, "get_user_token_debt", arguments, options, |d, body| {
			Ok(d.user_token_debt(body)?)
		})
		.await
	}

	pub async fn get_user_collateral(
		&self,
		signer: &SuiAddress,
		user: &UserKey,
		pool: &PoolKey,
		options: &CallOptions,
	) -> Result<CollateralItem, LendingError> {
		let arguments = vec![
			CallArg::from(&self.handles.storage),
			CallArg::from(&self.handles.price_oracle),
			self.user_arg(user)?,
			self.pool_arg(pool)?,
		];
		self.query(signer, "get_user_collateral", arguments, options, |d, body| {
			Ok(d.user_collateral(body)?)
		})
		.await
	}

	pub async fn get_reserve_info(
		&self,
		signer: &SuiAddress,
		pool: &PoolKey,
		options: &CallOptions,
	) -> Result<ReserveInfo, LendingError> {
		let arguments = vec![
			CallArg::from(&self.handles.pool_manager_info),
			CallArg::from(&self.handles.storage),
			self.pool_arg(pool)?,
		];
		self.query(signer, "get_reserve_info", arguments, options, |d, body| {
			Ok(d.reserve_info(body)?)
		})
		.await
	}

	pub async fn get_all_reserve_info(
		&self,
		signer: &SuiAddress,
		options: &CallOptions,
	) -> Result<Vec<ReserveInfo>, LendingError> {
		self.current("get_all_reserve_info")?;
		let arguments = vec![
			CallArg::from(&self.handles.pool_manager_info),
			CallArg::from(&self.handles.storage),
		];
		self.query(signer, "get_all_reserve_info", arguments, options, |d, body| {
			Ok(d.all_reserve_info(body)?)
		})
		.await
	}

	/// How much a user may still borrow from a pool.
	///
	/// A zero allowance that comes with a reason is returned as
	/// [`LendingError::Rejected`].
	pub async fn get_user_allowed_borrow(
		&self,
		signer: &SuiAddress,
		user: &UserKey,
		pool: &PoolKey,
		options: &CallOptions,
	) -> Result<U256, LendingError> {
		let h = &self.handles;
		let mut arguments = vec![
			CallArg::from(&h.pool_manager_info),
			CallArg::from(&h.storage),
			CallArg::from(&h.price_oracle),
		];
		match self.version {
			ProtocolVersion::Legacy => {
				arguments.extend([self.pool_arg(pool)?, self.user_arg(user)?])
			},
			ProtocolVersion::Current => {
				arguments.extend([self.user_arg(user)?, self.pool_arg(pool)?])
			},
		}
		self.query(signer, "get_user_allowed_borrow", arguments, options, |d, body| {
			match d.user_allowed_borrow(body)? {
				AllowedBorrow::Amount(amount) => Ok(amount),
				AllowedBorrow::Rejected(reason) => Err(LendingError::Rejected(reason)),
			}
		})
		.await
	}

	pub async fn get_user_lending_info(
		&self,
		signer: &SuiAddress,
		user: &UserKey,
		options: &CallOptions,
	) -> Result<UserLendingInfo, LendingError> {
		let arguments = vec![
			CallArg::from(&self.handles.storage),
			CallArg::from(&self.handles.price_oracle),
			self.user_arg(user)?,
		];
		self.query(signer, "get_user_lending_info", arguments, options, |d, body| {
			Ok(d.user_lending_info(body)?)
		})
		.await
	}

	pub async fn get_oracle_price(
		&self,
		signer: &SuiAddress,
		pool: &PoolKey,
		options: &CallOptions,
	) -> Result<DolaTokenPrice, LendingError> {
		self.current("get_oracle_price")?;
		let arguments = vec![
			CallArg::from(&self.handles.price_oracle),
			self.pool_arg(pool)?,
		];
		self.query(signer, "get_oracle_price", arguments, options, |d, body| {
			Ok(d.oracle_price(body)?)
		})
		.await
	}

	pub async fn get_all_oracle_price(
		&self,
		signer: &SuiAddress,
		options: &CallOptions,
	) -> Result<Vec<DolaTokenPrice>, LendingError> {
		self.current("get_all_oracle_price")?;
		let arguments = vec![
			CallArg::from(&self.handles.storage),
			CallArg::from(&self.handles.price_oracle),
		];
		self.query(signer, "get_all_oracle_price", arguments, options, |d, body| {
			Ok(d.all_oracle_price(body)?)
		})
		.await
	}

	/// Resolves the dola user id bound to `user` on `dola_chain_id`.
	///
	/// Fails when no binding exists.
	pub async fn get_dola_user_id(
		&self,
		signer: &SuiAddress,
		dola_chain_id: u16,
		user: &str,
		options: &CallOptions,
	) -> Result<String, LendingError> {
		let current = self.current("get_dola_user_id")?;
		let arguments = vec![
			CallArg::from(&current.user_manager_info),
			CallArg::U16(dola_chain_id),
			CallArg::Str(user.to_string()),
		];
		self.query(signer, "get_dola_user_id", arguments, options, |d, body| {
			Ok(d.dola_user_id(body)?)
		})
		.await
	}

	/// Every address bound to a dola user id.
	pub async fn get_dola_user_addresses(
		&self,
		signer: &SuiAddress,
		user: &UserKey,
		options: &CallOptions,
	) -> Result<Vec<DolaUserAddress>, LendingError> {
		let current = self.current("get_dola_user_addresses")?;
		let arguments = vec![CallArg::from(&current.user_manager_info), self.user_arg(user)?];
		self.query(signer, "get_dola_user_addresses", arguments, options, |d, body| {
			Ok(d.dola_user_addresses(body)?)
		})
		.await
	}

	pub async fn get_user_health_factor(
		&self,
		signer: &SuiAddress,
		user: &UserKey,
		options: &CallOptions,
	) -> Result<U256, LendingError> {
		self.current("get_user_health_factor")?;
		let arguments = vec![
			CallArg::from(&self.handles.storage),
			CallArg::from(&self.handles.price_oracle),
			self.user_arg(user)?,
		];
		self.query(signer, "get_user_health_factor", arguments, options, |d, body| {
			Ok(d.user_health_factor(body)?)
		})
		.await
	}
}
