//! Address binding through the bridge pool.
//!
//! Binding lets a dola user act from another chain's address. Both calls send
//! a wormhole message, so they carry a fee in SUI. The bridge pool takes the
//! fee as a decimal string on every deployment.

use crate::{Contract, LendingError};
use lending_types::{
	BindingArgs, CallArg, CallOptions, MoveCallRequest, ObjectId, SuiAddress, TransactionBytes,
	UnbindingArgs, U256,
};

const MODULE: &str = "bridge_pool";

impl Contract {
	/// Binds `bind_address` on `dola_chain_id` to the signer's dola user id.
	pub async fn send_binding(
		&self,
		signer: &SuiAddress,
		type_args: Vec<String>,
		args: &BindingArgs,
		options: &CallOptions,
	) -> Result<TransactionBytes, LendingError> {
		let arguments = self.bridge_arguments(
			&args.bridge_fee_coins,
			args.bridge_fee_amount,
			args.dola_chain_id,
			&args.bind_address,
		);
		self.submit(
			MoveCallRequest::new(signer, &self.handles.bridge_pool_package, MODULE, "send_binding")
				.with_type_arguments(type_args)
				.with_arguments(arguments)
				.with_options(options),
		)
		.await
	}

	/// Removes a binding created by [`Contract::send_binding`].
	pub async fn send_unbinding(
		&self,
		signer: &SuiAddress,
		type_args: Vec<String>,
		args: &UnbindingArgs,
		options: &CallOptions,
	) -> Result<TransactionBytes, LendingError> {
		let arguments = self.bridge_arguments(
			&args.bridge_fee_coins,
			args.bridge_fee_amount,
			args.dola_chain_id,
			&args.unbind_address,
		);
		self.submit(
			MoveCallRequest::new(
				signer,
				&self.handles.bridge_pool_package,
				MODULE,
				"send_unbinding",
			)
			.with_type_arguments(type_args)
			.with_arguments(arguments)
			.with_options(options),
		)
		.await
	}

	fn bridge_arguments(
		&self,
		fee_coins: &[ObjectId],
		fee_amount: U256,
		dola_chain_id: u16,
		address: &str,
	) -> Vec<CallArg> {
		let h = &self.handles;
		vec![
			CallArg::from(&h.pool_state),
			CallArg::from(&h.wormhole_state),
			CallArg::ObjectVec(fee_coins.to_vec()),
			CallArg::Str(fee_amount.to_string()),
			CallArg::U16(dola_chain_id),
			CallArg::Str(address.to_string()),
		]
	}
}
