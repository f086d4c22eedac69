//! Client binding for the Dola lending protocol on Sui.
//!
//! [`Contract`] prepares unsigned move calls for the lending entry points and
//! answers read-only queries by dry-running the protocol's interface functions
//! and decoding the event they emit. Everything that differs between
//! deployment generations (argument order, amount encoding, event shape) is
//! selected once from the configured [`ProtocolVersion`].

use lending_transport::TransportError;
use lending_types::{HandleError, ProtocolVersion};
use thiserror::Error;

pub mod bridge;
pub mod contract;
pub mod decoder;
pub mod events;
pub mod faucet;
pub mod query;

pub use contract::Contract;
pub use decoder::{decoder, AllowedBorrow, CurrentDecoder, DecodeError, EventDecoder, LegacyDecoder};
pub use faucet::Faucet;
pub use query::parse_last_event;

/// Errors returned by the lending binding.
#[derive(Debug, Error)]
pub enum LendingError {
	/// A configured handle is not a valid object id.
	#[error("Invalid {field}: {source}")]
	Config {
		field: &'static str,
		#[source]
		source: HandleError,
	},
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The simulated call aborted; carries the node's message verbatim.
	#[error("{0}")]
	Simulation(String),
	#[error("invalid events")]
	InvalidEvents,
	#[error("event parse failed: {0}")]
	EventParse(#[from] DecodeError),
	/// Decoding panicked.
	#[error("event parse failed")]
	EventParsePanic,
	/// The protocol refused the request and said why.
	#[error("{0}")]
	Rejected(String),
	#[error("{operation} is not supported by the {version} protocol")]
	Unsupported {
		operation: &'static str,
		version: ProtocolVersion,
	},
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
}
