//! Common types for the Dola Sui lending client.
//!
//! This crate defines the data shared by every other crate in the workspace:
//! validated on-chain handles, the protocol version selector, move call
//! arguments, dry-run results and the typed lending results produced by the
//! event decoders.

/// Operation arguments and query keys supplied by callers.
pub mod args;
/// Move call requests, call arguments and unsigned transaction payloads.
pub mod call;
/// Dry-run (simulation) results returned by the transport.
pub mod dry_run;
/// Hex object ids and addresses.
pub mod handle;
/// Typed lending results decoded from query events.
pub mod lending;
/// Hex prefix and decimal serde helpers.
pub mod utils;
/// Protocol schema versions.
pub mod version;

pub use alloy_primitives::U256;
pub use args::*;
pub use call::*;
pub use dry_run::*;
pub use handle::{HandleError, ObjectId, SuiAddress};
pub use lending::*;
pub use utils::without_0x_prefix;
pub use version::ProtocolVersion;
