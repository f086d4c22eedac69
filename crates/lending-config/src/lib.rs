//! Configuration for the Dola lending client.
//!
//! Configuration is a single TOML file. String values may reference
//! environment variables as `${VAR}` or `${VAR:-default}`; they are substituted
//! before parsing so handles and endpoints can be kept out of the file.

use lending_types::ProtocolVersion;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Configuration error: {0}")]
	Parse(String),
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// The full error embeds the whole input.
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	pub network: NetworkConfig,
	#[serde(default)]
	pub protocol: ProtocolConfig,
	pub contract: ContractConfig,
	/// Devnet faucet, when the deployment has one.
	pub faucet: Option<FaucetConfig>,
}

/// Sui full node connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// JSON-RPC endpoint of the full node.
	pub rpc_url: String,
	#[serde(default = "default_request_timeout_seconds")]
	pub request_timeout_seconds: u64,
	/// Gas budget attached to every built call.
	#[serde(default = "default_gas_budget")]
	pub gas_budget: u64,
}

fn default_request_timeout_seconds() -> u64 {
	30
}

fn default_gas_budget() -> u64 {
	10_000_000
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProtocolConfig {
	/// Deployment generation the handles below belong to.
	#[serde(default)]
	pub version: ProtocolVersion,
}

/// Hex handles of the deployed lending contracts.
///
/// Handles the configured protocol version does not use may be left empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
	pub lending_portal_package_id: String,
	pub external_interfaces_package_id: String,
	pub bridge_pool_package_id: String,
	pub pool_manager_info: String,
	pub pool_state: String,
	pub price_oracle: String,
	pub storage: String,
	pub wormhole_state: String,
	pub user_manager_info: String,
	pub core_state: String,
	pub clock: String,
	/// Governance genesis object gating withdraw, borrow and repay.
	pub approval: String,
	/// Shared state of the lending portal.
	pub lending_portal: String,
}

/// The Sui system clock lives at a fixed address.
fn default_clock() -> String {
	"0x0000000000000000000000000000000000000000000000000000000000000006".to_string()
}

impl Default for ContractConfig {
	fn default() -> Self {
		Self {
			lending_portal_package_id: String::new(),
			external_interfaces_package_id: String::new(),
			bridge_pool_package_id: String::new(),
			pool_manager_info: String::new(),
			pool_state: String::new(),
			price_oracle: String::new(),
			storage: String::new(),
			wormhole_state: String::new(),
			user_manager_info: String::new(),
			core_state: String::new(),
			clock: default_clock(),
			approval: String::new(),
			lending_portal: String::new(),
		}
	}
}

impl ContractConfig {
	/// Handles the given protocol version needs, in construction order.
	///
	/// Each entry is the field name and its configured value.
	pub fn required_handles(&self, version: ProtocolVersion) -> Vec<(&'static str, &str)> {
		let mut handles = vec![
			("lending_portal_package_id", self.lending_portal_package_id.as_str()),
			(
				"external_interfaces_package_id",
				self.external_interfaces_package_id.as_str(),
			),
			("bridge_pool_package_id", self.bridge_pool_package_id.as_str()),
			("pool_manager_info", self.pool_manager_info.as_str()),
			("pool_state", self.pool_state.as_str()),
			("price_oracle", self.price_oracle.as_str()),
			("storage", self.storage.as_str()),
			("wormhole_state", self.wormhole_state.as_str()),
		];
		if version == ProtocolVersion::Current {
			handles.extend([
				("user_manager_info", self.user_manager_info.as_str()),
				("core_state", self.core_state.as_str()),
				("clock", self.clock.as_str()),
				("approval", self.approval.as_str()),
				("lending_portal", self.lending_portal.as_str()),
			]);
		}
		handles
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FaucetConfig {
	pub package_id: String,
	pub faucet_id: String,
}

/// Substitutes `${VAR}` and `${VAR:-default}` references with environment values.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;
	for cap in re.captures_iter(input) {
		let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match std::env::var(name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						name.as_str()
					)))
				},
			},
		};
		result.push_str(&input[last..whole.start()]);
		result.push_str(&value);
		last = whole.end();
	}
	result.push_str(&input[last..]);

	Ok(result)
}

impl Config {
	/// Loads and validates configuration from a TOML file.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path.as_ref()).await?;
		content.parse()
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.network.rpc_url.trim().is_empty() {
			return Err(ConfigError::Validation("network.rpc_url cannot be empty".into()));
		}
		if self.network.request_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"network.request_timeout_seconds must be greater than 0".into(),
			));
		}
		if self.network.gas_budget == 0 {
			return Err(ConfigError::Validation(
				"network.gas_budget must be greater than 0".into(),
			));
		}

		let version = self.protocol.version;
		for (field, value) in self.contract.required_handles(version) {
			if value.trim().is_empty() {
				return Err(ConfigError::Validation(format!(
					"contract.{} is required for the {} protocol",
					field, version
				)));
			}
		}

		if let Some(faucet) = &self.faucet {
			if faucet.package_id.trim().is_empty() || faucet.faucet_id.trim().is_empty() {
				return Err(ConfigError::Validation(
					"faucet.package_id and faucet.faucet_id must both be set".into(),
				));
			}
		}

		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
