//! Command-line client for the Dola lending protocol.
//!
//! Runs read-only queries against a configured deployment and prints the
//! decoded result as JSON. Mutating calls are printed as unsigned
//! transactions for an external signer.

use clap::{Parser, Subcommand};
use lending_config::Config;
use lending_core::{Contract, Faucet};
use lending_transport::create_transport;
use lending_types::{CallOptions, PoolKey, ProtocolVersion, SuiAddress, UserKey};
use serde::Serialize;
use std::path::PathBuf;

/// Command-line arguments for the lending client.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "warn")]
	log_level: String,

	/// Address the calls are built for
	#[arg(short, long, env = "LENDING_SIGNER")]
	signer: SuiAddress,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Reserve state of one pool
	ReserveInfo {
		/// Dola pool id, or coin type name on legacy deployments
		#[arg(long)]
		pool: String,
	},
	/// Reserve state of every pool
	AllReserveInfo,
	/// Lending position of a user
	LendingInfo {
		/// Dola user id, or Sui address on legacy deployments
		#[arg(long)]
		user: String,
	},
	/// Oracle price of one pool's token
	OraclePrice {
		#[arg(long)]
		pool: String,
	},
	/// Oracle prices of every pool
	AllOraclePrice,
	/// Health factor of a user
	HealthFactor {
		#[arg(long)]
		user: String,
	},
	/// Dola user id bound to an address
	UserId {
		#[arg(long)]
		chain: u16,
		#[arg(long)]
		address: String,
	},
	/// Addresses bound to a dola user id
	UserAddresses {
		#[arg(long)]
		user: String,
	},
	/// Total liquidity of a pool
	TokenLiquidity {
		#[arg(long)]
		pool: String,
	},
	/// Amount a user may still borrow from a pool
	AllowedBorrow {
		#[arg(long)]
		user: String,
		#[arg(long)]
		pool: String,
	},
	/// Build a faucet claim for a coin type
	Claim {
		/// Coin type, for example `0x2::sui::SUI`
		#[arg(long)]
		coin: String,
	},
}

fn pool_key(version: ProtocolVersion, pool: &str) -> Result<PoolKey, Box<dyn std::error::Error>> {
	match version {
		ProtocolVersion::Legacy => Ok(PoolKey::Token(pool.to_string())),
		ProtocolVersion::Current => Ok(PoolKey::Dola(pool.parse()?)),
	}
}

fn user_key(version: ProtocolVersion, user: &str) -> Result<UserKey, Box<dyn std::error::Error>> {
	match version {
		ProtocolVersion::Legacy => Ok(UserKey::Address(user.parse()?)),
		ProtocolVersion::Current => Ok(UserKey::DolaUserId(user.to_string())),
	}
}

fn print<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config = Config::from_file(&args.config).await?;
	let version = config.protocol.version;
	tracing::info!(%version, rpc = %config.network.rpc_url, "Loaded configuration");

	let transport = create_transport(&config.network, version)?;
	let options = CallOptions::new(None, config.network.gas_budget);

	match args.command {
		Command::Claim { coin } => {
			let faucet_config = config
				.faucet
				.as_ref()
				.ok_or("no [faucet] section in configuration")?;
			let faucet = Faucet::from_config(transport, faucet_config)?;
			print(&faucet.claim(&args.signer, vec![coin], &options).await?)
		},
		command => {
			let contract = Contract::new(transport, &config.contract, version)?;
			query(&contract, &args.signer, command, &options).await
		},
	}
}

async fn query(
	contract: &Contract,
	signer: &SuiAddress,
	command: Command,
	options: &CallOptions,
) -> Result<(), Box<dyn std::error::Error>> {
	let version = contract.version();
	match command {
		Command::ReserveInfo { pool } => {
			let pool = pool_key(version, &pool)?;
			print(&contract.get_reserve_info(signer, &pool, options).await?)
		},
		Command::AllReserveInfo => print(&contract.get_all_reserve_info(signer, options).await?),
		Command::LendingInfo { user } => {
			let user = user_key(version, &user)?;
			print(&contract.get_user_lending_info(signer, &user, options).await?)
		},
		Command::OraclePrice { pool } => {
			let pool = pool_key(version, &pool)?;
			print(&contract.get_oracle_price(signer, &pool, options).await?)
		},
		Command::AllOraclePrice => print(&contract.get_all_oracle_price(signer, options).await?),
		Command::HealthFactor { user } => {
			let user = user_key(version, &user)?;
			let health = contract.get_user_health_factor(signer, &user, options).await?;
			print(&health.to_string())
		},
		Command::UserId { chain, address } => {
			print(&contract.get_dola_user_id(signer, chain, &address, options).await?)
		},
		Command::UserAddresses { user } => {
			let user = user_key(version, &user)?;
			print(&contract.get_dola_user_addresses(signer, &user, options).await?)
		},
		Command::TokenLiquidity { pool } => {
			let pool = pool_key(version, &pool)?;
			let liquidity = contract.get_dola_token_liquidity(signer, &pool, options).await?;
			print(&liquidity.to_string())
		},
		Command::AllowedBorrow { user, pool } => {
			let user = user_key(version, &user)?;
			let pool = pool_key(version, &pool)?;
			let amount = contract
				.get_user_allowed_borrow(signer, &user, &pool, options)
				.await?;
			print(&amount.to_string())
		},
		Command::Claim { .. } => Err("claim is handled by the faucet".into()),
	}
}
