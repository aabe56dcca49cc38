use alloy::primitives::{Address, U256};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use razor_contract_clients::ContractConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::config::consts::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_SECS, DEFAULT_RPC_URL};
use crate::config::network::{NetworkConfig, load_network_config};
use crate::retry::RetryConfig;
use crate::tx::ConfirmationPolicy;
use crate::wallet::signer_address;

/// CLI arguments for the Razor client
#[derive(Parser, Debug)]
#[command(name = "razor_cli")]
#[command(
    about = "Razor staking client - conditional approvals and epoch-gated bounty claims",
    long_about = None
)]
pub struct CliArgs {
    /// Ethereum RPC endpoint (will be converted to WebSocket)
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Private key of the signing account
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// TOML file with network constants and contract addresses
    #[arg(long, env = "RAZOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// RAZOR token contract address (overrides the config file)
    #[arg(long, env = "RAZOR_TOKEN_ADDRESS")]
    pub razor_token_address: Option<Address>,

    /// StakeManager contract address (overrides the config file)
    #[arg(long, env = "STAKE_MANAGER_ADDRESS")]
    pub stake_manager_address: Option<Address>,

    /// Epoch length in blocks (overrides the config file)
    #[arg(long, env = "EPOCH_LENGTH")]
    pub epoch_length: Option<u64>,

    /// Fixed gas limit for submitted transactions
    #[arg(long, env = "GAS_LIMIT")]
    pub gas_limit: Option<u64>,

    /// Abort the command after this many seconds, including any epoch wait
    #[arg(long, env = "TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Re-run the command on transient failures up to this many attempts
    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Approve the StakeManager to spend RAZOR unless the allowance already covers the amount
    Approve {
        /// Amount in wei
        #[arg(long)]
        amount: U256,

        /// Wait for the approval to be mined
        #[arg(long)]
        wait: bool,
    },
    /// Redeem a bounty, waiting for its lock epoch first if needed
    ClaimBounty {
        #[arg(long)]
        bounty_id: u32,

        /// Wait for the redemption to be mined
        #[arg(long)]
        wait: bool,
    },
    /// Print allowance, epoch and block-time estimate without submitting anything
    Status,
}

/// Client configuration with all required values resolved
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rpc_url: String,
    pub private_key: String,
    pub razor_token_address: Address,
    pub stake_manager_address: Address,
    pub epoch_length: u64,
    pub block_time_sample: u64,
    pub max_ws_retries: u32,
    pub gas_limit: Option<u64>,
    pub timeout: Option<Duration>,
    pub confirmation: ConfirmationPolicy,
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Load configuration with priority: CLI/env -> config file -> defaults
    pub fn load(args: &CliArgs) -> Result<Self> {
        let network = match &args.config {
            Some(path) => load_network_config(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => NetworkConfig::default(),
        };
        let config = Self::resolve(args, network)?;
        let wallet_address = signer_address(&config.private_key)?;

        info!(
            rpc_url = %config.rpc_url,
            razor_token = %config.razor_token_address,
            stake_manager = %config.stake_manager_address,
            epoch_length = config.epoch_length,
            wallet_address = %wallet_address,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn resolve(args: &CliArgs, network: NetworkConfig) -> Result<Self> {
        let rpc_url = args
            .rpc_url
            .clone()
            .or(network.rpc_url)
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let razor_token_address = args
            .razor_token_address
            .or(network.razor_token_address)
            .context("RAZOR token address not set (--razor-token-address or config file)")?;
        let stake_manager_address = args
            .stake_manager_address
            .or(network.stake_manager_address)
            .context("StakeManager address not set (--stake-manager-address or config file)")?;
        let epoch_length = args.epoch_length.unwrap_or(network.epoch_length);
        if epoch_length == 0 {
            anyhow::bail!("Epoch length must be at least one block");
        }

        Ok(Self {
            rpc_url,
            private_key: args.private_key.clone(),
            razor_token_address,
            stake_manager_address,
            epoch_length,
            block_time_sample: network.block_time_sample,
            max_ws_retries: network.max_ws_retries,
            gas_limit: args.gas_limit,
            timeout: args.timeout_secs.map(Duration::from_secs),
            confirmation: ConfirmationPolicy {
                poll_interval: Duration::from_secs(network.confirmation_poll_secs),
                max_attempts: network.confirmation_max_attempts,
            },
            retry: RetryConfig::fixed(DEFAULT_RETRY_DELAY_SECS, args.max_attempts.max(1)),
        })
    }

    pub fn contract_config(&self) -> ContractConfig {
        ContractConfig::new(
            self.rpc_url.clone(),
            self.razor_token_address,
            self.stake_manager_address,
        )
        .with_max_ws_retries(self.max_ws_retries)
    }
}
