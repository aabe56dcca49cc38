use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::config::consts::{
    DEFAULT_BLOCK_TIME_SAMPLE, DEFAULT_CONFIRMATION_MAX_ATTEMPTS, DEFAULT_CONFIRMATION_POLL_SECS,
    DEFAULT_EPOCH_LENGTH, DEFAULT_MAX_WS_RETRIES,
};

/// Network constants, typically shipped as a TOML file per deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub razor_token_address: Option<Address>,
    #[serde(default)]
    pub stake_manager_address: Option<Address>,
    #[serde(default = "default_epoch_length")]
    pub epoch_length: u64,
    #[serde(default = "default_block_time_sample")]
    pub block_time_sample: u64,
    #[serde(default = "default_confirmation_poll_secs")]
    pub confirmation_poll_secs: u64,
    #[serde(default = "default_confirmation_max_attempts")]
    pub confirmation_max_attempts: u32,
    #[serde(default = "default_max_ws_retries")]
    pub max_ws_retries: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            razor_token_address: None,
            stake_manager_address: None,
            epoch_length: default_epoch_length(),
            block_time_sample: default_block_time_sample(),
            confirmation_poll_secs: default_confirmation_poll_secs(),
            confirmation_max_attempts: default_confirmation_max_attempts(),
            max_ws_retries: default_max_ws_retries(),
        }
    }
}

/// Load network constants from a TOML file.
pub fn load_network_config<P: AsRef<Path>>(path: P) -> anyhow::Result<NetworkConfig> {
    let s = fs::read_to_string(path)?;
    let cfg: NetworkConfig = toml::from_str(&s)?;
    Ok(cfg)
}

fn default_epoch_length() -> u64 {
    DEFAULT_EPOCH_LENGTH
}

fn default_block_time_sample() -> u64 {
    DEFAULT_BLOCK_TIME_SAMPLE
}

fn default_confirmation_poll_secs() -> u64 {
    DEFAULT_CONFIRMATION_POLL_SECS
}

fn default_confirmation_max_attempts() -> u32 {
    DEFAULT_CONFIRMATION_MAX_ATTEMPTS
}

fn default_max_ws_retries() -> u32 {
    DEFAULT_MAX_WS_RETRIES
}
