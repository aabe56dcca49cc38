use alloy::primitives::Address;

pub mod errors;
pub mod razor_client;
pub mod razor_token;
pub mod stake_manager;

// ============================================================================
// Client Type Re-exports
// ============================================================================

pub use errors::{DecodedRevert, decode_error_with_abi, decode_revert_data, decode_revert_with_abi};
pub use razor_client::RazorClient;
pub use razor_token::{RAZOR, RazorTokenClient};
pub use stake_manager::{StakeManager, StakeManagerClient};

// ============================================================================
// Contract Configuration
// ============================================================================

/// Addresses and connection settings for the Razor network contracts
#[derive(Clone, Debug)]
pub struct ContractConfig {
    pub razor_token_address: Address,
    pub stake_manager_address: Address,
    pub rpc_url: String,
    pub max_ws_retries: u32,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            razor_token_address: Address::ZERO,
            stake_manager_address: Address::ZERO,
            rpc_url: String::new(),
            max_ws_retries: 10,
        }
    }
}

impl ContractConfig {
    /// Create a new configuration for deployed contracts
    ///
    /// # Arguments
    /// * `rpc_url` - Ethereum RPC endpoint (HTTP or WebSocket)
    /// * `razor_token_address` - Address of the RAZOR ERC-20 token
    /// * `stake_manager_address` - Address of the StakeManager (the approval spender)
    pub fn new(rpc_url: String, razor_token_address: Address, stake_manager_address: Address) -> Self {
        Self {
            razor_token_address,
            stake_manager_address,
            rpc_url,
            ..Default::default()
        }
    }

    pub fn with_max_ws_retries(mut self, retries: u32) -> Self {
        self.max_ws_retries = retries;
        self
    }
}
