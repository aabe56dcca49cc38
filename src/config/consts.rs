//! Centralized constants used as CLI and configuration defaults.

use alloy::primitives::U256;

// =============================================================================
// Network Constants
// =============================================================================

/// Default RPC endpoint
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Epoch length in blocks
pub const DEFAULT_EPOCH_LENGTH: u64 = 300;

/// Number of trailing blocks averaged when estimating block time
pub const DEFAULT_BLOCK_TIME_SAMPLE: u64 = 10;

/// WebSocket reconnection attempts
pub const DEFAULT_MAX_WS_RETRIES: u32 = 10;

// =============================================================================
// Confirmation Wait
// =============================================================================

/// Seconds between receipt polls
pub const DEFAULT_CONFIRMATION_POLL_SECS: u64 = 2;

/// Receipt polls before giving up
pub const DEFAULT_CONFIRMATION_MAX_ATTEMPTS: u32 = 30;

// =============================================================================
// Caller-side Retry
// =============================================================================

/// Flow attempts when the caller opts into retries (1 = no retry)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Delay between flow attempts in seconds
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

// =============================================================================
// Wallet
// =============================================================================

/// Convert ETH to wei at compile time
const fn eth_to_wei(eth: f64) -> U256 {
    let wei = (eth * 1_000_000_000_000_000_000.0) as u64;
    U256::from_limbs([wei, 0, 0, 0])
}

/// Minimum native balance required before submitting anything
pub const MIN_ETH_BALANCE: U256 = eth_to_wei(0.00001);
