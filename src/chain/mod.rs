//! Read-only access to the on-chain facts the flows decide on.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::error::ReadError;

mod rpc;

pub use rpc::RpcChainStateReader;

/// A pending reward that unlocks at `redeem_after`.
///
/// `amount == 0` means there is nothing to claim (never existed or already redeemed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BountyLock {
    pub amount: U256,
    pub redeem_after: u32,
    pub bounty_hunter: Address,
}

impl BountyLock {
    pub fn is_empty(&self) -> bool {
        self.amount.is_zero()
    }
}

/// Snapshot reads against current confirmed state. No side effects.
#[async_trait]
pub trait ChainStateReader: Send + Sync {
    /// How much `spender` may transfer on behalf of `owner`
    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ReadError>;

    /// Current network epoch
    async fn epoch(&self) -> Result<u32, ReadError>;

    /// Lock record for a bounty
    async fn bounty_lock(&self, bounty_id: u32) -> Result<BountyLock, ReadError>;

    /// Average seconds between recent blocks. Scheduling heuristic only.
    async fn block_time_secs(&self) -> Result<f64, ReadError>;
}
