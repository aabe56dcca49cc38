use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, U256},
    providers::Provider,
};
use async_trait::async_trait;
use razor_contract_clients::{RazorTokenClient, StakeManagerClient};
use tracing::debug;

use super::{BountyLock, ChainStateReader};
use crate::error::ReadError;

/// [`ChainStateReader`] backed by an Alloy provider
#[derive(Clone)]
pub struct RpcChainStateReader<P: Provider + Clone> {
    provider: P,
    token: RazorTokenClient<P>,
    stake_manager: StakeManagerClient<P>,
    epoch_length: u64,
    block_time_sample: u64,
}

impl<P: Provider + Clone> RpcChainStateReader<P> {
    /// # Arguments
    /// * `epoch_length` - Epoch length in blocks (network constant)
    /// * `block_time_sample` - Number of trailing blocks averaged for the block-time estimate
    pub fn new(
        provider: P,
        token_address: Address,
        stake_manager_address: Address,
        epoch_length: u64,
        block_time_sample: u64,
    ) -> Self {
        Self {
            token: RazorTokenClient::new(provider.clone(), token_address),
            stake_manager: StakeManagerClient::new(provider.clone(), stake_manager_address),
            provider,
            epoch_length: epoch_length.max(1),
            block_time_sample: block_time_sample.max(1),
        }
    }

    async fn block_timestamp(&self, number: u64) -> Result<u64, ReadError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await
            .map_err(|e| ReadError::network("block time", e))?
            .ok_or_else(|| ReadError::decode("block time", format!("missing block {number}")))?;
        Ok(block.header.timestamp)
    }
}

#[async_trait]
impl<P: Provider + Clone + 'static> ChainStateReader for RpcChainStateReader<P> {
    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ReadError> {
        self.token
            .allowance(owner, spender)
            .await
            .map_err(|e| ReadError::from_contract("allowance", e))
    }

    async fn epoch(&self) -> Result<u32, ReadError> {
        let block_number = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| ReadError::network("epoch", e))?;
        epoch_at(block_number, self.epoch_length)
    }

    async fn bounty_lock(&self, bounty_id: u32) -> Result<BountyLock, ReadError> {
        let record = self
            .stake_manager
            .bounty_lock(bounty_id)
            .await
            .map_err(|e| ReadError::from_contract("bounty lock", e))?;
        Ok(BountyLock {
            amount: record.amount,
            redeem_after: record.redeem_after,
            bounty_hunter: record.bounty_hunter,
        })
    }

    async fn block_time_secs(&self) -> Result<f64, ReadError> {
        let latest = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| ReadError::network("block time", e))?;
        let span = self.block_time_sample.min(latest);
        if span == 0 {
            return Err(ReadError::decode("block time", "chain has a single block"));
        }

        let newest = self.block_timestamp(latest).await?;
        let oldest = self.block_timestamp(latest - span).await?;
        let secs = average_block_time(newest, oldest, span)?;
        debug!(latest, span, block_time_secs = secs, "Estimated block time");
        Ok(secs)
    }
}

/// Epoch containing `block_number`
fn epoch_at(block_number: u64, epoch_length: u64) -> Result<u32, ReadError> {
    u32::try_from(block_number / epoch_length)
        .map_err(|_| ReadError::decode("epoch", format!("block {block_number} overflows epoch counter")))
}

fn average_block_time(newest: u64, oldest: u64, span: u64) -> Result<f64, ReadError> {
    if newest <= oldest {
        return Err(ReadError::decode(
            "block time",
            format!("non-increasing timestamps ({oldest} -> {newest})"),
        ));
    }
    Ok((newest - oldest) as f64 / span as f64)
}
