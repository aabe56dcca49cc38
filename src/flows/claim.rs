use alloy::{
    dyn_abi::DynSolValue,
    primitives::{B256, U256},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::MethodDescriptor;
use crate::chain::{BountyLock, ChainStateReader};
use crate::error::{BusinessRuleError, FlowError, ReadError};
use crate::tx::{SignerOptions, TransactionBuilder, TransactionSubmitter};

/// Decision taken from the current epoch and the lock record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimPlan {
    RedeemNow,
    WaitEpochs(u32),
}

/// Decide whether a bounty can be redeemed now. An empty lock is terminal.
pub fn plan_claim(bounty_id: u32, epoch: u32, lock: &BountyLock) -> Result<ClaimPlan, BusinessRuleError> {
    if lock.is_empty() {
        return Err(BusinessRuleError::ZeroBountyAmount { bounty_id });
    }
    if epoch < lock.redeem_after {
        Ok(ClaimPlan::WaitEpochs(lock.redeem_after - epoch))
    } else {
        Ok(ClaimPlan::RedeemNow)
    }
}

/// Wall-clock time for `epochs` epochs at the estimated block time
pub fn epoch_wait(epochs: u32, epoch_length: u64, block_time_secs: f64) -> Result<Duration, ReadError> {
    let secs = epochs as f64 * epoch_length as f64 * block_time_secs;
    Duration::try_from_secs_f64(secs)
        .map_err(|e| ReadError::decode("block time", format!("cannot wait {secs}s: {e}")))
}

/// Output of the planning phase: how long to wait before redeeming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimSchedule {
    pub bounty_id: u32,
    pub epoch: u32,
    pub lock: BountyLock,
    pub wait: Duration,
}

/// Redeem a bounty once its lock epoch has been reached.
///
/// Runs in two phases. [`prepare`](Self::prepare) reads state and computes a
/// single wait; [`redeem`](Self::redeem) submits. [`run`](Self::run) sleeps in
/// between. If the network turns out slower than estimated, the premature
/// redemption is rejected by the contract and surfaces as a submission error.
pub struct EpochGatedClaimFlow<R: ?Sized, B: ?Sized, S: ?Sized> {
    reader: Arc<R>,
    builder: Arc<B>,
    submitter: Arc<S>,
    redeem: MethodDescriptor,
    epoch_length: u64,
}

impl<R, B, S> EpochGatedClaimFlow<R, B, S>
where
    R: ChainStateReader + ?Sized,
    B: TransactionBuilder + ?Sized,
    S: TransactionSubmitter + ?Sized,
{
    /// `epoch_length` is the network's epoch length in blocks
    pub fn new(
        reader: Arc<R>,
        builder: Arc<B>,
        submitter: Arc<S>,
        redeem: MethodDescriptor,
        epoch_length: u64,
    ) -> Self {
        Self {
            reader,
            builder,
            submitter,
            redeem,
            epoch_length,
        }
    }

    /// Read epoch and lock, then compute the wait. Block time is only read
    /// when the lock has not expired yet.
    pub async fn prepare(&self, bounty_id: u32) -> Result<ClaimSchedule, FlowError> {
        let epoch = self.reader.epoch().await?;
        let lock = self.reader.bounty_lock(bounty_id).await?;

        let wait = match plan_claim(bounty_id, epoch, &lock)? {
            ClaimPlan::RedeemNow => Duration::ZERO,
            ClaimPlan::WaitEpochs(epochs) => {
                let block_time = self.reader.block_time_secs().await?;
                epoch_wait(epochs, self.epoch_length, block_time)?
            }
        };

        Ok(ClaimSchedule {
            bounty_id,
            epoch,
            lock,
            wait,
        })
    }

    /// Build and submit `redeemBounty(bountyId)`
    pub async fn redeem(
        &self,
        signer: &SignerOptions,
        schedule: &ClaimSchedule,
    ) -> Result<B256, FlowError> {
        let request = self.builder.build(self.redeem.options(
            signer,
            vec![DynSolValue::Uint(U256::from(schedule.bounty_id), 32)],
        ))?;
        let tx_hash = self.submitter.submit(&request).await?;
        info!(
            bounty_id = schedule.bounty_id,
            amount = %schedule.lock.amount,
            tx_hash = ?tx_hash,
            "Redeem bounty transaction submitted"
        );
        Ok(tx_hash)
    }

    pub async fn run(&self, signer: &SignerOptions, bounty_id: u32) -> Result<B256, FlowError> {
        let schedule = self.prepare(bounty_id).await?;

        if !schedule.wait.is_zero() {
            info!(
                bounty_id,
                epoch = schedule.epoch,
                redeem_after = schedule.lock.redeem_after,
                wait_secs = schedule.wait.as_secs_f64(),
                "Waiting for bounty lock to expire"
            );
            tokio::time::sleep(schedule.wait).await;
        }

        self.redeem(signer, &schedule).await
    }
}
