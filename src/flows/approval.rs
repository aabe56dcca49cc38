use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, B256, U256},
};
use std::sync::Arc;
use tracing::{debug, info};

use super::MethodDescriptor;
use crate::chain::ChainStateReader;
use crate::error::FlowError;
use crate::tx::{SignerOptions, TransactionBuilder, TransactionSubmitter};

/// Whether an approval transaction is required at all
pub fn needs_approval(allowance: U256, requested: U256) -> bool {
    allowance < requested
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// The allowance already covered the request; nothing was sent
    AlreadySufficient { allowance: U256 },
    /// An `approve` transaction was broadcast
    Submitted { tx_hash: B256 },
}

impl ApprovalOutcome {
    /// The broadcast hash, or [`B256::ZERO`] when no transaction was needed
    pub fn tx_hash(&self) -> B256 {
        match self {
            ApprovalOutcome::AlreadySufficient { .. } => B256::ZERO,
            ApprovalOutcome::Submitted { tx_hash } => *tx_hash,
        }
    }

    pub fn was_submitted(&self) -> bool {
        matches!(self, ApprovalOutcome::Submitted { .. })
    }
}

/// Approve `spender` for an amount, skipping the transaction when the current
/// allowance already covers it. Repeated runs with a satisfied allowance never submit.
pub struct ConditionalApprovalFlow<R: ?Sized, B: ?Sized, S: ?Sized> {
    reader: Arc<R>,
    builder: Arc<B>,
    submitter: Arc<S>,
    approve: MethodDescriptor,
    spender: Address,
}

impl<R, B, S> ConditionalApprovalFlow<R, B, S>
where
    R: ChainStateReader + ?Sized,
    B: TransactionBuilder + ?Sized,
    S: TransactionSubmitter + ?Sized,
{
    pub fn new(
        reader: Arc<R>,
        builder: Arc<B>,
        submitter: Arc<S>,
        approve: MethodDescriptor,
        spender: Address,
    ) -> Self {
        Self {
            reader,
            builder,
            submitter,
            approve,
            spender,
        }
    }

    /// A failed allowance read aborts before anything is built or sent.
    /// Submission errors are returned as-is; retrying is the caller's call.
    pub async fn run(
        &self,
        signer: &SignerOptions,
        amount: U256,
    ) -> Result<ApprovalOutcome, FlowError> {
        let allowance = self.reader.allowance(signer.account, self.spender).await?;

        if !needs_approval(allowance, amount) {
            debug!(
                allowance = %allowance,
                requested = %amount,
                "Sufficient allowance, no need to increase"
            );
            return Ok(ApprovalOutcome::AlreadySufficient { allowance });
        }

        info!(
            allowance = %allowance,
            requested = %amount,
            spender = %self.spender,
            "Sending approve transaction"
        );
        let request = self.builder.build(self.approve.options(
            signer,
            vec![
                DynSolValue::Address(self.spender),
                DynSolValue::Uint(amount, 256),
            ],
        ))?;
        let tx_hash = self.submitter.submit(&request).await?;
        info!(tx_hash = ?tx_hash, "Approve transaction submitted");

        Ok(ApprovalOutcome::Submitted { tx_hash })
    }
}
