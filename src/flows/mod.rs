//! Read-then-act orchestration over the chain reader, builder and submitter.
//!
//! Collaborators are injected through constructors; the flows hold no mutable state.

use alloy::{dyn_abi::DynSolValue, json_abi::JsonAbi, primitives::Address};
use razor_contract_clients::{RAZOR, StakeManager};
use std::sync::Arc;

use crate::tx::{SignerOptions, TransactionOptions};

pub mod approval;
pub mod claim;

#[cfg(test)]
pub(crate) mod mock;

pub use approval::{ApprovalOutcome, ConditionalApprovalFlow, needs_approval};
pub use claim::{ClaimPlan, ClaimSchedule, EpochGatedClaimFlow, epoch_wait, plan_claim};

/// A contract method a flow may call: `(contract, method, abi)`
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub contract: Address,
    pub method: &'static str,
    pub abi: Arc<JsonAbi>,
}

impl MethodDescriptor {
    /// `RAZOR.approve(spender, amount)`
    pub fn approve(token: Address) -> Self {
        Self {
            contract: token,
            method: "approve",
            abi: Arc::new(RAZOR::abi::contract()),
        }
    }

    /// `StakeManager.redeemBounty(bountyId)`
    pub fn redeem_bounty(stake_manager: Address) -> Self {
        Self {
            contract: stake_manager,
            method: "redeemBounty",
            abi: Arc::new(StakeManager::abi::contract()),
        }
    }

    pub(crate) fn options(
        &self,
        signer: &SignerOptions,
        parameters: Vec<DynSolValue>,
    ) -> TransactionOptions {
        TransactionOptions::new(signer.clone(), self.contract, self.method, self.abi.clone())
            .with_parameters(parameters)
    }
}
