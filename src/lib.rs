//! Client-side orchestration for Razor staking transactions.
//!
//! Two flows sit on top of three injectable collaborators:
//!
//! - [`flows::ConditionalApprovalFlow`] reads the current allowance and only
//!   sends `approve` when it does not already cover the requested amount.
//! - [`flows::EpochGatedClaimFlow`] reads the epoch and a bounty lock, waits
//!   once for the lock to expire using a block-time estimate, then sends
//!   `redeemBounty`.
//!
//! The collaborators are [`chain::ChainStateReader`], [`tx::TransactionBuilder`]
//! and [`tx::TransactionSubmitter`], each with an RPC-backed implementation.

pub mod chain;
pub mod config;
pub mod error;
pub mod flows;
pub mod retry;
pub mod tx;
pub mod wallet;

pub use error::{BusinessRuleError, FlowError, InvalidRequestError, ReadError, SubmissionError};
