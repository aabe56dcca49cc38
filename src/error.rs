//! Error taxonomy shared by the readers, builder, submitter and flows.
//!
//! Nothing in this crate retries on its own. [`FlowError::is_retryable`] exists
//! so that a caller layering [`crate::retry`] on top can tell transient failures
//! from terminal ones.

use alloy::primitives::B256;
use thiserror::Error;

/// Failure fetching on-chain state
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("network error reading {what}: {message}")]
    Network { what: &'static str, message: String },

    #[error("malformed response reading {what}: {message}")]
    Decode { what: &'static str, message: String },
}

impl ReadError {
    pub fn network(what: &'static str, message: impl ToString) -> Self {
        Self::Network {
            what,
            message: message.to_string(),
        }
    }

    pub fn decode(what: &'static str, message: impl ToString) -> Self {
        Self::Decode {
            what,
            message: message.to_string(),
        }
    }

    /// Classify an Alloy contract call failure
    pub fn from_contract(what: &'static str, error: alloy::contract::Error) -> Self {
        match error {
            alloy::contract::Error::TransportError(e) => Self::network(what, e),
            other => Self::decode(what, other),
        }
    }
}

/// Malformed transaction request. Programming error on the caller's side.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidRequestError {
    #[error("target contract address is zero")]
    MissingTarget,

    #[error("method name is empty")]
    MissingMethod,

    #[error("ABI descriptor has no functions")]
    EmptyAbi,

    #[error("method `{0}` is not present in the ABI")]
    UnknownMethod(String),

    #[error("method `{method}` expects {expected} parameter(s), got {actual}")]
    ArityMismatch {
        method: String,
        expected: String,
        actual: usize,
    },

    #[error("failed to encode parameters for `{method}`: {message}")]
    Encoding { method: String, message: String },
}

/// Business-rule violation. Terminal and never retryable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BusinessRuleError {
    #[error("bounty amount is 0")]
    ZeroBountyAmount { bounty_id: u32 },
}

/// Signing or broadcast failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("{method} reverted: {reason}")]
    Reverted { method: String, reason: String },

    #[error("{method} failed to estimate fees: {message}")]
    FeeEstimation { method: String, message: String },

    #[error("{method} nonce conflict: {message}")]
    NonceConflict { method: String, message: String },

    #[error("{method} rejected: insufficient funds for gas")]
    InsufficientFunds { method: String },

    #[error("{method} failed to send: {message}")]
    Rejected { method: String, message: String },

    /// The node could not be reached before anything was broadcast
    #[error("{method} could not reach the node: {message}")]
    Unavailable { method: String, message: String },
}

/// Any failure a flow can surface to its caller
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    #[error(transparent)]
    BusinessRule(#[from] BusinessRuleError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// The transaction was sent but not seen mined in time. Re-poll with the
    /// hash instead of resubmitting.
    #[error("timed out waiting for confirmation of {tx_hash} after {attempts} attempt(s)")]
    Timeout { tx_hash: B256, attempts: u32 },
}

impl FlowError {
    /// Whether an external retry layer may re-run the whole flow
    pub fn is_retryable(&self) -> bool {
        match self {
            FlowError::Read(ReadError::Network { .. }) => true,
            FlowError::Submission(SubmissionError::NonceConflict { .. })
            | FlowError::Submission(SubmissionError::Unavailable { .. }) => true,
            FlowError::Read(ReadError::Decode { .. })
            | FlowError::InvalidRequest(_)
            | FlowError::BusinessRule(_)
            | FlowError::Submission(_)
            | FlowError::Timeout { .. } => false,
        }
    }
}
