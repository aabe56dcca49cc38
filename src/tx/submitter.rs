use alloy::{
    json_abi::JsonAbi,
    network::TransactionBuilder as _,
    primitives::B256,
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest as RpcTransactionRequest},
    transports::{RpcError, TransportErrorKind},
};
use async_trait::async_trait;
use razor_contract_clients::{DecodedRevert, decode_error_with_abi};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::builder::TransactionRequest;
use crate::config::consts::{DEFAULT_CONFIRMATION_MAX_ATTEMPTS, DEFAULT_CONFIRMATION_POLL_SECS};
use crate::error::{FlowError, SubmissionError};

/// Result of waiting for a submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Mined with a successful status
    Confirmed {
        tx_hash: B256,
        block_number: Option<u64>,
        gas_used: u64,
    },
    /// Mined but reverted on-chain
    Failed {
        tx_hash: B256,
        block_number: Option<u64>,
        gas_used: u64,
    },
    /// Not seen mined within the polling budget; the transaction may still land
    TimedOut { tx_hash: B256, attempts: u32 },
}

impl ConfirmationStatus {
    /// `Confirmed` => hash, `Failed` => revert, `TimedOut` => [`FlowError::Timeout`]
    pub fn into_result(self, method: &str) -> Result<B256, FlowError> {
        match self {
            ConfirmationStatus::Confirmed { tx_hash, .. } => Ok(tx_hash),
            ConfirmationStatus::Failed { tx_hash, .. } => Err(SubmissionError::Reverted {
                method: method.to_string(),
                reason: format!("reverted on-chain. Tx hash: {tx_hash:?}"),
            }
            .into()),
            ConfirmationStatus::TimedOut { tx_hash, attempts } => {
                Err(FlowError::Timeout { tx_hash, attempts })
            }
        }
    }
}

/// Bounds for [`TransactionSubmitter::await_confirmation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_CONFIRMATION_POLL_SECS),
            max_attempts: DEFAULT_CONFIRMATION_MAX_ATTEMPTS,
        }
    }
}

/// Signs, broadcasts, and tracks transactions
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Sign and broadcast. Returns the transaction hash on acceptance by the node.
    async fn submit(&self, request: &TransactionRequest) -> Result<B256, SubmissionError>;

    /// Poll until mined or the policy's attempt budget runs out.
    ///
    /// Blocks the calling task; wrap in `tokio::time::timeout` for a hard deadline.
    async fn await_confirmation(&self, tx_hash: B256) -> ConfirmationStatus;
}

/// [`TransactionSubmitter`] over an Alloy provider that has a wallet filler
#[derive(Clone)]
pub struct RpcTransactionSubmitter<P: Provider + Clone> {
    provider: P,
    tx_lock: Arc<Mutex<()>>,
    confirmation: ConfirmationPolicy,
}

impl<P: Provider + Clone> RpcTransactionSubmitter<P> {
    /// `tx_lock` must be shared by every submitter signing with the same key
    pub fn new(provider: P, tx_lock: Arc<Mutex<()>>) -> Self {
        Self {
            provider,
            tx_lock,
            confirmation: ConfirmationPolicy::default(),
        }
    }

    pub fn with_confirmation_policy(mut self, policy: ConfirmationPolicy) -> Self {
        self.confirmation = policy;
        self
    }

    async fn resolve_fees(
        &self,
        method: &str,
        request: &TransactionRequest,
        tx: RpcTransactionRequest,
    ) -> Result<RpcTransactionRequest, SubmissionError> {
        let signer = request.signer();
        let (max_fee, priority_fee) = match (signer.max_fee_per_gas, signer.max_priority_fee_per_gas) {
            (Some(max_fee), Some(priority_fee)) => (max_fee, priority_fee),
            (max_fee, priority_fee) => {
                let estimate = self.provider.estimate_eip1559_fees().await.map_err(|e| {
                    SubmissionError::FeeEstimation {
                        method: method.to_string(),
                        message: e.to_string(),
                    }
                })?;
                (
                    max_fee.unwrap_or(estimate.max_fee_per_gas),
                    priority_fee.unwrap_or(estimate.max_priority_fee_per_gas),
                )
            }
        };

        Ok(tx
            .with_max_fee_per_gas(max_fee)
            .with_max_priority_fee_per_gas(cap_priority_fee(method, max_fee, priority_fee)))
    }
}

#[async_trait]
impl<P: Provider + Clone + 'static> TransactionSubmitter for RpcTransactionSubmitter<P> {
    async fn submit(&self, request: &TransactionRequest) -> Result<B256, SubmissionError> {
        let method = request.method();
        let mut tx = RpcTransactionRequest::default()
            .with_from(request.signer().account)
            .with_to(request.target())
            .with_input(request.calldata().clone());
        if let Some(amount) = request.amount() {
            tx = tx.with_value(amount);
        }
        if let Some(gas) = request.signer().gas_limit {
            tx = tx.with_gas_limit(gas);
        }

        // Pre-simulate to catch reverts with proper error messages
        if let Err(e) = self.provider.call(tx.clone()).await {
            return Err(classify_simulation_failure(method, request.abi(), &e));
        }

        let tx = self.resolve_fees(method, request, tx).await?;

        // Acquire lock and send
        let _guard = self.tx_lock.lock().await;
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| classify_send_failure(method, decode_error_with_abi(&e, request.abi())))?;

        let tx_hash = *pending.tx_hash();
        info!(method = %method, tx_hash = ?tx_hash, "Transaction sent");
        Ok(tx_hash)
    }

    async fn await_confirmation(&self, tx_hash: B256) -> ConfirmationStatus {
        let provider = self.provider.clone();
        poll_for_receipt(self.confirmation, tx_hash, move || {
            let provider = provider.clone();
            async move {
                provider
                    .get_transaction_receipt(tx_hash)
                    .await
                    .map(|receipt| receipt.as_ref().map(ReceiptSummary::from))
                    .map_err(|e| e.to_string())
            }
        })
        .await
    }
}

/// The parts of a receipt the confirmation wait cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReceiptSummary {
    pub status: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
}

impl From<&TransactionReceipt> for ReceiptSummary {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            status: receipt.status(),
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
        }
    }
}

/// Poll `fetch` until it yields a receipt or `policy.max_attempts` polls have been made.
/// Fetch errors are logged and consume an attempt.
pub(crate) async fn poll_for_receipt<F, Fut>(
    policy: ConfirmationPolicy,
    tx_hash: B256,
    fetch: F,
) -> ConfirmationStatus
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Option<ReceiptSummary>, String>>,
{
    let max_attempts = policy.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match fetch().await {
            Ok(Some(receipt)) => {
                let total_cost = receipt.effective_gas_price * receipt.gas_used as u128;
                if receipt.status {
                    info!(
                        tx_hash = ?tx_hash,
                        block_number = ?receipt.block_number,
                        gas_used = receipt.gas_used,
                        effective_gas_price = receipt.effective_gas_price,
                        total_cost,
                        "Transaction confirmed"
                    );
                    return ConfirmationStatus::Confirmed {
                        tx_hash,
                        block_number: receipt.block_number,
                        gas_used: receipt.gas_used,
                    };
                }
                warn!(
                    tx_hash = ?tx_hash,
                    block_number = ?receipt.block_number,
                    gas_used = receipt.gas_used,
                    total_cost,
                    "Transaction reverted on-chain"
                );
                return ConfirmationStatus::Failed {
                    tx_hash,
                    block_number: receipt.block_number,
                    gas_used: receipt.gas_used,
                };
            }
            Ok(None) => {
                debug!(tx_hash = ?tx_hash, attempt, max_attempts, "Transaction not mined yet");
            }
            Err(error) => {
                warn!(tx_hash = ?tx_hash, attempt, max_attempts, %error, "Failed to fetch receipt");
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(policy.poll_interval).await;
        }
    }

    warn!(tx_hash = ?tx_hash, attempts = max_attempts, "Gave up waiting for confirmation");
    ConfirmationStatus::TimedOut {
        tx_hash,
        attempts: max_attempts,
    }
}

/// A priority fee above the max fee is rejected by the node
fn cap_priority_fee(method: &str, max_fee: u128, priority_fee: u128) -> u128 {
    if priority_fee > max_fee {
        warn!(
            method = %method,
            max_fee,
            priority_fee,
            "Priority fee exceeds max fee, capping"
        );
        return max_fee;
    }
    priority_fee
}

/// Map a failed `eth_call`. Only a revert payload is a revert; an unreachable
/// node is retryable since nothing was broadcast.
fn classify_simulation_failure(
    method: &str,
    abi: &JsonAbi,
    error: &RpcError<TransportErrorKind>,
) -> SubmissionError {
    if let RpcError::Transport(kind) = error {
        return SubmissionError::Unavailable {
            method: method.to_string(),
            message: kind.to_string(),
        };
    }
    classify_send_failure(method, decode_error_with_abi(error, abi))
}

/// Map a broadcast failure onto the submission taxonomy
fn classify_send_failure(method: &str, decoded: DecodedRevert) -> SubmissionError {
    let method = method.to_string();
    let message = match decoded {
        DecodedRevert::NoRevertData(message) => message,
        revert => {
            return SubmissionError::Reverted {
                method,
                reason: revert.to_string(),
            };
        }
    };

    let lower = message.to_lowercase();
    if lower.contains("insufficient funds") {
        SubmissionError::InsufficientFunds { method }
    } else if lower.contains("nonce too low")
        || lower.contains("replacement transaction underpriced")
        || lower.contains("already known")
    {
        SubmissionError::NonceConflict { method, message }
    } else if lower.contains("execution reverted") {
        SubmissionError::Reverted {
            method,
            reason: message,
        }
    } else {
        SubmissionError::Rejected { method, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{AbiTransactionBuilder, SignerOptions, TransactionBuilder, TransactionOptions};
    use alloy::{
        dyn_abi::DynSolValue,
        primitives::{Address, Bytes, U256},
        providers::{DynProvider, ProviderBuilder},
        rpc::json_rpc::ErrorPayload,
        sol_types::SolError,
        transports::mock::Asserter,
    };
    use razor_contract_clients::{RAZOR, RazorTokenClient};
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn mocked_submitter(asserter: &Asserter) -> RpcTransactionSubmitter<DynProvider> {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone())
            .erased();
        RpcTransactionSubmitter::new(provider, Arc::new(Mutex::new(())))
    }

    fn approve_request(signer: SignerOptions) -> TransactionRequest {
        let options = TransactionOptions::new(
            signer,
            Address::repeat_byte(0x22),
            "approve",
            Arc::new(RazorTokenClient::<DynProvider>::abi()),
        )
        .with_parameters(vec![
            DynSolValue::Address(Address::repeat_byte(0x33)),
            DynSolValue::Uint(U256::from(1000), 256),
        ]);
        AbiTransactionBuilder.build(options).unwrap()
    }

    fn signer() -> SignerOptions {
        SignerOptions::new(Address::repeat_byte(0x11))
    }

    fn hash() -> B256 {
        B256::with_last_byte(1)
    }

    fn policy(max_attempts: u32) -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_secs(2),
            max_attempts,
        }
    }

    fn receipt(status: bool) -> ReceiptSummary {
        ReceiptSummary {
            status,
            block_number: Some(21_000),
            gas_used: 46_000,
            effective_gas_price: 1_000_000_000,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_after_pending_polls() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let start = tokio::time::Instant::now();

        let status = poll_for_receipt(policy(5), hash(), || {
            let calls = calls_clone.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Ok(None)
                } else {
                    Ok(Some(receipt(true)))
                }
            }
        })
        .await;

        assert_eq!(
            status,
            ConfirmationStatus::Confirmed {
                tx_hash: hash(),
                block_number: Some(21_000),
                gas_used: 46_000,
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_receipt() {
        let status = poll_for_receipt(policy(3), hash(), || async { Ok(Some(receipt(false))) }).await;
        assert!(matches!(status, ConfirmationStatus::Failed { .. }));
        assert!(matches!(
            status.into_result("approve"),
            Err(FlowError::Submission(SubmissionError::Reverted { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_never_mined() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let status = poll_for_receipt(policy(4), hash(), || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("connection reset".to_string())
            }
        })
        .await;

        assert_eq!(
            status,
            ConfirmationStatus::TimedOut {
                tx_hash: hash(),
                attempts: 4
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(
            status.into_result("redeemBounty"),
            Err(FlowError::Timeout {
                tx_hash: hash(),
                attempts: 4
            })
        );
    }

    #[test]
    fn test_classify_send_failure() {
        assert_eq!(
            classify_send_failure(
                "approve",
                DecodedRevert::NoRevertData("insufficient funds for gas * price + value".into())
            ),
            SubmissionError::InsufficientFunds {
                method: "approve".into()
            }
        );
        assert!(matches!(
            classify_send_failure("approve", DecodedRevert::NoRevertData("nonce too low".into())),
            SubmissionError::NonceConflict { .. }
        ));
        assert!(matches!(
            classify_send_failure(
                "approve",
                DecodedRevert::NoRevertData("replacement transaction underpriced".into())
            ),
            SubmissionError::NonceConflict { .. }
        ));
        assert!(matches!(
            classify_send_failure("approve", DecodedRevert::NoRevertData("bad signature".into())),
            SubmissionError::Rejected { .. }
        ));
        assert_eq!(
            classify_send_failure("redeemBounty", DecodedRevert::Reason("Redeem epoch not reached".into())),
            SubmissionError::Reverted {
                method: "redeemBounty".into(),
                reason: "Redeem epoch not reached".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_simulation_error_without_revert_data_is_not_a_revert() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("connection reset");

        let err = mocked_submitter(&asserter)
            .submit(&approve_request(signer()))
            .await
            .unwrap_err();

        match &err {
            SubmissionError::Rejected { method, message } => {
                assert_eq!(method, "approve");
                assert!(message.contains("connection reset"), "{message}");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_node_during_simulation_is_retryable() {
        // No queued response: the mocked transport itself fails
        let asserter = Asserter::new();

        let err = mocked_submitter(&asserter)
            .submit(&approve_request(signer()))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::Unavailable { .. }), "{err:?}");
        assert!(FlowError::from(err).is_retryable());
    }

    #[tokio::test]
    async fn test_simulation_revert_names_the_contract_error() {
        let asserter = Asserter::new();
        let data = RAZOR::ERC20InvalidSpender {
            spender: Address::ZERO,
        }
        .abi_encode();
        let payload: ErrorPayload = serde_json::from_value(json!({
            "code": 3,
            "message": "execution reverted",
            "data": Bytes::from(data),
        }))
        .unwrap();
        asserter.push_failure(payload);

        let err = mocked_submitter(&asserter)
            .submit(&approve_request(signer()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SubmissionError::Reverted {
                method: "approve".into(),
                reason: format!("ERC20InvalidSpender({})", Address::ZERO),
            }
        );
        assert!(!FlowError::from(err).is_retryable());
    }

    #[tokio::test]
    async fn test_priority_fee_capped_at_max_fee() {
        // Both fees overridden, so no estimate is requested
        let asserter = Asserter::new();
        let request = approve_request(SignerOptions {
            max_fee_per_gas: Some(10),
            max_priority_fee_per_gas: Some(50),
            ..signer()
        });

        let tx = mocked_submitter(&asserter)
            .resolve_fees("approve", &request, RpcTransactionRequest::default())
            .await
            .unwrap();

        assert_eq!(tx.max_fee_per_gas, Some(10));
        assert_eq!(tx.max_priority_fee_per_gas, Some(10));
    }

    #[test]
    fn test_cap_priority_fee() {
        assert_eq!(cap_priority_fee("approve", 100, 2), 2);
        assert_eq!(cap_priority_fee("approve", 100, 100), 100);
        assert_eq!(cap_priority_fee("approve", 100, 250), 100);
    }

    #[test]
    fn test_reverted_without_payload_is_still_a_revert() {
        assert!(matches!(
            classify_send_failure(
                "redeemBounty",
                DecodedRevert::NoRevertData("execution reverted".into())
            ),
            SubmissionError::Reverted { .. }
        ));
    }
}
