//! Caller-side retry policy.
//!
//! The flows never retry internally. A caller that wants retries wraps a whole
//! flow invocation, so each attempt re-reads chain state before acting:
//!
//! ```ignore
//! use razor_txflow::retry::{retry_flow, RetryConfig};
//!
//! let hash = retry_flow(RetryConfig::fixed(5, 3), "approve", || async {
//!     approval.run(&signer, amount).await
//! })
//! .await?;
//! ```

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::consts::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_SECS};
use crate::error::FlowError;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one. Must be at least 1.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::fixed(DEFAULT_RETRY_DELAY_SECS, DEFAULT_MAX_ATTEMPTS)
    }
}

impl RetryConfig {
    /// Create a fixed-delay retry configuration.
    pub fn fixed(delay_secs: u64, max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::from_secs(delay_secs),
        }
    }
}

/// Retry an async operation, but only for errors the classifier accepts.
///
/// Non-retryable errors fail immediately without consuming the remaining attempts.
pub async fn retry_with_classifier<F, Fut, T, E, C>(
    config: RetryConfig,
    operation_name: &str,
    operation: F,
    is_retryable: C,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    C: Fn(&E) -> bool,
{
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => {
                if !is_retryable(&e) {
                    debug!(
                        operation = operation_name,
                        error = %e,
                        "Non-retryable error, failing immediately"
                    );
                    return Err(e);
                }

                if attempt >= config.max_attempts {
                    if config.max_attempts > 1 {
                        warn!(
                            operation = operation_name,
                            attempt,
                            max_attempts = config.max_attempts,
                            error = %e,
                            "Max retry attempts exhausted"
                        );
                    }
                    return Err(e);
                }

                let delay = config.delay;
                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_secs = delay.as_secs(),
                    error = %e,
                    "Operation failed, retrying after delay"
                );

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Retry a whole flow invocation on transient [`FlowError`]s only
pub async fn retry_flow<F, Fut, T>(
    config: RetryConfig,
    operation_name: &str,
    operation: F,
) -> Result<T, FlowError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, FlowError>>,
{
    retry_with_classifier(config, operation_name, operation, FlowError::is_retryable).await
}
