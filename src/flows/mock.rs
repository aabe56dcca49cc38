use alloy::primitives::{Address, B256, U256, address};
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::time::Instant;

use crate::chain::{BountyLock, ChainStateReader};
use crate::error::{ReadError, SubmissionError};
use crate::tx::{ConfirmationStatus, TransactionRequest, TransactionSubmitter};

pub(crate) const SIGNER: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
pub(crate) const TOKEN: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
pub(crate) const STAKE_MANAGER: Address = address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");

pub(crate) fn tx_hash() -> B256 {
    B256::with_last_byte(1)
}

/// Reader returning canned values and recording which reads happened
pub(crate) struct MockReader {
    pub allowance: Result<U256, ReadError>,
    pub epoch: Result<u32, ReadError>,
    pub bounty_lock: Result<BountyLock, ReadError>,
    pub block_time_secs: Result<f64, ReadError>,
    reads: Mutex<Vec<&'static str>>,
}

impl MockReader {
    pub fn new() -> Self {
        Self {
            allowance: Ok(U256::ZERO),
            epoch: Ok(0),
            bounty_lock: Ok(BountyLock {
                amount: U256::ZERO,
                redeem_after: 0,
                bounty_hunter: SIGNER,
            }),
            block_time_secs: Ok(2.0),
            reads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_allowance(mut self, allowance: u64) -> Self {
        self.allowance = Ok(U256::from(allowance));
        self
    }

    pub fn with_epoch(mut self, epoch: Result<u32, ReadError>) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn with_lock(mut self, amount: u64, redeem_after: u32) -> Self {
        self.bounty_lock = Ok(BountyLock {
            amount: U256::from(amount),
            redeem_after,
            bounty_hunter: SIGNER,
        });
        self
    }

    pub fn reads(&self) -> Vec<&'static str> {
        self.reads.lock().unwrap().clone()
    }

    fn record(&self, what: &'static str) {
        self.reads.lock().unwrap().push(what);
    }
}

#[async_trait]
impl ChainStateReader for MockReader {
    async fn allowance(&self, _owner: Address, _spender: Address) -> Result<U256, ReadError> {
        self.record("allowance");
        self.allowance.clone()
    }

    async fn epoch(&self) -> Result<u32, ReadError> {
        self.record("epoch");
        self.epoch.clone()
    }

    async fn bounty_lock(&self, _bounty_id: u32) -> Result<BountyLock, ReadError> {
        self.record("bounty_lock");
        self.bounty_lock.clone()
    }

    async fn block_time_secs(&self) -> Result<f64, ReadError> {
        self.record("block_time");
        self.block_time_secs.clone()
    }
}

/// Submitter recording every request together with the (virtual) time it arrived
pub(crate) struct MockSubmitter {
    pub result: Result<B256, SubmissionError>,
    pub confirmation: ConfirmationStatus,
    submitted: Mutex<Vec<(TransactionRequest, Instant)>>,
}

impl MockSubmitter {
    pub fn new() -> Self {
        Self {
            result: Ok(tx_hash()),
            confirmation: ConfirmationStatus::Confirmed {
                tx_hash: tx_hash(),
                block_number: Some(1),
                gas_used: 21_000,
            },
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: SubmissionError) -> Self {
        Self {
            result: Err(error),
            ..Self::new()
        }
    }

    pub fn submissions(&self) -> Vec<(TransactionRequest, Instant)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionSubmitter for MockSubmitter {
    async fn submit(&self, request: &TransactionRequest) -> Result<B256, SubmissionError> {
        self.submitted
            .lock()
            .unwrap()
            .push((request.clone(), Instant::now()));
        self.result.clone()
    }

    async fn await_confirmation(&self, _tx_hash: B256) -> ConfirmationStatus {
        self.confirmation
    }
}
