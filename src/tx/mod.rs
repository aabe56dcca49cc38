pub mod builder;
pub mod submitter;

pub use builder::{
    AbiTransactionBuilder, SignerOptions, TransactionBuilder, TransactionOptions,
    TransactionRequest,
};
pub use submitter::{
    ConfirmationPolicy, ConfirmationStatus, RpcTransactionSubmitter, TransactionSubmitter,
};
