use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt},
    json_abi::{Function, JsonAbi},
    primitives::{Address, Bytes, U256},
};
use std::sync::Arc;

use crate::error::InvalidRequestError;

/// Who signs and how gas is paid. Key material stays in the provider's wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerOptions {
    pub account: Address,
    pub gas_limit: Option<u64>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

impl SignerOptions {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            ..Default::default()
        }
    }
}

/// Everything needed to assemble one contract call
#[derive(Debug, Clone)]
pub struct TransactionOptions {
    pub signer: SignerOptions,
    pub target: Address,
    pub method: String,
    pub abi: Arc<JsonAbi>,
    pub parameters: Vec<DynSolValue>,
    pub amount: Option<U256>,
}

impl TransactionOptions {
    pub fn new(
        signer: SignerOptions,
        target: Address,
        method: impl Into<String>,
        abi: Arc<JsonAbi>,
    ) -> Self {
        Self {
            signer,
            target,
            method: method.into(),
            abi,
            parameters: Vec::new(),
            amount: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<DynSolValue>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_amount(mut self, amount: U256) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// A validated, encoded call ready for submission. Built fresh per attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    signer: SignerOptions,
    target: Address,
    abi: Arc<JsonAbi>,
    function: Function,
    parameters: Vec<DynSolValue>,
    amount: Option<U256>,
    calldata: Bytes,
}

impl TransactionRequest {
    pub fn signer(&self) -> &SignerOptions {
        &self.signer
    }

    pub fn target(&self) -> Address {
        self.target
    }

    /// ABI of the target contract, used to name its custom errors on revert
    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    pub fn method(&self) -> &str {
        &self.function.name
    }

    /// Full signature, e.g. `approve(address,uint256)`
    pub fn signature(&self) -> String {
        self.function.signature()
    }

    pub fn parameters(&self) -> &[DynSolValue] {
        &self.parameters
    }

    pub fn amount(&self) -> Option<U256> {
        self.amount
    }

    /// Selector followed by the ABI-encoded parameters
    pub fn calldata(&self) -> &Bytes {
        &self.calldata
    }
}

/// Assembles [`TransactionRequest`]s. Pure, no network access.
pub trait TransactionBuilder: Send + Sync {
    fn build(&self, options: TransactionOptions) -> Result<TransactionRequest, InvalidRequestError>;
}

/// Builder that validates the call against its JSON ABI and encodes it
#[derive(Debug, Clone, Copy, Default)]
pub struct AbiTransactionBuilder;

impl TransactionBuilder for AbiTransactionBuilder {
    fn build(&self, options: TransactionOptions) -> Result<TransactionRequest, InvalidRequestError> {
        let TransactionOptions {
            signer,
            target,
            method,
            abi,
            parameters,
            amount,
        } = options;

        if target.is_zero() {
            return Err(InvalidRequestError::MissingTarget);
        }
        if method.is_empty() {
            return Err(InvalidRequestError::MissingMethod);
        }
        if abi.functions.is_empty() {
            return Err(InvalidRequestError::EmptyAbi);
        }

        let overloads = abi
            .function(&method)
            .ok_or_else(|| InvalidRequestError::UnknownMethod(method.clone()))?;
        let function = overloads
            .iter()
            .find(|f| f.inputs.len() == parameters.len())
            .ok_or_else(|| InvalidRequestError::ArityMismatch {
                method: method.clone(),
                expected: overloads
                    .iter()
                    .map(|f| f.inputs.len().to_string())
                    .collect::<Vec<_>>()
                    .join(" or "),
                actual: parameters.len(),
            })?;

        let calldata = function
            .abi_encode_input(&parameters)
            .map_err(|e| InvalidRequestError::Encoding {
                method: method.clone(),
                message: e.to_string(),
            })?;

        Ok(TransactionRequest {
            signer,
            target,
            function: function.clone(),
            abi: abi.clone(),
            parameters,
            amount,
            calldata: calldata.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use razor_contract_clients::RazorTokenClient;

    const TOKEN: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
    const SPENDER: Address = address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");

    fn token_abi() -> Arc<JsonAbi> {
        Arc::new(RazorTokenClient::<alloy::providers::DynProvider>::abi())
    }

    fn approve_options() -> TransactionOptions {
        TransactionOptions::new(SignerOptions::default(), TOKEN, "approve", token_abi())
            .with_parameters(vec![
                DynSolValue::Address(SPENDER),
                DynSolValue::Uint(U256::from(1000u64), 256),
            ])
    }

    #[test]
    fn test_build_approve() {
        let request = AbiTransactionBuilder.build(approve_options()).unwrap();

        assert_eq!(request.target(), TOKEN);
        assert_eq!(request.method(), "approve");
        assert_eq!(request.signature(), "approve(address,uint256)");
        // selector + two 32-byte words
        assert_eq!(request.calldata().len(), 4 + 64);
        // keccak256("approve(address,uint256)")[..4]
        assert_eq!(&request.calldata()[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(request.amount(), None);
    }

    #[test]
    fn test_build_carries_amount_and_signer() {
        let signer = SignerOptions {
            account: SPENDER,
            gas_limit: Some(100_000),
            ..Default::default()
        };
        let mut options = approve_options().with_amount(U256::from(5u8));
        options.signer = signer.clone();

        let request = AbiTransactionBuilder.build(options).unwrap();
        assert_eq!(request.amount(), Some(U256::from(5u8)));
        assert_eq!(request.signer(), &signer);
    }

    #[test]
    fn test_arity_mismatch_fails_fast() {
        let options = approve_options().with_parameters(vec![DynSolValue::Address(SPENDER)]);
        let err = AbiTransactionBuilder.build(options).unwrap_err();
        assert_eq!(
            err,
            InvalidRequestError::ArityMismatch {
                method: "approve".into(),
                expected: "2".into(),
                actual: 1,
            }
        );
    }

    #[test]
    fn test_rejects_missing_pieces() {
        let mut options = approve_options();
        options.target = Address::ZERO;
        assert_eq!(
            AbiTransactionBuilder.build(options).unwrap_err(),
            InvalidRequestError::MissingTarget
        );

        let mut options = approve_options();
        options.method = String::new();
        assert_eq!(
            AbiTransactionBuilder.build(options).unwrap_err(),
            InvalidRequestError::MissingMethod
        );

        let mut options = approve_options();
        options.abi = Arc::new(JsonAbi::default());
        assert_eq!(
            AbiTransactionBuilder.build(options).unwrap_err(),
            InvalidRequestError::EmptyAbi
        );

        let mut options = approve_options();
        options.method = "transferFrom".into();
        assert_eq!(
            AbiTransactionBuilder.build(options).unwrap_err(),
            InvalidRequestError::UnknownMethod("transferFrom".into())
        );
    }

    #[test]
    fn test_type_mismatch_is_encoding_error() {
        let options = approve_options().with_parameters(vec![
            DynSolValue::Bool(true),
            DynSolValue::Uint(U256::from(1u8), 256),
        ]);
        let err = AbiTransactionBuilder.build(options).unwrap_err();
        assert!(matches!(err, InvalidRequestError::Encoding { .. }));
    }
}
