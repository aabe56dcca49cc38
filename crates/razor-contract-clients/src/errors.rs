//! Revert decoding for contract calls and raw RPC errors.

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt},
    json_abi::JsonAbi,
    primitives::{Bytes, U256},
    sol_types::{Panic, Revert, SolError},
    transports::{RpcError, TransportErrorKind},
};
use std::fmt;

/// Human-readable interpretation of a failed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedRevert {
    /// `require(cond, "reason")` / `revert("reason")`
    Reason(String),
    /// Solidity panic (assert, overflow, division by zero, ...)
    Panic(U256),
    /// Custom error declared in the contract's ABI
    Contract { name: String, args: Vec<String> },
    /// Revert payload with an unknown selector
    Custom { selector: [u8; 4], data: Bytes },
    /// The node returned no revert payload; keeps the transport message
    NoRevertData(String),
}

impl fmt::Display for DecodedRevert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedRevert::Reason(reason) => write!(f, "{reason}"),
            DecodedRevert::Panic(code) => write!(f, "panic code {code:#x}"),
            DecodedRevert::Contract { name, args } => write!(f, "{name}({})", args.join(", ")),
            DecodedRevert::Custom { selector, data } => {
                write!(f, "custom error {} ({} bytes)", Bytes::copy_from_slice(selector), data.len())
            }
            DecodedRevert::NoRevertData(message) => write!(f, "{message}"),
        }
    }
}

/// Errors that may carry a revert payload
pub trait RevertSource: fmt::Display {
    fn revert_data(&self) -> Option<Bytes>;
}

impl RevertSource for RpcError<TransportErrorKind> {
    fn revert_data(&self) -> Option<Bytes> {
        self.as_error_resp().and_then(|payload| payload.as_revert_data())
    }
}

/// Decode a raw revert payload. Returns `None` for an empty payload.
pub fn decode_revert_data(data: &[u8]) -> Option<DecodedRevert> {
    if data.len() < 4 {
        return None;
    }

    if let Ok(revert) = Revert::abi_decode(data) {
        return Some(DecodedRevert::Reason(revert.reason));
    }
    if let Ok(panic) = Panic::abi_decode(data) {
        return Some(DecodedRevert::Panic(panic.code));
    }

    let mut selector = [0u8; 4];
    selector.copy_from_slice(&data[..4]);
    Some(DecodedRevert::Custom {
        selector,
        data: Bytes::copy_from_slice(&data[4..]),
    })
}

/// Like [`decode_revert_data`], but resolves custom errors declared in `abi` by name
pub fn decode_revert_with_abi(data: &[u8], abi: &JsonAbi) -> Option<DecodedRevert> {
    match decode_revert_data(data)? {
        DecodedRevert::Custom { selector, data } => Some(
            abi.errors()
                .filter(|error| error.selector().0 == selector)
                .find_map(|error| {
                    let values = error.abi_decode_input(&data).ok()?;
                    Some(DecodedRevert::Contract {
                        name: error.name.clone(),
                        args: values.iter().map(format_value).collect(),
                    })
                })
                .unwrap_or(DecodedRevert::Custom { selector, data }),
        ),
        decoded => Some(decoded),
    }
}

/// Decode whatever revert information an error carries, naming custom errors
/// declared in the called contract's ABI
pub fn decode_error_with_abi<E: RevertSource + ?Sized>(error: &E, abi: &JsonAbi) -> DecodedRevert {
    error
        .revert_data()
        .and_then(|data| decode_revert_with_abi(&data, abi))
        .unwrap_or_else(|| DecodedRevert::NoRevertData(error.to_string()))
}

fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(address) => address.to_string(),
        DynSolValue::Uint(value, _) => value.to_string(),
        DynSolValue::Int(value, _) => value.to_string(),
        DynSolValue::Bool(value) => value.to_string(),
        DynSolValue::String(value) => format!("{value:?}"),
        other => format!("{other:?}"),
    }
}
