use alloy::{
    primitives::{Address, U256, utils::format_ether},
    signers::local::PrivateKeySigner,
};
use anyhow::{Context, Result};
use razor_contract_clients::RazorClient;
use tracing::{info, warn};

use crate::config::consts::MIN_ETH_BALANCE;

/// Address of a private key (with or without 0x prefix)
pub fn signer_address(private_key: &str) -> Result<Address> {
    let key = private_key.trim_start_matches("0x");
    let signer = key
        .parse::<PrivateKeySigner>()
        .context("Failed to parse private key")?;
    Ok(signer.address())
}

/// Fail if `balance` cannot pay for gas
pub fn check_min_balance(address: Address, balance: U256) -> Result<()> {
    if balance < MIN_ETH_BALANCE {
        warn!(
            address = %address,
            balance = %format_ether(balance),
            "Signer balance below minimum"
        );
        anyhow::bail!(
            "Insufficient funds. {address} requires at least {} ETH to pay for gas.",
            format_ether(MIN_ETH_BALANCE)
        );
    }
    Ok(())
}

/// Fetch the signer's native balance and make sure it can pay for gas
pub async fn ensure_funded(client: &RazorClient) -> Result<U256> {
    let address = client.signer_address();
    info!("Checking balance for address: {address}");
    let balance = client
        .get_balance()
        .await
        .context("Failed to fetch balance")?;
    check_min_balance(address, balance)?;
    Ok(balance)
}
