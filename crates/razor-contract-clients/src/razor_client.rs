use crate::{ContractConfig, RazorTokenClient};
use alloy::{
    network::{Ethereum, EthereumWallet, NetworkWallet},
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
    signers::local::PrivateKeySigner,
};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Connection bundle: a signing Alloy provider plus the token client.
///
/// The provider is owned here and handed out as a clone to readers and
/// submitters; closing the connection is dropping the last clone.
#[derive(Clone)]
pub struct RazorClient {
    provider: DynProvider,
    wallet: EthereumWallet,
    tx_lock: Arc<Mutex<()>>,
    pub token: RazorTokenClient<DynProvider>,
}

impl RazorClient {
    pub async fn connect(config: ContractConfig, private_key: &str) -> anyhow::Result<Self> {
        let ws_url = config
            .rpc_url
            .replace("http://", "ws://")
            .replace("https://", "wss://");

        let ws = WsConnect::new(ws_url.clone()).with_max_retries(config.max_ws_retries);
        let signer = private_key
            .trim_start_matches("0x")
            .parse::<PrivateKeySigner>()
            .context("Failed to parse private key")?;
        let wallet = EthereumWallet::from(signer);

        // Build a provider that can sign transactions, then erase the concrete type
        let provider: DynProvider = ProviderBuilder::new()
            .wallet(wallet.clone())
            .with_simple_nonce_management()
            .with_gas_estimation()
            .connect_ws(ws)
            .await
            .context("Failed to connect to RPC endpoint")?
            .erased();

        let token = RazorTokenClient::new(provider.clone(), config.razor_token_address);

        let client = Self {
            provider,
            wallet,
            tx_lock: Arc::new(Mutex::new(())),
            token,
        };
        info!(
            rpc_url = %ws_url,
            signer = %client.signer_address(),
            razor_token = %config.razor_token_address,
            stake_manager = %config.stake_manager_address,
            "Connected to Razor contracts"
        );
        Ok(client)
    }

    pub fn provider(&self) -> DynProvider {
        self.provider.clone()
    }

    /// Lock serializing sends from this signer
    pub fn tx_lock(&self) -> Arc<Mutex<()>> {
        self.tx_lock.clone()
    }

    /// Get the signer address
    pub fn signer_address(&self) -> Address {
        <EthereumWallet as NetworkWallet<Ethereum>>::default_signer_address(&self.wallet)
    }

    /// Get the native balance of the signer
    pub async fn get_balance(&self) -> anyhow::Result<U256> {
        Ok(self.provider.get_balance(self.signer_address()).await?)
    }
}
