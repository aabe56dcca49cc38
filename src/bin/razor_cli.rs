use alloy::primitives::utils::format_ether;
use anyhow::{Result, anyhow};
use clap::Parser;
use razor_contract_clients::RazorClient;
use razor_txflow::{
    chain::{ChainStateReader, RpcChainStateReader},
    config::{AppConfig, CliArgs, Command},
    flows::{ApprovalOutcome, ConditionalApprovalFlow, EpochGatedClaimFlow, MethodDescriptor},
    retry::retry_flow,
    tx::{AbiTransactionBuilder, RpcTransactionSubmitter, SignerOptions, TransactionSubmitter},
    wallet::ensure_funded,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy()
        .add_directive("alloy=warn".parse()?)
        .add_directive("alloy_pubsub=error".parse()?)
        .add_directive("alloy_transport_ws=off".parse()?);

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true))
        .with(filter)
        .init();

    let cli_args = CliArgs::parse();
    let config = AppConfig::load(&cli_args)?;
    let command = cli_args.command;

    // The deadline is owned here; the flows only yield at their sleep/poll points
    match config.timeout {
        Some(timeout) => tokio::time::timeout(timeout, run(config.clone(), command))
            .await
            .map_err(|_| anyhow!("Command timed out after {}s", timeout.as_secs()))?,
        None => run(config, command).await,
    }
}

async fn run(config: AppConfig, command: Command) -> Result<()> {
    let client = RazorClient::connect(config.contract_config(), &config.private_key).await?;

    let reader = Arc::new(RpcChainStateReader::new(
        client.provider(),
        config.razor_token_address,
        config.stake_manager_address,
        config.epoch_length,
        config.block_time_sample,
    ));
    let builder = Arc::new(AbiTransactionBuilder);
    let submitter = Arc::new(
        RpcTransactionSubmitter::new(client.provider(), client.tx_lock())
            .with_confirmation_policy(config.confirmation),
    );
    let signer = SignerOptions {
        account: client.signer_address(),
        gas_limit: config.gas_limit,
        ..Default::default()
    };

    match command {
        Command::Approve { amount, wait } => {
            ensure_funded(&client).await?;
            let flow = ConditionalApprovalFlow::new(
                reader,
                builder,
                submitter.clone(),
                MethodDescriptor::approve(config.razor_token_address),
                config.stake_manager_address,
            );

            let outcome =
                retry_flow(config.retry.clone(), "approve", || flow.run(&signer, amount)).await?;
            match outcome {
                ApprovalOutcome::AlreadySufficient { allowance } => {
                    info!(allowance = %allowance, "Allowance already sufficient, nothing to do");
                }
                ApprovalOutcome::Submitted { tx_hash } => {
                    info!("Txn Hash: {tx_hash}");
                    if wait {
                        submitter
                            .await_confirmation(tx_hash)
                            .await
                            .into_result("approve")?;
                    }
                }
            }
        }
        Command::ClaimBounty { bounty_id, wait } => {
            ensure_funded(&client).await?;
            let flow = EpochGatedClaimFlow::new(
                reader,
                builder,
                submitter.clone(),
                MethodDescriptor::redeem_bounty(config.stake_manager_address),
                config.epoch_length,
            );

            let tx_hash = retry_flow(config.retry.clone(), "claimBounty", || {
                flow.run(&signer, bounty_id)
            })
            .await?;
            info!("Txn Hash: {tx_hash}");
            if wait {
                submitter
                    .await_confirmation(tx_hash)
                    .await
                    .into_result("redeemBounty")?;
            }
        }
        Command::Status => {
            let address = client.signer_address();
            let eth_balance = client.get_balance().await?;
            let razor_balance = client.token.balance_of(address).await?;
            let allowance = reader
                .allowance(address, config.stake_manager_address)
                .await?;
            let epoch = reader.epoch().await?;
            let block_time = reader.block_time_secs().await?;
            info!(
                address = %address,
                eth = %format_ether(eth_balance),
                razor = %format_ether(razor_balance),
                allowance = %format_ether(allowance),
                epoch,
                block_time_secs = block_time,
                "Account status"
            );
        }
    }

    Ok(())
}
