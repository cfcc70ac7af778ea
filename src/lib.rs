pub mod config;
pub use config::run;

pub mod artifact;
pub mod chain;
pub mod deployer;
pub mod error;
pub mod migrations;
pub mod runner;

mod formatting;
mod wallet;

use alloy::{
    network::EthereumWallet,
    primitives::U256,
    providers::{ProviderBuilder, RootProvider},
    transports::http::{Client, Http},
};
use eyre::WrapErr;
use owo_colors::OwoColorize;

use crate::{
    artifact::Artifacts,
    chain::Chain,
    chain::RpcChain,
    config::Migrate,
    deployer::{Deployer, Deployment},
    error::MigrationError,
    formatting::format_cost,
};

/// Runs the project's migrations against the network in `config`.
pub async fn migrate(config: &Migrate) -> eyre::Result<()> {
    let rpc_url = config.endpoint.parse()?;
    println!("connecting to RPC: {}", config.endpoint.bright_magenta());

    match config.auth.wallet()? {
        Some(signer) => {
            let sender = signer.address();
            let provider = ProviderBuilder::new()
                .with_recommended_fillers()
                .wallet(EthereumWallet::from(signer))
                .on_http(rpc_url);
            let chain = RpcChain::<_, Http<Client>>::with_signer(provider, sender);
            migrate_on(chain, config).await
        }
        None => {
            let provider = ProviderBuilder::new()
                .with_recommended_fillers()
                .on_http(rpc_url);
            let chain = RpcChain::<_, Http<Client>>::new(provider);
            migrate_on(chain, config).await
        }
    }
}

async fn migrate_on<C: Chain>(chain: C, config: &Migrate) -> eyre::Result<()> {
    let artifacts = Artifacts::new(&config.build_dir);
    let mut deployer = Deployer::connect(chain, artifacts)
        .await
        .wrap_err("failed to pick an account to deploy from")?;
    println!("deploying from: {}", deployer.from().bright_purple());

    let result = migrations::migrations()
        .run(&mut deployer, &config.network, config.range())
        .await;

    match result {
        Ok(deployments) => {
            println!();
            println!("{}", "migrations complete".bright_green());
            print_summary(&deployments);
            Ok(())
        }
        Err(e) => {
            if let Some(failed) = e.downcast_ref::<MigrationError>() {
                println!();
                println!("{}", "migrations halted".red());
                print_summary(&failed.deployments);
            }
            Err(e)
        }
    }
}

fn print_summary(deployments: &[Deployment]) {
    let cost = format_cost(total_cost(deployments)).unwrap_or("???".red().to_string());
    println!("> total deployments: {}", deployments.len());
    println!("> final cost: {cost}");
}

fn total_cost(deployments: &[Deployment]) -> U256 {
    deployments
        .iter()
        .fold(U256::ZERO, |total, deployment| total + deployment.cost())
}

/// Prints the registered migrations in the order they run.
pub fn list() -> eyre::Result<()> {
    let migrations =
        migrations::migrations::<RpcChain<RootProvider<Http<Client>>, Http<Client>>>();
    for migration in migrations.iter() {
        println!("{}_{}", migration.number, migration.name);
    }

    Ok(())
}
