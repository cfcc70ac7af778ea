use std::{future::Future, pin::Pin};

use alloy::primitives::Address;
use eyre::bail;
use owo_colors::OwoColorize;

use crate::{
    chain::Chain,
    deployer::{Deployer, Deployment},
    error::{DeployError, MigrationError},
};

pub type MigrationFuture<'a> = Pin<Box<dyn Future<Output = Result<(), DeployError>> + 'a>>;

/// A migration callback: receives the deployer, the network name and the
/// accounts available on that network.
pub type MigrationFn<C> =
    for<'a> fn(&'a mut Deployer<C>, &'a str, &'a [Address]) -> MigrationFuture<'a>;

pub struct Migration<C> {
    pub number: u32,
    pub name: &'static str,
    run: MigrationFn<C>,
}

/// Inclusive bounds on the migration numbers to execute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationRange {
    pub from: Option<u32>,
    pub to: Option<u32>,
}

impl MigrationRange {
    pub fn contains(&self, number: u32) -> bool {
        self.from.map_or(true, |from| number >= from) && self.to.map_or(true, |to| number <= to)
    }
}

/// An ordered set of migrations.
pub struct Migrations<C> {
    migrations: Vec<Migration<C>>,
}

impl<C> Default for Migrations<C> {
    fn default() -> Self {
        Self {
            migrations: Vec::new(),
        }
    }
}

impl<C: Chain> Migrations<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a migration. Migrations run in ascending `number` order,
    /// regardless of registration order.
    pub fn add(mut self, number: u32, name: &'static str, run: MigrationFn<C>) -> Self {
        let index = self.migrations.partition_point(|m| m.number <= number);
        self.migrations.insert(index, Migration { number, name, run });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Migration<C>> {
        self.migrations.iter()
    }

    /// Runs the selected migrations one after another against `network`.
    ///
    /// The first failure stops the run; migrations after it are not
    /// executed. Returns every deployment made during the run. On failure
    /// those deployments travel in the [`MigrationError`].
    pub async fn run(
        &self,
        deployer: &mut Deployer<C>,
        network: &str,
        range: MigrationRange,
    ) -> eyre::Result<Vec<Deployment>> {
        let selected: Vec<_> = self
            .migrations
            .iter()
            .filter(|m| range.contains(m.number))
            .collect();
        if selected.is_empty() {
            bail!("no migrations to run in the selected range");
        }

        let accounts = deployer.chain().accounts().await?;
        let chain_id = deployer.chain().chain_id().await?;
        println!(
            "running migrations on network {} (chain id {})",
            network.bright_magenta(),
            chain_id
        );

        deployer.take_deployments();
        for migration in selected {
            println!();
            println!(
                "{}",
                format!("{}_{}", migration.number, migration.name).bold()
            );
            let outcome = (migration.run)(&mut *deployer, network, &accounts).await;
            if let Err(source) = outcome {
                return Err(MigrationError {
                    number: migration.number,
                    name: migration.name.to_owned(),
                    source,
                    deployments: deployer.take_deployments(),
                }
                .into());
            }
        }

        Ok(deployer.take_deployments())
    }
}
