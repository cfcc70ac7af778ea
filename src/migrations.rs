use alloy::primitives::Address;

use crate::{
    chain::Chain,
    deployer::Deployer,
    error::DeployError,
    runner::{MigrationFuture, Migrations},
};

/// The project's migrations, in the order they are applied.
pub fn migrations<C: Chain>() -> Migrations<C> {
    Migrations::new().add(2, "deploy_contracts", deploy_contracts)
}

/// Deploys `SimpleStorage` to whichever network the runner targets.
pub fn deploy_contracts<'a, C: Chain>(
    deployer: &'a mut Deployer<C>,
    _network: &'a str,
    _accounts: &'a [Address],
) -> MigrationFuture<'a> {
    Box::pin(async move {
        let simple_storage = deployer.artifacts().require("SimpleStorage")?;
        deployer.deploy(&simple_storage).await?;
        Ok::<(), DeployError>(())
    })
}
