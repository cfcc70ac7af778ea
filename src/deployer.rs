use alloy::primitives::{Address, Bytes, TxHash, U256};
use owo_colors::OwoColorize;

use crate::{
    artifact::{Artifact, Artifacts},
    chain::Chain,
    error::DeployError,
    formatting::{format_cost, format_gas, format_init_code_size},
};

/// A contract instance published by a [`Deployer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub contract_name: String,
    pub address: Address,
    pub transaction_hash: TxHash,
    pub gas_used: u128,
    pub effective_gas_price: u128,
}

impl Deployment {
    /// Total fee paid for the deployment, in wei.
    pub fn cost(&self) -> U256 {
        U256::from(self.gas_used) * U256::from(self.effective_gas_price)
    }
}

/// Publishes contracts from a single account.
///
/// Handed to every migration by the runner. Deploying is never idempotent:
/// each call creates a new instance at a new address.
pub struct Deployer<C> {
    chain: C,
    artifacts: Artifacts,
    from: Address,
    deployments: Vec<Deployment>,
}

impl<C: Chain> Deployer<C> {
    pub fn new(chain: C, artifacts: Artifacts, from: Address) -> Self {
        Self {
            chain,
            artifacts,
            from,
            deployments: Vec::new(),
        }
    }

    /// Creates a deployer sending from the first account the chain offers.
    pub async fn connect(chain: C, artifacts: Artifacts) -> Result<Self, DeployError> {
        let accounts = chain.accounts().await?;
        let from = accounts.first().copied().ok_or(DeployError::NoAccounts)?;
        Ok(Self::new(chain, artifacts, from))
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    pub fn from(&self) -> Address {
        self.from
    }

    /// Deployments made so far, oldest first.
    pub fn deployments(&self) -> &[Deployment] {
        &self.deployments
    }

    /// Deploys `artifact`, whose constructor must take no arguments.
    pub async fn deploy(&mut self, artifact: &Artifact) -> Result<Deployment, DeployError> {
        let expected = artifact.constructor_inputs();
        if expected > 0 {
            return Err(DeployError::ConstructorArguments {
                name: artifact.contract_name.clone(),
                expected,
            });
        }

        self.deploy_with_args(artifact, &[]).await
    }

    /// Deploys `artifact` with ABI-encoded constructor arguments appended to
    /// its creation code.
    pub async fn deploy_with_args(
        &mut self,
        artifact: &Artifact,
        args: &[u8],
    ) -> Result<Deployment, DeployError> {
        let init_code = Bytes::from([&artifact.bytecode[..], args].concat());

        println!();
        println!("Deploying '{}'", artifact.contract_name.bright_cyan());
        println!("> init code size: {}", format_init_code_size(init_code.len()));

        let deployed = self.chain.deploy(self.from, init_code).await?;
        let deployment = Deployment {
            contract_name: artifact.contract_name.clone(),
            address: deployed.address,
            transaction_hash: deployed.transaction_hash,
            gas_used: deployed.gas_used,
            effective_gas_price: deployed.effective_gas_price,
        };

        println!(
            "> transaction hash: {}",
            deployment.transaction_hash.bright_magenta()
        );
        println!("> contract address: {}", deployment.address.bright_purple());
        println!("> account: {}", self.from);
        println!("> gas used: {}", format_gas(deployment.gas_used));
        let cost = format_cost(deployment.cost()).unwrap_or("???".red().to_string());
        println!("> total cost: {cost}");

        self.deployments.push(deployment.clone());
        Ok(deployment)
    }

    /// Hands back the deployments recorded since the last call.
    pub(crate) fn take_deployments(&mut self) -> Vec<Deployment> {
        std::mem::take(&mut self.deployments)
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, Address};

    use super::Deployer;
    use crate::{
        artifact::{
            tests::{build_dir, SIMPLE_STORAGE},
            Artifacts,
        },
        chain::testing::{MemoryChain, GAS_PRICE},
        error::DeployError,
    };

    const ALICE: Address = address!("90F8bf6A479f320ead074411a4B0e7944Ea8c9C1");
    const BOB: Address = address!("FFcf8FDEE72ac11b5c542428B35EEF5769C409f0");

    #[tokio::test]
    async fn connects_with_first_account() {
        let dir = build_dir(&[]);
        let chain = MemoryChain::new(vec![ALICE, BOB]);
        let deployer = Deployer::connect(chain, Artifacts::new(dir.path())).await.unwrap();
        assert_eq!(deployer.from(), ALICE);
    }

    #[tokio::test]
    async fn refuses_to_connect_without_accounts() {
        let dir = build_dir(&[]);
        let chain = MemoryChain::new(vec![]);
        let result = Deployer::connect(chain, Artifacts::new(dir.path())).await;
        assert!(matches!(result, Err(DeployError::NoAccounts)));
    }

    #[tokio::test]
    async fn deploys_creation_code() {
        let dir = build_dir(&[("SimpleStorage", SIMPLE_STORAGE)]);
        let artifacts = Artifacts::new(dir.path());
        let artifact = artifacts.require("SimpleStorage").unwrap();
        let mut deployer = Deployer::new(MemoryChain::new(vec![ALICE]), artifacts, ALICE);

        let deployment = deployer.deploy(&artifact).await.unwrap();

        assert_eq!(deployment.contract_name, "SimpleStorage");
        assert_eq!(deployment.address, ALICE.create(0));
        assert_eq!(deployment.effective_gas_price, GAS_PRICE);
        assert_eq!(
            deployer.chain().code_at(deployment.address),
            Some(artifact.bytecode.clone())
        );
        assert_eq!(deployer.deployments(), [deployment]);
    }

    #[tokio::test]
    async fn appends_constructor_arguments() {
        let dir = build_dir(&[("SimpleStorage", SIMPLE_STORAGE)]);
        let artifacts = Artifacts::new(dir.path());
        let artifact = artifacts.require("SimpleStorage").unwrap();
        let mut deployer = Deployer::new(MemoryChain::new(vec![ALICE]), artifacts, ALICE);

        let args = [0u8; 32];
        let deployment = deployer.deploy_with_args(&artifact, &args).await.unwrap();

        let code = deployer.chain().code_at(deployment.address).unwrap();
        assert_eq!(code.len(), artifact.bytecode.len() + 32);
        assert!(code.starts_with(&artifact.bytecode));
    }

    #[tokio::test]
    async fn requires_constructor_arguments_when_declared() {
        let json = r#"{
  "contractName": "Token",
  "abi": [
    {
      "inputs": [{ "internalType": "uint256", "name": "supply", "type": "uint256" }],
      "stateMutability": "nonpayable",
      "type": "constructor"
    }
  ],
  "bytecode": "0x60806040"
}"#;
        let dir = build_dir(&[("Token", json)]);
        let artifacts = Artifacts::new(dir.path());
        let artifact = artifacts.require("Token").unwrap();
        let mut deployer = Deployer::new(MemoryChain::new(vec![ALICE]), artifacts, ALICE);

        let err = deployer.deploy(&artifact).await.unwrap_err();

        assert!(matches!(
            err,
            DeployError::ConstructorArguments { expected: 1, .. }
        ));
        assert_eq!(deployer.chain().contracts(), 0);
    }

    #[tokio::test]
    async fn reverted_deploy_records_nothing() {
        let dir = build_dir(&[("SimpleStorage", SIMPLE_STORAGE)]);
        let artifacts = Artifacts::new(dir.path());
        let artifact = artifacts.require("SimpleStorage").unwrap();
        let mut deployer = Deployer::new(MemoryChain::reverting(vec![ALICE]), artifacts, ALICE);

        let err = deployer.deploy(&artifact).await.unwrap_err();

        assert!(matches!(err, DeployError::Reverted { .. }));
        assert!(deployer.deployments().is_empty());
    }
}
