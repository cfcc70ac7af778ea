use std::path::PathBuf;

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::deployer::Deployment;

/// Everything that can go wrong while resolving or deploying a contract.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("could not find artifact for contract '{name}' at {}", .path.display())]
    ArtifactNotFound { name: String, path: PathBuf },
    #[error("artifact for contract '{name}' is invalid: {reason}")]
    InvalidArtifact { name: String, reason: String },
    #[error("contract '{0}' has no creation bytecode; abstract contracts and interfaces cannot be deployed")]
    NotDeployable(String),
    #[error("contract '{name}' expects {expected} constructor argument(s), got none")]
    ConstructorArguments { name: String, expected: usize },
    #[error("no account available to deploy from")]
    NoAccounts,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("transaction rejected by the node: {0}")]
    Rejected(String),
    #[error("deployment transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },
    #[error("failed to read contract address from receipt of {tx_hash}")]
    MissingAddress { tx_hash: TxHash },
}

/// A numbered migration that failed, halting the run.
#[derive(Debug, Error)]
#[error("migration {number}_{name} failed")]
pub struct MigrationError {
    pub number: u32,
    pub name: String,
    #[source]
    pub source: DeployError,
    /// Deployments made by earlier migrations of the same run.
    pub deployments: Vec<Deployment>,
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn artifact_not_found_names_contract_and_path() {
        let err = DeployError::ArtifactNotFound {
            name: "SimpleStorage".to_owned(),
            path: PathBuf::from("build/contracts/SimpleStorage.json"),
        };
        assert_eq!(
            err.to_string(),
            "could not find artifact for contract 'SimpleStorage' at build/contracts/SimpleStorage.json"
        );
    }

    #[test]
    fn migration_error_keeps_its_source() {
        let err = MigrationError {
            number: 2,
            name: "deploy_contracts".to_owned(),
            source: DeployError::NoAccounts,
            deployments: Vec::new(),
        };
        assert_eq!(err.to_string(), "migration 2_deploy_contracts failed");
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("no account available to deploy from"));
    }
}
