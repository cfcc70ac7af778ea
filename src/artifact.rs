use std::{fs, path::PathBuf};

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use serde::Deserialize;

use crate::error::DeployError;

/// A compiled contract, as written to the build directory by the compiler.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    #[serde(default)]
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl Artifact {
    /// Number of inputs the constructor expects.
    pub fn constructor_inputs(&self) -> usize {
        self.abi
            .constructor
            .as_ref()
            .map_or(0, |constructor| constructor.inputs.len())
    }
}

/// Resolves contract names to artifacts in a build directory.
#[derive(Debug, Clone)]
pub struct Artifacts {
    dir: PathBuf,
}

impl Artifacts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loads the artifact for `name` from `<dir>/<name>.json`.
    pub fn require(&self, name: &str) -> Result<Artifact, DeployError> {
        let path = self.dir.join(format!("{name}.json"));
        if !path.is_file() {
            return Err(DeployError::ArtifactNotFound {
                name: name.to_owned(),
                path,
            });
        }

        let invalid = |reason: String| DeployError::InvalidArtifact {
            name: name.to_owned(),
            reason,
        };
        let json = fs::read_to_string(&path).map_err(|e| invalid(e.to_string()))?;
        let artifact: Artifact = serde_json::from_str(&json).map_err(|e| invalid(e.to_string()))?;

        if artifact.contract_name != name {
            return Err(invalid(format!(
                "file declares contract '{}'",
                artifact.contract_name
            )));
        }
        if artifact.bytecode.is_empty() {
            return Err(DeployError::NotDeployable(name.to_owned()));
        }

        Ok(artifact)
    }
}
