use std::path::PathBuf;

use anyhow::{bail, Context};
use ethers::abi::Abi;
use ethers::types::Bytes;
use serde::Deserialize;
use xshell::Shell;

use daoctl_types::ContractArtifact;

/// Locates and parses compiled contract JSON produced by a hardhat or
/// foundry build.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load(&self, shell: &Shell, contract: &str) -> anyhow::Result<ContractArtifact> {
        let path = self.locate(shell, contract)?;
        let raw = shell
            .read_file(&path)
            .with_context(|| format!("Failed to read artifact {}", path.display()))?;
        parse_artifact(&raw, contract)
            .with_context(|| format!("Malformed artifact {}", path.display()))
    }

    // Hardhat-style flat layout first, then the foundry <Name>.sol/ nesting.
    fn locate(&self, shell: &Shell, contract: &str) -> anyhow::Result<PathBuf> {
        let flat = self.root.join(format!("{contract}.json"));
        if shell.path_exists(&flat) {
            return Ok(flat);
        }
        let nested = self
            .root
            .join(format!("{contract}.sol"))
            .join(format!("{contract}.json"));
        if shell.path_exists(&nested) {
            return Ok(nested);
        }
        bail!(
            "No artifact for contract `{contract}` under {}; run the contract build first",
            self.root.display()
        )
    }
}

#[derive(Deserialize)]
struct RawArtifact {
    #[serde(default, alias = "contractName")]
    contract_name: Option<String>,
    abi: Abi,
    #[serde(default)]
    bytecode: Option<RawBytecode>,
    #[serde(default)]
    metadata: Option<RawMetadata>,
}

// Hardhat stores bytecode as a hex string, foundry wraps it in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

// Foundry writes `metadata` as an object and `rawMetadata` as a JSON string;
// hardhat artifacts carry neither.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMetadata {
    Inline { compiler: Option<RawCompiler> },
    Json(String),
}

#[derive(Deserialize)]
struct RawCompiler {
    version: Option<String>,
}

impl RawMetadata {
    fn compiler_version(self) -> Option<String> {
        match self {
            RawMetadata::Inline { compiler } => compiler.and_then(|c| c.version),
            RawMetadata::Json(raw) => serde_json::from_str::<serde_json::Value>(&raw)
                .ok()?
                .pointer("/compiler/version")?
                .as_str()
                .map(str::to_string),
        }
    }
}

fn parse_artifact(raw: &str, contract: &str) -> anyhow::Result<ContractArtifact> {
    let artifact: RawArtifact = serde_json::from_str(raw)?;
    let bytecode = match artifact.bytecode {
        Some(RawBytecode::Hex(hex)) | Some(RawBytecode::Object { object: hex }) => {
            decode_bytecode(&hex)?
        }
        None => bail!("Artifact has no bytecode field"),
    };
    if bytecode.is_empty() {
        bail!("Artifact bytecode is empty; is `{contract}` abstract?");
    }
    Ok(ContractArtifact {
        contract_name: artifact.contract_name.unwrap_or_else(|| contract.to_string()),
        abi: artifact.abi,
        bytecode: Bytes::from(bytecode),
        compiler_version: artifact.metadata.and_then(RawMetadata::compiler_version),
    })
}

fn decode_bytecode(raw: &str) -> anyhow::Result<Vec<u8>> {
    hex::decode(raw.trim_start_matches("0x")).context("Bytecode is not valid hex")
}
