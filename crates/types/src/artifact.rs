use ethers::abi::Abi;
use ethers::types::Bytes;

/// Compiled contract ready for deployment: the ABI plus creation bytecode,
/// as produced by a hardhat or foundry build.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
    /// Compiler version from artifact metadata, when the build records one.
    pub compiler_version: Option<String>,
}
