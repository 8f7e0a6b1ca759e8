/// Name of the networks config file
pub const NETWORKS_FILE: &str = "networks.yaml";
/// Directory holding per-network deployment records
pub const DEPLOYMENTS_DIR: &str = "deployments";
/// Default directory with compiled contract artifacts
pub const ARTIFACTS_DIR: &str = "artifacts";

pub const DEFAULT_NETWORK: &str = "localhost";
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// Artifact names of the two contracts the tool deploys
pub const TOKEN_CONTRACT: &str = "Token";
pub const DAO_CONTRACT: &str = "DAO";
