use std::path::PathBuf;

use daoctl_config::{ARTIFACTS_DIR, NETWORKS_FILE};

const CONFIG_ENV: &str = "DAOCTL_CONFIG";
const ARTIFACTS_ENV: &str = "DAOCTL_ARTIFACTS";

/// Networks config path: explicit flag, then env override, then the file in
/// the working directory.
pub fn config_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(NETWORKS_FILE))
}

/// Artifacts directory: explicit flag, then env override, then `artifacts/`
/// in the working directory.
pub fn artifacts_root(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var(ARTIFACTS_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(ARTIFACTS_DIR))
}
