use std::path::Path;

use anyhow::{bail, Context};
use serde::{de::DeserializeOwned, Serialize};
use xshell::Shell;

/// Marker for configs stored as single files, serialized according to the
/// file extension (yaml, json or toml).
pub trait FileConfigTrait: Serialize + DeserializeOwned {}

pub trait ReadConfig: Sized {
    fn read(shell: &Shell, path: impl AsRef<Path>) -> anyhow::Result<Self>;
}

impl<T: FileConfigTrait> ReadConfig for T {
    fn read(shell: &Shell, path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = shell
            .read_file(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        decode(&raw, path).with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

pub trait SaveConfig {
    fn save(&self, shell: &Shell, path: impl AsRef<Path>) -> anyhow::Result<()>;
}

impl<T: FileConfigTrait> SaveConfig for T {
    fn save(&self, shell: &Shell, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let raw = encode(self, path)?;
        shell
            .write_file(path, raw)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }
}

/// Reads the config when the file exists, otherwise materializes the default
/// on disk and returns it.
pub fn get_or_create_config<T: FileConfigTrait>(
    shell: &Shell,
    path: &Path,
    default: impl FnOnce() -> T,
) -> anyhow::Result<T> {
    if shell.path_exists(path) {
        T::read(shell, path)
    } else {
        let config = default();
        config.save(shell, path)?;
        Ok(config)
    }
}

fn decode<T: DeserializeOwned>(raw: &str, path: &Path) -> anyhow::Result<T> {
    let decoded = match extension(path)? {
        "yaml" | "yml" => serde_yaml::from_str(raw)?,
        "json" => serde_json::from_str(raw)?,
        "toml" => toml::from_str(raw)?,
        other => bail!("Unsupported config format `{other}`"),
    };
    Ok(decoded)
}

fn encode<T: Serialize>(config: &T, path: &Path) -> anyhow::Result<String> {
    let encoded = match extension(path)? {
        "yaml" | "yml" => serde_yaml::to_string(config)?,
        "json" => serde_json::to_string_pretty(config)?,
        "toml" => toml::to_string(config)?,
        other => bail!("Unsupported config format `{other}`"),
    };
    Ok(encoded)
}

fn extension(path: &Path) -> anyhow::Result<&str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .with_context(|| format!("Config file {} has no extension", path.display()))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct SampleConfig {
        name: String,
        retries: u32,
    }

    impl FileConfigTrait for SampleConfig {}

    fn sample() -> SampleConfig {
        SampleConfig {
            name: "devnet".to_string(),
            retries: 3,
        }
    }

    #[test]
    fn roundtrips_through_every_supported_format() {
        let shell = Shell::new().unwrap();
        let dir = tempfile::tempdir().unwrap();

        for file in ["config.yaml", "config.json", "config.toml"] {
            let path = dir.path().join(file);
            sample().save(&shell, &path).unwrap();
            let read = SampleConfig::read(&shell, &path).unwrap();
            assert_eq!(read, sample(), "roundtrip failed for {file}");
        }
    }

    #[test]
    fn rejects_unknown_extension() {
        let shell = Shell::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let err = sample().save(&shell, &path).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[test]
    fn get_or_create_materializes_the_default_once() {
        let shell = Shell::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let created = get_or_create_config(&shell, &path, sample).unwrap();
        assert_eq!(created, sample());
        assert!(path.exists());

        // A second call must read the file back instead of re-defaulting.
        let reread =
            get_or_create_config(&shell, &path, || SampleConfig {
                name: "other".to_string(),
                retries: 0,
            })
            .unwrap();
        assert_eq!(reread, sample());
    }
}
