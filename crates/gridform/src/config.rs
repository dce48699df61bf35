//! `gridform.toml` loading, mirroring the teacher's `core-config::load_from`
//! shape: a local file takes priority, otherwise fall back to the platform
//! config directory; unknown keys are ignored so the file can evolve without
//! warnings.

use std::{fs, path::PathBuf};

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ContainerConfig {
    #[serde(default = "ContainerConfig::default_block_expand")]
    pub block_expand: i64,
}

impl ContainerConfig {
    const fn default_block_expand() -> i64 {
        2
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            block_expand: Self::default_block_expand(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub container: ContainerConfig,
}

/// Prefer `./gridform.toml`, then `$XDG_CONFIG_HOME/gridform/gridform.toml`
/// (or the platform equivalent via `dirs::config_dir`).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("gridform.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("gridform").join("gridform.toml");
    }
    PathBuf::from("gridform.toml")
}

/// Load `path` (or the discovered default) if it exists; a missing file is
/// not an error, it just yields defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<ConfigFile> {
    let path = path.unwrap_or_else(discover);
    match fs::read_to_string(&path) {
        Ok(content) => {
            let file: ConfigFile = toml::from_str(&content)?;
            tracing::debug!(target: "gridform.config", path = %path.display(), "loaded config file");
            Ok(file)
        }
        Err(_) => Ok(ConfigFile::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_default_block_expand() {
        let file = load_from(Some(PathBuf::from("/nonexistent/gridform.toml"))).unwrap();
        assert_eq!(file.container.block_expand, 2);
    }

    #[test]
    fn parses_container_block_expand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridform.toml");
        fs::write(&path, "[container]\nblock_expand = 3\n").unwrap();
        let file = load_from(Some(path)).unwrap();
        assert_eq!(file.container.block_expand, 3);
    }
}
