use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::schema::DATABASE_NAME;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RisiConfig {
    pub database: Option<String>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ServerConfig {
    pub port: Option<u16>,
}

impl RisiConfig {
    /// Database path: explicit flag, then config, then `risi.db`
    pub fn database_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_database_path)
    }

    /// Server port: explicit flag, then config, then 8080
    pub fn port(&self, flag: Option<u16>) -> u16 {
        flag.or_else(|| self.server.as_ref().and_then(|s| s.port))
            .unwrap_or(DEFAULT_PORT)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("risi.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from(DATABASE_NAME)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<RisiConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: RisiConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &RisiConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
